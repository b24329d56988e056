//! Injectable get-or-fetch cache with a fixed TTL.
//!
//! Used by the input-gathering layer only. The scoring path never reads
//! from a cache.

use async_trait::async_trait;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::future::Future;
use std::hash::Hash;
use std::time::{Duration, Instant};
use tracing::debug;

use crate::error::ProviderError;
use crate::models::{ReverseChronologicalGameLog, Sport};
use crate::providers::GameLogProvider;

struct Entry<V> {
    value: V,
    inserted_at: Instant,
}

impl<V> Entry<V> {
    fn is_fresh(&self, ttl: Duration) -> bool {
        self.inserted_at.elapsed() < ttl
    }
}

pub struct TtlCache<K, V> {
    ttl: Duration,
    entries: RwLock<FxHashMap<K, Entry<V>>>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(FxHashMap::default()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Fresh value for the key, if any.
    pub fn get(&self, key: &K) -> Option<V> {
        let entries = self.entries.read();
        entries
            .get(key)
            .filter(|e| e.is_fresh(self.ttl))
            .map(|e| e.value.clone())
    }

    pub fn insert(&self, key: K, value: V) {
        self.entries.write().insert(
            key,
            Entry {
                value,
                inserted_at: Instant::now(),
            },
        );
    }

    /// Return the cached value or run `fetch` and store a successful result.
    pub fn get_or_fetch<E>(&self, key: K, fetch: impl FnOnce() -> Result<V, E>) -> Result<V, E> {
        if let Some(value) = self.get(&key) {
            return Ok(value);
        }
        let value = fetch()?;
        self.insert(key, value.clone());
        Ok(value)
    }

    /// Async variant. The lock is never held across the fetch.
    ///
    /// Concurrent misses on the same key are not coalesced; each caller
    /// fetches and the last insert wins.
    pub async fn get_or_fetch_async<E, F, Fut>(&self, key: K, fetch: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.get(&key) {
            return Ok(value);
        }
        let value = fetch().await?;
        self.insert(key, value.clone());
        Ok(value)
    }

    pub fn invalidate(&self, key: &K) -> bool {
        self.entries.write().remove(key).is_some()
    }

    /// Drop expired entries, returning how many were removed.
    pub fn purge_expired(&self) -> usize {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, e| e.is_fresh(self.ttl));
        before - entries.len()
    }

    /// Number of stored entries, including expired ones not yet purged
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }
}

/// Game-log provider wrapper that caches per (player, sport).
pub struct CachedGameLogProvider<P> {
    inner: P,
    cache: TtlCache<(String, Sport), ReverseChronologicalGameLog>,
}

impl<P: GameLogProvider> CachedGameLogProvider<P> {
    pub fn new(inner: P, ttl: Duration) -> Self {
        Self {
            inner,
            cache: TtlCache::new(ttl),
        }
    }

    pub fn cache(&self) -> &TtlCache<(String, Sport), ReverseChronologicalGameLog> {
        &self.cache
    }
}

#[async_trait]
impl<P: GameLogProvider> GameLogProvider for CachedGameLogProvider<P> {
    async fn game_logs(&self, player_id: &str, sport: Sport) -> Result<ReverseChronologicalGameLog, ProviderError> {
        let key = (player_id.to_string(), sport);
        self.cache
            .get_or_fetch_async(key, || async {
                debug!("Game log cache miss for {} ({})", player_id, sport);
                self.inner.game_logs(player_id, sport).await
            })
            .await
    }
}

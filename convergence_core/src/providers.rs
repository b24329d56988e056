//! Input Providers
//!
//! Boundary traits for the externally owned data sources, an in-memory
//! implementation, and concurrent slate gathering. Fetch failures degrade to
//! empty logs or missing data so the engine always receives a usable input.

use async_trait::async_trait;
use futures_util::stream::{self, StreamExt};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::MAX_FETCH_CONCURRENCY;
use crate::error::ProviderError;
use crate::heatcheck::HeatCheckCandidate;
use crate::models::{DefenseRanking, Game, Player, ReverseChronologicalGameLog, SeasonStats, Sport, SportExtra};

#[async_trait]
pub trait GameLogProvider: Send + Sync {
    /// Game logs newest-first
    async fn game_logs(&self, player_id: &str, sport: Sport) -> Result<ReverseChronologicalGameLog, ProviderError>;
}

#[async_trait]
pub trait SeasonStatsProvider: Send + Sync {
    async fn season_stats(&self, player_id: &str, stat: &str) -> Result<SeasonStats, ProviderError>;
}

#[async_trait]
pub trait DefenseRankingProvider: Send + Sync {
    async fn defense_ranking(&self, team: &str, position: &str, stat: &str) -> Result<DefenseRanking, ProviderError>;
}

#[async_trait]
pub trait SportExtraProvider: Send + Sync {
    async fn sport_extra(&self, player: &Player, game: &Game) -> Result<Option<SportExtra>, ProviderError>;
}

#[async_trait]
impl<P: GameLogProvider + ?Sized> GameLogProvider for Arc<P> {
    async fn game_logs(&self, player_id: &str, sport: Sport) -> Result<ReverseChronologicalGameLog, ProviderError> {
        (**self).game_logs(player_id, sport).await
    }
}

/// Map-backed provider for all four inputs.
///
/// Defense rankings are keyed by (team, stat); position is not used.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProvider {
    game_logs: FxHashMap<String, ReverseChronologicalGameLog>,
    season_stats: FxHashMap<(String, String), SeasonStats>,
    defense: FxHashMap<(String, String), DefenseRanking>,
    extras: FxHashMap<String, SportExtra>,
}

fn key(value: &str) -> String {
    value.trim().to_uppercase()
}

impl InMemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_game_logs(&mut self, player_id: &str, logs: ReverseChronologicalGameLog) {
        self.game_logs.insert(player_id.to_string(), logs);
    }

    pub fn insert_season_stats(&mut self, player_id: &str, stat: &str, stats: SeasonStats) {
        self.season_stats.insert((player_id.to_string(), stat.to_string()), stats);
    }

    pub fn insert_defense_ranking(&mut self, team: &str, stat: &str, ranking: DefenseRanking) {
        self.defense.insert((key(team), stat.to_string()), ranking);
    }

    pub fn insert_extra(&mut self, player_id: &str, extra: SportExtra) {
        self.extras.insert(player_id.to_string(), extra);
    }
}

#[async_trait]
impl GameLogProvider for InMemoryProvider {
    async fn game_logs(&self, player_id: &str, _sport: Sport) -> Result<ReverseChronologicalGameLog, ProviderError> {
        self.game_logs
            .get(player_id)
            .cloned()
            .ok_or_else(|| ProviderError::NotFound(format!("game logs for {}", player_id)))
    }
}

#[async_trait]
impl SeasonStatsProvider for InMemoryProvider {
    async fn season_stats(&self, player_id: &str, stat: &str) -> Result<SeasonStats, ProviderError> {
        self.season_stats
            .get(&(player_id.to_string(), stat.to_string()))
            .cloned()
            .ok_or_else(|| ProviderError::NotFound(format!("{} season stats for {}", stat, player_id)))
    }
}

#[async_trait]
impl DefenseRankingProvider for InMemoryProvider {
    async fn defense_ranking(&self, team: &str, _position: &str, stat: &str) -> Result<DefenseRanking, ProviderError> {
        self.defense
            .get(&(key(team), stat.to_string()))
            .cloned()
            .ok_or_else(|| ProviderError::NotFound(format!("{} defense vs {}", team, stat)))
    }
}

#[async_trait]
impl SportExtraProvider for InMemoryProvider {
    async fn sport_extra(&self, player: &Player, _game: &Game) -> Result<Option<SportExtra>, ProviderError> {
        Ok(self.extras.get(&player.id).cloned())
    }
}

/// The four sources used to resolve a slate.
#[derive(Clone, Copy)]
pub struct InputSources<'a> {
    pub game_logs: &'a dyn GameLogProvider,
    pub season_stats: &'a dyn SeasonStatsProvider,
    pub defense: &'a dyn DefenseRankingProvider,
    pub extra: &'a dyn SportExtraProvider,
}

impl<'a> InputSources<'a> {
    /// Use one provider for every input.
    pub fn single<P>(provider: &'a P) -> Self
    where
        P: GameLogProvider + SeasonStatsProvider + DefenseRankingProvider + SportExtraProvider,
    {
        Self {
            game_logs: provider,
            season_stats: provider,
            defense: provider,
            extra: provider,
        }
    }
}

/// One (player, stat) to resolve.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlateRequest {
    pub player: Player,
    pub game: Game,
    pub stat: String,
}

/// Resolve inputs for every request, at most `max_concurrent` at a time.
///
/// Output order matches request order.
pub async fn gather_slate(
    sources: InputSources<'_>,
    requests: Vec<SlateRequest>,
    max_concurrent: usize,
) -> Vec<HeatCheckCandidate> {
    let limit = max_concurrent.clamp(1, MAX_FETCH_CONCURRENCY);
    let total = requests.len();
    info!("Gathering inputs for {} candidates (concurrency {})", total, limit);

    let mut resolved: Vec<(usize, HeatCheckCandidate)> = stream::iter(requests.into_iter().enumerate())
        .map(|(index, request)| async move { (index, gather_one(sources, request).await) })
        .buffer_unordered(limit)
        .collect()
        .await;

    resolved.sort_by_key(|(index, _)| *index);
    resolved.into_iter().map(|(_, candidate)| candidate).collect()
}

async fn gather_one(sources: InputSources<'_>, request: SlateRequest) -> HeatCheckCandidate {
    let SlateRequest { player, game, stat } = request;
    let is_home = game.is_home_team(&player.team);
    let opponent = game.opponent_for(is_home).to_string();

    let (logs, season, defense, extra) = futures_util::future::join4(
        sources.game_logs.game_logs(&player.id, player.sport),
        sources.season_stats.season_stats(&player.id, &stat),
        sources.defense.defense_ranking(&opponent, &player.position, &stat),
        sources.extra.sport_extra(&player, &game),
    )
    .await;

    let game_logs = degrade(logs, &player.id, "game logs").unwrap_or_default();
    let season_stats = degrade(season, &player.id, "season stats");
    let defense_ranking = degrade(defense, &player.id, "defense ranking");
    let extra = degrade(extra, &player.id, "sport extra").flatten();

    HeatCheckCandidate {
        player,
        game,
        game_logs,
        season_stats,
        defense_ranking,
        stat,
        extra,
    }
}

/// Best-effort partial input: failures become `None`.
fn degrade<T>(result: Result<T, ProviderError>, player_id: &str, what: &str) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) if e.is_not_found() => {
            debug!("No {} for {}: {}", what, player_id, e);
            None
        }
        Err(e) => {
            warn!("Failed to fetch {} for {}: {}", what, player_id, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factors::test_support::*;

    struct FailingLogs;

    #[async_trait]
    impl GameLogProvider for FailingLogs {
        async fn game_logs(&self, _player_id: &str, _sport: Sport) -> Result<ReverseChronologicalGameLog, ProviderError> {
            Err(ProviderError::Unavailable("timeout".to_string()))
        }
    }

    fn request(id: &str, team: &str) -> SlateRequest {
        let mut p = player(Sport::NBA, team, "PG");
        p.id = id.to_string();
        SlateRequest {
            player: p,
            game: game("BOS", "MIA"),
            stat: "points".to_string(),
        }
    }

    #[tokio::test]
    async fn test_gather_preserves_order_and_resolves() {
        let mut provider = InMemoryProvider::new();
        provider.insert_game_logs("a", logs("points", &[20.0, 22.0], "MIA"));
        provider.insert_season_stats("a", "points", season(21.0));
        provider.insert_defense_ranking("mia", "points", DefenseRanking { rank: 4, stats_allowed: 105.0 });

        let requests: Vec<SlateRequest> = ["a", "b", "c", "d"].iter().map(|id| request(id, "BOS")).collect();
        let candidates = gather_slate(InputSources::single(&provider), requests, 2).await;

        let ids: Vec<&str> = candidates.iter().map(|c| c.player.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c", "d"]);
        assert_eq!(candidates[0].game_logs.len(), 2);
        assert_eq!(candidates[0].season_stats.as_ref().map(|s| s.average), Some(21.0));
        assert_eq!(candidates[0].defense_ranking.as_ref().map(|d| d.rank), Some(4));
        assert!(candidates[1].game_logs.is_empty());
        assert!(candidates[1].season_stats.is_none());
    }

    #[tokio::test]
    async fn test_provider_failure_degrades_to_empty() {
        let mut provider = InMemoryProvider::new();
        provider.insert_season_stats("a", "points", season(21.0));
        let sources = InputSources {
            game_logs: &FailingLogs,
            ..InputSources::single(&provider)
        };
        let candidates = gather_slate(sources, vec![request("a", "BOS")], 0).await;
        assert_eq!(candidates.len(), 1);
        assert!(candidates[0].game_logs.is_empty());
        assert!(candidates[0].season_stats.is_some());
    }
}

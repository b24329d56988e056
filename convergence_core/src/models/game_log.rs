//! Game logs and explicit ordering wrappers.
//!
//! Providers hand the engine logs newest-first. EWMA needs oldest-first.
//! The two orderings are separate types so the reversal is always explicit:
//! - `ReverseChronologicalGameLog`: newest-first, the boundary shape
//! - `ChronologicalGameLog`: oldest-first, the only shape that exposes `ewma`

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::utils::stats;

/// One completed game for a player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameLog {
    pub date: NaiveDate,
    /// Opponent abbreviation
    pub opponent: String,
    pub is_home: bool,
    #[serde(default)]
    pub stats: BTreeMap<String, f64>,
    #[serde(default)]
    pub is_back_to_back: bool,
    #[serde(default)]
    pub rest_days: u32,
    #[serde(default)]
    pub minutes_played: Option<f64>,
    /// Enrichment slot, not authoritative
    #[serde(default)]
    pub opponent_def_rank: Option<u32>,
}

impl GameLog {
    /// Stat value for this game, 0 when absent.
    pub fn stat(&self, key: &str) -> f64 {
        self.stats.get(key).copied().unwrap_or(0.0)
    }

    pub fn against(&self, team: &str) -> bool {
        self.opponent.trim().eq_ignore_ascii_case(team.trim())
    }
}

/// Game logs ordered newest-first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReverseChronologicalGameLog(Vec<GameLog>);

impl ReverseChronologicalGameLog {
    pub fn new(logs: Vec<GameLog>) -> Self {
        Self(logs)
    }

    /// Sort arbitrary logs newest-first by date.
    pub fn from_unordered(mut logs: Vec<GameLog>) -> Self {
        logs.sort_by(|a, b| b.date.cmp(&a.date));
        Self(logs)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[GameLog] {
        &self.0
    }

    /// Most recent game, if any.
    pub fn most_recent(&self) -> Option<&GameLog> {
        self.0.first()
    }

    pub fn most_recent_mut(&mut self) -> Option<&mut GameLog> {
        self.0.first_mut()
    }

    /// The `n` most recent games, still newest-first.
    pub fn latest(&self, n: usize) -> &[GameLog] {
        &self.0[..n.min(self.0.len())]
    }

    /// Stat values newest-first across the full log.
    pub fn stat_values(&self, stat: &str) -> Vec<f64> {
        self.0.iter().map(|g| g.stat(stat)).collect()
    }

    /// Mean of the stat over the `n` most recent games.
    pub fn recent_mean(&self, stat: &str, n: usize) -> f64 {
        let values: Vec<f64> = self.latest(n).iter().map(|g| g.stat(stat)).collect();
        stats::mean(&values)
    }

    /// The `n` most recent games reversed into oldest-first order.
    pub fn chronological(&self, n: usize) -> ChronologicalGameLog {
        let mut window = self.latest(n).to_vec();
        window.reverse();
        ChronologicalGameLog(window)
    }

    pub fn iter(&self) -> impl Iterator<Item = &GameLog> {
        self.0.iter()
    }
}

impl From<Vec<GameLog>> for ReverseChronologicalGameLog {
    fn from(logs: Vec<GameLog>) -> Self {
        Self::new(logs)
    }
}

/// Game logs ordered oldest-first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChronologicalGameLog(Vec<GameLog>);

impl ChronologicalGameLog {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Stat values oldest-first.
    pub fn stat_series(&self, stat: &str) -> Vec<f64> {
        self.0.iter().map(|g| g.stat(stat)).collect()
    }

    pub fn ewma(&self, stat: &str, alpha: f64) -> f64 {
        stats::ewma(&self.stat_series(stat), alpha)
    }

    /// Back to newest-first.
    pub fn reversed(self) -> ReverseChronologicalGameLog {
        let mut logs = self.0;
        logs.reverse();
        ReverseChronologicalGameLog(logs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn log(day: u32, pts: f64) -> GameLog {
        GameLog {
            date: NaiveDate::from_ymd_opt(2025, 1, day).unwrap(),
            opponent: "BOS".to_string(),
            is_home: true,
            stats: BTreeMap::from([("points".to_string(), pts)]),
            is_back_to_back: false,
            rest_days: 1,
            minutes_played: Some(34.0),
            opponent_def_rank: None,
        }
    }

    #[test]
    fn test_chronological_reverses_window() {
        // newest-first: 30 (Jan 3), 20 (Jan 2), 10 (Jan 1)
        let logs = ReverseChronologicalGameLog::new(vec![log(3, 30.0), log(2, 20.0), log(1, 10.0)]);
        let chrono = logs.chronological(3);
        assert_eq!(chrono.stat_series("points"), vec![10.0, 20.0, 30.0]);
        assert!((chrono.ewma("points", 0.5) - 22.5).abs() < 1e-9);
    }

    #[test]
    fn test_from_unordered_sorts_newest_first() {
        let logs = ReverseChronologicalGameLog::from_unordered(vec![log(1, 10.0), log(3, 30.0), log(2, 20.0)]);
        assert_eq!(logs.stat_values("points"), vec![30.0, 20.0, 10.0]);
        assert_eq!(logs.chronological(3).reversed(), logs);
    }

    #[test]
    fn test_missing_stat_reads_zero() {
        let g = log(1, 12.0);
        assert_eq!(g.stat("rebounds"), 0.0);
        let empty = ReverseChronologicalGameLog::default();
        assert_eq!(empty.latest(5).len(), 0);
        assert_eq!(empty.recent_mean("points", 5), 0.0);
    }
}

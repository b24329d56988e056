//! Slate file loading.
//!
//! A slate is a JSON document of already-parsed engine shapes: one entry per
//! player with the game, the stats to scan and whatever inputs are known.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;

use prop_convergence_core::providers::{InMemoryProvider, SlateRequest};
use prop_convergence_core::{
    DefenseRanking, Game, GameLog, Player, ReverseChronologicalGameLog, SeasonStats, SportExtra,
};

#[derive(Debug, Deserialize)]
pub struct Slate {
    #[serde(default)]
    pub date: Option<NaiveDate>,
    pub entries: Vec<SlateEntry>,
}

#[derive(Debug, Deserialize)]
pub struct SlateEntry {
    pub player: Player,
    pub game: Game,
    pub stats: Vec<String>,
    /// Any order; sorted newest-first on load
    #[serde(default)]
    pub game_logs: Vec<GameLog>,
    /// Keyed by stat
    #[serde(default)]
    pub season_stats: BTreeMap<String, SeasonStats>,
    /// Opponent defense keyed by stat
    #[serde(default)]
    pub defense: BTreeMap<String, DefenseRanking>,
    #[serde(default)]
    pub extra: Option<SportExtra>,
}

impl Slate {
    pub fn load(path: &str) -> Result<Self> {
        let raw = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path))?;
        Self::parse(&raw)
    }

    pub fn parse(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).context("Invalid slate JSON")
    }

    pub fn candidate_count(&self) -> usize {
        self.entries.iter().map(|e| e.stats.len()).sum()
    }

    /// Split into a provider holding the data and one request per stat.
    pub fn into_inputs(self) -> (InMemoryProvider, Vec<SlateRequest>) {
        let mut provider = InMemoryProvider::new();
        let mut requests = Vec::new();

        for entry in self.entries {
            let player_id = entry.player.id.clone();
            let is_home = entry.game.is_home_team(&entry.player.team);
            let opponent = entry.game.opponent_for(is_home).to_string();

            if !entry.game_logs.is_empty() {
                provider.insert_game_logs(&player_id, ReverseChronologicalGameLog::from_unordered(entry.game_logs));
            }
            for (stat, season) in entry.season_stats {
                provider.insert_season_stats(&player_id, &stat, season);
            }
            for (stat, ranking) in entry.defense {
                provider.insert_defense_ranking(&opponent, &stat, ranking);
            }
            if let Some(extra) = entry.extra {
                provider.insert_extra(&player_id, extra);
            }

            for stat in entry.stats {
                requests.push(SlateRequest {
                    player: entry.player.clone(),
                    game: entry.game.clone(),
                    stat,
                });
            }
        }

        (provider, requests)
    }
}

//! HeatCheck Slate Scanner
//!
//! Runs the router over a slate of (player, stat) candidates using each
//! player's own season average as the reference line, and ranks the
//! strongest picks by composite score.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::{debug, info};

pub use crate::config::HeatCheckConfig;
use crate::convergence::{ConvergenceEngine, PropRequest};
use crate::models::{
    DefenseRanking, Game, LeanDirection, Player, ReverseChronologicalGameLog, SeasonStats, Sport,
    SportExtra, Tier,
};
use crate::utils::stats;
use crate::verdict::{synthesize_verdict, VerdictInput};

/// Neutral defense rank used when no ranking is known
const DEFAULT_DEFENSE_RANK: u32 = 15;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeatCheckCandidate {
    pub player: Player,
    pub game: Game,
    #[serde(default)]
    pub game_logs: ReverseChronologicalGameLog,
    #[serde(default)]
    pub season_stats: Option<SeasonStats>,
    #[serde(default)]
    pub defense_ranking: Option<DefenseRanking>,
    pub stat: String,
    #[serde(default)]
    pub extra: Option<SportExtra>,
}

impl HeatCheckCandidate {
    pub fn to_request(&self, line: f64) -> PropRequest {
        PropRequest {
            player: self.player.clone(),
            game: self.game.clone(),
            game_logs: self.game_logs.clone(),
            season_stats: self.season_stats.clone(),
            defense_ranking: self.defense_ranking.clone(),
            stat: self.stat.clone(),
            line,
            extra: self.extra.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Hot,
    Cold,
    Steady,
}

impl Trend {
    /// L5 average against the season average, with a 10% band.
    pub fn classify(l5_average: f64, season_average: f64) -> Self {
        if l5_average > season_average * 1.10 {
            Trend::Hot
        } else if l5_average < season_average * 0.90 {
            Trend::Cold
        } else {
            Trend::Steady
        }
    }

    pub fn agrees_with(&self, direction: LeanDirection) -> bool {
        matches!(
            (self, direction),
            (Trend::Hot, LeanDirection::Over) | (Trend::Cold, LeanDirection::Under)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatCheckPick {
    pub player_id: String,
    pub player_name: String,
    pub team: String,
    pub sport: Sport,
    pub stat: String,
    pub season_average: f64,
    pub l5_average: f64,
    pub l10_average: f64,
    pub ewma_l10: f64,
    pub projection: f64,
    pub trend: Trend,
    pub direction: LeanDirection,
    pub tier: Tier,
    pub convergence_score: u8,
    pub confidence: u8,
    pub composite_score: f64,
    pub defense_rank: Option<u32>,
}

/// `0.4 × avg + 0.4 × EWMA(L10) + 0.2 × avg × (1 + matchup)`, where the
/// matchup adjustment is `(rank − 15) / 15 × 0.10`.
pub fn projection(season_average: f64, ewma_l10: f64, defense_rank: u32) -> f64 {
    let matchup_adj = (defense_rank as f64 - 15.0) / 15.0 * 0.10;
    0.4 * season_average + 0.4 * ewma_l10 + 0.2 * season_average * (1.0 + matchup_adj)
}

pub fn composite_score(confidence: u8, trend: Trend, direction: LeanDirection, tier: Tier, defense_rank: Option<u32>) -> f64 {
    let mut score = confidence as f64;
    if trend.agrees_with(direction) {
        score *= 1.15;
    }
    match defense_rank {
        Some(rank) if rank >= 26 => score *= 1.10,
        Some(rank) if rank >= 22 => score *= 1.05,
        _ => {}
    }
    if tier == Tier::Neutral {
        score *= 0.7;
    }
    score
}

/// Evaluate one candidate, or `None` when it is filtered out.
pub fn scan_candidate(
    engine: &ConvergenceEngine,
    candidate: &HeatCheckCandidate,
    config: &HeatCheckConfig,
) -> Option<HeatCheckPick> {
    let logs = &candidate.game_logs;
    let stat = candidate.stat.as_str();

    if logs.len() < config.min_games {
        debug!(player = %candidate.player.id, stat, "Skipping: {} games logged", logs.len());
        return None;
    }
    let season_average = match &candidate.season_stats {
        Some(season) => season.average,
        None => stats::mean(&logs.stat_values(stat)),
    };
    if !season_average.is_finite() || season_average < config.min_season_average {
        debug!(player = %candidate.player.id, stat, "Skipping: negligible season average {:.2}", season_average);
        return None;
    }

    let sport = candidate.player.sport;
    let l5_average = logs.recent_mean(stat, 5);
    let l10_average = logs.recent_mean(stat, 10);
    let ewma_l10 = logs.chronological(10).ewma(stat, sport.ewma_alpha());
    let defense_rank = candidate.defense_ranking.as_ref().map(|d| d.rank);
    let projected = projection(season_average, ewma_l10, defense_rank.unwrap_or(DEFAULT_DEFENSE_RANK));

    let line = season_average;
    let result = engine.evaluate(&candidate.to_request(line));
    let l10_values: Vec<f64> = logs.latest(10).iter().map(|g| g.stat(stat)).collect();
    let verdict = synthesize_verdict(&VerdictInput::from_result(&result).with_context(
        Some(stats::hit_rate(&l10_values, line)),
        Some(l10_average - line),
        Some(season_average),
    ));

    // Gate on the displayed verdict confidence, which includes the hit-rate context
    if verdict.confidence < config.min_confidence {
        debug!(
            player = %candidate.player.id,
            stat,
            confidence = verdict.confidence,
            "Skipping: below minimum confidence"
        );
        return None;
    }

    let trend = Trend::classify(l5_average, season_average);
    let composite = composite_score(verdict.confidence, trend, verdict.direction, result.lean.tier, defense_rank);

    Some(HeatCheckPick {
        player_id: candidate.player.id.clone(),
        player_name: candidate.player.name.clone(),
        team: candidate.player.team.clone(),
        sport,
        stat: candidate.stat.clone(),
        season_average,
        l5_average,
        l10_average,
        ewma_l10,
        projection: projected,
        trend,
        direction: verdict.direction,
        tier: result.lean.tier,
        convergence_score: verdict.convergence_score,
        confidence: verdict.confidence,
        composite_score: composite,
        defense_rank,
    })
}

/// Scan a slate in parallel and return the top picks, best first.
pub fn scan_slate(
    engine: &ConvergenceEngine,
    candidates: &[HeatCheckCandidate],
    config: &HeatCheckConfig,
) -> Vec<HeatCheckPick> {
    let mut picks: Vec<HeatCheckPick> = candidates
        .par_iter()
        .filter_map(|candidate| scan_candidate(engine, candidate, config))
        .collect();

    picks.sort_by(rank_picks);
    let qualified = picks.len();
    picks.truncate(config.max_picks);

    info!(
        "HeatCheck scanned {} candidates: {} qualified, {} kept",
        candidates.len(),
        qualified,
        picks.len()
    );
    picks
}

fn rank_picks(a: &HeatCheckPick, b: &HeatCheckPick) -> Ordering {
    b.composite_score
        .total_cmp(&a.composite_score)
        .then_with(|| a.player_id.cmp(&b.player_id))
        .then_with(|| a.stat.cmp(&b.stat))
}

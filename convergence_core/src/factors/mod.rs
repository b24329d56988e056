//! Factor inputs, sport tunings and the universal scorers.

use crate::models::{
    DefenseRanking, Game, Player, ReverseChronologicalGameLog, SeasonStats, Signal, Sport,
};
use crate::utils::stats;
use crate::weather::StatCategory;

pub mod universal;

pub const RECENT_TREND: &str = "Recent Trend (EWMA)";
pub const SEASON_AVERAGE: &str = "Season Average vs Line";
pub const OPPONENT_DEFENSE: &str = "Opponent Defense Rank";
pub const HOME_AWAY: &str = "Home/Away Split";
pub const REST_FATIGUE: &str = "Rest/Fatigue (B2B)";
pub const HEAD_TO_HEAD: &str = "Head-to-Head";
pub const MOMENTUM: &str = "Momentum/Streak";
pub const MINUTES_TREND: &str = "Minutes/Usage Trend";
pub const GAME_ENVIRONMENT: &str = "Game Environment (O/U + Pace)";

/// Everything a scorer may look at for one (player, game, stat, line).
#[derive(Debug, Clone, Copy)]
pub struct FactorInput<'a> {
    pub player: &'a Player,
    pub game: &'a Game,
    pub game_logs: &'a ReverseChronologicalGameLog,
    pub season_stats: Option<&'a SeasonStats>,
    pub defense_ranking: Option<&'a DefenseRanking>,
    pub stat: &'a str,
    pub line: f64,
    pub is_home: bool,
}

impl<'a> FactorInput<'a> {
    pub fn opponent(&self) -> &'a str {
        self.game.opponent_for(self.is_home)
    }

    pub fn home_team(&self) -> &'a str {
        &self.game.home_team
    }

    pub fn has_valid_line(&self) -> bool {
        self.line.is_finite() && self.line > 0.0
    }

    /// Season average, falling back to the mean of all game logs.
    pub fn season_average(&self) -> Option<f64> {
        if let Some(season) = self.season_stats {
            return Some(season.average);
        }
        if self.game_logs.is_empty() {
            return None;
        }
        Some(stats::mean(&self.game_logs.stat_values(self.stat)))
    }

    pub fn stat_category(&self) -> StatCategory {
        StatCategory::from_stat(self.player.sport, self.stat)
    }

    pub fn is_minutes_stat(&self) -> bool {
        matches!(
            self.stat.trim().to_lowercase().as_str(),
            "minutes" | "min" | "minutes_played"
        )
    }
}

/// Sport-tunable scorer parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct ScorerTuning {
    pub ewma_alpha: f64,
    pub trend_lookback: usize,
    /// Fraction of the line (0.08 = 8%)
    pub trend_fire_threshold: f64,
    pub season_fire_pct: f64,
    pub season_use_median: bool,
    /// Ranks at or above this are strong defenses (under)
    pub defense_top_threshold: u32,
    /// Ranks at or below this are weak defenses (over)
    pub defense_bottom_threshold: u32,
    pub team_count: u32,
    pub venue_fire_pct: f64,
    pub h2h_min_games: usize,
    pub momentum_fire_threshold: u32,
    pub environment_median_total: f64,
    pub environment_threshold_pct: f64,
}

impl ScorerTuning {
    pub fn nba() -> Self {
        Self {
            ewma_alpha: Sport::NBA.ewma_alpha(),
            trend_lookback: 10,
            trend_fire_threshold: 0.08,
            season_fire_pct: 0.05,
            season_use_median: false,
            defense_top_threshold: 10,
            defense_bottom_threshold: 21,
            team_count: 30,
            venue_fire_pct: 0.05,
            h2h_min_games: 3,
            momentum_fire_threshold: 4,
            environment_median_total: 226.5,
            environment_threshold_pct: 0.03,
        }
    }

    pub fn mlb() -> Self {
        Self {
            ewma_alpha: Sport::MLB.ewma_alpha(),
            environment_median_total: 8.5,
            environment_threshold_pct: 0.10,
            ..Self::nba()
        }
    }

    pub fn nfl() -> Self {
        Self {
            ewma_alpha: Sport::NFL.ewma_alpha(),
            trend_lookback: 6,
            // One game a week; a single blowout skews the mean
            season_use_median: true,
            // Only a handful of NFL defenses are truly elite
            defense_top_threshold: 5,
            team_count: 32,
            environment_median_total: 44.5,
            environment_threshold_pct: 0.08,
            ..Self::nba()
        }
    }
}

/// Map a signed gap onto a signal and strength.
///
/// Fires when `|gap| >= threshold`; strength is `|gap| / scale` clamped.
pub(crate) fn directional(gap: f64, threshold: f64, scale: f64) -> (Signal, f64) {
    let strength = stats::clamp_unit(stats::safe_div(gap.abs(), scale));
    let signal = if gap >= threshold {
        Signal::Over
    } else if gap <= -threshold {
        Signal::Under
    } else {
        Signal::Neutral
    };
    (signal, strength)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directional_thresholds() {
        assert_eq!(directional(2.0, 1.0, 4.0), (Signal::Over, 0.5));
        assert_eq!(directional(-1.0, 1.0, 4.0), (Signal::Under, 0.25));
        assert_eq!(directional(0.5, 1.0, 4.0).0, Signal::Neutral);
        assert_eq!(directional(10.0, 1.0, 4.0).1, 1.0);
        assert_eq!(directional(1.0, 1.0, 0.0).1, 0.0);
    }

    #[test]
    fn test_tunings_differ_by_sport() {
        assert_eq!(ScorerTuning::nfl().defense_top_threshold, 5);
        assert_eq!(ScorerTuning::nfl().team_count, 32);
        assert_eq!(ScorerTuning::mlb().ewma_alpha, 0.70);
        assert_eq!(ScorerTuning::nba().ewma_alpha, 0.85);
    }
}

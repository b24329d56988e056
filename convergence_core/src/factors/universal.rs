//! Sport-agnostic factor scorers.
//!
//! Each scorer returns a `FactorResult`. Missing or insufficient data never
//! errors: it degrades to neutral with zero strength and says why, so every
//! sport module can always emit its full factor set.

use super::{directional, FactorInput, ScorerTuning};
use crate::models::{FactorResult, GameLog, Signal};
use crate::utils::stats;

/// EWMA of the recent window against the line.
pub fn recent_trend(input: &FactorInput, tuning: &ScorerTuning) -> FactorResult {
    if !input.has_valid_line() {
        return FactorResult::unavailable("Invalid line");
    }
    let window = input.game_logs.chronological(tuning.trend_lookback);
    if window.len() < 3 {
        return FactorResult::unavailable("Insufficient recent data");
    }

    let ewma = window.ewma(input.stat, tuning.ewma_alpha);
    let deviation_pct = (ewma - input.line) / input.line * 100.0;
    let threshold = tuning.trend_fire_threshold * 100.0;
    let (signal, strength) = directional(deviation_pct, threshold, 2.0 * threshold);

    let detail = match signal {
        Signal::Over => format!("Weighted recent form runs {:.1}% above the line", deviation_pct),
        Signal::Under => format!("Weighted recent form runs {:.1}% below the line", -deviation_pct),
        Signal::Neutral => "Recent form sits near the line".to_string(),
    };
    FactorResult::new(
        signal,
        strength,
        detail,
        format!(
            "EWMA(L{}) {:.1} vs {:.1} ({:+.1}%)",
            window.len(),
            ewma,
            input.line,
            deviation_pct
        ),
    )
}

/// Season center of mass against the line.
pub fn season_average(input: &FactorInput, tuning: &ScorerTuning) -> FactorResult {
    if !input.has_valid_line() {
        return FactorResult::unavailable("Invalid line");
    }
    let center = match input.season_stats {
        Some(season) if tuning.season_use_median => season.median.unwrap_or(season.average),
        Some(season) => season.average,
        None if !input.game_logs.is_empty() => stats::mean(&input.game_logs.stat_values(input.stat)),
        None => return FactorResult::unavailable("Season data unavailable"),
    };

    let threshold = (input.line * tuning.season_fire_pct).max(0.5);
    let gap = center - input.line;
    let (signal, strength) = directional(gap, threshold, 2.5 * threshold);
    let label = if tuning.season_use_median { "median" } else { "average" };

    FactorResult::new(
        signal,
        strength,
        format!("Season {} {:+.1} vs the line", label, gap),
        format!("Season {} {:.1} vs {:.1}", label, center, input.line),
    )
}

/// Opponent defense rank (1 = toughest).
pub fn opponent_defense(input: &FactorInput, tuning: &ScorerTuning) -> FactorResult {
    let Some(ranking) = input.defense_ranking else {
        return FactorResult::unavailable("Defense ranking unavailable");
    };
    let rank = ranking.rank.clamp(1, tuning.team_count);
    let top = tuning.defense_top_threshold;
    let bottom = tuning.defense_bottom_threshold;
    let data_point = format!(
        "{} rank #{} ({:.1} allowed)",
        input.opponent(),
        rank,
        ranking.stats_allowed
    );

    if rank >= bottom {
        let span = (tuning.team_count - bottom + 1) as f64;
        let strength = (rank - bottom + 1) as f64 / span;
        FactorResult::new(
            Signal::Over,
            strength,
            format!("Soft matchup: {} defense ranks {} of {}", input.opponent(), rank, tuning.team_count),
            data_point,
        )
    } else if rank <= top {
        let strength = (top - rank + 1) as f64 / top as f64;
        FactorResult::new(
            Signal::Under,
            strength,
            format!("Tough matchup: {} defense ranks {} of {}", input.opponent(), rank, tuning.team_count),
            data_point,
        )
    } else {
        FactorResult::new(Signal::Neutral, 0.0, "Middle-of-the-pack defense", data_point)
    }
}

/// Venue-specific average against the line.
pub fn home_away_split(input: &FactorInput, tuning: &ScorerTuning) -> FactorResult {
    if !input.has_valid_line() {
        return FactorResult::unavailable("Invalid line");
    }
    let venue = if input.is_home { "Home" } else { "Away" };
    let venue_values: Vec<f64> = input
        .game_logs
        .iter()
        .filter(|g| g.is_home == input.is_home)
        .map(|g| g.stat(input.stat))
        .collect();

    let (average, source) = if venue_values.is_empty() {
        match input.season_stats {
            Some(season) => (season.average, "season avg fallback".to_string()),
            None => return FactorResult::unavailable("No venue split data"),
        }
    } else {
        (stats::mean(&venue_values), format!("{} g", venue_values.len()))
    };

    let threshold = (input.line * tuning.venue_fire_pct).max(0.8);
    let gap = average - input.line;
    let (signal, strength) = directional(gap, threshold, 2.5 * threshold);

    FactorResult::new(
        signal,
        strength,
        format!("{} average {:+.1} vs the line", venue, gap),
        format!("{} avg {:.1} ({}) vs {:.1}", venue, average, source, input.line),
    )
}

/// Back-to-back fatigue or extended-rest boost.
///
/// The most recent game-log entry carries the rest context for the game
/// being analyzed.
pub fn rest_fatigue(input: &FactorInput, _tuning: &ScorerTuning) -> FactorResult {
    let Some(current) = input.game_logs.most_recent() else {
        return FactorResult::unavailable("No rest data");
    };
    let Some(season_avg) = input.season_average().filter(|avg| *avg > 0.0) else {
        return FactorResult::unavailable("Season average unavailable");
    };

    if current.is_back_to_back {
        let b2b = subset_mean(input, |g| g.is_back_to_back);
        let Some(b2b_avg) = b2b else {
            return FactorResult::new(
                Signal::Under,
                0.3,
                "Back-to-back with no B2B history",
                format!("Season avg {:.1}", season_avg),
            );
        };
        let drop = (season_avg - b2b_avg) / season_avg;
        let data_point = format!("B2B avg {:.1} vs season {:.1}", b2b_avg, season_avg);
        if drop < -0.05 {
            return FactorResult::new(
                Signal::Neutral,
                0.1,
                "Back-to-back, but production holds up on B2Bs",
                data_point,
            );
        }
        return FactorResult::new(
            Signal::Under,
            0.3 + drop.max(0.0) * 3.0,
            format!("Back-to-back: B2B production {:.0}% below season", drop.max(0.0) * 100.0),
            data_point,
        );
    }

    if current.rest_days >= 2 {
        let rested = subset_mean(input, |g| g.rest_days >= 2);
        let Some(rested_avg) = rested else {
            return FactorResult::new(
                Signal::Over,
                0.2,
                format!("{} days rest", current.rest_days),
                format!("Season avg {:.1}", season_avg),
            );
        };
        let gain = (rested_avg - season_avg) / season_avg;
        let data_point = format!("Rested avg {:.1} vs season {:.1}", rested_avg, season_avg);
        if gain < -0.05 {
            return FactorResult::new(
                Signal::Neutral,
                0.1,
                "Extra rest has not helped historically",
                data_point,
            );
        }
        return FactorResult::new(
            Signal::Over,
            0.2 + gain.max(0.0) * 3.0,
            format!("{} days rest: rested production {:+.0}%", current.rest_days, gain * 100.0),
            data_point,
        );
    }

    FactorResult::new(
        Signal::Neutral,
        0.1,
        "Normal rest",
        format!("{} day(s) rest", current.rest_days),
    )
}

/// Hit rate against this specific opponent.
pub fn head_to_head(input: &FactorInput, tuning: &ScorerTuning) -> FactorResult {
    let opponent = input.opponent();
    let values: Vec<f64> = input
        .game_logs
        .iter()
        .filter(|g| g.against(opponent))
        .map(|g| g.stat(input.stat))
        .collect();

    if values.len() < tuning.h2h_min_games {
        return FactorResult::new(
            Signal::Neutral,
            0.0,
            format!("Limited H2H data ({} games vs {})", values.len(), opponent),
            "N/A",
        );
    }

    let hit_rate = stats::hit_rate(&values, input.line);
    let signal = if hit_rate > 0.6 {
        Signal::Over
    } else if hit_rate < 0.4 {
        Signal::Under
    } else {
        Signal::Neutral
    };
    let hits = values.iter().filter(|v| **v > input.line).count();

    FactorResult::new(
        signal,
        (hit_rate - 0.5).abs() * 2.0,
        format!("Cleared the line in {} of {} games vs {}", hits, values.len(), opponent),
        format!("H2H avg {:.1}, hit rate {:.0}%", stats::mean(&values), hit_rate * 100.0),
    )
}

/// Signed streak over the full log, newest first.
///
/// Only `value > line` counts toward an over streak; a value exactly on the
/// line extends an under streak.
pub fn momentum(input: &FactorInput, tuning: &ScorerTuning) -> FactorResult {
    if input.game_logs.is_empty() {
        return FactorResult::unavailable("No game history");
    }
    let streak = streak_length(input.game_logs.as_slice(), input.stat, input.line);
    let length = streak.unsigned_abs();
    let strength = (length as f64 / 7.0).min(1.0);
    let side = if streak > 0 { "over" } else { "under" };
    let data_point = format!("{} straight {}", length, side);

    if length >= tuning.momentum_fire_threshold {
        let signal = if streak > 0 { Signal::Over } else { Signal::Under };
        FactorResult::new(
            signal,
            strength,
            format!("{}-game {} streak", length, side),
            data_point,
        )
    } else {
        FactorResult::new(Signal::Neutral, strength, "No active streak", data_point)
    }
}

pub(crate) fn streak_length(logs: &[GameLog], stat: &str, line: f64) -> i32 {
    let mut streak: i32 = 0;
    for log in logs {
        let hit = log.stat(stat) > line;
        if hit && streak >= 0 {
            streak += 1;
        } else if !hit && streak <= 0 {
            streak -= 1;
        } else {
            break;
        }
    }
    streak
}

/// Recent 5 vs prior 5 minutes played.
pub fn minutes_trend(input: &FactorInput, _tuning: &ScorerTuning) -> FactorResult {
    if input.is_minutes_stat() {
        return FactorResult::unavailable("N/A for minutes prop");
    }
    let samples: Vec<f64> = input
        .game_logs
        .iter()
        .filter_map(|g| g.minutes_played)
        .filter(|m| *m > 0.0)
        .collect();
    if samples.len() < 5 {
        return FactorResult::unavailable("Insufficient minutes data");
    }
    let recent = stats::mean(&samples[..5]);
    let older = &samples[5..samples.len().min(10)];
    if older.is_empty() {
        return FactorResult::unavailable("Insufficient minutes history");
    }
    let prior = stats::mean(older);
    let delta = recent - prior;
    let (signal, strength) = directional(delta, 2.0, 5.0);

    let detail = match signal {
        Signal::Over => format!("Minutes trending up {:+.1}", delta),
        Signal::Under => format!("Minutes trending down {:+.1}", delta),
        Signal::Neutral => "Stable minutes".to_string(),
    };
    FactorResult::new(
        signal,
        strength,
        detail,
        format!("L5 {:.1} min vs prior {:.1}", recent, prior),
    )
}

/// Market total against the sport median.
pub fn game_environment(input: &FactorInput, tuning: &ScorerTuning) -> FactorResult {
    let Some(total) = input.game.total else {
        return FactorResult::unavailable("Game total unavailable");
    };
    let median = tuning.environment_median_total;
    let threshold = median * tuning.environment_threshold_pct;
    let delta = total - median;
    let (signal, strength) = directional(delta, threshold, 2.0 * threshold);

    let implied = input
        .game
        .implied_team_total(input.is_home)
        .map(|t| format!("; implied team total {:.1}", t))
        .unwrap_or_default();
    let detail = match signal {
        Signal::Over => "High-scoring game environment",
        Signal::Under => "Low-scoring game environment",
        Signal::Neutral => "Average game environment",
    };
    FactorResult::new(
        signal,
        strength,
        detail,
        format!("O/U {:.1} vs median {:.1}{}", total, median, implied),
    )
}

fn subset_mean(input: &FactorInput, keep: impl Fn(&GameLog) -> bool) -> Option<f64> {
    let values: Vec<f64> = input
        .game_logs
        .iter()
        .filter(|g| keep(g))
        .map(|g| g.stat(input.stat))
        .collect();
    if values.is_empty() {
        None
    } else {
        Some(stats::mean(&values))
    }
}

// ============================================================================
// Tests
// ============================================================================

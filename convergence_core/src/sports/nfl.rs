//! NFL factor set.
//!
//! One game a week makes role and usage the leading indicator, so minutes
//! give way to snap and target share. Rest is folded into game script risk
//! and head-to-head is replaced with implied team points.

use super::{weather_factor, weigh, FactorWeights, SportFactorProvider};
use crate::factors::universal;
use crate::factors::{
    directional, FactorInput, ScorerTuning, MOMENTUM, OPPONENT_DEFENSE, RECENT_TREND, SEASON_AVERAGE,
};
use crate::models::{FactorResult, NflExtra, Signal, Sport, SportExtra, WeightedFactor};
use crate::utils::stats;
use crate::venues;

pub const SNAP_TARGET_TREND: &str = "Snap % + Target Share Trend";
pub const REST_GAME_SCRIPT: &str = "Rest & Game Script Risk";
pub const IMPLIED_POINTS: &str = "Implied Team Points";
pub const WEATHER_DOME: &str = "Weather & Dome Status";
pub const HOME_AWAY_DIVISIONAL: &str = "Home/Away + Divisional";

const LEAGUE_MEDIAN_IMPLIED: f64 = 22.0;

pub static NFL_WEIGHTS: FactorWeights = [
    (RECENT_TREND, 0.25),
    (SEASON_AVERAGE, 0.18),
    (OPPONENT_DEFENSE, 0.17),
    (SNAP_TARGET_TREND, 0.15),
    (REST_GAME_SCRIPT, 0.10),
    (IMPLIED_POINTS, 0.08),
    (WEATHER_DOME, 0.05),
    (HOME_AWAY_DIVISIONAL, 0.01),
    (MOMENTUM, 0.01),
];

pub struct NflProvider {
    tuning: ScorerTuning,
}

impl NflProvider {
    pub fn new() -> Self {
        Self {
            tuning: ScorerTuning::nfl(),
        }
    }
}

impl Default for NflProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl SportFactorProvider for NflProvider {
    fn sport(&self) -> Sport {
        Sport::NFL
    }

    fn name(&self) -> &str {
        "nfl_factors"
    }

    fn weights(&self) -> &'static FactorWeights {
        &NFL_WEIGHTS
    }

    fn get_factors(&self, input: &FactorInput, extra: Option<&SportExtra>) -> Vec<WeightedFactor> {
        let t = &self.tuning;
        let nfl = extra.and_then(SportExtra::as_nfl);

        weigh(
            &NFL_WEIGHTS,
            [
                universal::recent_trend(input, t),
                universal::season_average(input, t),
                universal::opponent_defense(input, t),
                snap_target_trend(input, nfl),
                rest_game_script(input),
                implied_points(input),
                weather_factor(input, nfl.and_then(|e| e.weather.as_ref())),
                home_away_divisional(input, t),
                universal::momentum(input, t),
            ],
        )
    }
}

pub fn get_nfl_factors(input: &FactorInput, extra: Option<&SportExtra>) -> Vec<WeightedFactor> {
    NflProvider::new().get_factors(input, extra)
}

fn share_delta(current: Option<f64>, season: Option<f64>) -> Option<f64> {
    current.zip(season).map(|(c, s)| c - s)
}

/// Usage share against the season baseline, by position.
///
/// Falls back to the last three games of minutes against the three before
/// when no usage data was supplied.
pub fn snap_target_trend(input: &FactorInput, extra: Option<&NflExtra>) -> FactorResult {
    let position = input.player.position.trim().to_uppercase();

    let usage = extra.and_then(|e| match position.as_str() {
        "RB" => share_delta(e.carries_share, e.season_avg_carries_share).map(|d| (d, "Carries share")),
        "WR" | "TE" => {
            let target = share_delta(e.target_share, e.season_avg_target_share);
            let snap = share_delta(e.snap_pct, e.season_avg_snap_pct);
            match (target, snap) {
                (Some(t), Some(s)) => Some((0.6 * t + 0.4 * s, "Target/snap share")),
                (Some(t), None) => Some((t, "Target share")),
                (None, Some(s)) => Some((s, "Snap share")),
                (None, None) => None,
            }
        }
        _ => share_delta(e.snap_pct, e.season_avg_snap_pct).map(|d| (d, "Snap share")),
    });

    if let Some((delta, label)) = usage {
        let (signal, strength) = directional(delta, 8.0, 15.0);
        let detail = match signal {
            Signal::Over => format!("{} rising vs season", label),
            Signal::Under => format!("{} falling vs season", label),
            Signal::Neutral => format!("{} steady", label),
        };
        return FactorResult::new(signal, strength, detail, format!("{} {:+.1} pts vs season", label, delta));
    }

    let minutes: Vec<f64> = input
        .game_logs
        .iter()
        .filter_map(|g| g.minutes_played)
        .filter(|m| *m > 0.0)
        .collect();
    if minutes.len() < 4 {
        return FactorResult::unavailable("Usage data unavailable");
    }
    let recent = stats::mean(&minutes[..3]);
    let prior = stats::mean(&minutes[3..minutes.len().min(6)]);
    if prior <= 0.0 {
        return FactorResult::unavailable("Usage data unavailable");
    }
    let change_pct = (recent - prior) / prior * 100.0;
    let (signal, strength) = directional(change_pct, 8.0, 15.0);
    FactorResult::new(
        signal,
        strength,
        "Usage proxy from playing time",
        format!("L3 {:.1} vs prior {:.1} ({:+.1}%)", recent, prior, change_pct),
    )
}

/// Short weeks and blowout risk.
pub fn rest_game_script(input: &FactorInput) -> FactorResult {
    let mut score: f64 = 0.0;
    let mut parts = Vec::new();

    let rest = input.game_logs.most_recent().map(|g| g.rest_days);
    if let Some(rest) = rest {
        if rest <= 4 {
            score -= 0.3;
            parts.push(format!("Short week ({}d)", rest));
        } else if rest >= 10 {
            score += 0.15;
            parts.push(format!("Extended rest ({}d)", rest));
        }
    }

    let spread = input.game.team_spread(input.is_home);
    if let Some(spread) = spread {
        let magnitude = spread.abs();
        if magnitude > 14.0 {
            // Favorites rest starters late, underdogs abandon the game plan
            if spread < 0.0 {
                score -= 0.25;
                parts.push(format!("Heavy favorite {:+.1}, garbage-time risk", spread));
            } else {
                score -= 0.15;
                parts.push(format!("Heavy underdog {:+.1}, script risk", spread));
            }
        } else if magnitude >= 10.0 {
            score -= 0.10;
            parts.push(format!("Lopsided spread {:+.1}", spread));
        }
    }

    if rest.is_none() && spread.is_none() {
        return FactorResult::unavailable("Rest and spread data unavailable");
    }

    let signal = if score >= 0.1 {
        Signal::Over
    } else if score <= -0.1 {
        Signal::Under
    } else {
        Signal::Neutral
    };
    let detail = if parts.is_empty() {
        "Normal rest, competitive script".to_string()
    } else {
        parts.join(", ")
    };
    FactorResult::new(signal, score.abs().min(1.0), detail, format!("Script score {:+.2}", score))
}

/// Implied team total against the league median.
pub fn implied_points(input: &FactorInput) -> FactorResult {
    let Some(implied) = input.game.implied_team_total(input.is_home) else {
        return FactorResult::unavailable("Game total unavailable");
    };
    let threshold = LEAGUE_MEDIAN_IMPLIED * 0.10;
    let (signal, strength) = directional(implied - LEAGUE_MEDIAN_IMPLIED, threshold, 2.0 * threshold);
    let detail = match signal {
        Signal::Over => "Offense projected to score well",
        Signal::Under => "Offense projected to struggle",
        Signal::Neutral => "Average scoring projection",
    };
    FactorResult::new(
        signal,
        strength,
        detail,
        format!("Implied {:.1} vs median {:.1}", implied, LEAGUE_MEDIAN_IMPLIED),
    )
}

/// Venue split, softened for familiar divisional opponents.
pub fn home_away_divisional(input: &FactorInput, tuning: &ScorerTuning) -> FactorResult {
    let base = universal::home_away_split(input, tuning);
    if !venues::are_division_rivals(&input.player.team, input.opponent()) {
        return base;
    }
    FactorResult::new(
        base.signal,
        base.strength * 0.75,
        format!("{} (divisional game)", base.detail),
        base.data_point,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factors::test_support::*;
    use crate::models::{Game, ReverseChronologicalGameLog, WeatherConditions};

    fn priced(home: &str, away: &str, total: f64, spread: f64) -> Game {
        Game {
            total: Some(total),
            spread: Some(spread),
            ..game(home, away)
        }
    }

    #[test]
    fn test_ari_dome_zeroes_weather() {
        let p = player(Sport::NFL, "ARI", "WR");
        let g = game("ARI", "SF");
        let l = logs("receiving_yards", &[70.0, 65.0, 80.0], "SF");
        let input = FactorInput {
            player: &p,
            game: &g,
            game_logs: &l,
            season_stats: None,
            defense_ranking: None,
            stat: "receiving_yards",
            line: 60.5,
            is_home: true,
        };
        let extra = SportExtra::Nfl(NflExtra {
            weather: Some(WeatherConditions {
                wind_speed_mph: Some(30.0),
                temperature_f: Some(20.0),
                ..Default::default()
            }),
            ..Default::default()
        });
        let factors = get_nfl_factors(&input, Some(&extra));
        assert_eq!(factors[6].name, WEATHER_DOME);
        assert_eq!(factors[6].signal, Signal::Neutral);
        assert_eq!(factors[6].strength, 0.0);
        assert_eq!(factors[6].detail, "Indoor dome");
    }

    #[test]
    fn test_usage_by_position() {
        let g = game("KC", "BUF");
        let l = logs("receptions", &[], "BUF");
        let extra = NflExtra {
            snap_pct: Some(90.0),
            season_avg_snap_pct: Some(80.0),
            target_share: Some(30.0),
            season_avg_target_share: Some(20.0),
            carries_share: Some(40.0),
            season_avg_carries_share: Some(50.0),
            ..Default::default()
        };

        let wr = player(Sport::NFL, "KC", "WR");
        let input = FactorInput {
            player: &wr,
            game: &g,
            game_logs: &l,
            season_stats: None,
            defense_ranking: None,
            stat: "receptions",
            line: 5.5,
            is_home: true,
        };
        let r = snap_target_trend(&input, Some(&extra));
        assert_eq!(r.signal, Signal::Over);
        assert!((r.strength - 10.0 / 15.0).abs() < 1e-9);

        let rb = player(Sport::NFL, "KC", "RB");
        let input = FactorInput { player: &rb, ..input };
        let r = snap_target_trend(&input, Some(&extra));
        assert_eq!(r.signal, Signal::Under);

        let r = snap_target_trend(&input, None);
        assert_eq!(r.strength, 0.0);
    }

    #[test]
    fn test_game_script_blowout_risk() {
        let p = player(Sport::NFL, "KC", "RB");
        let g = priced("KC", "CAR", 47.0, -15.5);
        let l = logs("rushing_yards", &[80.0], "CAR");
        let input = FactorInput {
            player: &p,
            game: &g,
            game_logs: &l,
            season_stats: None,
            defense_ranking: None,
            stat: "rushing_yards",
            line: 70.5,
            is_home: true,
        };
        let r = rest_game_script(&input);
        assert_eq!(r.signal, Signal::Under);
        // rest_days 1 also counts as a short week
        assert!((r.strength - 0.55).abs() < 1e-9);

        // 47 / 2 + 15.5 / 2 = 31.25 implied
        let r = implied_points(&input);
        assert_eq!(r.signal, Signal::Over);
        assert_eq!(r.strength, 1.0);
    }

    #[test]
    fn test_game_script_spread_bands() {
        let p = player(Sport::NFL, "KC", "RB");
        let l = ReverseChronologicalGameLog::default();
        let script = |spread: f64| {
            let g = priced("KC", "CAR", 44.5, spread);
            let input = FactorInput {
                player: &p,
                game: &g,
                game_logs: &l,
                season_stats: None,
                defense_ranking: None,
                stat: "rushing_yards",
                line: 70.5,
                is_home: true,
            };
            rest_game_script(&input)
        };

        let lopsided = script(-12.0);
        assert_eq!(lopsided.signal, Signal::Under);
        assert!((lopsided.strength - 0.10).abs() < 1e-9);

        let underdog = script(15.5);
        assert_eq!(underdog.signal, Signal::Under);
        assert!((underdog.strength - 0.15).abs() < 1e-9);
        assert!(underdog.detail.contains("Heavy underdog"));

        let close = script(-3.0);
        assert_eq!(close.signal, Signal::Neutral);
        assert_eq!(close.strength, 0.0);
    }

    #[test]
    fn test_extended_rest_leans_over() {
        let p = player(Sport::NFL, "KC", "WR");
        let g = game("KC", "LV");
        let mut l = logs("receiving_yards", &[75.0, 60.0], "LV");
        if let Some(latest) = l.most_recent_mut() {
            latest.rest_days = 11;
        }
        let input = FactorInput {
            player: &p,
            game: &g,
            game_logs: &l,
            season_stats: None,
            defense_ranking: None,
            stat: "receiving_yards",
            line: 64.5,
            is_home: true,
        };
        let r = rest_game_script(&input);
        assert_eq!(r.signal, Signal::Over);
        assert!((r.strength - 0.15).abs() < 1e-9);
        assert!(r.detail.contains("Extended rest (11d)"));
    }

    #[test]
    fn test_divisional_dampens_venue_split() {
        let p = player(Sport::NFL, "KC", "WR");
        let rival = game("KC", "DEN");
        let other = game("KC", "NYG");
        let l = logs("receiving_yards", &[90.0, 40.0, 95.0, 45.0, 92.0], "DEN");
        let input = FactorInput {
            player: &p,
            game: &other,
            game_logs: &l,
            season_stats: None,
            defense_ranking: None,
            stat: "receiving_yards",
            line: 70.5,
            is_home: true,
        };
        let plain = home_away_divisional(&input, &ScorerTuning::nfl());
        let input = FactorInput { game: &rival, ..input };
        let divisional = home_away_divisional(&input, &ScorerTuning::nfl());
        assert_eq!(plain.signal, Signal::Over);
        assert_eq!(divisional.signal, Signal::Over);
        assert!((divisional.strength - plain.strength * 0.75).abs() < 1e-9);
        assert!(divisional.detail.ends_with("(divisional game)"));
    }
}

//! MLB factor set.
//!
//! Replaces the volume-sensitive basketball factors with starting pitcher
//! quality, platoon splits, park and weather. Minutes and rest carry no
//! signal for hitters, and head-to-head samples are too thin to use.

use super::{weather_factor, weigh, FactorWeights, SportFactorProvider};
use crate::factors::universal;
use crate::factors::{directional, FactorInput, ScorerTuning, HOME_AWAY, MOMENTUM, RECENT_TREND, SEASON_AVERAGE};
use crate::models::{
    FactorResult, Handedness, MlbExtra, PitcherProfile, PlatoonSplits, Signal, Sport, SportExtra,
    WeightedFactor,
};
use crate::venues;
use crate::weather::StatCategory;

pub const OPPOSING_PITCHER: &str = "Opposing Pitcher Quality";
pub const PLATOON_SPLIT: &str = "Platoon Split";
pub const BALLPARK_FACTOR: &str = "Ballpark Factor";
pub const WEATHER_WIND: &str = "Weather & Wind";
pub const LINEUP_POSITION: &str = "Lineup Position";

const LEAGUE_RUN_METRIC: f64 = 4.20;
const LEAGUE_WHIP: f64 = 1.28;
/// Plate appearances gained per slot moved up the order
const PA_PER_SLOT: f64 = 0.15;

pub static MLB_WEIGHTS: FactorWeights = [
    (RECENT_TREND, 0.20),
    (SEASON_AVERAGE, 0.16),
    (OPPOSING_PITCHER, 0.22),
    (PLATOON_SPLIT, 0.15),
    (BALLPARK_FACTOR, 0.11),
    (WEATHER_WIND, 0.11),
    (LINEUP_POSITION, 0.03),
    (HOME_AWAY, 0.01),
    (MOMENTUM, 0.01),
];

pub struct MlbProvider {
    tuning: ScorerTuning,
}

impl MlbProvider {
    pub fn new() -> Self {
        Self {
            tuning: ScorerTuning::mlb(),
        }
    }
}

impl Default for MlbProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl SportFactorProvider for MlbProvider {
    fn sport(&self) -> Sport {
        Sport::MLB
    }

    fn name(&self) -> &str {
        "mlb_factors"
    }

    fn weights(&self) -> &'static FactorWeights {
        &MLB_WEIGHTS
    }

    fn get_factors(&self, input: &FactorInput, extra: Option<&SportExtra>) -> Vec<WeightedFactor> {
        let t = &self.tuning;
        let empty = MlbExtra::default();
        let mlb = extra.and_then(SportExtra::as_mlb).unwrap_or(&empty);
        let pitcher = mlb.opposing_pitcher.as_ref();

        weigh(
            &MLB_WEIGHTS,
            [
                universal::recent_trend(input, t),
                universal::season_average(input, t),
                opposing_pitcher(input, t, pitcher),
                platoon_split(mlb.platoon_splits.as_ref(), pitcher),
                ballpark_factor(input),
                weather_factor(input, mlb.weather.as_ref()),
                lineup_position(mlb.lineup_spot),
                universal::home_away_split(input, t),
                universal::momentum(input, t),
            ],
        )
    }
}

pub fn get_mlb_factors(input: &FactorInput, extra: Option<&SportExtra>) -> Vec<WeightedFactor> {
    MlbProvider::new().get_factors(input, extra)
}

/// Starting pitcher run prevention, strikeouts, baserunners and rest.
///
/// Positive scores favor the hitter. With no probable starter the team
/// defense rank stands in.
pub fn opposing_pitcher(
    input: &FactorInput,
    tuning: &ScorerTuning,
    pitcher: Option<&PitcherProfile>,
) -> FactorResult {
    let Some(pitcher) = pitcher else {
        return defense_proxy(input, tuning);
    };

    let mut score = 0.0;
    let mut parts = Vec::new();

    let run_metric = pitcher
        .fip
        .map(|v| ("FIP", v))
        .or_else(|| pitcher.era.map(|v| ("ERA", v)));
    if let Some((label, value)) = run_metric {
        score += 0.4 * (value - LEAGUE_RUN_METRIC) / 1.0;
        parts.push(format!("{} {:.2}", label, value));
    }

    if let Some(k9) = pitcher.k_per_9 {
        score += if k9 >= 10.5 {
            -0.3
        } else if k9 >= 9.5 {
            -0.2
        } else if k9 <= 6.5 {
            0.3
        } else if k9 <= 7.5 {
            0.2
        } else {
            0.0
        };
        parts.push(format!("K/9 {:.1}", k9));
    }

    if let Some(whip) = pitcher.whip {
        score += 0.5 * (whip - LEAGUE_WHIP) / 0.20;
        parts.push(format!("WHIP {:.2}", whip));
    }

    if let Some(rest) = pitcher.rest_days {
        if rest <= 3 {
            score += 0.15;
        } else if rest >= 6 {
            score -= 0.05;
        }
        parts.push(format!("{}d rest", rest));
    }

    if parts.is_empty() {
        return defense_proxy(input, tuning);
    }

    let strength = (score.abs() / 0.8).min(1.0);
    let signal = if score > 0.15 {
        Signal::Over
    } else if score < -0.15 {
        Signal::Under
    } else {
        Signal::Neutral
    };
    let detail = match signal {
        Signal::Over => format!("Hittable starter: {}", pitcher.name),
        Signal::Under => format!("Tough starter: {}", pitcher.name),
        Signal::Neutral => format!("League-average starter: {}", pitcher.name),
    };
    FactorResult::new(
        signal,
        strength,
        detail,
        format!("{} (score {:+.2})", parts.join(", "), score),
    )
}

fn defense_proxy(input: &FactorInput, tuning: &ScorerTuning) -> FactorResult {
    if input.defense_ranking.is_none() {
        return FactorResult::unavailable("Opposing pitcher data unavailable");
    }
    let proxy = universal::opponent_defense(input, tuning);
    FactorResult {
        detail: format!("No probable starter, team rank proxy: {}", proxy.detail),
        ..proxy
    }
}

/// Hitter production against the starter's throwing hand.
pub fn platoon_split(splits: Option<&PlatoonSplits>, pitcher: Option<&PitcherProfile>) -> FactorResult {
    let (Some(splits), Some(pitcher)) = (splits, pitcher) else {
        return FactorResult::unavailable("Platoon data unavailable");
    };
    let split = splits.against(pitcher.throws);
    let gap = split - 100.0;
    let (signal, strength) = directional(gap, 15.0, 40.0);
    let hand = match pitcher.throws {
        Handedness::Left => "LHP",
        Handedness::Right => "RHP",
    };
    let detail = match signal {
        Signal::Over => format!("Favorable platoon vs {}", hand),
        Signal::Under => format!("Unfavorable platoon vs {}", hand),
        Signal::Neutral => format!("Neutral platoon vs {}", hand),
    };
    FactorResult::new(signal, strength, detail, format!("{:.0} vs {} (100 = avg)", split, hand))
}

/// Static park run index for the home team's ballpark.
pub fn ballpark_factor(input: &FactorInput) -> FactorResult {
    let Some(park) = venues::ballpark(input.home_team()) else {
        return FactorResult::unavailable("Ballpark factor unavailable");
    };
    let deviation = (park.factor as f64 - 100.0) / 100.0;
    let strength = (deviation.abs() * 5.0).min(1.0);
    let mut signal = if park.factor > 105 {
        Signal::Over
    } else if park.factor < 95 {
        Signal::Under
    } else {
        Signal::Neutral
    };

    // A hitter-friendly park is a pitcher-unfriendly one
    let pitching = input.stat_category() == StatCategory::Pitching;
    if pitching {
        signal = match signal {
            Signal::Over => Signal::Under,
            Signal::Under => Signal::Over,
            Signal::Neutral => Signal::Neutral,
        };
    }

    let detail = match (park.factor > 105, park.factor < 95) {
        (true, _) => format!("{} plays hitter-friendly", park.name),
        (_, true) => format!("{} plays pitcher-friendly", park.name),
        _ => format!("{} plays neutral", park.name),
    };
    let strength = if signal == Signal::Neutral { 0.0 } else { strength };
    FactorResult::new(signal, strength, detail, format!("Park factor {}", park.factor))
}

/// Batting order slot as a plate appearance proxy.
pub fn lineup_position(slot: Option<u8>) -> FactorResult {
    let Some(slot) = slot else {
        return FactorResult::unavailable("Lineup not posted");
    };
    if !(1..=9).contains(&slot) {
        return FactorResult::unavailable("Lineup slot out of range");
    }
    let expected_pa = 4.8 - slot as f64 * PA_PER_SLOT;
    // Slot 5 is the baseline; integer distance keeps mirrored slots symmetric
    let delta = (5 - slot as i32) as f64 * PA_PER_SLOT;
    let (signal, strength) = directional(delta, PA_PER_SLOT, 0.6);
    let detail = match signal {
        Signal::Over => "Top of the order, extra plate appearances",
        Signal::Under => "Bottom of the order, fewer plate appearances",
        Signal::Neutral => "Middle of the order",
    };
    FactorResult::new(
        signal,
        strength,
        detail,
        format!("Batting {} ({:.2} expected PA)", slot, expected_pa),
    )
}

//! NBA factor set: the nine universal factors, weighted toward recent
//! trend and season average for a dense schedule with fast role changes.

use super::{weigh, FactorWeights, SportFactorProvider};
use crate::factors::universal;
use crate::factors::{
    FactorInput, ScorerTuning, GAME_ENVIRONMENT, HEAD_TO_HEAD, HOME_AWAY, MINUTES_TREND, MOMENTUM,
    OPPONENT_DEFENSE, RECENT_TREND, REST_FATIGUE, SEASON_AVERAGE,
};
use crate::models::{Sport, SportExtra, WeightedFactor};

pub static NBA_WEIGHTS: FactorWeights = [
    (RECENT_TREND, 0.26),
    (SEASON_AVERAGE, 0.20),
    (OPPONENT_DEFENSE, 0.18),
    (MINUTES_TREND, 0.14),
    (REST_FATIGUE, 0.10),
    (GAME_ENVIRONMENT, 0.07),
    (HOME_AWAY, 0.03),
    (HEAD_TO_HEAD, 0.01),
    // Tiebreaker
    (MOMENTUM, 0.01),
];

pub struct NbaProvider {
    tuning: ScorerTuning,
}

impl NbaProvider {
    pub fn new() -> Self {
        Self {
            tuning: ScorerTuning::nba(),
        }
    }
}

impl Default for NbaProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl SportFactorProvider for NbaProvider {
    fn sport(&self) -> Sport {
        Sport::NBA
    }

    fn name(&self) -> &str {
        "nba_factors"
    }

    fn weights(&self) -> &'static FactorWeights {
        &NBA_WEIGHTS
    }

    fn get_factors(&self, input: &FactorInput, _extra: Option<&SportExtra>) -> Vec<WeightedFactor> {
        let t = &self.tuning;
        weigh(
            &NBA_WEIGHTS,
            [
                universal::recent_trend(input, t),
                universal::season_average(input, t),
                universal::opponent_defense(input, t),
                universal::minutes_trend(input, t),
                universal::rest_fatigue(input, t),
                universal::game_environment(input, t),
                universal::home_away_split(input, t),
                universal::head_to_head(input, t),
                universal::momentum(input, t),
            ],
        )
    }
}

/// NBA factor entry point.
pub fn get_nba_factors(input: &FactorInput, extra: Option<&SportExtra>) -> Vec<WeightedFactor> {
    NbaProvider::new().get_factors(input, extra)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factors::test_support::*;
    use crate::models::Signal;

    #[test]
    fn test_nba_returns_nine_in_table_order() {
        let p = player(Sport::NBA, "DEN", "C");
        let g = game("DEN", "PHX");
        let l = logs("points", &[30.0, 28.0, 32.0, 29.0, 31.0], "PHX");
        let input = FactorInput {
            player: &p,
            game: &g,
            game_logs: &l,
            season_stats: None,
            defense_ranking: None,
            stat: "points",
            line: 25.0,
            is_home: true,
        };
        let factors = get_nba_factors(&input, None);
        assert_eq!(factors.len(), 9);
        assert_eq!(factors[0].name, RECENT_TREND);
        assert_eq!(factors[0].weight, 0.26);
        assert_eq!(factors[0].signal, Signal::Over);
        assert_eq!(factors[8].name, MOMENTUM);
    }
}

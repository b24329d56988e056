//! Convergence Router
//!
//! Dispatches a prop to its sport provider, tallies the nine factors and
//! computes the weighted lean.
//!
//! The lean is a signed weighted vote: `Σ weight × direction × strength`,
//! with the magnitude taken at the end. Below 10 points it is a toss-up.

use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use tracing::{debug, error};

use crate::factors::FactorInput;
use crate::models::{
    ConvergenceFactor, DefenseRanking, FactorResult, Game, Lean, LeanDirection, Player,
    ReverseChronologicalGameLog, SeasonStats, Signal, Sport, SportExtra, Tier, WeightedFactor,
};
use crate::sports::{SportProviderRegistry, FACTOR_COUNT};

/// Confidence points below which the lean is a toss-up
pub const TOSS_UP_THRESHOLD: f64 = 10.0;
pub const STRONG_TIER_THRESHOLD: f64 = 65.0;
pub const MODERATE_TIER_THRESHOLD: f64 = 50.0;

/// Fully resolved inputs for a single prop evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropRequest {
    pub player: Player,
    pub game: Game,
    #[serde(default)]
    pub game_logs: ReverseChronologicalGameLog,
    #[serde(default)]
    pub season_stats: Option<SeasonStats>,
    #[serde(default)]
    pub defense_ranking: Option<DefenseRanking>,
    pub stat: String,
    pub line: f64,
    #[serde(default)]
    pub extra: Option<SportExtra>,
}

impl PropRequest {
    pub fn is_home(&self) -> bool {
        self.game.is_home_team(&self.player.team)
    }

    pub fn input(&self) -> FactorInput<'_> {
        FactorInput {
            player: &self.player,
            game: &self.game,
            game_logs: &self.game_logs,
            season_stats: self.season_stats.as_ref(),
            defense_ranking: self.defense_ranking.as_ref(),
            stat: &self.stat,
            line: self.line,
            is_home: self.is_home(),
        }
    }
}

/// Router output: legacy flat factors plus the weighted set and lean.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvergenceResult {
    pub player_id: String,
    pub stat: String,
    pub line: f64,
    pub sport: Sport,
    pub is_home: bool,
    pub over_count: usize,
    pub under_count: usize,
    pub neutral_count: usize,
    pub factors: Vec<ConvergenceFactor>,
    pub weighted_factors: Vec<WeightedFactor>,
    pub lean: Lean,
}

impl ConvergenceResult {
    /// Factors agreeing with the lean (max side for a toss-up).
    pub fn convergence_score(&self) -> usize {
        match self.lean.direction {
            LeanDirection::Over => self.over_count,
            LeanDirection::Under => self.under_count,
            LeanDirection::TossUp => self.over_count.max(self.under_count),
        }
    }
}

pub struct ConvergenceEngine {
    registry: SportProviderRegistry,
}

impl ConvergenceEngine {
    pub fn new(registry: SportProviderRegistry) -> Self {
        Self { registry }
    }

    pub fn with_defaults() -> Self {
        Self::new(SportProviderRegistry::with_defaults())
    }

    pub fn registry(&self) -> &SportProviderRegistry {
        &self.registry
    }

    pub fn evaluate(&self, request: &PropRequest) -> ConvergenceResult {
        self.evaluate_input(&request.input(), request.extra.as_ref())
    }

    pub fn evaluate_input(&self, input: &FactorInput, extra: Option<&SportExtra>) -> ConvergenceResult {
        let sport = input.player.sport;
        let provider = self.registry.provider_for(sport);

        if let Some(extra) = extra {
            if extra.sport() != provider.sport() {
                debug!(
                    "Ignoring {} extra data for {} provider",
                    extra.sport(),
                    provider.name()
                );
            }
        }

        let mut weighted = provider.get_factors(input, extra);
        if weighted.len() != FACTOR_COUNT {
            error!(
                provider = provider.name(),
                count = weighted.len(),
                "Factor provider returned wrong factor count, normalizing to {}",
                FACTOR_COUNT
            );
            weighted.truncate(FACTOR_COUNT);
            while weighted.len() < FACTOR_COUNT {
                weighted.push(WeightedFactor::from_result(
                    "Unavailable",
                    0.0,
                    FactorResult::unavailable("Factor unavailable"),
                ));
            }
        }

        let over_count = weighted.iter().filter(|f| f.signal == Signal::Over).count();
        let under_count = weighted.iter().filter(|f| f.signal == Signal::Under).count();
        let neutral_count = weighted.len() - over_count - under_count;
        let lean = compute_lean(&weighted);

        debug!(
            player = %input.player.id,
            sport = %sport,
            stat = input.stat,
            line = input.line,
            confidence = lean.confidence,
            "Convergence {} ({} over / {} under / {} neutral)",
            lean.direction.label(),
            over_count,
            under_count,
            neutral_count
        );

        ConvergenceResult {
            player_id: input.player.id.clone(),
            stat: input.stat.to_string(),
            line: input.line,
            sport,
            is_home: input.is_home,
            over_count,
            under_count,
            neutral_count,
            factors: weighted.iter().map(ConvergenceFactor::from).collect(),
            weighted_factors: weighted,
            lean,
        }
    }
}

impl Default for ConvergenceEngine {
    fn default() -> Self {
        Self::with_defaults()
    }
}

fn default_engine() -> &'static ConvergenceEngine {
    static ENGINE: OnceLock<ConvergenceEngine> = OnceLock::new();
    ENGINE.get_or_init(ConvergenceEngine::with_defaults)
}

/// Evaluate a prop with the default provider registry.
#[allow(clippy::too_many_arguments)]
pub fn evaluate(
    player: &Player,
    game: &Game,
    game_logs: &ReverseChronologicalGameLog,
    season_stats: Option<&SeasonStats>,
    defense_ranking: Option<&DefenseRanking>,
    stat: &str,
    line: f64,
    extra: Option<&SportExtra>,
) -> ConvergenceResult {
    let input = FactorInput {
        player,
        game,
        game_logs,
        season_stats,
        defense_ranking,
        stat,
        line,
        is_home: game.is_home_team(&player.team),
    };
    default_engine().evaluate_input(&input, extra)
}

/// Signed weighted vote across the factors.
pub fn weighted_sum(factors: &[WeightedFactor]) -> f64 {
    let sum: f64 = factors.iter().map(WeightedFactor::contribution).sum();
    if sum.is_finite() {
        sum
    } else {
        0.0
    }
}

pub fn compute_lean(factors: &[WeightedFactor]) -> Lean {
    let sum = weighted_sum(factors);
    let raw = sum.abs() * 100.0;

    let direction = if raw < TOSS_UP_THRESHOLD {
        LeanDirection::TossUp
    } else if sum > 0.0 {
        LeanDirection::Over
    } else {
        LeanDirection::Under
    };
    let tier = if raw >= STRONG_TIER_THRESHOLD {
        Tier::Strong
    } else if raw >= MODERATE_TIER_THRESHOLD {
        Tier::Moderate
    } else {
        Tier::Neutral
    };

    Lean {
        direction,
        confidence: clamp_confidence(raw),
        tier,
        factors: factors.to_vec(),
    }
}

/// Round and clamp to the displayable 1..=99 range.
pub(crate) fn clamp_confidence(raw: f64) -> u8 {
    if !raw.is_finite() {
        return 1;
    }
    raw.round().clamp(1.0, 99.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factors::test_support::*;
    use crate::sports::{FactorWeights, SportFactorProvider};
    use std::sync::Arc;

    fn factor(weight: f64, signal: Signal, strength: f64) -> WeightedFactor {
        WeightedFactor::from_result("f", weight, FactorResult::new(signal, strength, "", ""))
    }

    #[test]
    fn test_lean_all_over_is_strong() {
        let factors: Vec<WeightedFactor> = (0..9).map(|_| factor(1.0 / 9.0, Signal::Over, 1.0)).collect();
        let lean = compute_lean(&factors);
        assert_eq!(lean.direction, LeanDirection::Over);
        assert_eq!(lean.tier, Tier::Strong);
        assert_eq!(lean.confidence, 99);
    }

    #[test]
    fn test_lean_toss_up_below_ten() {
        let factors = vec![
            factor(0.5, Signal::Over, 0.3),
            factor(0.5, Signal::Under, 0.2),
        ];
        let lean = compute_lean(&factors);
        assert_eq!(lean.direction, LeanDirection::TossUp);
        assert_eq!(lean.confidence, 5);
        assert_eq!(lean.tier, Tier::Neutral);
    }

    #[test]
    fn test_lean_tiers_and_floor() {
        let lean = compute_lean(&[factor(1.0, Signal::Under, 0.55)]);
        assert_eq!(lean.direction, LeanDirection::Under);
        assert_eq!(lean.tier, Tier::Moderate);
        assert_eq!(lean.confidence, 55);

        let lean = compute_lean(&[factor(1.0, Signal::Neutral, 0.0)]);
        assert_eq!(lean.confidence, 1);
    }

    #[test]
    fn test_empty_logs_still_nine_factors() {
        let p = player(Sport::NBA, "BOS", "SF");
        let g = game("BOS", "MIA");
        let l = ReverseChronologicalGameLog::default();
        let result = evaluate(&p, &g, &l, None, None, "points", 24.5, None);
        assert_eq!(result.weighted_factors.len(), 9);
        assert_eq!(result.factors.len(), 9);
        assert_eq!(result.neutral_count, 9);
        assert_eq!(result.lean.direction, LeanDirection::TossUp);
        assert!((1..=99).contains(&result.lean.confidence));
        assert!(result.is_home);
    }

    struct ShortProvider;

    impl SportFactorProvider for ShortProvider {
        fn sport(&self) -> Sport {
            Sport::NHL
        }
        fn name(&self) -> &str {
            "short"
        }
        fn weights(&self) -> &'static FactorWeights {
            &crate::sports::nba::NBA_WEIGHTS
        }
        fn get_factors(&self, _input: &FactorInput, _extra: Option<&SportExtra>) -> Vec<WeightedFactor> {
            vec![factor(0.5, Signal::Over, 1.0); 3]
        }
    }

    #[test]
    fn test_wrong_factor_count_is_normalized() {
        let mut registry = SportProviderRegistry::with_defaults();
        registry.register(Arc::new(ShortProvider));
        let engine = ConvergenceEngine::new(registry);

        let request = PropRequest {
            player: player(Sport::NHL, "BOS", "C"),
            game: game("TOR", "BOS"),
            game_logs: ReverseChronologicalGameLog::default(),
            season_stats: None,
            defense_ranking: None,
            stat: "shots".to_string(),
            line: 3.5,
            extra: None,
        };
        let result = engine.evaluate(&request);
        assert_eq!(result.weighted_factors.len(), 9);
        assert_eq!(result.over_count, 3);
        assert_eq!(result.neutral_count, 6);
        assert!(!result.is_home);
    }
}

//! Sport Factor Providers
//!
//! Defines the SportFactorProvider trait and the registry that routes a
//! sport to its factor set. Every provider emits exactly nine weighted
//! factors whose weights sum to 1.0.

use rustc_hash::FxHashMap;
use std::sync::Arc;
use tracing::debug;

use crate::factors::FactorInput;
use crate::models::{FactorResult, Signal, Sport, SportExtra, WeatherConditions, WeightedFactor};
use crate::weather::calculate_weather_signal;

pub mod mlb;
pub mod nba;
pub mod nfl;

pub use mlb::{get_mlb_factors, MlbProvider};
pub use nba::{get_nba_factors, NbaProvider};
pub use nfl::{get_nfl_factors, NflProvider};

/// Number of factors every provider must return.
pub const FACTOR_COUNT: usize = 9;

/// Factor name and weight for one slot.
pub type FactorWeights = [(&'static str, f64); FACTOR_COUNT];

/// Per-sport factor selection and weighting.
pub trait SportFactorProvider: Send + Sync {
    fn sport(&self) -> Sport;

    /// Provider name for logging and debugging
    fn name(&self) -> &str;

    fn weights(&self) -> &'static FactorWeights;

    /// Evaluate all nine factors for the input.
    fn get_factors(&self, input: &FactorInput, extra: Option<&SportExtra>) -> Vec<WeightedFactor>;
}

/// Registry of sport providers keyed by sport.
///
/// Sports without a dedicated provider fall back to NBA.
pub struct SportProviderRegistry {
    providers: FxHashMap<Sport, Arc<dyn SportFactorProvider>>,
    fallback: Arc<dyn SportFactorProvider>,
}

impl SportProviderRegistry {
    /// Create a registry with the NBA, MLB and NFL providers
    pub fn with_defaults() -> Self {
        let nba: Arc<dyn SportFactorProvider> = Arc::new(NbaProvider::new());
        let mut providers: FxHashMap<Sport, Arc<dyn SportFactorProvider>> = FxHashMap::default();
        providers.insert(Sport::NBA, nba.clone());
        providers.insert(Sport::MLB, Arc::new(MlbProvider::new()));
        providers.insert(Sport::NFL, Arc::new(NflProvider::new()));
        Self {
            providers,
            fallback: nba,
        }
    }

    /// Register or replace the provider for its sport
    pub fn register(&mut self, provider: Arc<dyn SportFactorProvider>) {
        debug!("Registering factor provider {} for {}", provider.name(), provider.sport());
        self.providers.insert(provider.sport(), provider);
    }

    /// Provider for the sport, NBA when none is registered
    pub fn provider_for(&self, sport: Sport) -> &dyn SportFactorProvider {
        match self.providers.get(&sport) {
            Some(provider) => provider.as_ref(),
            None => {
                debug!("No factor provider for {}, falling back to {}", sport, self.fallback.name());
                self.fallback.as_ref()
            }
        }
    }

    pub fn has_provider(&self, sport: Sport) -> bool {
        self.providers.contains_key(&sport)
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl Default for SportProviderRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Pair each factor result with its slot weight.
pub(crate) fn weigh(weights: &FactorWeights, results: [FactorResult; FACTOR_COUNT]) -> Vec<WeightedFactor> {
    weights
        .iter()
        .zip(results)
        .map(|((name, weight), result)| WeightedFactor::from_result(name, *weight, result))
        .collect()
}

/// Weather factor shared by the outdoor sports.
pub(crate) fn weather_factor(input: &FactorInput, weather: Option<&WeatherConditions>) -> FactorResult {
    let signal = calculate_weather_signal(
        weather,
        input.player.sport,
        input.stat_category(),
        input.home_team(),
    );
    let direction = if signal.signal > 0.1 {
        Signal::Over
    } else if signal.signal < -0.1 {
        Signal::Under
    } else {
        Signal::Neutral
    };
    let data_point = match signal.effective_wind {
        Some(wind) => format!("Signal {:+.2}, effective wind {:+.1} mph", signal.signal, wind),
        None => format!("Signal {:+.2}", signal.signal),
    };
    FactorResult::new(direction, signal.signal.abs(), signal.detail, data_point)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weight_sum(weights: &FactorWeights) -> f64 {
        weights.iter().map(|(_, w)| w).sum()
    }

    #[test]
    fn test_weights_sum_to_one() {
        let registry = SportProviderRegistry::with_defaults();
        for sport in [Sport::NBA, Sport::MLB, Sport::NFL] {
            let provider = registry.provider_for(sport);
            assert!(
                (weight_sum(provider.weights()) - 1.0).abs() < 1e-9,
                "{} weights sum to {}",
                sport,
                weight_sum(provider.weights())
            );
        }
    }

    #[test]
    fn test_unknown_sport_falls_back_to_nba() {
        let registry = SportProviderRegistry::with_defaults();
        assert_eq!(registry.len(), 3);
        assert!(!registry.has_provider(Sport::NHL));
        assert_eq!(registry.provider_for(Sport::NHL).sport(), Sport::NBA);
        assert_eq!(registry.provider_for(Sport::MLB).sport(), Sport::MLB);
    }

    #[test]
    fn test_factor_names_unique_per_sport() {
        let registry = SportProviderRegistry::with_defaults();
        for sport in [Sport::NBA, Sport::MLB, Sport::NFL] {
            let mut names: Vec<&str> = registry.provider_for(sport).weights().iter().map(|(n, _)| *n).collect();
            names.sort();
            names.dedup();
            assert_eq!(names.len(), FACTOR_COUNT);
        }
    }
}

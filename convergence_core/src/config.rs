use std::env;
use std::time::Duration;

use crate::error::ConfigError;

/// Upper bound on concurrent provider fetches
pub const MAX_FETCH_CONCURRENCY: usize = 15;

#[derive(Debug, Clone, PartialEq)]
pub struct HeatCheckConfig {
    pub min_confidence: u8,
    pub max_picks: usize,
    pub min_games: usize,
    /// Skip negligible stats (e.g. 0.2 blocks per game)
    pub min_season_average: f64,
}

impl Default for HeatCheckConfig {
    fn default() -> Self {
        Self {
            min_confidence: 55,
            max_picks: 15,
            min_games: 5,
            min_season_average: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FetchConfig {
    pub max_concurrency: usize,
    pub cache_ttl: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            max_concurrency: 8,
            cache_ttl: Duration::from_secs(300),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EngineConfig {
    pub heatcheck: HeatCheckConfig,
    pub fetch: FetchConfig,
}

impl EngineConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; unset keys take defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let heatcheck = HeatCheckConfig {
            min_confidence: parse_confidence(&lookup, "HEATCHECK_MIN_CONFIDENCE", defaults.heatcheck.min_confidence)?,
            max_picks: parse_usize(&lookup, "HEATCHECK_MAX_PICKS", defaults.heatcheck.max_picks)?,
            min_games: parse_usize(&lookup, "HEATCHECK_MIN_GAMES", defaults.heatcheck.min_games)?,
            min_season_average: parse_f64(
                &lookup,
                "HEATCHECK_MIN_SEASON_AVG",
                defaults.heatcheck.min_season_average,
            )?,
        };

        let max_concurrency = parse_usize(&lookup, "FETCH_MAX_CONCURRENCY", defaults.fetch.max_concurrency)?
            .clamp(1, MAX_FETCH_CONCURRENCY);
        let cache_ttl_secs = parse_u64(&lookup, "FETCH_CACHE_TTL_SECS", defaults.fetch.cache_ttl.as_secs())?;

        Ok(Self {
            heatcheck,
            fetch: FetchConfig {
                max_concurrency,
                cache_ttl: Duration::from_secs(cache_ttl_secs),
            },
        })
    }
}

fn raw_or(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn parse_usize(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: usize) -> Result<usize, ConfigError> {
    match raw_or(lookup, key) {
        Some(raw) => raw
            .parse::<usize>()
            .map_err(|_| ConfigError::invalid(key, &raw, "non-negative integer")),
        None => Ok(default),
    }
}

fn parse_u64(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: u64) -> Result<u64, ConfigError> {
    match raw_or(lookup, key) {
        Some(raw) => raw
            .parse::<u64>()
            .map_err(|_| ConfigError::invalid(key, &raw, "seconds as integer")),
        None => Ok(default),
    }
}

fn parse_f64(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: f64) -> Result<f64, ConfigError> {
    match raw_or(lookup, key) {
        Some(raw) => match raw.parse::<f64>() {
            Ok(v) if v.is_finite() && v >= 0.0 => Ok(v),
            _ => Err(ConfigError::invalid(key, &raw, "non-negative number")),
        },
        None => Ok(default),
    }
}

fn parse_confidence(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: u8) -> Result<u8, ConfigError> {
    match raw_or(lookup, key) {
        Some(raw) => match raw.parse::<u8>() {
            Ok(v) if (1..=99).contains(&v) => Ok(v),
            _ => Err(ConfigError::invalid(key, &raw, "integer 1-99")),
        },
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = EngineConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.heatcheck.min_confidence, 55);
        assert_eq!(config.heatcheck.max_picks, 15);
        assert_eq!(config.fetch.max_concurrency, 8);
        assert_eq!(config.fetch.cache_ttl, Duration::from_secs(300));
    }

    #[test]
    fn test_overrides_and_concurrency_clamp() {
        let config = EngineConfig::from_lookup(lookup(&[
            ("HEATCHECK_MIN_CONFIDENCE", "60"),
            ("HEATCHECK_MIN_SEASON_AVG", " 1.5 "),
            ("FETCH_MAX_CONCURRENCY", "40"),
        ]))
        .unwrap();
        assert_eq!(config.heatcheck.min_confidence, 60);
        assert_eq!(config.heatcheck.min_season_average, 1.5);
        assert_eq!(config.fetch.max_concurrency, 15);

        let config = EngineConfig::from_lookup(lookup(&[("FETCH_MAX_CONCURRENCY", "0")])).unwrap();
        assert_eq!(config.fetch.max_concurrency, 1);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let err = EngineConfig::from_lookup(lookup(&[("HEATCHECK_MAX_PICKS", "lots")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::invalid("HEATCHECK_MAX_PICKS", "lots", "non-negative integer")
        );
        assert!(EngineConfig::from_lookup(lookup(&[("HEATCHECK_MIN_CONFIDENCE", "120")])).is_err());
        assert!(EngineConfig::from_lookup(lookup(&[("HEATCHECK_MIN_SEASON_AVG", "-1")])).is_err());
    }
}

//! Error types for input providers and configuration.
//!
//! The scoring path itself never fails: sparse inputs degrade to neutral
//! factors. These errors only surface at the data and config boundaries.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("provider unavailable: {0}")]
    Unavailable(String),

    #[error("failed to decode provider payload: {0}")]
    Decode(String),
}

impl ProviderError {
    /// Missing data is expected for rookies and thin feeds, not an outage.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ProviderError::NotFound(_))
    }
}

impl From<serde_json::Error> for ProviderError {
    fn from(err: serde_json::Error) -> Self {
        ProviderError::Decode(err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid {key}: {value} (expected {expected})")]
    Invalid {
        key: String,
        value: String,
        expected: String,
    },
}

impl ConfigError {
    pub fn invalid(key: &str, value: &str, expected: &str) -> Self {
        ConfigError::Invalid {
            key: key.to_string(),
            value: value.to_string(),
            expected: expected.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ConfigError::invalid("HEATCHECK_MAX_PICKS", "abc", "integer");
        assert_eq!(err.to_string(), "invalid HEATCHECK_MAX_PICKS: abc (expected integer)");

        let err: ProviderError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, ProviderError::Decode(_)));
        assert!(!err.is_not_found());
        assert!(ProviderError::NotFound("p1".into()).is_not_found());
    }
}

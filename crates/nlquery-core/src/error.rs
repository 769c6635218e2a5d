//! Error types for nlquery

use thiserror::Error;

/// Result type alias using NlQueryError
pub type Result<T> = std::result::Result<T, NlQueryError>;

/// Error type alias for convenience
pub type Error = NlQueryError;

/// Exit codes for CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL_ERROR: i32 = 1;
    pub const RATE_LIMITED: i32 = 2;
    pub const INVALID_INPUT: i32 = 3;
}

/// Main error type for nlquery
#[derive(Debug, Error)]
pub enum NlQueryError {
    /// Missing credential or unusable configuration. Raised before any network call.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The language model reported resource exhaustion.
    #[error("LLM rate-limit exceeded: {0}")]
    RateLimited(String),

    /// The model answer could not be turned into a query, or the model call failed.
    #[error("Query generation failed: {0}")]
    QueryGeneration(String),

    #[error("Search backend error: {0}")]
    Backend(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl NlQueryError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::RateLimited(_) => exit_codes::RATE_LIMITED,
            Self::Config(_) | Self::Yaml(_) => exit_codes::INVALID_INPUT,
            _ => exit_codes::GENERAL_ERROR,
        }
    }

    /// True for the one LLM failure the pipeline reports separately.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_is_distinguished() {
        let err = NlQueryError::RateLimited("quota exhausted".to_string());
        assert!(err.is_rate_limited());
        assert_eq!(err.exit_code(), exit_codes::RATE_LIMITED);
        assert_eq!(err.to_string(), "LLM rate-limit exceeded: quota exhausted");

        let generic = NlQueryError::QueryGeneration("no JSON".to_string());
        assert!(!generic.is_rate_limited());
        assert_eq!(generic.exit_code(), exit_codes::GENERAL_ERROR);
    }

    #[test]
    fn test_config_errors_are_invalid_input() {
        let err = NlQueryError::Config("missing key".to_string());
        assert_eq!(err.exit_code(), exit_codes::INVALID_INPUT);
    }
}

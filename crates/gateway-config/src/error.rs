//! Configuration error types.

use thiserror::Error;

/// Errors from loading gateway configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Required environment variable missing or empty.
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    /// URL parsing error
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias using ConfigError.
pub type ConfigResult<T> = Result<T, ConfigError>;

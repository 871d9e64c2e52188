//! Provider Error Types

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, ProviderError>;

/// Errors raised while configuring a provider (never per request)
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Invalid or missing configuration value
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP client could not be built
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    /// Invalid marker pattern
    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),
}

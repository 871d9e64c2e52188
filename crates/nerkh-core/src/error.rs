//! Error Types

use thiserror::Error;

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, NerkhError>;

/// Core error types
#[derive(Error, Debug)]
pub enum NerkhError {
    /// Two catalog entries share a key
    #[error("Duplicate instrument key: {0}")]
    DuplicateKey(String),

    /// A category has no instruments
    #[error("Category has no instruments: {0}")]
    EmptyCategory(String),

    /// Catalog entry is missing a required field
    #[error("Invalid catalog entry: {0}")]
    InvalidEntry(String),

    /// Key not present in the catalog
    #[error("Instrument not found: {0}")]
    InstrumentNotFound(String),

    /// Selector is not one of the known keyboard options
    #[error("Unrecognized selector: {0}")]
    UnrecognizedSelector(String),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Why a single instrument could not be fetched.
///
/// Recovered per instrument by the reporter and rendered as a sentinel.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Network failure, timeout, non-success status or empty body
    #[error("Upstream unavailable: {0}")]
    Unavailable(String),

    /// Payload did not have the expected structure
    #[error("Malformed payload: {0}")]
    Malformed(String),
}

/// Sentinel shown when the payload had no quote ("not found")
pub const NOT_FOUND: &str = "یافت نشد";

/// Sentinel shown when the provider could not be reached ("connection error")
pub const CONNECTION_ERROR: &str = "خطا در اتصال";

impl FetchError {
    /// Placeholder text for the report line
    pub fn sentinel(&self) -> &'static str {
        match self {
            FetchError::Unavailable(_) => CONNECTION_ERROR,
            FetchError::Malformed(_) => NOT_FOUND,
        }
    }

    pub fn unavailable(msg: impl Into<String>) -> Self {
        FetchError::Unavailable(msg.into())
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        FetchError::Malformed(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinels_follow_error_kind() {
        assert_eq!(FetchError::unavailable("timeout").sentinel(), CONNECTION_ERROR);
        assert_eq!(FetchError::malformed("no span").sentinel(), NOT_FOUND);
    }

    #[test]
    fn catalog_json_errors_convert() {
        let err: NerkhError = serde_json::from_str::<Vec<u8>>("{").unwrap_err().into();
        assert!(err.to_string().starts_with("JSON error:"));
    }
}

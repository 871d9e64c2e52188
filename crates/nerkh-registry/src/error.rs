//! Registry Error Types

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, RegistryError>;

/// Registry errors
#[derive(Error, Debug)]
pub enum RegistryError {
    /// SQLite failure
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Backing store failed
    #[error("Storage error: {0}")]
    Storage(String),
}

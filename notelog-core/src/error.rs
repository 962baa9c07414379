//! Error types for notelog-core

use thiserror::Error;

/// Main error type for the notelog-core library
#[derive(Error, Debug)]
pub enum Error {
    /// `log`/`note` called with nothing to record
    #[error("provide something to log")]
    EmptyMessage,

    /// Level name or value that does not map to a canonical level
    #[error("wrong level provided for logging: {0}")]
    InvalidLevel(String),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type alias for notelog-core
pub type Result<T> = std::result::Result<T, Error>;

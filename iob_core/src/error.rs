//! Error types for the iob_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for iob_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Curve parameter outside its valid domain (non-positive DIA or peak)
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Malformed dose arguments
    #[error("{0}")]
    InvalidInput(String),

    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

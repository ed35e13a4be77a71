//! Error types for the prosa preprocessing pipeline.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for prosa operations.
///
/// Errors can only arise while loading configuration. Per-document
/// processing is total: malformed input text yields a degenerate but
/// valid result instead of an error, and an invalid pattern inside an
/// otherwise well-formed configuration is replaced by a safe default
/// at pipeline construction time rather than reported here.
#[derive(Error, Debug)]
pub enum ProsaError {
    /// I/O error while reading a configuration file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file is not valid JSON.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration file not found.
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),
}

/// Result type alias for prosa operations.
pub type Result<T> = std::result::Result<T, ProsaError>;

impl From<serde_json::Error> for ProsaError {
    fn from(err: serde_json::Error) -> Self {
        ProsaError::Config(err.to_string())
    }
}

//! Error types for falar

use std::io;
use thiserror::Error;

/// Main error type for falar
#[derive(Error, Debug)]
pub enum FalarError {
    #[error("Speech engine error: {0}")]
    Speech(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("INI parse error: {0}")]
    IniParse(String),

    #[error("Clipboard error: {0}")]
    Clipboard(String),

    #[error("Usage error: {0}")]
    Usage(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for falar operations
pub type Result<T> = std::result::Result<T, FalarError>;

impl From<String> for FalarError {
    fn from(s: String) -> Self {
        FalarError::Other(s)
    }
}

impl From<&str> for FalarError {
    fn from(s: &str) -> Self {
        FalarError::Other(s.to_string())
    }
}

//! Error types for readaloud

use std::io;
use thiserror::Error;

/// Main error type for readaloud
#[derive(Error, Debug)]
pub enum ReadAloudError {
    #[error("Speech synthesis error: {0}")]
    Speech(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file is not valid UTF-8 text
    #[error("Could not read {0}. Please ensure it's a valid text file.")]
    InvalidEncoding(String),

    #[error("No text to export")]
    NothingToExport,

    #[error("{0} is not supported by the speech engine")]
    Unsupported(&'static str),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for readaloud operations
pub type Result<T> = std::result::Result<T, ReadAloudError>;

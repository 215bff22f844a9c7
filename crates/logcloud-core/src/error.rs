//! Structured error types for the analysis core.

use thiserror::Error;

/// A single entry's payload could not be turned into a log message.
///
/// Always recovered: the batch extractor skips the entry and logs a warning.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("payload is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    #[error("payload could not be rendered as JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Invalid analysis or output settings. Fatal, raised before any message is
/// processed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("ngram_size must be at least 1, got {0}")]
    NgramSize(i64),

    #[error("unsupported analysis mode {0:?}, expected `word` or `phrase`")]
    UnsupportedMode(String),

    #[error("unsupported output format {0:?}, expected `svg` or `terminal`")]
    UnsupportedFormat(String),

    #[error("unsupported order {0:?}, expected `timestamp desc` or `timestamp asc`")]
    UnsupportedOrder(String),
}

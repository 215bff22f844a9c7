//! Errors raised while fetching entries from a log source.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("reading {origin}: {source}")]
    Io {
        origin: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed log entry on line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Filter(#[from] FilterError),
}

/// A syntax error in a filter expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid filter at offset {offset}: {message}")]
pub struct FilterError {
    /// Byte offset into the filter string.
    pub offset: usize,
    pub message: String,
}

impl FilterError {
    pub fn new(offset: usize, message: impl Into<String>) -> Self {
        Self {
            offset,
            message: message.into(),
        }
    }
}

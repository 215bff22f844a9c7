//! Cloud Logging export file source.

use std::path::{Path, PathBuf};

use logcloud_core::RawEntry;

use crate::error::FeedError;
use crate::export::parse_export;
use crate::{select, ListRequest, LogSource};

/// Reads entries from an export written by `gcloud logging read --format=json`.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LogSource for FileSource {
    async fn list_entries(&self, request: &ListRequest) -> Result<Vec<RawEntry>, FeedError> {
        // Parse the filter first so a typo fails before any I/O.
        let filter = request.parsed_filter()?;

        let path = self.path();
        let src = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| FeedError::Io {
                origin: path.display().to_string(),
                source,
            })?;
        let entries = parse_export(&src)?;
        tracing::info!(path = %path.display(), entries = entries.len(), "read log export");

        Ok(select(entries, request, filter.as_ref()))
    }
}

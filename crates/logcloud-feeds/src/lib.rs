//! logcloud-feeds: log source adapters for logcloud.
//!
//! Each source produces a batch of [`RawEntry`] values for a [`ListRequest`].
//! Whatever the backing store, selection is the same: restrict to the
//! requested log, apply the filter expression, order by timestamp, and cap
//! the result at `limit`.

pub mod error;
pub mod export;
pub mod file;
pub mod filter;
pub mod stdin;

use std::future::Future;

use logcloud_core::{ConfigurationError, RawEntry};

pub use error::{FeedError, FilterError};
pub use file::FileSource;
pub use filter::Filter;
pub use stdin::StdinSource;

/// Entry ordering by timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Order {
    #[default]
    TimestampDesc,
    TimestampAsc,
}

impl std::str::FromStr for Order {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_ascii_lowercase();
        match normalized.as_str() {
            "timestamp desc" | "timestamp" => Ok(Order::TimestampDesc),
            "timestamp asc" => Ok(Order::TimestampAsc),
            _ => Err(ConfigurationError::UnsupportedOrder(s.to_string())),
        }
    }
}

/// What to fetch from a log source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRequest {
    pub project_id: String,
    /// Short (`app`) or fully qualified (`projects/p/logs/app`) log name.
    pub log_name: String,
    /// Maximum number of entries returned.
    pub limit: usize,
    /// Optional filter expression, see [`filter`].
    pub filter: Option<String>,
    pub order: Order,
}

impl ListRequest {
    pub fn new(project_id: impl Into<String>, log_name: impl Into<String>, limit: usize) -> Self {
        Self {
            project_id: project_id.into(),
            log_name: log_name.into(),
            limit,
            filter: None,
            order: Order::default(),
        }
    }

    /// Attach a filter expression; blank expressions are dropped.
    pub fn with_filter(mut self, filter: Option<String>) -> Self {
        self.filter = filter.filter(|f| !f.trim().is_empty());
        self
    }

    pub fn with_order(mut self, order: Order) -> Self {
        self.order = order;
        self
    }

    /// `projects/<project>/logs/<name>`, unless the name is already qualified.
    pub fn qualified_log_name(&self) -> String {
        if self.log_name.contains("/logs/") {
            self.log_name.clone()
        } else {
            format!("projects/{}/logs/{}", self.project_id, self.log_name)
        }
    }

    /// Parse the filter expression, if any.
    pub fn parsed_filter(&self) -> Result<Option<Filter>, FilterError> {
        self.filter.as_deref().map(Filter::parse).transpose()
    }
}

/// A source of raw log entries.
pub trait LogSource {
    fn list_entries(
        &self,
        request: &ListRequest,
    ) -> impl Future<Output = Result<Vec<RawEntry>, FeedError>> + Send;
}

/// Restrict, filter, order, and cap a batch of entries for `request`.
///
/// Ordering is stable; entries without a timestamp sort after all others in
/// either direction.
pub fn select(
    entries: Vec<RawEntry>,
    request: &ListRequest,
    filter: Option<&Filter>,
) -> Vec<RawEntry> {
    let qualified = request.qualified_log_name();
    let before = entries.len();

    let mut kept: Vec<RawEntry> = entries
        .into_iter()
        .filter(|e| e.log_name == qualified || e.log_name == request.log_name)
        .filter(|e| filter.map_or(true, |f| f.matches(e)))
        .collect();

    kept.sort_by(|a, b| match (a.timestamp, b.timestamp) {
        (Some(x), Some(y)) => match request.order {
            Order::TimestampDesc => y.cmp(&x),
            Order::TimestampAsc => x.cmp(&y),
        },
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
    kept.truncate(request.limit);

    tracing::debug!(
        log_name = %qualified,
        read = before,
        selected = kept.len(),
        "selected log entries"
    );
    kept
}

/// An in-memory source, for callers that already hold the entries.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    entries: Vec<RawEntry>,
}

impl MemorySource {
    pub fn new(entries: Vec<RawEntry>) -> Self {
        Self { entries }
    }
}

impl LogSource for MemorySource {
    async fn list_entries(&self, request: &ListRequest) -> Result<Vec<RawEntry>, FeedError> {
        let filter = request.parsed_filter()?;
        Ok(select(self.entries.clone(), request, filter.as_ref()))
    }
}

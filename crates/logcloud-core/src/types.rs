//! Core types for logcloud-core.
//!
//! This module defines the data structures handed across the log-source
//! boundary: the [`RawEntry`] envelope, its variant-shaped [`Payload`], and
//! the Cloud Logging [`Severity`] ladder.

use std::collections::BTreeMap;

/// One log record as received from a log source.
///
/// Only `payload` feeds the analysis; the envelope fields exist so sources
/// can apply log-name restrictions, filters, and timestamp ordering.
#[derive(Debug, Clone, PartialEq)]
pub struct RawEntry {
    /// Fully qualified log name, e.g. `projects/acme/logs/app`.
    pub log_name: String,
    /// Event timestamp (UTC), if the source supplied a parseable one.
    pub timestamp: Option<chrono::DateTime<chrono::Utc>>,
    pub severity: Severity,
    /// User-defined labels attached to the entry.
    pub labels: BTreeMap<String, String>,
    pub payload: Payload,
}

impl RawEntry {
    /// Build an entry with no timestamp, `DEFAULT` severity, and no labels.
    pub fn new(log_name: impl Into<String>, payload: Payload) -> Self {
        Self {
            log_name: log_name.into(),
            timestamp: None,
            severity: Severity::Default,
            labels: BTreeMap::new(),
            payload,
        }
    }

    pub fn with_timestamp(mut self, ts: chrono::DateTime<chrono::Utc>) -> Self {
        self.timestamp = Some(ts);
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }
}

/// The variant-shaped body of a [`RawEntry`].
///
/// Each variant has exactly one extraction rule in
/// [`extract`](crate::extract::extract).
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Plain text (`textPayload`).
    Text(String),
    /// Structured key-value mapping (`jsonPayload`).
    Map(serde_json::Map<String, serde_json::Value>),
    /// Undecoded bytes, e.g. a stdin line that was not valid UTF-8.
    Binary(Vec<u8>),
    /// Anything else (`protoPayload`, a missing payload, scalars).
    Other(serde_json::Value),
}

impl From<&str> for Payload {
    fn from(s: &str) -> Self {
        Payload::Text(s.to_string())
    }
}

impl From<String> for Payload {
    fn from(s: String) -> Self {
        Payload::Text(s)
    }
}

/// Cloud Logging severity, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Severity {
    #[default]
    Default,
    Debug,
    Info,
    Notice,
    Warning,
    Error,
    Critical,
    Alert,
    Emergency,
}

impl Severity {
    /// Parse a severity name case-insensitively, accepting common aliases
    /// (`warn`, `err`, `fatal`) emitted by non-GCP loggers.
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "default" => Some(Severity::Default),
            "debug" | "trace" => Some(Severity::Debug),
            "info" => Some(Severity::Info),
            "notice" => Some(Severity::Notice),
            "warning" | "warn" => Some(Severity::Warning),
            "error" | "err" => Some(Severity::Error),
            "critical" | "fatal" => Some(Severity::Critical),
            "alert" => Some(Severity::Alert),
            "emergency" => Some(Severity::Emergency),
            _ => None,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Default => write!(f, "DEFAULT"),
            Severity::Debug => write!(f, "DEBUG"),
            Severity::Info => write!(f, "INFO"),
            Severity::Notice => write!(f, "NOTICE"),
            Severity::Warning => write!(f, "WARNING"),
            Severity::Error => write!(f, "ERROR"),
            Severity::Critical => write!(f, "CRITICAL"),
            Severity::Alert => write!(f, "ALERT"),
            Severity::Emergency => write!(f, "EMERGENCY"),
        }
    }
}

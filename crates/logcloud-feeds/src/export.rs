//! Cloud Logging export parsing.
//!
//! Accepts the JSON written by `gcloud logging read --format=json` (a single
//! array of `LogEntry` objects) as well as JSON lines, one `LogEntry` per
//! line. Only the fields logcloud uses are read; everything else is ignored.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use logcloud_core::{Payload, RawEntry, Severity};
use serde::Deserialize;

use crate::error::FeedError;

/// The subset of the `LogEntry` wire format logcloud reads.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireEntry {
    #[serde(default)]
    log_name: String,
    timestamp: Option<String>,
    receive_timestamp: Option<String>,
    severity: Option<String>,
    #[serde(default)]
    labels: BTreeMap<String, String>,
    text_payload: Option<String>,
    json_payload: Option<serde_json::Map<String, serde_json::Value>>,
    proto_payload: Option<serde_json::Value>,
}

impl WireEntry {
    fn into_raw(self) -> RawEntry {
        let payload = if let Some(text) = self.text_payload {
            Payload::Text(text)
        } else if let Some(map) = self.json_payload {
            Payload::Map(map)
        } else {
            Payload::Other(self.proto_payload.unwrap_or(serde_json::Value::Null))
        };

        let timestamp = self
            .timestamp
            .as_deref()
            .or(self.receive_timestamp.as_deref())
            .and_then(|ts| parse_timestamp(ts, &self.log_name));

        let severity = self
            .severity
            .as_deref()
            .and_then(Severity::from_str_loose)
            .unwrap_or_default();

        RawEntry {
            log_name: self.log_name,
            timestamp,
            severity,
            labels: self.labels,
            payload,
        }
    }
}

fn parse_timestamp(ts: &str, log_name: &str) -> Option<DateTime<Utc>> {
    match DateTime::parse_from_rfc3339(ts) {
        Ok(t) => Some(t.with_timezone(&Utc)),
        Err(e) => {
            tracing::warn!(timestamp = ts, log_name, error = %e, "ignoring unparseable timestamp");
            None
        }
    }
}

/// Parse an export document into entries, in document order.
pub fn parse_export(src: &str) -> Result<Vec<RawEntry>, FeedError> {
    if src.trim_start().starts_with('[') {
        let wire: Vec<WireEntry> = serde_json::from_str(src).map_err(|source| FeedError::Parse {
            line: source.line(),
            source,
        })?;
        return Ok(wire.into_iter().map(WireEntry::into_raw).collect());
    }

    src.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            serde_json::from_str::<WireEntry>(line)
                .map(WireEntry::into_raw)
                .map_err(|source| FeedError::Parse { line: i + 1, source })
        })
        .collect()
}

//! Builders for entries and on-disk exports.

use std::io::Write;

use logcloud::core::{Payload, RawEntry, Severity};
use tempfile::NamedTempFile;

pub fn text_entry(text: &str) -> RawEntry {
    RawEntry::new(super::QUALIFIED_LOG, Payload::from(text))
}

pub fn json_entry(value: serde_json::Value) -> RawEntry {
    let payload = match value {
        serde_json::Value::Object(map) => Payload::Map(map),
        other => Payload::Other(other),
    };
    RawEntry::new(super::QUALIFIED_LOG, payload)
}

pub fn entry_at(text: &str, ts: &str, severity: Severity) -> RawEntry {
    text_entry(text)
        .with_timestamp(ts.parse().expect("fixture timestamp"))
        .with_severity(severity)
}

/// Write `lines` as a JSON-lines export and keep the file alive for the
/// caller.
pub fn write_export(lines: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp export");
    for line in lines {
        writeln!(file, "{line}").expect("write temp export");
    }
    file.flush().expect("flush temp export");
    file
}

/// Write one JSON array export of text entries.
pub fn write_array_export(texts: &[&str]) -> NamedTempFile {
    let records: Vec<_> = texts
        .iter()
        .map(|t| serde_json::json!({ "logName": super::QUALIFIED_LOG, "textPayload": t }))
        .collect();
    let mut file = NamedTempFile::new().expect("create temp export");
    serde_json::to_writer_pretty(&mut file, &records).expect("write temp export");
    file.flush().expect("flush temp export");
    file
}

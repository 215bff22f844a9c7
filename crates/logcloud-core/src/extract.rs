//! Payload extractor: turns [`RawEntry`] payloads into plain log messages.
//!
//! Extraction never aborts a batch: an entry whose payload cannot be
//! stringified is dropped with a warning and the rest are still processed.

use serde_json::Value;

use crate::error::ExtractionError;
use crate::types::{Payload, RawEntry};

/// Key whose value is preferred over the whole mapping for structured payloads.
pub const MESSAGE_KEY: &str = "message";

/// Extract the log message text from one payload.
pub fn extract(payload: &Payload) -> Result<String, ExtractionError> {
    match payload {
        Payload::Text(s) => Ok(s.clone()),
        Payload::Map(map) => match map.get(MESSAGE_KEY) {
            Some(value) => value_text(value),
            None => Ok(serde_json::to_string(map)?),
        },
        Payload::Binary(bytes) => Ok(String::from_utf8(bytes.clone())?),
        Payload::Other(value) => value_text(value),
    }
}

/// Extract messages from a batch, preserving order and skipping failures.
pub fn extract_messages(entries: &[RawEntry]) -> Vec<String> {
    let mut messages = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        match extract(&entry.payload) {
            Ok(message) => messages.push(message),
            Err(e) => {
                tracing::warn!(index, log_name = %entry.log_name, error = %e, "skipping log entry");
            }
        }
    }
    tracing::debug!(
        entries = entries.len(),
        messages = messages.len(),
        "extracted log messages"
    );
    messages
}

/// Strings are used verbatim; every other value is rendered as compact JSON.
fn value_text(value: &Value) -> Result<String, ExtractionError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        other => Ok(serde_json::to_string(other)?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(value: Value) -> Payload {
        match value {
            Value::Object(m) => Payload::Map(m),
            _ => panic!("test payload must be an object"),
        }
    }

    #[test]
    fn text_is_verbatim() {
        assert_eq!(extract(&"Disk FULL!".into()).unwrap(), "Disk FULL!");
    }

    #[test]
    fn map_prefers_message_field() {
        let payload = map(json!({"message": "upstream timeout", "code": 504}));
        assert_eq!(extract(&payload).unwrap(), "upstream timeout");
    }

    #[test]
    fn map_non_string_message_is_json() {
        let payload = map(json!({"message": {"text": "nested"}}));
        assert_eq!(extract(&payload).unwrap(), r#"{"text":"nested"}"#);
    }

    #[test]
    fn map_without_message_is_whole_mapping() {
        let payload = map(json!({"code": 504, "path": "/api"}));
        let text = extract(&payload).unwrap();
        assert!(text.contains(r#""code":504"#));
        assert!(text.contains(r#""path":"/api""#));
    }

    #[test]
    fn other_values_are_canonical_json() {
        assert_eq!(extract(&Payload::Other(json!(42))).unwrap(), "42");
        assert_eq!(extract(&Payload::Other(Value::Null)).unwrap(), "null");
        assert_eq!(extract(&Payload::Other(json!("plain"))).unwrap(), "plain");
    }

    #[test]
    fn invalid_utf8_is_an_error() {
        let err = extract(&Payload::Binary(vec![0x66, 0xff, 0xfe])).unwrap_err();
        assert!(matches!(err, ExtractionError::InvalidUtf8(_)));
    }

    #[test]
    fn batch_skips_failures_and_keeps_order() {
        let entries = vec![
            RawEntry::new("log", "first".into()),
            RawEntry::new("log", Payload::Binary(vec![0xc3, 0x28])),
            RawEntry::new("log", Payload::Binary(b"third".to_vec())),
        ];
        assert_eq!(extract_messages(&entries), vec!["first", "third"]);
    }
}

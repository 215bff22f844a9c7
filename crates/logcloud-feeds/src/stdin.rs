//! Raw text lines from stdin, one entry per non-blank line.
//!
//! Lines carry no envelope, so each entry is stamped with the request's
//! qualified log name and `DEFAULT` severity. Lines that are not valid UTF-8
//! are passed on as [`Payload::Binary`] for the extractor to reject.

use logcloud_core::{Payload, RawEntry};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use crate::error::FeedError;
use crate::{select, ListRequest, LogSource};

#[derive(Debug, Clone, Copy, Default)]
pub struct StdinSource;

impl StdinSource {
    pub fn new() -> Self {
        Self
    }
}

impl LogSource for StdinSource {
    async fn list_entries(&self, request: &ListRequest) -> Result<Vec<RawEntry>, FeedError> {
        let filter = request.parsed_filter()?;
        let reader = BufReader::new(tokio::io::stdin());
        let entries = read_lines(reader, &request.qualified_log_name())
            .await
            .map_err(|source| FeedError::Io {
                origin: "stdin".to_string(),
                source,
            })?;
        Ok(select(entries, request, filter.as_ref()))
    }
}

/// Read every non-blank line of `reader` as an entry of `log_name`.
pub async fn read_lines<R>(mut reader: R, log_name: &str) -> std::io::Result<Vec<RawEntry>>
where
    R: AsyncBufRead + Unpin,
{
    let mut entries = Vec::new();
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }
        while matches!(buf.last(), Some(b'\n' | b'\r')) {
            buf.pop();
        }
        if buf.iter().all(u8::is_ascii_whitespace) {
            continue;
        }
        let payload = match String::from_utf8(buf.clone()) {
            Ok(text) => Payload::Text(text),
            Err(e) => Payload::Binary(e.into_bytes()),
        };
        entries.push(RawEntry::new(log_name, payload));
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn splits_lines_and_skips_blanks() {
        let input: &[u8] = b"first line\r\n\n   \nsecond\n";
        let entries = read_lines(input, "projects/p/logs/l").await.unwrap();
        let payloads: Vec<_> = entries.iter().map(|e| e.payload.clone()).collect();
        assert_eq!(payloads, vec![Payload::from("first line"), Payload::from("second")]);
        assert!(entries.iter().all(|e| e.log_name == "projects/p/logs/l"));
    }

    #[tokio::test]
    async fn last_line_without_newline_is_kept() {
        let input: &[u8] = b"one\ntwo";
        assert_eq!(read_lines(input, "l").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn invalid_utf8_becomes_binary() {
        let input: &[u8] = b"ok\n\xff\xfe bad\n";
        let entries = read_lines(input, "l").await.unwrap();
        assert_eq!(entries[1].payload, Payload::Binary(b"\xff\xfe bad".to_vec()));
    }
}

//! Static log corpora used across harnesses.

pub const PROJECT: &str = "acme-prod";
pub const LOG: &str = "api";
pub const QUALIFIED_LOG: &str = "projects/acme-prod/logs/api";

/// Plain-text messages as an application would log them.
pub const CORPUS_TEXT: &[&str] = &[
    "Starting application version 2.4.1",
    "Failed to connect to database after 3 retries",
    "Connection refused: db.internal:5432",
    "ERROR: NullPointerException at com.example.App.handle(App.java:42)",
    "Disk usage at 92% on /dev/sda1",
    "GET /api/v1/users 200 47ms",
    "upstream timeout while calling payment gateway",
    "Retrying payment gateway request, attempt 2 of 3",
    "Graceful shutdown complete",
    "Ünïcödé façade naïve café 東京 request",
];

/// One export record per line, in the shape `gcloud logging read
/// --format=json` produces.
pub const EXPORT_LINES: &[&str] = &[
    r#"{"logName":"projects/acme-prod/logs/api","timestamp":"2024-01-15T10:00:00Z","severity":"INFO","textPayload":"Server started on port 8080"}"#,
    r#"{"logName":"projects/acme-prod/logs/api","timestamp":"2024-01-15T10:00:01Z","severity":"ERROR","labels":{"env":"prod"},"textPayload":"Connection refused: database timeout"}"#,
    r#"{"logName":"projects/acme-prod/logs/api","timestamp":"2024-01-15T10:00:02Z","severity":"WARNING","jsonPayload":{"message":"Slow query on database","duration_ms":4200}}"#,
    r#"{"logName":"projects/acme-prod/logs/api","timestamp":"2024-01-15T10:00:03Z","severity":"ERROR","jsonPayload":{"error":"payment gateway timeout","attempt":3}}"#,
    r#"{"logName":"projects/acme-prod/logs/worker","timestamp":"2024-01-15T10:00:04Z","severity":"ERROR","textPayload":"worker queue overflow"}"#,
    r#"{"logName":"projects/acme-prod/logs/api","timestamp":"2024-01-15T10:00:05Z","severity":"DEBUG","labels":{"env":"staging"},"textPayload":"Cache miss for session"}"#,
];

//! Structured form of one vMon log line

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One non-blank log line, split into the vMon prefix fields.
///
/// Every field except `raw` and `message` may be absent when the line does
/// not follow the full vMon layout. Records are immutable once parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    /// 1-based line number in the source log
    pub line_number: usize,

    /// Timestamp text as it appeared, e.g. `2024-02-25T15:01:02.123Z`
    pub timestamp: Option<String>,

    /// Level tag, e.g. `In(05)`
    pub level: Option<String>,

    /// Host tag, e.g. `host-1234`
    pub host: Option<String>,

    /// Service tag without the angle brackets; `unknown` is stored as absent
    pub service: Option<String>,

    /// Text remaining after the matched prefix fields
    pub message: String,

    /// The original line, verbatim
    pub raw: String,
}

impl LogRecord {
    /// Create a record that carries only the raw line as its message
    pub fn unparsed(raw: impl Into<String>, line_number: usize) -> Self {
        let raw = raw.into();
        Self {
            line_number,
            timestamp: None,
            level: None,
            host: None,
            service: None,
            message: raw.trim().to_string(),
            raw,
        }
    }

    /// The timestamp as an instant, if present and a valid RFC 3339 time
    pub fn instant(&self) -> Option<DateTime<Utc>> {
        let text = self.timestamp.as_deref()?;
        DateTime::parse_from_rfc3339(text)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }

    /// Whether this record is tagged with `service`
    pub fn is_service(&self, service: &str) -> bool {
        self.service.as_deref() == Some(service)
    }

    /// Whether the message contains `needle`
    pub fn mentions(&self, needle: &str) -> bool {
        self.message.contains(needle)
    }
}

//! vMon line parser with per-field fallback
//!
//! A full vMon line looks like
//!
//! ```text
//! 2024-02-25T15:01:02.123Z In(05) host-1234 <vmafd> Service STARTED successfully.
//! ```
//!
//! The strict pattern is tried first. When it fails, the timestamp is looked
//! for at the start of the line and the level, host and service tags are each
//! searched for independently in the rest, so one missing field never hides
//! the others.

use crate::record::LogRecord;
use regex::Regex;
use std::sync::LazyLock;

/// Service tag value that means "no service"
pub const UNKNOWN_SERVICE: &str = "unknown";

static FULL_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}\.\d{3}Z)\s+([A-Za-z]+\(\d+\))\s+(host-\d+)\s+<([^>]+)>\s+(.+)$",
    )
    .expect("full line pattern is valid")
});

static TIMESTAMP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}\.\d{3}Z").expect("timestamp pattern is valid")
});

static LEVEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([A-Za-z]+\(\d+\))").expect("level pattern is valid"));

static HOST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(host-\d+)").expect("host pattern is valid"));

static SERVICE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<([^>]+)>").expect("service pattern is valid"));

/// Optional prefix fields searched for in the post-timestamp remainder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Level,
    Host,
    Service,
}

/// Fallback extractors, applied in order and independently of each other
static EXTRACTORS: [(Field, &LazyLock<Regex>); 3] = [
    (Field::Level, &LEVEL),
    (Field::Host, &HOST),
    (Field::Service, &SERVICE_TAG),
];

/// Parse one log line into a [`LogRecord`].
///
/// Never fails. `raw` is always the line exactly as given; the fields are
/// matched against the line with surrounding whitespace removed.
pub fn parse_line(line: &str, line_number: usize) -> LogRecord {
    let trimmed = line.trim();

    if let Some(caps) = FULL_LINE.captures(trimmed) {
        return LogRecord {
            line_number,
            timestamp: Some(caps[1].to_string()),
            level: Some(caps[2].to_string()),
            host: Some(caps[3].to_string()),
            service: normalize_service(&caps[4]),
            message: caps[5].to_string(),
            raw: line.to_string(),
        };
    }

    parse_fallback(line, trimmed, line_number)
}

fn parse_fallback(line: &str, trimmed: &str, line_number: usize) -> LogRecord {
    let mut record = LogRecord::unparsed(line, line_number);

    let Some(timestamp) = TIMESTAMP.find(trimmed) else {
        return record;
    };

    let remaining = trimmed[timestamp.end()..].trim();
    record.timestamp = Some(timestamp.as_str().to_string());

    for &(field, pattern) in EXTRACTORS.iter() {
        let found = search(pattern, remaining);
        match field {
            Field::Level => record.level = found,
            Field::Host => record.host = found,
            Field::Service => record.service = found.as_deref().and_then(normalize_service),
        }
    }

    // Tags are found by search, not consumed, so the message keeps them.
    record.message = remaining.to_string();
    record
}

fn search(pattern: &Regex, haystack: &str) -> Option<String> {
    pattern
        .captures(haystack)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Trim a service tag; empty and `unknown` become absent
fn normalize_service(tag: &str) -> Option<String> {
    let tag = tag.trim();
    if tag.is_empty() || tag == UNKNOWN_SERVICE {
        None
    } else {
        Some(tag.to_string())
    }
}

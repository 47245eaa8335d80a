//! # vMon Log
//!
//! Turns a vMon startup log into structured [`LogRecord`]s and removes the
//! known noisy categories before analysis.
//!
//! Parsing never fails: a line that does not match the full vMon layout
//! degrades to a record with whatever fields could be recovered. Only the
//! file-level conditions (missing or empty log) are errors.

#![warn(missing_docs)]

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

pub mod filter;
pub mod parser;
pub mod record;

pub use filter::{FilterStats, LogFilter};
pub use parser::parse_line;
pub use record::LogRecord;

/// Log reading error types
#[derive(Debug, Error)]
pub enum LogError {
    /// The log file does not exist
    #[error("Log file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The log file holds no non-blank line
    #[error("Log file is empty: {}", .0.display())]
    Empty(PathBuf),

    /// The log file exists but could not be read
    #[error("Failed to read log file {}: {source}", .path.display())]
    Read {
        /// Path of the unreadable file
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },
}

/// Result type for log operations
pub type Result<T> = std::result::Result<T, LogError>;

/// Read and parse a log file.
///
/// Invalid UTF-8 is replaced rather than rejected so a single corrupt byte
/// never aborts a run.
pub fn read_log_file(path: impl AsRef<Path>) -> Result<Vec<LogRecord>> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(LogError::NotFound(path.to_path_buf()));
    }

    let bytes = std::fs::read(path).map_err(|source| LogError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let content = String::from_utf8_lossy(&bytes);

    let records = parse_str(&content);
    if records.is_empty() {
        return Err(LogError::Empty(path.to_path_buf()));
    }

    info!("Parsed {} log records from {}", records.len(), path.display());
    Ok(records)
}

/// Parse every non-blank line of `content`.
///
/// Blank and whitespace-only lines produce no record. Line numbers are
/// 1-based positions in `content`, blank lines included.
pub fn parse_str(content: &str) -> Vec<LogRecord> {
    let mut records = Vec::new();
    let mut degraded = 0usize;

    for (index, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let record = parse_line(line, index + 1);
        if record.service.is_none() {
            degraded += 1;
        }
        records.push(record);
    }

    if degraded > 0 {
        debug!("{degraded} of {} records carry no service tag", records.len());
    }
    records
}

//! Noise filter applied before classification

use crate::record::LogRecord;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Message fragments that never carry service status
pub const DEFAULT_DENYLIST: [&str; 2] = ["<event-pub> Constructed command", "Client info Uid"];

/// Removes records whose message contains a denylisted fragment.
///
/// Filtering is order-preserving and idempotent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFilter {
    patterns: Vec<String>,
}

/// Counts reported by [`LogFilter::apply_with_stats`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterStats {
    /// Records before filtering
    pub total: usize,
    /// Records kept
    pub kept: usize,
    /// Records removed as noise
    pub removed: usize,
}

impl Default for LogFilter {
    fn default() -> Self {
        Self::new(DEFAULT_DENYLIST)
    }
}

impl LogFilter {
    /// Create a filter from a custom denylist
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            patterns: patterns.into_iter().map(Into::into).collect(),
        }
    }

    /// The denylisted fragments
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// Whether `record` is noise
    pub fn is_noise(&self, record: &LogRecord) -> bool {
        self.patterns.iter().any(|p| record.mentions(p))
    }

    /// Return the records that are not noise, in their original order
    pub fn apply(&self, records: &[LogRecord]) -> Vec<LogRecord> {
        records
            .iter()
            .filter(|record| !self.is_noise(record))
            .cloned()
            .collect()
    }

    /// Like [`apply`](Self::apply), also reporting how many records were dropped
    pub fn apply_with_stats(&self, records: &[LogRecord]) -> (Vec<LogRecord>, FilterStats) {
        let kept = self.apply(records);
        let stats = FilterStats {
            total: records.len(),
            kept: kept.len(),
            removed: records.len() - kept.len(),
        };
        info!(
            "Filtered log: {} records, {} kept, {} removed",
            stats.total, stats.kept, stats.removed
        );
        (kept, stats)
    }
}

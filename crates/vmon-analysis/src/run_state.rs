//! Run-state classification

use crate::scan::{Marker, first_decisive};
use serde::{Deserialize, Serialize};
use std::fmt;
use vmon_log::LogRecord;

/// Logged once vMon sees the service up
pub const SERVICE_STARTED: &str = "Service STARTED successfully";

/// Logged when the service process exits
pub const SERVICE_EXITED: &str = "Service exited. Exit code";

const MARKERS: [Marker<RunStatus>; 2] = [
    Marker {
        pattern: SERVICE_STARTED,
        outcome: RunStatus::Running,
    },
    Marker {
        pattern: SERVICE_EXITED,
        outcome: RunStatus::FailedToStart,
    },
];

/// Where a service ended up
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RunStatus {
    /// Reported started
    #[serde(rename = "running")]
    Running,
    /// Exited with an exit code before or instead of starting
    #[serde(rename = "failed to start")]
    FailedToStart,
    /// No start or exit was logged; means "no evidence", not a confirmed stop
    #[default]
    #[serde(rename = "stopped")]
    Stopped,
}

impl RunStatus {
    /// Report text for this status
    pub fn as_str(self) -> &'static str {
        match self {
            RunStatus::Running => "running",
            RunStatus::FailedToStart => "failed to start",
            RunStatus::Stopped => "stopped",
        }
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Run-state classification of one service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStateResult {
    /// Service name
    pub service: String,
    /// Classified status
    pub status: RunStatus,
    /// The record that decided `status`
    pub matching_log_entries: Vec<LogRecord>,
}

/// Classify whether `service` ended up running from its log records
pub fn classify_run_state<'a>(
    service: &str,
    records: impl IntoIterator<Item = &'a LogRecord>,
) -> RunStateResult {
    let scan = first_decisive(
        records.into_iter().filter(|r| r.is_service(service)),
        &MARKERS,
        &[],
        RunStatus::Stopped,
    );

    RunStateResult {
        service: service.to_string(),
        status: scan.status,
        matching_log_entries: scan.evidence(),
    }
}

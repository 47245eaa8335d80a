//! Pre-start command classification

use crate::scan::{Marker, first_decisive};
use serde::{Deserialize, Serialize};
use std::fmt;
use vmon_catalog::ServiceCatalog;
use vmon_log::LogRecord;

/// Logged when a pre-start command exits cleanly
pub const PRESTART_SUCCESS: &str = "Service pre-start command completed successfully";

/// Logged when a pre-start command exits non-zero
pub const PRESTART_FAILURE: &str = "Service pre-start command failed with exit";

/// Prefix of the pre-start command's captured stderr lines
pub const PRESTART_STDERR: &str = "Service pre-start command's stderr:";

const MARKERS: [Marker<PrestartStatus>; 2] = [
    Marker {
        pattern: PRESTART_SUCCESS,
        outcome: PrestartStatus::Success,
    },
    Marker {
        pattern: PRESTART_FAILURE,
        outcome: PrestartStatus::Failed,
    },
];

/// Outcome of a service's pre-start command
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrestartStatus {
    /// The command completed successfully
    #[serde(rename = "success")]
    Success,
    /// The command exited with an error
    #[serde(rename = "failed")]
    Failed,
    /// No pre-start outcome was logged
    #[default]
    #[serde(rename = "not executed")]
    NotExecuted,
}

impl PrestartStatus {
    /// Report text for this status
    pub fn as_str(self) -> &'static str {
        match self {
            PrestartStatus::Success => "success",
            PrestartStatus::Failed => "failed",
            PrestartStatus::NotExecuted => "not executed",
        }
    }
}

impl fmt::Display for PrestartStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pre-start classification of one service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrestartResult {
    /// Service name
    pub service: String,
    /// Classified status
    pub status: PrestartStatus,
    /// The record that decided `status`
    pub matching_log_entries: Vec<LogRecord>,
    /// Captured stderr of the command; never affects `status`
    pub error_log_entries: Vec<LogRecord>,
}

/// Classify the pre-start outcome of `service` from its log records.
///
/// Records tagged with another service are ignored. With no marker at all
/// the status is [`PrestartStatus::NotExecuted`].
pub fn classify_prestart<'a>(
    service: &str,
    records: impl IntoIterator<Item = &'a LogRecord>,
) -> PrestartResult {
    let scan = first_decisive(
        records.into_iter().filter(|r| r.is_service(service)),
        &MARKERS,
        &[PRESTART_STDERR],
        PrestartStatus::NotExecuted,
    );

    PrestartResult {
        service: service.to_string(),
        status: scan.status,
        matching_log_entries: scan.evidence(),
        error_log_entries: scan.auxiliary_evidence(),
    }
}

/// Services among `services` that declare a pre-start command.
///
/// Services unknown to the catalog are left out.
pub fn prestart_candidates<C: ServiceCatalog + ?Sized>(
    catalog: &C,
    services: &[String],
) -> Vec<String> {
    services
        .iter()
        .filter(|name| catalog.service_info(name).is_some_and(|d| d.has_prestart()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use vmon_catalog::{Catalog, ServiceDescriptor};
    use vmon_log::parse_str;

    fn line(n: u32, service: &str, message: &str) -> String {
        format!("2024-02-25T15:00:{n:02}.000Z In(05) host-1 <{service}> {message}\n")
    }

    #[test]
    fn test_single_success() {
        let log = line(1, "vmafd", "Service pre-start command completed successfully.")
            + &line(2, "vmafd", "Service STARTED successfully.");
        let records = parse_str(&log);

        let result = classify_prestart("vmafd", &records);
        assert_eq!(result.status, PrestartStatus::Success);
        assert_eq!(result.matching_log_entries.len(), 1);
        assert_eq!(result.matching_log_entries[0].line_number, 1);
    }

    #[test]
    fn test_failure_before_success_is_failed() {
        let mut log = line(1, "vpxd", "Service pre-start command failed with exit code 1.");
        for n in 2..6 {
            log += &line(n, "vpxd", "retrying");
        }
        log += &line(6, "vpxd", "Service pre-start command completed successfully.");
        let records = parse_str(&log);

        let result = classify_prestart("vpxd", &records);
        assert_eq!(result.status, PrestartStatus::Failed);
        assert_eq!(result.matching_log_entries[0].line_number, 1);
    }

    #[test]
    fn test_stderr_is_informational() {
        let log = line(1, "sps", "Service pre-start command's stderr: warning: deprecated flag")
            + &line(2, "sps", "Service pre-start command completed successfully.")
            + &line(3, "sps", "Service pre-start command's stderr: late output");
        let records = parse_str(&log);

        let result = classify_prestart("sps", &records);
        assert_eq!(result.status, PrestartStatus::Success);
        assert_eq!(result.error_log_entries.len(), 2);

        let only_stderr = parse_str(&line(1, "sps", "Service pre-start command's stderr: x"));
        let result = classify_prestart("sps", &only_stderr);
        assert_eq!(result.status, PrestartStatus::NotExecuted);
        assert_eq!(result.error_log_entries.len(), 1);
    }

    #[test]
    fn test_other_services_are_ignored() {
        let records = parse_str(&line(
            1,
            "vmafd",
            "Service pre-start command completed successfully.",
        ));

        let result = classify_prestart("vpxd", &records);
        assert_eq!(result.status, PrestartStatus::NotExecuted);
        assert!(result.matching_log_entries.is_empty());
    }

    #[test]
    fn test_status_text() {
        assert_eq!(PrestartStatus::NotExecuted.to_string(), "not executed");
        assert_eq!(
            serde_json::to_string(&PrestartStatus::Failed).unwrap(),
            "\"failed\""
        );
    }

    #[test]
    fn test_prestart_candidates() {
        let catalog = Catalog::from_descriptors([
            ServiceDescriptor {
                prestart_command: Some("/bin/true".to_string()),
                ..ServiceDescriptor::named("vmafd")
            },
            ServiceDescriptor::named("lwsmd"),
        ]);
        let services = vec![
            "vmafd".to_string(),
            "lwsmd".to_string(),
            "ghost".to_string(),
        ];

        assert_eq!(prestart_candidates(&catalog, &services), vec!["vmafd"]);
    }
}

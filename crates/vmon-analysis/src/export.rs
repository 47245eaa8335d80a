//! YAML report artifact
//!
//! The artifact is the one thing an analysis run leaves behind. Field order
//! inside a service entry is fixed so consumers can diff reports textually;
//! fields beyond the classic set come after `service_logs`.

use crate::prestart::PrestartStatus;
use crate::run_state::RunStatus;
use crate::{AnalysisError, AnalysisReport, Result};
use chrono::{DateTime, Local};
use indexmap::IndexMap;
use serde::Serialize;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::info;
use vmon_log::LogRecord;

/// Suffix shared by every report file name
pub const REPORT_SUFFIX: &str = "-vmon-analysis.yaml";

const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Give up after this many same-second name collisions
const MAX_NAME_ATTEMPTS: u32 = 100;

#[derive(Serialize)]
struct ReportDocument<'a> {
    profile: &'a str,
    services: IndexMap<&'a str, ServiceEntry<'a>>,
}

#[derive(Serialize)]
struct ServiceEntry<'a> {
    id: Option<u32>,
    parent_id: Option<u32>,
    description: Option<&'a str>,
    level: Option<u32>,
    #[serde(rename = "type")]
    service_type: Option<&'a str>,
    serviceprestart: &'a str,
    prestart_status: PrestartStatus,
    service_status: RunStatus,
    combined_status: &'a str,
    dp_services: &'a [String],
    prestart_logs: Vec<LogEntry<'a>>,
    service_logs: Vec<LogEntry<'a>>,
    rdp_services: &'a [String],
    prestart_errors: Vec<LogEntry<'a>>,
}

#[derive(Serialize)]
struct LogEntry<'a> {
    timestamp: Option<&'a str>,
    level: Option<&'a str>,
    content: &'a str,
}

impl<'a> From<&'a LogRecord> for LogEntry<'a> {
    fn from(record: &'a LogRecord) -> Self {
        Self {
            timestamp: record.timestamp.as_deref(),
            level: record.level.as_deref(),
            content: &record.message,
        }
    }
}

fn entries(records: &[LogRecord]) -> Vec<LogEntry<'_>> {
    records.iter().map(LogEntry::from).collect()
}

/// Render the report as the YAML artifact text
pub fn render_yaml(report: &AnalysisReport) -> Result<String> {
    let services = report
        .services
        .iter()
        .map(|s| {
            let entry = ServiceEntry {
                id: s.id,
                parent_id: s.parent_id,
                description: s.description.as_deref(),
                level: s.level,
                service_type: s.service_type.as_ref().map(|t| t.as_str()),
                serviceprestart: s.prestart_command.as_deref().unwrap_or_default(),
                prestart_status: s.prestart.status,
                service_status: s.run_state.status,
                combined_status: &s.combined_status,
                dp_services: &s.dependencies,
                prestart_logs: entries(&s.prestart.matching_log_entries),
                service_logs: entries(&s.run_state.matching_log_entries),
                rdp_services: &s.dependents,
                prestart_errors: entries(&s.prestart.error_log_entries),
            };
            (s.service.as_str(), entry)
        })
        .collect();

    let document = ReportDocument {
        profile: &report.profile,
        services,
    };
    Ok(serde_yaml::to_string(&document)?)
}

/// File name for a report created at `now`; `attempt` > 0 disambiguates collisions
pub fn report_file_name(now: DateTime<Local>, attempt: u32) -> String {
    let stamp = now.format(TIMESTAMP_FORMAT);
    if attempt == 0 {
        format!("{stamp}{REPORT_SUFFIX}")
    } else {
        format!("{stamp}_{attempt:02}{REPORT_SUFFIX}")
    }
}

/// Write the report into `output_dir` under a fresh timestamped name.
///
/// The whole document is rendered before anything touches the disk and is
/// moved into place only once completely written; an existing report is
/// never overwritten.
pub fn write_report(report: &AnalysisReport, output_dir: &Path) -> Result<PathBuf> {
    let yaml = render_yaml(report)?;
    std::fs::create_dir_all(output_dir)?;

    let mut temp = tempfile::Builder::new()
        .prefix(".vmon-analysis-")
        .suffix(".tmp")
        .tempfile_in(output_dir)?;
    temp.write_all(yaml.as_bytes())?;
    temp.as_file().sync_all()?;

    let now = Local::now();
    let mut attempt = 0;
    loop {
        let path = output_dir.join(report_file_name(now, attempt));
        match temp.persist_noclobber(&path) {
            Ok(_) => {
                info!("Analysis results exported to: {}", path.display());
                return Ok(path);
            }
            Err(err)
                if err.error.kind() == io::ErrorKind::AlreadyExists
                    && attempt + 1 < MAX_NAME_ATTEMPTS =>
            {
                temp = err.file;
                attempt += 1;
            }
            Err(err) => {
                return Err(AnalysisError::Persist {
                    path,
                    source: err.error,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_report_file_name() {
        let now = Local.with_ymd_and_hms(2025, 2, 24, 15, 7, 9).unwrap();

        assert_eq!(report_file_name(now, 0), "20250224_150709-vmon-analysis.yaml");
        assert_eq!(report_file_name(now, 3), "20250224_150709_03-vmon-analysis.yaml");
        // Disambiguated names sort after the first one of the same second
        assert!(report_file_name(now, 1) > report_file_name(now, 0));
    }
}

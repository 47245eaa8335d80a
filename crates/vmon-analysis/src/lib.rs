//! # vMon Analysis
//!
//! Classifies every service of the active vMon profile from a parsed log:
//! whether its pre-start command ran and how, and whether the service came
//! up. The results are joined with catalog metadata into an
//! [`AnalysisReport`] that [`export`] turns into the YAML artifact.
//!
//! ```text
//! records ─► filter ─► profile ─► prestart ─┐
//!                                 run state ─┴─► report ─► export
//! ```

#![warn(missing_docs)]

use indexmap::IndexMap;
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;
use vmon_catalog::ServiceCatalog;
use vmon_log::{FilterStats, LogError, LogFilter, LogRecord};

pub mod export;
pub mod prestart;
pub mod profile;
pub mod report;
pub mod run_state;
pub mod scan;

pub use export::{render_yaml, write_report};
pub use prestart::{PrestartResult, PrestartStatus, classify_prestart, prestart_candidates};
pub use profile::{DEFAULT_PROFILE, ResolvedProfile, resolve_profile};
pub use report::{ServiceReport, assemble, combined_status};
pub use run_state::{RunStateResult, RunStatus, classify_run_state};

/// Analysis error types
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The log could not be loaded
    #[error(transparent)]
    Log(#[from] LogError),

    /// A service lost one of its classifications during assembly
    #[error("No classification for service: {0}")]
    MissingClassification(String),

    /// The report could not be rendered
    #[error("Failed to serialize report: {0}")]
    Serialize(#[from] serde_yaml::Error),

    /// Writing the report failed
    #[error("Failed to write report: {0}")]
    Io(#[from] std::io::Error),

    /// The finished report could not be moved into place
    #[error("Failed to save report to {}: {source}", .path.display())]
    Persist {
        /// Intended report path
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },
}

/// Result type for analysis operations
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Knobs for a single analysis run
#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    /// Noise filter applied before anything else
    pub filter: LogFilter,
    /// Profile used when the log names none
    pub default_profile: String,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            filter: LogFilter::default(),
            default_profile: DEFAULT_PROFILE.to_string(),
        }
    }
}

/// Result of analysing one log against a catalog
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    /// Profile in effect
    pub profile: String,
    /// Whether the profile came from the log
    pub profile_detected: bool,
    /// Noise filter counts
    pub filter_stats: FilterStats,
    /// One entry per service of the profile, in report order
    pub services: Vec<ServiceReport>,
}

impl AnalysisReport {
    /// Number of services per combined status
    pub fn status_counts(&self) -> IndexMap<String, usize> {
        report::status_counts(&self.services)
    }

    /// The entry for `name`, if the service is in the report
    pub fn service(&self, name: &str) -> Option<&ServiceReport> {
        self.services.iter().find(|s| s.service == name)
    }
}

/// Run the whole pipeline over already parsed records
pub fn analyze<C: ServiceCatalog + ?Sized>(
    records: &[LogRecord],
    catalog: &C,
    options: &AnalysisOptions,
) -> Result<AnalysisReport> {
    let (records, filter_stats) = options.filter.apply_with_stats(records);

    let resolved = resolve_profile(&records, &options.default_profile);
    let services = profile::active_services(catalog, &resolved.name);
    info!(
        "Analyzing {} services of profile '{}'",
        services.len(),
        resolved.name
    );

    let services = assemble(catalog, &services, &records)?;

    Ok(AnalysisReport {
        profile: resolved.name,
        profile_detected: resolved.detected,
        filter_stats,
        services,
    })
}

/// Read the log at `path` and analyze it
pub fn analyze_file<C: ServiceCatalog + ?Sized>(
    path: impl AsRef<Path>,
    catalog: &C,
    options: &AnalysisOptions,
) -> Result<AnalysisReport> {
    let records = vmon_log::read_log_file(path)?;
    analyze(&records, catalog, options)
}

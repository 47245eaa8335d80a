//! Joins both classifications with catalog metadata

use crate::prestart::{PrestartResult, PrestartStatus, classify_prestart};
use crate::run_state::{RunStateResult, RunStatus, classify_run_state};
use crate::scan::group_by_service;
use crate::{AnalysisError, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::debug;
use vmon_catalog::{DependencyGraph, ServiceCatalog, ServiceType};
use vmon_log::LogRecord;

/// Everything known about one service after analysis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceReport {
    /// Service name
    pub service: String,
    /// Catalog id
    pub id: Option<u32>,
    /// Catalog parent id
    pub parent_id: Option<u32>,
    /// Catalog description
    pub description: Option<String>,
    /// Start-order level
    pub level: Option<u32>,
    /// Service type
    pub service_type: Option<ServiceType>,
    /// Declared pre-start command
    pub prestart_command: Option<String>,
    /// Pre-start classification
    pub prestart: PrestartResult,
    /// Run-state classification
    pub run_state: RunStateResult,
    /// `"{prestart}/{run state}"`
    pub combined_status: String,
    /// Services this one depends on
    pub dependencies: Vec<String>,
    /// Services that depend on this one, across the whole catalog
    pub dependents: Vec<String>,
}

impl ServiceReport {
    /// Pre-start status
    pub fn prestart_status(&self) -> PrestartStatus {
        self.prestart.status
    }

    /// Run-state status
    pub fn run_status(&self) -> RunStatus {
        self.run_state.status
    }
}

/// The combined status text
pub fn combined_status(prestart: PrestartStatus, run: RunStatus) -> String {
    format!("{prestart}/{run}")
}

/// Classify and assemble a report entry for every service in `services`.
///
/// The result is sorted by level (services without a level last), then by
/// combined status; ties keep the order of `services`.
pub fn assemble<C: ServiceCatalog + ?Sized>(
    catalog: &C,
    services: &[String],
    records: &[LogRecord],
) -> Result<Vec<ServiceReport>> {
    let by_service = group_by_service(records);
    let graph = DependencyGraph::build(catalog);

    let mut prestarts: HashMap<&str, PrestartResult> = services
        .iter()
        .map(|name| (name.as_str(), classify_prestart(name, scoped(&by_service, name))))
        .collect();
    let mut run_states: HashMap<&str, RunStateResult> = services
        .iter()
        .map(|name| (name.as_str(), classify_run_state(name, scoped(&by_service, name))))
        .collect();

    let mut reports = Vec::with_capacity(services.len());
    for name in services {
        let prestart = prestarts
            .remove(name.as_str())
            .ok_or_else(|| AnalysisError::MissingClassification(name.clone()))?;
        let run_state = run_states
            .remove(name.as_str())
            .ok_or_else(|| AnalysisError::MissingClassification(name.clone()))?;

        let descriptor = catalog.service_info(name);
        if descriptor.is_none() {
            debug!("Service '{}' is not in the catalog", name);
        }

        reports.push(ServiceReport {
            service: name.clone(),
            id: descriptor.and_then(|d| d.id),
            parent_id: descriptor.and_then(|d| d.parent_id),
            description: descriptor.and_then(|d| d.description.clone()),
            level: descriptor.and_then(|d| d.level),
            service_type: descriptor.and_then(|d| d.service_type.clone()),
            prestart_command: descriptor.and_then(|d| d.prestart_command.clone()),
            combined_status: combined_status(prestart.status, run_state.status),
            prestart,
            run_state,
            dependencies: graph.dependencies_of(name).to_vec(),
            dependents: graph.dependents_of(name).to_vec(),
        });
    }

    sort_reports(&mut reports);
    Ok(reports)
}

/// Stable sort by level (absent last), then combined status
pub fn sort_reports(reports: &mut [ServiceReport]) {
    reports.sort_by(|a, b| {
        compare_levels(a.level, b.level).then_with(|| a.combined_status.cmp(&b.combined_status))
    });
}

fn compare_levels(a: Option<u32>, b: Option<u32>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Number of services per combined status, sorted by status text
pub fn status_counts(reports: &[ServiceReport]) -> IndexMap<String, usize> {
    let mut counts: IndexMap<String, usize> = IndexMap::new();
    for report in reports {
        *counts.entry(report.combined_status.clone()).or_default() += 1;
    }
    counts.sort_keys();
    counts
}

fn scoped<'a>(
    by_service: &HashMap<&str, Vec<&'a LogRecord>>,
    name: &str,
) -> impl Iterator<Item = &'a LogRecord> {
    by_service
        .get(name)
        .cloned()
        .unwrap_or_default()
        .into_iter()
}

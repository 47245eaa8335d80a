use super::CatalogArgs;
use anyhow::{Context, Result};
use clap::ValueEnum;
use comfy_table::{Cell, Color, Table};
use serde::Serialize;
use std::path::Path;
use tracing::info;
use vmon_analysis::{
    AnalysisOptions, AnalysisReport, PrestartStatus, RunStatus, ServiceReport, analyze,
    prestart_candidates, write_report,
};
use vmon_log::LogRecord;

/// Console output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// Human-readable summary and table
    Table,
    /// The full report as JSON
    Json,
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    output_file: &'a Path,
    report: &'a AnalysisReport,
}

pub fn run(
    log_file: &Path,
    catalog_args: &CatalogArgs,
    output_dir: &Path,
    format: Format,
    show_logs: bool,
) -> Result<()> {
    let catalog = catalog_args.load()?;
    let records = vmon_log::read_log_file(log_file)
        .with_context(|| format!("Failed to read log {}", log_file.display()))?;

    let report = analyze(&records, &catalog, &AnalysisOptions::default())
        .context("Failed to analyze log")?;
    let output_file = write_report(&report, output_dir).context("Failed to write report")?;

    if format == Format::Json {
        let document = JsonOutput {
            output_file: &output_file,
            report: &report,
        };
        println!("{}", serde_json::to_string_pretty(&document)?);
        return Ok(());
    }

    println!("Analyzing {}...", log_file.display());
    println!(
        "  Catalog: {} ({} services)",
        catalog_args.path().display(),
        catalog.len()
    );
    if report.profile_detected {
        println!("  Profile: {}", report.profile);
    } else {
        println!("  Profile: {} (not found in log)", report.profile);
    }
    println!(
        "  Log records: {} total, {} kept, {} filtered as noise",
        report.filter_stats.total, report.filter_stats.kept, report.filter_stats.removed
    );
    let instants: Vec<_> = records.iter().filter_map(LogRecord::instant).collect();
    if let (Some(first), Some(last)) = (instants.iter().min(), instants.iter().max()) {
        println!("  Time span: {} to {}", first.to_rfc3339(), last.to_rfc3339());
    }

    let services: Vec<String> = report.services.iter().map(|s| s.service.clone()).collect();
    println!(
        "  Services in profile: {} ({} with a pre-start command)",
        services.len(),
        prestart_candidates(&catalog, &services).len()
    );

    if report.services.is_empty() {
        println!("\nNo services found for profile '{}'", report.profile);
    } else {
        println!("\n{}", service_table(&report));
        print_counts(&report);
    }

    if show_logs {
        print_evidence(&report);
    }

    info!("Report written for profile '{}'", report.profile);
    println!("\nOutput file: {}", output_file.display());
    Ok(())
}

fn service_table(report: &AnalysisReport) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        "SERVICE",
        "LEVEL",
        "TYPE",
        "PRE-START",
        "RUN STATE",
        "DEPENDENCIES",
    ]);

    for service in &report.services {
        table.add_row(vec![
            Cell::new(&service.service),
            Cell::new(
                service
                    .level
                    .map(|l| l.to_string())
                    .unwrap_or_else(|| "-".to_string()),
            ),
            Cell::new(
                service
                    .service_type
                    .as_ref()
                    .map(|t| t.as_str())
                    .unwrap_or("-"),
            ),
            Cell::new(service.prestart_status()).fg(prestart_color(service.prestart_status())),
            Cell::new(service.run_status()).fg(run_color(service.run_status())),
            Cell::new(dependency_list(service)),
        ]);
    }

    table
}

fn prestart_color(status: PrestartStatus) -> Color {
    match status {
        PrestartStatus::Success => Color::Green,
        PrestartStatus::Failed => Color::Red,
        PrestartStatus::NotExecuted => Color::DarkGrey,
    }
}

fn run_color(status: RunStatus) -> Color {
    match status {
        RunStatus::Running => Color::Green,
        RunStatus::FailedToStart => Color::Red,
        RunStatus::Stopped => Color::DarkGrey,
    }
}

fn dependency_list(service: &ServiceReport) -> String {
    if service.dependencies.is_empty() {
        "-".to_string()
    } else {
        service.dependencies.join(", ")
    }
}

fn print_counts(report: &AnalysisReport) {
    println!("Status counts:");
    for (status, count) in report.status_counts() {
        println!("  {status}: {count}");
    }
}

fn print_evidence(report: &AnalysisReport) {
    for service in &report.services {
        let prestart = &service.prestart.matching_log_entries;
        let errors = &service.prestart.error_log_entries;
        let run = &service.run_state.matching_log_entries;
        if prestart.is_empty() && errors.is_empty() && run.is_empty() {
            continue;
        }

        println!("\n=== {} ({}) ===", service.service, service.combined_status);
        for record in prestart.iter().chain(errors).chain(run) {
            println!("  {}", evidence_line(record));
        }
    }
}

fn evidence_line(record: &LogRecord) -> String {
    match record.timestamp.as_deref() {
        Some(timestamp) => format!("{}: {} {}", record.line_number, timestamp, record.message),
        None => format!("{}: {}", record.line_number, record.message),
    }
}

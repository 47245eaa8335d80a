//! Command-line entry point for vMon log analysis

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

mod commands;

use commands::CatalogArgs;

#[derive(Parser)]
#[command(name = "vmon-analyzer")]
#[command(about = "vMon log analyzer - pre-start and run-state status of vCenter services")]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a vMon log and write the YAML report
    Analyze {
        /// vMon log file to analyze
        #[arg(short, long, value_name = "PATH")]
        log_file: PathBuf,

        #[command(flatten)]
        catalog: CatalogArgs,

        /// Directory the report is written to
        #[arg(short, long, value_name = "DIR", default_value = "output")]
        output_dir: PathBuf,

        /// Console output format
        #[arg(short, long, value_enum, default_value_t = commands::analyze::Format::Table)]
        format: commands::analyze::Format,

        /// Print the log lines behind each classification
        #[arg(long)]
        show_logs: bool,
    },

    /// Validate a service catalog
    Validate {
        #[command(flatten)]
        catalog: CatalogArgs,
    },

    /// Show what a service depends on and what depends on it
    Deps {
        /// Service name
        service: String,

        #[command(flatten)]
        catalog: CatalogArgs,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(level.into())
                .from_env_lossy(),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Analyze {
            log_file,
            catalog,
            output_dir,
            format,
            show_logs,
        } => commands::analyze::run(&log_file, &catalog, &output_dir, format, show_logs),
        Commands::Validate { catalog } => commands::validate::run(&catalog),
        Commands::Deps { service, catalog } => commands::deps::run(&service, &catalog),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::from(commands::exit_code(&err))
        }
    }
}

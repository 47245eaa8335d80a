pub mod analyze;
pub mod deps;
pub mod validate;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use std::path::PathBuf;
use vmon_analysis::AnalysisError;
use vmon_catalog::{Catalog, CatalogError, parser};
use vmon_log::LogError;

/// Exit code for input that could not be loaded
pub const EXIT_INPUT: u8 = 1;

/// Exit code for a failure once analysis has started
pub const EXIT_ANALYSIS: u8 = 2;

/// vCenter releases with a bundled service catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum VcenterVersion {
    /// vCenter 7
    #[value(name = "7")]
    V7,
    /// vCenter 8 (8.0 U3)
    #[value(name = "8")]
    V8,
}

impl VcenterVersion {
    /// Catalog file name for this release
    pub fn catalog_file(self) -> &'static str {
        match self {
            VcenterVersion::V7 => "vcsa7-all-services.yaml",
            VcenterVersion::V8 => "vcsa8u3-all-services.yaml",
        }
    }
}

/// Where to load the service catalog from
#[derive(Args, Debug, Clone)]
pub struct CatalogArgs {
    /// vCenter version whose catalog to use
    #[arg(long, value_enum, default_value_t = VcenterVersion::V8)]
    pub vcenter_version: VcenterVersion,

    /// Directory holding the bundled catalogs
    #[arg(long, value_name = "DIR", default_value = "configs")]
    pub config_dir: PathBuf,

    /// Explicit catalog file; overrides --vcenter-version and --config-dir
    #[arg(long, value_name = "PATH")]
    pub catalog: Option<PathBuf>,
}

impl CatalogArgs {
    /// Path of the catalog file to load
    pub fn path(&self) -> PathBuf {
        match &self.catalog {
            Some(path) => path.clone(),
            None => self.config_dir.join(self.vcenter_version.catalog_file()),
        }
    }

    /// Load the selected catalog
    pub fn load(&self) -> Result<Catalog> {
        let path = self.path();
        parser::parse_file(&path)
            .with_context(|| format!("Failed to load catalog {}", path.display()))
    }
}

/// Map a command failure to the process exit code.
///
/// Problems with the inputs themselves exit with [`EXIT_INPUT`]; anything
/// that goes wrong after loading exits with [`EXIT_ANALYSIS`].
pub fn exit_code(err: &anyhow::Error) -> u8 {
    let input_problem = err.chain().any(|cause| {
        cause.is::<LogError>()
            || cause.is::<CatalogError>()
            || matches!(cause.downcast_ref::<AnalysisError>(), Some(AnalysisError::Log(_)))
    });
    if input_problem {
        EXIT_INPUT
    } else {
        EXIT_ANALYSIS
    }
}

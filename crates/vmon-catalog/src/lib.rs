//! # vMon Service Catalog
//!
//! Read-only catalog of the services vMon manages: numeric ids, levels,
//! types, profile membership, pre-start commands and dependency edges.
//!
//! The catalog is loaded from a YAML document (see [`parser`]) and queried
//! through the [`ServiceCatalog`] trait, so analysis code never depends on
//! where the data came from.

#![warn(missing_docs)]

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub mod graph;
pub mod lint;
pub mod parser;

pub use graph::DependencyGraph;
pub use lint::CatalogWarning;

/// Catalog error types
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Failed to read catalog file
    #[error("Failed to read catalog file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse YAML
    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// Invalid catalog
    #[error("Invalid catalog: {0}")]
    ValidationError(String),

    /// Service reference not found
    #[error("Service '{0}' not found")]
    ServiceNotFound(String),
}

/// Result type for catalog operations
pub type Result<T> = std::result::Result<T, CatalogError>;

/// How vMon treats a service
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ServiceType {
    /// Started by the operating system, not by vMon
    SystemControl,
    /// Started and watched by vMon
    VmonControl,
    /// Any other tag, kept verbatim
    Other(String),
}

impl ServiceType {
    /// The catalog tag for this type
    pub fn as_str(&self) -> &str {
        match self {
            ServiceType::SystemControl => "system-control",
            ServiceType::VmonControl => "vmon-control",
            ServiceType::Other(tag) => tag,
        }
    }
}

impl From<String> for ServiceType {
    fn from(tag: String) -> Self {
        match tag.trim() {
            "system-control" => ServiceType::SystemControl,
            "vmon-control" => ServiceType::VmonControl,
            other => ServiceType::Other(other.to_string()),
        }
    }
}

impl From<ServiceType> for String {
    fn from(service_type: ServiceType) -> Self {
        service_type.as_str().to_string()
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything the catalog knows about one service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceDescriptor {
    /// Service name, the key in the catalog
    pub name: String,

    /// Ordinal position used by the dashboard matrix
    pub id: Option<u32>,

    /// Id of the parent service
    pub parent_id: Option<u32>,

    /// Human readable description
    pub description: Option<String>,

    /// Start-order level; lower levels start first
    pub level: Option<u32>,

    /// Service type tag
    pub service_type: Option<ServiceType>,

    /// Services this one depends on, in catalog order, without duplicates
    pub dependencies: Vec<String>,

    /// Profiles this service belongs to
    pub profiles: Vec<String>,

    /// Pre-start command; when present a pre-start phase is expected
    pub prestart_command: Option<String>,

    /// Health check command
    pub health_command: Option<String>,

    /// Name the service logs under, when it differs from `name`
    pub name_in_log: Option<String>,

    /// Log file locations of the service
    pub log_files: Vec<String>,
}

impl ServiceDescriptor {
    /// A descriptor with only a name
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: None,
            parent_id: None,
            description: None,
            level: None,
            service_type: None,
            dependencies: Vec::new(),
            profiles: Vec::new(),
            prestart_command: None,
            health_command: None,
            name_in_log: None,
            log_files: Vec::new(),
        }
    }

    /// Whether the service belongs to `profile` (exact membership)
    pub fn in_profile(&self, profile: &str) -> bool {
        self.profiles.iter().any(|p| p == profile)
    }

    /// Whether the service declares a pre-start command
    pub fn has_prestart(&self) -> bool {
        self.prestart_command.is_some()
    }
}

/// Read operations the analysis needs from a catalog
pub trait ServiceCatalog {
    /// All service names, sorted
    fn service_names(&self) -> Vec<String>;

    /// Metadata of one service, `None` when the catalog does not know it
    fn service_info(&self, name: &str) -> Option<&ServiceDescriptor>;

    /// Names of the services in `profile`, in catalog order
    fn services_by_profile(&self, profile: &str) -> Vec<String>;

    /// Every descriptor, in catalog order
    fn descriptors(&self) -> Vec<&ServiceDescriptor>;
}

/// In-memory catalog keyed by service name, preserving document order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    services: IndexMap<String, ServiceDescriptor>,
}

impl Catalog {
    /// Build a catalog from descriptors; a later duplicate name replaces an earlier one
    pub fn from_descriptors(descriptors: impl IntoIterator<Item = ServiceDescriptor>) -> Self {
        let services = descriptors
            .into_iter()
            .map(|d| (d.name.clone(), d))
            .collect();
        Self { services }
    }

    /// Number of services
    pub fn len(&self) -> usize {
        self.services.len()
    }

    /// Whether the catalog has no services
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    /// Look up a service, failing when it is unknown
    pub fn require(&self, name: &str) -> Result<&ServiceDescriptor> {
        self.services
            .get(name)
            .ok_or_else(|| CatalogError::ServiceNotFound(name.to_string()))
    }

    /// Names of the services with the given type
    pub fn services_by_type(&self, service_type: &ServiceType) -> Vec<String> {
        self.names_where(|d| d.service_type.as_ref() == Some(service_type))
    }

    /// Names of the services at the given level
    pub fn services_by_level(&self, level: u32) -> Vec<String> {
        self.names_where(|d| d.level == Some(level))
    }

    /// Names of the services that declare a pre-start command
    pub fn services_with_prestart(&self) -> Vec<String> {
        self.names_where(ServiceDescriptor::has_prestart)
    }

    /// Every profile name used by any service, sorted
    pub fn profiles(&self) -> Vec<String> {
        let mut profiles: Vec<String> = self
            .services
            .values()
            .flat_map(|d| d.profiles.iter().cloned())
            .collect();
        profiles.sort();
        profiles.dedup();
        profiles
    }

    /// Dependency graph over the whole catalog
    pub fn dependency_graph(&self) -> DependencyGraph {
        DependencyGraph::build(self)
    }

    /// Non-fatal findings about the catalog contents
    pub fn lint(&self) -> Vec<CatalogWarning> {
        lint::lint(self)
    }

    fn names_where(&self, predicate: impl Fn(&ServiceDescriptor) -> bool) -> Vec<String> {
        self.services
            .values()
            .filter(|d| predicate(d))
            .map(|d| d.name.clone())
            .collect()
    }
}

impl ServiceCatalog for Catalog {
    fn service_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.services.keys().cloned().collect();
        names.sort();
        names
    }

    fn service_info(&self, name: &str) -> Option<&ServiceDescriptor> {
        self.services.get(name)
    }

    fn services_by_profile(&self, profile: &str) -> Vec<String> {
        self.names_where(|d| d.in_profile(profile))
    }

    fn descriptors(&self) -> Vec<&ServiceDescriptor> {
        self.services.values().collect()
    }
}

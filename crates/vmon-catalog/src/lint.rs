//! Non-fatal catalog checks
//!
//! None of these stop an analysis: dangling dependencies in particular are
//! normal in real catalogs.

use crate::{Catalog, ServiceCatalog};
use indexmap::IndexMap;
use std::fmt;

/// A questionable but tolerated catalog entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogWarning {
    /// A dependency names a service the catalog does not define
    DanglingDependency {
        /// Declaring service
        service: String,
        /// Undefined dependency
        dependency: String,
    },

    /// A service lists itself as a dependency
    SelfDependency {
        /// Offending service
        service: String,
    },

    /// Several services share one id
    DuplicateId {
        /// Shared id
        id: u32,
        /// Services using it, in catalog order
        services: Vec<String>,
    },

    /// A service belongs to no profile and is never analyzed
    NoProfile {
        /// Offending service
        service: String,
    },
}

impl fmt::Display for CatalogWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogWarning::DanglingDependency { service, dependency } => write!(
                f,
                "Service '{service}' depends on unknown service '{dependency}'"
            ),
            CatalogWarning::SelfDependency { service } => {
                write!(f, "Service '{service}' depends on itself")
            }
            CatalogWarning::DuplicateId { id, services } => {
                write!(f, "Id {id} is shared by: {}", services.join(", "))
            }
            CatalogWarning::NoProfile { service } => {
                write!(f, "Service '{service}' belongs to no profile")
            }
        }
    }
}

/// Collect every warning for `catalog`, grouped by kind
pub fn lint(catalog: &Catalog) -> Vec<CatalogWarning> {
    let mut warnings = Vec::new();
    let mut ids: IndexMap<u32, Vec<String>> = IndexMap::new();

    for descriptor in catalog.descriptors() {
        for dep in &descriptor.dependencies {
            if dep == &descriptor.name {
                warnings.push(CatalogWarning::SelfDependency {
                    service: descriptor.name.clone(),
                });
            } else if catalog.service_info(dep).is_none() {
                warnings.push(CatalogWarning::DanglingDependency {
                    service: descriptor.name.clone(),
                    dependency: dep.clone(),
                });
            }
        }

        if let Some(id) = descriptor.id {
            ids.entry(id).or_default().push(descriptor.name.clone());
        }
    }

    warnings.extend(
        ids.into_iter()
            .filter(|(_, services)| services.len() > 1)
            .map(|(id, services)| CatalogWarning::DuplicateId { id, services }),
    );

    warnings.extend(
        catalog
            .descriptors()
            .into_iter()
            .filter(|d| d.profiles.is_empty())
            .map(|d| CatalogWarning::NoProfile {
                service: d.name.clone(),
            }),
    );

    warnings
}

//! YAML catalog parser
//!
//! The catalog document has a single `services` mapping keyed by service
//! name. Every field of an entry is optional and `null`, missing and blank
//! values all mean "not set":
//!
//! ```yaml
//! services:
//!   vmafd:
//!     id: 3
//!     parent_id: null
//!     level: 1
//!     type: vmon-control
//!     description: VMware Authentication Framework
//!     serviceprestart: /usr/lib/vmware-vmafd/prestart.sh
//!     profile: [ALL, HACore]
//!     dp_service: [lwsmd]
//! ```

use crate::{Catalog, CatalogError, Result, ServiceDescriptor, ServiceType};
use indexmap::IndexMap;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use std::path::Path;
use tracing::{debug, warn};

/// Raw catalog document
#[derive(Debug, Deserialize)]
struct CatalogDocument {
    #[serde(default)]
    services: Option<IndexMap<String, Option<ServiceEntry>>>,
}

/// Raw service entry as written in the catalog
#[derive(Debug, Default, Deserialize)]
struct ServiceEntry {
    #[serde(default)]
    serviceprestart: Option<String>,
    #[serde(default)]
    servicehealthcmd: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default, deserialize_with = "blank_or_number")]
    id: Option<u32>,
    #[serde(default)]
    nameinlog: Option<String>,
    #[serde(default, deserialize_with = "blank_or_number")]
    level: Option<u32>,
    #[serde(default, rename = "type")]
    service_type: Option<String>,
    #[serde(default)]
    profile: Option<Vec<String>>,
    #[serde(default)]
    log: Option<Vec<String>>,
    #[serde(default)]
    dp_service: Option<Vec<String>>,
    #[serde(default, deserialize_with = "blank_or_number")]
    parent_id: Option<u32>,
}

/// A numeric field as it may appear in hand-edited catalogs
#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(u32),
    Text(String),
}

/// Integer, `null` or blank string; blank means absent
fn blank_or_number<'de, D>(deserializer: D) -> std::result::Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<NumberOrText>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrText::Number(n)) => Ok(Some(n)),
        Some(NumberOrText::Text(text)) => {
            let text = text.trim();
            if text.is_empty() {
                return Ok(None);
            }
            text.parse()
                .map(Some)
                .map_err(|_| D::Error::custom(format!("expected a number, found '{text}'")))
        }
    }
}

/// Parse a YAML catalog file
pub fn parse_file(path: impl AsRef<Path>) -> Result<Catalog> {
    let path = path.as_ref();
    debug!("Loading service catalog from {}", path.display());
    let content = std::fs::read_to_string(path)?;
    parse_str(&content)
}

/// Parse a YAML catalog from a string
pub fn parse_str(content: &str) -> Result<Catalog> {
    let document: CatalogDocument = serde_yaml::from_str(content)?;
    let Some(services) = document.services else {
        return Err(CatalogError::ValidationError(
            "missing top-level 'services' mapping".to_string(),
        ));
    };

    let mut descriptors = Vec::with_capacity(services.len());
    for (name, entry) in services {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(CatalogError::ValidationError(
                "service with an empty name".to_string(),
            ));
        }
        if entry.is_none() {
            warn!("Service '{}' has no attributes", name);
        }
        descriptors.push(into_descriptor(name, entry.unwrap_or_default()));
    }

    Ok(Catalog::from_descriptors(descriptors))
}

fn into_descriptor(name: String, entry: ServiceEntry) -> ServiceDescriptor {
    ServiceDescriptor {
        id: entry.id,
        parent_id: entry.parent_id,
        description: non_blank(entry.description),
        level: entry.level,
        service_type: non_blank(entry.service_type).map(ServiceType::from),
        dependencies: names(entry.dp_service),
        profiles: names(entry.profile),
        prestart_command: non_blank(entry.serviceprestart),
        health_command: non_blank(entry.servicehealthcmd),
        name_in_log: non_blank(entry.nameinlog),
        log_files: names(entry.log),
        name,
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Trimmed, non-blank, de-duplicated names in their original order
fn names(values: Option<Vec<String>>) -> Vec<String> {
    let mut result: Vec<String> = Vec::new();
    for value in values.unwrap_or_default() {
        let value = value.trim();
        if !value.is_empty() && !result.iter().any(|v| v == value) {
            result.push(value.to_string());
        }
    }
    result
}

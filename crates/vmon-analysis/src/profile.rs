//! Profile detection and the active service set

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use vmon_catalog::ServiceCatalog;
use vmon_log::LogRecord;

/// Message vMon logs when it boots with a profile
pub const PROFILE_MARKER: &str = "Starting vMon with profile";

/// Profile name used when the log names none
pub const DEFAULT_PROFILE: &str = "NONE";

/// The profile in effect for a log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedProfile {
    /// Profile name
    pub name: String,
    /// Whether `name` came from the log rather than the default
    pub detected: bool,
}

/// Name of the profile vMon last started with, if the log says.
///
/// vMon may restart within one log, so the last marker wins. A marker line
/// without a quoted name is skipped.
pub fn detect_profile(records: &[LogRecord]) -> Option<String> {
    records
        .iter()
        .rev()
        .filter(|r| r.mentions(PROFILE_MARKER))
        .find_map(|r| {
            let name = quoted_name(&r.message);
            if name.is_none() {
                debug!("Profile marker without a name on line {}", r.line_number);
            }
            name
        })
}

/// Detected profile, or `default` when the log names none
pub fn resolve_profile(records: &[LogRecord], default: &str) -> ResolvedProfile {
    match detect_profile(records) {
        Some(name) => {
            info!("Current profile: {}", name);
            ResolvedProfile {
                name,
                detected: true,
            }
        }
        None => {
            info!("Profile information not found, using '{}'", default);
            ResolvedProfile {
                name: default.to_string(),
                detected: false,
            }
        }
    }
}

/// Services of `profile`, in catalog order; unknown profiles give an empty set
pub fn active_services<C: ServiceCatalog + ?Sized>(catalog: &C, profile: &str) -> Vec<String> {
    catalog.services_by_profile(profile)
}

/// The last single-quoted segment of `message`
fn quoted_name(message: &str) -> Option<String> {
    let parts: Vec<&str> = message.split('\'').collect();
    if parts.len() < 3 {
        return None;
    }
    let name = parts[parts.len() - 2].trim();
    (!name.is_empty()).then(|| name.to_string())
}

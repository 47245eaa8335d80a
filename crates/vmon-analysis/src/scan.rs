//! First-decisive-marker scan shared by both classifiers
//!
//! A classifier is a default status plus an ordered list of markers. The
//! records are scanned in file order; the first record whose message holds
//! any marker fixes the status and later markers are ignored. Within one
//! record, markers are tried in list order.

use std::collections::HashMap;
use vmon_log::LogRecord;

/// A literal message fragment and the status it leads to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Marker<S> {
    /// Fragment looked for in the message
    pub pattern: &'static str,
    /// Status once the fragment is seen
    pub outcome: S,
}

/// Outcome of a scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scan<'a, S> {
    /// Final status; the default when no marker matched
    pub status: S,
    /// The record that decided the status
    pub decisive: Option<&'a LogRecord>,
    /// Records matching an auxiliary fragment, over the whole input
    pub auxiliary: Vec<&'a LogRecord>,
}

impl<S> Scan<'_, S> {
    /// Owned copy of the deciding record, if any
    pub fn evidence(&self) -> Vec<LogRecord> {
        self.decisive.into_iter().cloned().collect()
    }

    /// Owned copies of the auxiliary records
    pub fn auxiliary_evidence(&self) -> Vec<LogRecord> {
        self.auxiliary.iter().map(|r| (*r).clone()).collect()
    }
}

/// Scan `records` in order and stop updating the status at the first marker hit.
///
/// Auxiliary fragments never change the status; they are collected from
/// every non-decisive record.
pub fn first_decisive<'a, S: Copy>(
    records: impl IntoIterator<Item = &'a LogRecord>,
    markers: &[Marker<S>],
    auxiliary: &[&str],
    default: S,
) -> Scan<'a, S> {
    let mut scan = Scan {
        status: default,
        decisive: None,
        auxiliary: Vec::new(),
    };

    for record in records {
        if scan.decisive.is_none() {
            if let Some(marker) = markers.iter().find(|m| record.mentions(m.pattern)) {
                scan.status = marker.outcome;
                scan.decisive = Some(record);
                continue;
            }
        }
        if auxiliary.iter().any(|fragment| record.mentions(fragment)) {
            scan.auxiliary.push(record);
        }
    }

    scan
}

/// Records grouped by their service tag, each group in file order
pub fn group_by_service(records: &[LogRecord]) -> HashMap<&str, Vec<&LogRecord>> {
    let mut groups: HashMap<&str, Vec<&LogRecord>> = HashMap::new();
    for record in records {
        if let Some(service) = record.service.as_deref() {
            groups.entry(service).or_default().push(record);
        }
    }
    groups
}

//! Changes and plans
//!
//! A [`Plan`] is the ordered list of [`Change`]s that turns the zone a
//! provider currently serves into the desired zone.
//!
//! ## Flow
//!
//! ```text
//! desired Zone ──┐
//!                ├── plan_changes() ── Vec<Change> ── Plan ── DnsProvider::apply()
//! live Zone ─────┘        ▲
//!      ▲                  │ keyed on (name, type)
//!      │
//! DnsProvider::populate()
//! ```
//!
//! `plan_changes` is deliberately minimal: it compares records by key and by
//! [`Record::same_data`] and nothing else. No thresholds, no special cases
//! for apex NS records.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::model::{Record, RecordType, Zone, ZoneName};

/// One difference between the live and the desired zone
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum Change {
    /// Record only exists in the desired zone
    Create { new: Record },
    /// Record exists in both with different data
    Update { existing: Record, new: Record },
    /// Record only exists in the live zone
    Delete { existing: Record },
}

impl Change {
    /// Record state before the change, if there was one
    pub fn existing(&self) -> Option<&Record> {
        match self {
            Change::Create { .. } => None,
            Change::Update { existing, .. } | Change::Delete { existing } => Some(existing),
        }
    }

    /// Record state after the change, if there will be one
    pub fn new_record(&self) -> Option<&Record> {
        match self {
            Change::Create { new } | Change::Update { new, .. } => Some(new),
            Change::Delete { .. } => None,
        }
    }

    /// The record this change is about (new state when available)
    pub fn record(&self) -> &Record {
        match self {
            Change::Create { new } | Change::Update { new, .. } => new,
            Change::Delete { existing } => existing,
        }
    }
}

/// Changes to apply to one zone
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Plan {
    /// Zone the changes belong to
    pub zone: ZoneName,
    /// Ordered changes
    pub changes: Vec<Change>,
    /// Whether the zone already existed at the provider
    pub exists: bool,
}

impl Plan {
    pub fn new(zone: ZoneName, changes: Vec<Change>, exists: bool) -> Self {
        Self {
            zone,
            changes,
            exists,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn creates(&self) -> usize {
        self.count(|c| matches!(c, Change::Create { .. }))
    }

    pub fn updates(&self) -> usize {
        self.count(|c| matches!(c, Change::Update { .. }))
    }

    pub fn deletes(&self) -> usize {
        self.count(|c| matches!(c, Change::Delete { .. }))
    }

    fn count(&self, pred: impl Fn(&Change) -> bool) -> usize {
        self.changes.iter().filter(|c| pred(c)).count()
    }
}

/// Diff `existing` against `desired`, keyed on `(name, type)`
///
/// Changes come out sorted by name, then type.
pub fn plan_changes(existing: &Zone, desired: &Zone) -> Vec<Change> {
    let mut keys: BTreeMap<(&str, RecordType), (Option<&Record>, Option<&Record>)> =
        BTreeMap::new();

    for record in existing.records() {
        keys.entry(record.key()).or_default().0 = Some(record);
    }
    for record in desired.records() {
        keys.entry(record.key()).or_default().1 = Some(record);
    }

    keys.into_values()
        .filter_map(|pair| match pair {
            (None, Some(new)) => Some(Change::Create { new: new.clone() }),
            (Some(existing), None) => Some(Change::Delete {
                existing: existing.clone(),
            }),
            (Some(existing), Some(new)) if !existing.same_data(new) => Some(Change::Update {
                existing: existing.clone(),
                new: new.clone(),
            }),
            _ => None,
        })
        .collect()
}

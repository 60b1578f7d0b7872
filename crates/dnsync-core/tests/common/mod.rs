//! Test doubles and common utilities for planning contract tests
//!
//! This module provides a minimal provider double that serves a canned live
//! zone and records every call made to it.

#![allow(dead_code)]

use dnsync_core::error::Result;
use dnsync_core::plan::{Change, Plan};
use dnsync_core::{DnsProvider, Record, RecordType, Zone, ZoneName};
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

const SUPPORTS: &[RecordType] = &[
    RecordType::A,
    RecordType::Aaaa,
    RecordType::Cname,
    RecordType::Mx,
    RecordType::Txt,
];

/// A mock DnsProvider serving a fixed live zone
pub struct MockDnsProvider {
    /// Records returned by populate()
    live: Vec<Record>,
    /// Whether populate() reports the zone as existing
    exists: bool,
    /// Strict supports flag
    strict: bool,
    /// Call counter for populate()
    populate_call_count: Arc<AtomicUsize>,
    /// Changes received by apply(), in order
    applied: Arc<Mutex<Vec<Change>>>,
}

impl MockDnsProvider {
    pub fn new(live: Vec<Record>) -> Self {
        Self {
            exists: !live.is_empty(),
            live,
            strict: true,
            populate_call_count: Arc::new(AtomicUsize::new(0)),
            applied: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn lenient(mut self) -> Self {
        self.strict = false;
        self
    }

    /// Get the number of times populate() was called
    pub fn populate_call_count(&self) -> usize {
        self.populate_call_count.load(Ordering::SeqCst)
    }

    /// Get the changes passed to apply()
    pub fn applied(&self) -> Vec<Change> {
        self.applied.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl DnsProvider for MockDnsProvider {
    fn id(&self) -> &str {
        "mock"
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }

    fn supports(&self) -> &'static [RecordType] {
        SUPPORTS
    }

    fn strict_supports(&self) -> bool {
        self.strict
    }

    async fn populate(&self, zone: &mut Zone) -> Result<bool> {
        self.populate_call_count.fetch_add(1, Ordering::SeqCst);
        for record in &self.live {
            zone.add_record(record.clone())?;
        }
        Ok(self.exists)
    }

    async fn apply(&self, plan: &Plan) -> Result<usize> {
        let mut applied = self.applied.lock().unwrap();
        applied.extend(plan.changes.iter().cloned());
        Ok(plan.changes.len())
    }
}

/// The zone used throughout the tests
pub fn unit_tests() -> ZoneName {
    ZoneName::new("unit.tests.").unwrap()
}

/// Build a zone from records
pub fn zone_with(records: Vec<Record>) -> Zone {
    let mut zone = Zone::new(unit_tests());
    for record in records {
        zone.add_record(record).unwrap();
    }
    zone
}

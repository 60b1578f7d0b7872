//! Contract Test: Planning Is Owned By The Core
//!
//! Constraints verified:
//! - `DnsProvider::plan` populates a fresh zone exactly once and diffs it
//!   against the desired zone
//! - Unsupported record types fail planning in strict mode and are dropped
//!   in lenient mode
//! - Identical live and desired zones produce an empty plan
//!
//! If this test fails, providers can no longer rely on the core for diffing.

mod common;

use common::*;
use dnsync_core::model::MxValue;
use dnsync_core::{Change, DnsProvider, Error, Record, RecordType};

fn a(name: &str, values: &[&str]) -> Record {
    Record::multiple(name, RecordType::A, 60, values.iter().copied()).unwrap()
}

#[tokio::test]
async fn plan_populates_once_and_diffs() {
    let provider = MockDnsProvider::new(vec![
        a("www", &["1.2.3.4"]),
        Record::single("old", RecordType::Txt, 300, "dileu").unwrap(),
    ]);

    let desired = zone_with(vec![
        a("www", &["1.2.3.4", "5.6.7.8"]),
        Record::multiple(
            "mx",
            RecordType::Mx,
            300,
            vec![MxValue {
                preference: 10,
                exchange: "smtp.unit.tests.".to_string(),
            }],
        )
        .unwrap(),
    ]);

    let plan = provider.plan(&desired).await.expect("plan succeeds");

    assert_eq!(provider.populate_call_count(), 1);
    assert!(plan.exists);
    assert_eq!(plan.zone, unit_tests());
    assert_eq!((plan.creates(), plan.updates(), plan.deletes()), (1, 1, 1));
}

#[tokio::test]
async fn matching_zones_plan_nothing() {
    let provider = MockDnsProvider::new(vec![a("www", &["5.6.7.8", "1.2.3.4"])]);
    let desired = zone_with(vec![a("www", &["1.2.3.4", "5.6.7.8"])]);

    let plan = provider.plan(&desired).await.expect("plan succeeds");

    assert!(plan.is_empty());
}

#[tokio::test]
async fn strict_supports_rejects_unsupported_types() {
    let provider = MockDnsProvider::new(Vec::new());
    let desired = zone_with(vec![
        a("www", &["1.2.3.4"]),
        Record::single("ptr", RecordType::Ptr, 60, "host.unit.tests.").unwrap(),
    ]);

    let err = provider.plan(&desired).await.unwrap_err();

    assert!(matches!(&err, Error::Unsupported(msg) if msg.contains("PTR records not supported for ptr.unit.tests.")));
    // Nothing was fetched: the check happens before populate
    assert_eq!(provider.populate_call_count(), 0);
}

#[tokio::test]
async fn lenient_supports_drops_unsupported_types() {
    let provider = MockDnsProvider::new(Vec::new()).lenient();
    let desired = zone_with(vec![
        a("www", &["1.2.3.4"]),
        Record::single("ptr", RecordType::Ptr, 60, "host.unit.tests.").unwrap(),
    ]);

    let plan = provider.plan(&desired).await.expect("plan succeeds");

    assert!(!plan.exists);
    assert_eq!(plan.changes.len(), 1);
    assert!(matches!(&plan.changes[0], Change::Create { new } if new.record_type() == RecordType::A));
}

#[tokio::test]
async fn apply_receives_planned_changes_in_order() {
    let provider = MockDnsProvider::new(vec![a("b", &["1.1.1.1"])]);
    let desired = zone_with(vec![a("a", &["2.2.2.2"]), a("c", &["3.3.3.3"])]);

    let plan = provider.plan(&desired).await.expect("plan succeeds");
    let applied = provider.apply(&plan).await.expect("apply succeeds");

    assert_eq!(applied, 3);
    let names: Vec<_> = provider
        .applied()
        .iter()
        .map(|c| c.record().name().to_string())
        .collect();
    assert_eq!(names, vec!["a", "b", "c"]);
}

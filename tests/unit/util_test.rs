//! Tests for utility types

use std::collections::HashSet;

use prometheus_admission_gate::util::{now_ms, JobId, Priority};

#[test]
fn test_priority_ordering() {
    assert!(Priority::new(5) > Priority::new(3));
    assert!(Priority::new(3) > Priority::LOWEST);
}

#[test]
fn test_priority_clamp() {
    assert_eq!(Priority::new(0).clamp_to(10), Priority::new(1));
    assert_eq!(Priority::new(42).clamp_to(10), Priority::new(10));
    assert_eq!(Priority::new(7).clamp_to(10), Priority::new(7));
    assert_eq!(Priority::new(7).clamp_to(1), Priority::LOWEST);
}

#[test]
fn test_priority_demoted_floors_at_one() {
    assert_eq!(Priority::new(4).demoted(), Priority::new(3));
    assert_eq!(Priority::LOWEST.demoted(), Priority::LOWEST);
    assert_eq!(Priority::new(0).demoted(), Priority::LOWEST);
}

#[test]
fn test_priority_serializes_as_number() {
    let json = serde_json::to_string(&Priority::from(6_u32)).unwrap();
    assert_eq!(json, "6");
}

#[test]
fn test_job_ids_are_unique() {
    let ids: HashSet<JobId> = (0..1000).map(|_| JobId::new()).collect();
    assert_eq!(ids.len(), 1000);
}

#[test]
fn test_job_id_display_is_uuid() {
    let id = JobId::new();
    assert_eq!(id.to_string(), id.as_uuid().to_string());
    assert_eq!(id.to_string().len(), 36);
}

#[test]
fn test_now_ms_is_after_2020() {
    assert!(now_ms() > 1_577_836_800_000);
}

#[test]
fn test_init_tracing_is_idempotent() {
    prometheus_admission_gate::util::init_tracing();
    prometheus_admission_gate::util::init_tracing();
    assert!(tracing::dispatcher::has_been_set());
}

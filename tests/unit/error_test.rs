//! Tests for error types

use std::time::Duration;

use anyhow::anyhow;
use prometheus_admission_gate::core::SchedulerError;

#[test]
fn test_shutdown_error() {
    let err = SchedulerError::Shutdown;
    assert_eq!(format!("{err}"), "scheduler is shutting down");
    assert!(err.is_rejection());
}

#[test]
fn test_queue_full_error() {
    let err = SchedulerError::QueueFull { depth: 20, max: 20 };
    assert_eq!(format!("{err}"), "queue full: 20 jobs waiting (max 20)");
    assert!(err.is_rejection());
}

#[test]
fn test_timeout_error() {
    let err = SchedulerError::Timeout(Duration::from_millis(50));
    assert_eq!(format!("{err}"), "job timed out after 50ms");
    assert!(!err.is_rejection());
}

#[test]
fn test_job_error_is_transparent() {
    let err: SchedulerError = anyhow!("compiler exited with 1").into();
    assert_eq!(format!("{err}"), "compiler exited with 1");
    assert!(!err.is_rejection());
}

#[test]
fn test_invalid_config_error() {
    let err = SchedulerError::InvalidConfig("max_concurrent must be greater than 0".to_string());
    assert_eq!(
        format!("{err}"),
        "invalid configuration: max_concurrent must be greater than 0"
    );
}

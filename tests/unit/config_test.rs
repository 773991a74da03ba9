//! Tests for configuration validation

use std::collections::HashMap;
use std::time::Duration;

use prometheus_admission_gate::config::{ControllerConfig, ResourceLimits, SchedulerConfig};
use prometheus_admission_gate::util::Priority;

#[test]
fn test_default_config_is_valid() {
    let cfg = ControllerConfig::default();
    assert!(cfg.validate().is_ok());
    assert!(cfg.max_concurrent >= 1);
    assert_eq!(cfg.max_queue_size, 100);
    assert_eq!(cfg.priority_levels, 10);
    assert_eq!(cfg.timeout(), Duration::from_secs(30));
    assert_eq!(cfg.retry_attempts, 2);
    assert!(cfg.resource_limits.is_none());
}

#[test]
fn test_presets_are_valid() {
    assert!(ControllerConfig::health_checks().validate().is_ok());
    assert!(ControllerConfig::builds().validate().is_ok());
}

#[test]
fn test_invalid_max_concurrent() {
    assert!(ControllerConfig::new().with_max_concurrent(0).validate().is_err());
}

#[test]
fn test_invalid_priority_levels() {
    assert!(ControllerConfig::new().with_priority_levels(0).validate().is_err());
}

#[test]
fn test_invalid_timeout() {
    assert!(ControllerConfig::new().with_timeout_ms(0).validate().is_err());
}

#[test]
fn test_zero_queue_and_zero_retries_are_valid() {
    let cfg = ControllerConfig::new()
        .with_max_queue_size(0)
        .with_retry_attempts(0);
    assert!(cfg.validate().is_ok());
}

#[test]
fn test_invalid_resource_limits() {
    let cfg = ControllerConfig::new().with_resource_limits(ResourceLimits {
        cpu_percent: 150.0,
        memory_percent: 80.0,
        disk_percent: 90.0,
    });
    let err = cfg.validate().unwrap_err();
    assert!(err.contains("cpu_percent"));
}

#[test]
fn test_default_priority() {
    assert_eq!(ControllerConfig::new().default_priority(), Priority::new(5));
    assert_eq!(
        ControllerConfig::new().with_priority_levels(1).default_priority(),
        Priority::new(1)
    );
    assert_eq!(
        ControllerConfig::new().with_priority_levels(3).default_priority(),
        Priority::new(2)
    );
}

#[test]
fn test_controller_config_from_json_fills_defaults() {
    let json = r#"{ "max_concurrent": 4, "timeout_ms": 500 }"#;
    let cfg = ControllerConfig::from_json_str(json).expect("valid");
    assert_eq!(cfg.max_concurrent, 4);
    assert_eq!(cfg.timeout_ms, 500);
    assert_eq!(cfg.max_queue_size, 100);
}

#[test]
fn test_controller_config_from_json_rejects_invalid() {
    assert!(ControllerConfig::from_json_str(r#"{ "max_concurrent": 0 }"#).is_err());
    assert!(ControllerConfig::from_json_str("not json").is_err());
}

#[test]
fn test_scheduler_config_validation() {
    let mut controllers = HashMap::new();
    controllers.insert("health".to_string(), ControllerConfig::health_checks());
    let config = SchedulerConfig { controllers };
    assert!(config.validate().is_ok());
}

#[test]
fn test_scheduler_config_empty() {
    let config = SchedulerConfig::default();
    assert!(config.validate().is_err());
}

#[test]
fn test_scheduler_config_from_json() {
    let json = r#"{
        "controllers": {
            "builds": {
                "max_concurrent": 2,
                "max_queue_size": 20,
                "priority_levels": 10,
                "timeout_ms": 300000,
                "retry_attempts": 0
            },
            "health": {
                "max_concurrent": 3,
                "resource_limits": { "cpu_percent": 85.0, "memory_percent": 75.0, "disk_percent": 90.0 }
            }
        }
    }"#;

    let config = SchedulerConfig::from_json_str(json).expect("valid");
    assert_eq!(config.controllers.len(), 2);
    assert_eq!(config.controllers["builds"], ControllerConfig::builds());
    let limits = config.controllers["health"].resource_limits.expect("limits");
    assert!((limits.memory_percent - 75.0).abs() < f64::EPSILON);
}

#[test]
fn test_scheduler_config_names_invalid_controller() {
    let json = r#"{ "controllers": { "bad": { "timeout_ms": 0 } } }"#;
    let err = SchedulerConfig::from_json_str(json).unwrap_err();
    assert!(err.contains("bad"));
}

#[test]
fn test_from_env_overrides() {
    // Only this test touches ADMISSION_* variables.
    std::env::set_var("ADMISSION_MAX_CONCURRENT", "6");
    std::env::set_var("ADMISSION_RETRY_ATTEMPTS", "0");
    let cfg = ControllerConfig::from_env().expect("valid env config");
    assert_eq!(cfg.max_concurrent, 6);
    assert_eq!(cfg.retry_attempts, 0);
    assert_eq!(cfg.priority_levels, 10);

    std::env::set_var("ADMISSION_TIMEOUT_MS", "soon");
    let err = ControllerConfig::from_env().unwrap_err();
    assert!(err.contains("ADMISSION_TIMEOUT_MS"));

    std::env::remove_var("ADMISSION_MAX_CONCURRENT");
    std::env::remove_var("ADMISSION_RETRY_ATTEMPTS");
    std::env::remove_var("ADMISSION_TIMEOUT_MS");
}

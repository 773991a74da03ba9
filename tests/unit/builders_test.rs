//! Tests for controller builders

use std::collections::HashMap;

use prometheus_admission_gate::builders::{build_controller, build_controllers};
use prometheus_admission_gate::config::{ControllerConfig, SchedulerConfig};
use prometheus_admission_gate::core::{AdmissionController, JobMetadata, SchedulerError};
use prometheus_admission_gate::runtime::TokioSpawner;

#[tokio::test]
async fn test_build_named_controllers() {
    let mut controllers = HashMap::new();
    controllers.insert("health".to_string(), ControllerConfig::health_checks());
    controllers.insert("builds".to_string(), ControllerConfig::builds());
    let cfg = SchedulerConfig { controllers };

    let built: HashMap<String, AdmissionController<String>> =
        build_controllers(&cfg, &TokioSpawner::current()).expect("built");

    assert_eq!(built.len(), 2);
    assert_eq!(built["health"].config().max_concurrent, 3);
    assert_eq!(built["builds"].config().retry_attempts, 0);

    // Each controller owns its own state.
    let handle = built["builds"]
        .execute(|| async { Ok("artifact".to_string()) }, None, JobMetadata::labeled("build:web"))
        .expect("admitted");
    assert_eq!(handle.await.unwrap(), "artifact");
    assert_eq!(built["builds"].metrics().total_executed, 1);
    assert_eq!(built["health"].metrics().total_executed, 0);
}

#[tokio::test]
async fn test_build_rejects_invalid_entry() {
    let mut controllers = HashMap::new();
    controllers.insert(
        "broken".to_string(),
        ControllerConfig::new().with_timeout_ms(0),
    );
    let cfg = SchedulerConfig { controllers };

    let result: Result<HashMap<String, AdmissionController<u8>>, _> =
        build_controllers(&cfg, &TokioSpawner::current());
    match result {
        Err(SchedulerError::InvalidConfig(msg)) => assert!(msg.contains("broken")),
        Err(other) => panic!("unexpected error: {other:?}"),
        Ok(_) => panic!("invalid config accepted"),
    }
}

#[tokio::test]
async fn test_build_single_controller() {
    let ctrl: AdmissionController<u8> =
        build_controller(&ControllerConfig::new().with_max_concurrent(2), TokioSpawner::current())
            .expect("built");
    assert_eq!(ctrl.status().active_count, 0);
    assert!(!ctrl.status().is_shutdown);
}

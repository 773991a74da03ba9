//! Build admission controllers from configuration.
//!
//! There are no process-wide limiter instances: each subsystem builds the
//! controllers it needs and owns them.

use std::collections::HashMap;

use crate::config::{ControllerConfig, SchedulerConfig};
use crate::core::{AdmissionController, SchedulerError, Spawn};

/// Build a single controller.
///
/// # Errors
///
/// Returns `SchedulerError::InvalidConfig` if `cfg` is invalid.
pub fn build_controller<T, S>(
    cfg: &ControllerConfig,
    spawner: S,
) -> Result<AdmissionController<T, S>, SchedulerError>
where
    T: Send + 'static,
    S: Spawn + Send + Sync + 'static,
{
    AdmissionController::new(cfg.clone(), spawner)
}

/// Build one controller per named entry, all sharing clones of `spawner`.
///
/// # Errors
///
/// Returns `SchedulerError::InvalidConfig` naming the first invalid controller.
pub fn build_controllers<T, S>(
    cfg: &SchedulerConfig,
    spawner: &S,
) -> Result<HashMap<String, AdmissionController<T, S>>, SchedulerError>
where
    T: Send + 'static,
    S: Spawn + Clone + Send + Sync + 'static,
{
    cfg.validate().map_err(SchedulerError::InvalidConfig)?;

    cfg.controllers
        .iter()
        .map(|(name, controller_cfg)| {
            build_controller(controller_cfg, spawner.clone()).map(|c| (name.clone(), c))
        })
        .collect()
}

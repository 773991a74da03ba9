//! Configuration models for controllers and their named presets.

pub mod controller;

pub use controller::{ControllerConfig, ResourceLimits, SchedulerConfig};

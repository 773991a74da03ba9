//! Controller and scheduler configuration structures.

use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::util::types::Priority;

/// Advisory resource thresholds, in percent. Exceeding them is logged, never enforced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResourceLimits {
    /// CPU utilisation threshold.
    pub cpu_percent: f64,
    /// Memory utilisation threshold.
    pub memory_percent: f64,
    /// Disk utilisation threshold.
    pub disk_percent: f64,
}

impl Default for ResourceLimits {
    fn default() -> Self {
        Self {
            cpu_percent: 80.0,
            memory_percent: 80.0,
            disk_percent: 90.0,
        }
    }
}

impl ResourceLimits {
    /// Validate that every threshold is a percentage.
    pub fn validate(&self) -> Result<(), String> {
        for (name, value) in [
            ("cpu_percent", self.cpu_percent),
            ("memory_percent", self.memory_percent),
            ("disk_percent", self.disk_percent),
        ] {
            if !(0.0..=100.0).contains(&value) {
                return Err(format!("{name} must be within 0..=100, got {value}"));
            }
        }
        Ok(())
    }
}

/// Immutable configuration snapshot for one admission controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Maximum jobs executing at once.
    pub max_concurrent: usize,
    /// Maximum jobs waiting in the priority queue.
    pub max_queue_size: usize,
    /// Number of priority tiers; priorities live in `[1, priority_levels]`.
    pub priority_levels: u32,
    /// Per-attempt timeout in milliseconds.
    pub timeout_ms: u64,
    /// Retries after the first failed attempt.
    pub retry_attempts: u32,
    /// Optional advisory resource thresholds.
    pub resource_limits: Option<ResourceLimits>,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            max_concurrent: num_cpus::get().max(1),
            max_queue_size: 100,
            priority_levels: 10,
            timeout_ms: 30_000,
            retry_attempts: 2,
            resource_limits: None,
        }
    }
}

impl ControllerConfig {
    /// Default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Preset for health-check fan-out: few concurrent probes, short timeout, one retry.
    #[must_use]
    pub fn health_checks() -> Self {
        Self {
            max_concurrent: 3,
            max_queue_size: 50,
            priority_levels: 10,
            timeout_ms: 10_000,
            retry_attempts: 1,
            resource_limits: None,
        }
    }

    /// Preset for builds: two at a time, long timeout, never retried.
    #[must_use]
    pub fn builds() -> Self {
        Self {
            max_concurrent: 2,
            max_queue_size: 20,
            priority_levels: 10,
            timeout_ms: 300_000,
            retry_attempts: 0,
            resource_limits: None,
        }
    }

    /// Set the concurrency limit.
    #[must_use]
    pub const fn with_max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = max_concurrent;
        self
    }

    /// Set the queue capacity.
    #[must_use]
    pub const fn with_max_queue_size(mut self, max_queue_size: usize) -> Self {
        self.max_queue_size = max_queue_size;
        self
    }

    /// Set the number of priority tiers.
    #[must_use]
    pub const fn with_priority_levels(mut self, priority_levels: u32) -> Self {
        self.priority_levels = priority_levels;
        self
    }

    /// Set the per-attempt timeout.
    #[must_use]
    pub const fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set the number of retries.
    #[must_use]
    pub const fn with_retry_attempts(mut self, retry_attempts: u32) -> Self {
        self.retry_attempts = retry_attempts;
        self
    }

    /// Attach advisory resource thresholds.
    #[must_use]
    pub const fn with_resource_limits(mut self, limits: ResourceLimits) -> Self {
        self.resource_limits = Some(limits);
        self
    }

    /// Per-attempt timeout as a [`Duration`].
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Priority given to jobs submitted without one: the middle tier.
    #[must_use]
    pub fn default_priority(&self) -> Priority {
        Priority::new(self.priority_levels.saturating_add(1) / 2).clamp_to(self.priority_levels)
    }

    /// Validate controller configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_concurrent == 0 {
            return Err("max_concurrent must be greater than 0".into());
        }
        if self.priority_levels == 0 {
            return Err("priority_levels must be at least 1".into());
        }
        if self.timeout_ms == 0 {
            return Err("timeout_ms must be greater than 0".into());
        }
        if let Some(limits) = &self.resource_limits {
            limits.validate()?;
        }
        Ok(())
    }

    /// Parse a controller configuration from JSON and validate it.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Build a configuration from `ADMISSION_*` environment variables, loading
    /// a `.env` file first if one exists. Unset variables keep their defaults.
    pub fn from_env() -> Result<Self, String> {
        let _ = dotenvy::dotenv();
        let defaults = Self::default();
        let cfg = Self {
            max_concurrent: env_or("ADMISSION_MAX_CONCURRENT", defaults.max_concurrent)?,
            max_queue_size: env_or("ADMISSION_MAX_QUEUE_SIZE", defaults.max_queue_size)?,
            priority_levels: env_or("ADMISSION_PRIORITY_LEVELS", defaults.priority_levels)?,
            timeout_ms: env_or("ADMISSION_TIMEOUT_MS", defaults.timeout_ms)?,
            retry_attempts: env_or("ADMISSION_RETRY_ATTEMPTS", defaults.retry_attempts)?,
            resource_limits: None,
        };
        cfg.validate()?;
        Ok(cfg)
    }
}

fn env_or<V>(key: &str, default: V) -> Result<V, String>
where
    V: FromStr,
    V::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| format!("{key}: cannot parse `{raw}`: {e}")),
        Err(_) => Ok(default),
    }
}

/// Root configuration: named controllers, each owned by the subsystem that builds it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Map of controller name to configuration.
    pub controllers: HashMap<String, ControllerConfig>,
}

impl SchedulerConfig {
    /// Validate all controllers and ensure at least one exists.
    pub fn validate(&self) -> Result<(), String> {
        if self.controllers.is_empty() {
            return Err("at least one controller must be defined".into());
        }
        for (name, controller) in &self.controllers {
            controller
                .validate()
                .map_err(|e| format!("controller `{name}` invalid: {e}"))?;
        }
        Ok(())
    }

    /// Parse scheduler configuration from a JSON string and validate.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }
}

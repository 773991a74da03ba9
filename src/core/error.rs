//! Error types for admission and execution.

use std::time::Duration;

use thiserror::Error;

/// Errors produced by the admission controller and surfaced through job handles.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// Shutdown has begun; no new work is admitted.
    #[error("scheduler is shutting down")]
    Shutdown,
    /// The pending queue is at capacity; the job was not recorded.
    #[error("queue full: {depth} jobs waiting (max {max})")]
    QueueFull {
        /// Queue length at rejection time.
        depth: usize,
        /// Configured maximum queue size.
        max: usize,
    },
    /// The job did not finish within the configured timeout.
    #[error("job timed out after {0:?}")]
    Timeout(Duration),
    /// The job's own error, passed through unchanged.
    #[error(transparent)]
    Job(#[from] anyhow::Error),
    /// Configuration failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl SchedulerError {
    /// True for the fail-fast rejections raised by `execute` itself.
    #[must_use]
    pub const fn is_rejection(&self) -> bool {
        matches!(self, Self::Shutdown | Self::QueueFull { .. })
    }
}

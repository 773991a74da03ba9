//! Admission control, scheduling, execution and retry.

pub mod controller;
pub mod error;
pub mod executor;
pub mod job;
pub mod metrics;
pub mod probe;
pub mod retry;
pub mod shutdown;
pub mod timeout;

pub use controller::{AdmissionController, ControllerStatus};
pub use error::SchedulerError;
pub use executor::Spawn;
pub use job::{work_fn, BatchJob, JobFuture, JobHandle, JobMetadata, Work};
pub use metrics::{MetricsCollector, MetricsSnapshot};
pub use probe::{ResourceMonitor, ResourceProbe, ResourceSample};
pub use retry::{RetryDecision, RetryPolicy};
pub use timeout::race_deadline;

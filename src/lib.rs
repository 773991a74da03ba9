//! # Prometheus Admission Gate
//!
//! Bounded-concurrency admission control for expensive asynchronous jobs.
//!
//! Many independent jobs (builds, health checks, test runs) are submitted to a
//! shared gate. The gate runs up to `max_concurrent` of them at once, queues
//! the rest by priority, enforces a per-attempt timeout, retries failures at a
//! lower priority, and drains gracefully on shutdown. It exists to stop
//! unbounded fan-out from overloading a process.
//!
//! ## Lifecycle of a job
//!
//! - **Admission**: a free slot starts the job immediately; otherwise it is
//!   queued, or rejected with `QueueFull` when the queue is at capacity.
//! - **Ordering**: queued jobs run highest priority first, FIFO within a tier.
//! - **Timeout**: an attempt that overruns `timeout_ms` counts as a failure.
//!   The attempt itself keeps running in the background.
//! - **Retry**: a failed job is requeued one tier lower until
//!   `retry_attempts` is spent, then its handle resolves with the last error.
//! - **Shutdown**: admission closes, in-flight jobs get a bounded drain, and
//!   queued jobs are dropped without ever resolving.
//!
//! ```rust,ignore
//! use prometheus_admission_gate::config::ControllerConfig;
//! use prometheus_admission_gate::core::{AdmissionController, BatchJob, JobMetadata};
//! use prometheus_admission_gate::runtime::TokioSpawner;
//! use prometheus_admission_gate::util::Priority;
//! use std::time::Duration;
//!
//! let checks = AdmissionController::new(ControllerConfig::health_checks(), TokioSpawner::current())?;
//!
//! let handle = checks.execute(
//!     || async { ping("db").await },
//!     Some(Priority::new(8)),
//!     JobMetadata::labeled("health:db"),
//! )?;
//! let status = handle.await?;
//!
//! let results = checks
//!     .execute_batch(vec![BatchJob::new(|| ping("cache")), BatchJob::new(|| ping("queue"))], Some(2))
//!     .await;
//!
//! checks.shutdown(Duration::from_secs(5)).await;
//! ```
//!
//! For complete examples, see `tests/admission_control_test.rs`.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Builders to construct controllers from configuration.
pub mod builders;
/// Configuration models for controllers and presets.
pub mod config;
/// Admission control, scheduling, execution and retry.
pub mod core;
/// Infrastructure backing the controller state.
pub mod infra;
/// Runtime adapters.
pub mod runtime;
/// Shared utilities.
pub mod util;

//! Admission controller and scheduler loop.
//!
//! All mutable scheduling state (in-flight ids, the priority queue and the
//! shutdown flag) sits behind one `parking_lot::Mutex` that is never held
//! across an `.await`. Job bodies run on spawned tasks, up to
//! `max_concurrent` at a time.

use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;

use futures::stream::{FuturesUnordered, StreamExt};
use parking_lot::Mutex;
use serde::Serialize;
use tokio::sync::Notify;
use tracing::{debug, info, warn};

use crate::config::ControllerConfig;
use crate::core::executor::Spawn;
use crate::core::job::{work_fn, BatchJob, JobHandle, JobMetadata, JobRecord, Work};
use crate::core::metrics::{MetricsCollector, MetricsSnapshot};
use crate::core::probe::ResourceMonitor;
use crate::core::retry::RetryPolicy;
use crate::core::SchedulerError;
use crate::infra::queue::PriorityQueue;
use crate::runtime::TokioSpawner;
use crate::util::clock::now_ms;
use crate::util::types::{JobId, Priority};

/// Read-only view of the controller.
#[derive(Debug, Clone, Serialize)]
pub struct ControllerStatus {
    /// Jobs currently executing.
    pub active_count: usize,
    /// Jobs waiting in the queue.
    pub queue_length: usize,
    /// Whether shutdown has begun.
    pub is_shutdown: bool,
    /// Configuration in force.
    pub config: ControllerConfig,
}

pub(crate) struct ControllerState<T> {
    pub in_flight: HashSet<JobId>,
    pub queue: PriorityQueue<JobRecord<T>>,
    pub is_shutdown: bool,
}

pub(crate) struct Inner<T, S> {
    pub config: ControllerConfig,
    pub retry: RetryPolicy,
    pub state: Mutex<ControllerState<T>>,
    pub metrics: Arc<MetricsCollector>,
    /// Signalled whenever the in-flight set becomes empty.
    pub idle: Notify,
    pub monitor: Mutex<Option<ResourceMonitor>>,
    pub spawner: S,
}

/// Bounded-concurrency gate with a priority queue, timeouts and retries.
///
/// Cloning is cheap and every clone drives the same state. Build one per
/// subsystem that needs bounded fan-out.
///
/// ```rust,ignore
/// use prometheus_admission_gate::config::ControllerConfig;
/// use prometheus_admission_gate::core::{AdmissionController, JobMetadata};
/// use prometheus_admission_gate::runtime::TokioSpawner;
///
/// let builds = AdmissionController::new(ControllerConfig::builds(), TokioSpawner::current())?;
/// let handle = builds.execute(|| async { run_build().await }, None, JobMetadata::labeled("build:web"))?;
/// let artifact = handle.await?;
/// ```
pub struct AdmissionController<T, S = TokioSpawner> {
    pub(crate) inner: Arc<Inner<T, S>>,
}

impl<T, S> Clone for AdmissionController<T, S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T, S> AdmissionController<T, S>
where
    T: Send + 'static,
    S: Spawn + Send + Sync + 'static,
{
    /// Create a controller after validating `config`.
    ///
    /// # Errors
    ///
    /// Returns `SchedulerError::InvalidConfig` if validation fails.
    pub fn new(config: ControllerConfig, spawner: S) -> Result<Self, SchedulerError> {
        config.validate().map_err(SchedulerError::InvalidConfig)?;

        info!(
            max_concurrent = config.max_concurrent,
            max_queue_size = config.max_queue_size,
            priority_levels = config.priority_levels,
            timeout_ms = config.timeout_ms,
            retry_attempts = config.retry_attempts,
            "admission controller created"
        );

        let inner = Inner {
            retry: RetryPolicy::new(config.retry_attempts),
            state: Mutex::new(ControllerState {
                in_flight: HashSet::with_capacity(config.max_concurrent.min(1024)),
                queue: PriorityQueue::with_capacity(config.max_queue_size),
                is_shutdown: false,
            }),
            metrics: Arc::new(MetricsCollector::new()),
            idle: Notify::new(),
            monitor: Mutex::new(None),
            spawner,
            config,
        };
        Ok(Self {
            inner: Arc::new(inner),
        })
    }

    /// Submit a job.
    ///
    /// Starts it immediately if a slot is free, otherwise queues it by
    /// priority. `priority` defaults to the middle tier and is clamped into
    /// `[1, priority_levels]`.
    ///
    /// # Errors
    ///
    /// - `SchedulerError::Shutdown` once shutdown has begun
    /// - `SchedulerError::QueueFull` if every slot is busy and the queue is at capacity
    pub fn execute<F, Fut>(
        &self,
        work: F,
        priority: Option<Priority>,
        metadata: JobMetadata,
    ) -> Result<JobHandle<T>, SchedulerError>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<T>> + Send + 'static,
    {
        self.submit(work_fn(work), priority, metadata)
    }

    /// Submit an already boxed job body.
    ///
    /// # Errors
    ///
    /// Same as [`AdmissionController::execute`].
    pub fn submit(
        &self,
        work: Work<T>,
        priority: Option<Priority>,
        metadata: JobMetadata,
    ) -> Result<JobHandle<T>, SchedulerError> {
        let config = &self.inner.config;
        let priority = priority
            .unwrap_or_else(|| config.default_priority())
            .clamp_to(config.priority_levels);

        let mut state = self.inner.state.lock();
        if state.is_shutdown {
            warn!(label = metadata.label_or_dash(), "job rejected: shutting down");
            return Err(SchedulerError::Shutdown);
        }

        if state.in_flight.len() < config.max_concurrent {
            let (record, handle) = JobRecord::new(work, priority, metadata, now_ms());
            state.in_flight.insert(record.id);
            drop(state);
            debug!(job_id = %record.id, priority = priority.value(), "job admitted immediately");
            self.inner.dispatch(record);
            return Ok(handle);
        }

        let depth = state.queue.len();
        if depth >= config.max_queue_size {
            warn!(
                depth,
                max = config.max_queue_size,
                label = metadata.label_or_dash(),
                "job rejected: queue full"
            );
            return Err(SchedulerError::QueueFull {
                depth,
                max: config.max_queue_size,
            });
        }

        let (record, handle) = JobRecord::new(work, priority, metadata, now_ms());
        debug!(job_id = %record.id, priority = priority.value(), depth, "job queued");
        state.queue.push(record);
        drop(state);

        self.inner.drain();
        Ok(handle)
    }

    /// Run a fixed list of independent jobs, at most `max_concurrent_override`
    /// (default: the controller's `max_concurrent`) submitted at once.
    ///
    /// Every job still passes through the controller's own admission. The
    /// result vector is index-aligned with `jobs`; each slot holds that job's
    /// value or error. Jobs abandoned by a concurrent shutdown keep the batch
    /// pending.
    pub async fn execute_batch(
        &self,
        jobs: Vec<BatchJob<T>>,
        max_concurrent_override: Option<usize>,
    ) -> Vec<Result<T, SchedulerError>> {
        let window = max_concurrent_override
            .unwrap_or(self.inner.config.max_concurrent)
            .max(1);
        let total = jobs.len();
        let mut done: Vec<(usize, Result<T, SchedulerError>)> = Vec::with_capacity(total);
        let mut pending = jobs.into_iter().enumerate();
        let mut running = FuturesUnordered::new();

        debug!(total, window, "batch started");
        loop {
            while running.len() < window {
                let Some((index, job)) = pending.next() else {
                    break;
                };
                match self.submit(job.work, job.priority, job.metadata) {
                    Ok(handle) => running.push(async move { (index, handle.await) }),
                    Err(err) => done.push((index, Err(err))),
                }
            }
            match running.next().await {
                Some(finished) => done.push(finished),
                None => break,
            }
        }

        done.sort_by_key(|(index, _)| *index);
        done.into_iter().map(|(_, outcome)| outcome).collect()
    }

    /// Current metrics.
    #[must_use]
    pub fn metrics(&self) -> MetricsSnapshot {
        self.inner.metrics.snapshot()
    }

    /// Current status.
    #[must_use]
    pub fn status(&self) -> ControllerStatus {
        let state = self.inner.state.lock();
        ControllerStatus {
            active_count: state.in_flight.len(),
            queue_length: state.queue.len(),
            is_shutdown: state.is_shutdown,
            config: self.inner.config.clone(),
        }
    }

    /// Configuration in force.
    #[must_use]
    pub fn config(&self) -> &ControllerConfig {
        &self.inner.config
    }
}

impl<T, S> Inner<T, S>
where
    T: Send + 'static,
    S: Spawn + Send + Sync + 'static,
{
    /// Scheduler loop: move queued jobs into free slots, highest priority
    /// first. Safe to call redundantly; a no-op once shutdown has begun.
    pub(crate) fn drain(self: &Arc<Self>) {
        let ready = {
            let mut state = self.state.lock();
            if state.is_shutdown {
                return;
            }
            let mut ready = Vec::new();
            while state.in_flight.len() < self.config.max_concurrent {
                let Some(record) = state.queue.pop() else {
                    break;
                };
                state.in_flight.insert(record.id);
                ready.push(record);
            }
            ready
        };

        for record in ready {
            debug!(job_id = %record.id, attempt = record.attempt, "dequeued job");
            self.dispatch(record);
        }
    }
}

impl<T, S> Inner<T, S> {
    /// Drop `id` from the in-flight set.
    pub(crate) fn release(&self, id: JobId) {
        let mut state = self.state.lock();
        state.in_flight.remove(&id);
        self.notify_if_idle(&state);
    }

    pub(crate) fn notify_if_idle(&self, state: &ControllerState<T>) {
        if state.in_flight.is_empty() {
            self.idle.notify_waiters();
        }
    }
}

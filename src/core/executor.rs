//! Per-attempt execution and the hand-off back to the scheduler.

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, warn};

use crate::core::controller::Inner;
use crate::core::job::JobRecord;
use crate::core::retry::RetryDecision;
use crate::core::timeout::race_deadline;
use crate::core::SchedulerError;
use crate::util::clock::now_ms;

/// Abstraction for spawning detached tasks on a runtime.
pub trait Spawn {
    /// Spawn a future that runs to completion on its own.
    fn spawn<F>(&self, fut: F)
    where
        F: Future<Output = ()> + Send + 'static;
}

impl<T, S> Inner<T, S>
where
    T: Send + 'static,
    S: Spawn + Send + Sync + 'static,
{
    /// Start one attempt of an admitted record. The caller has already placed
    /// the record's id in the in-flight set.
    pub(crate) fn dispatch(self: &Arc<Self>, record: JobRecord<T>) {
        let inner = Arc::clone(self);
        self.spawner.spawn(async move {
            inner.run_attempt(record).await;
        });
    }

    async fn run_attempt(self: Arc<Self>, record: JobRecord<T>) {
        debug!(
            job_id = %record.id,
            priority = record.priority.value(),
            attempt = record.attempt,
            label = record.metadata.label_or_dash(),
            "executing job"
        );

        let started = Instant::now();
        let outcome =
            race_deadline(&self.spawner, Arc::clone(&record.work), self.config.timeout()).await;
        let elapsed = started.elapsed();

        match outcome {
            Ok(value) => {
                self.metrics.record_success(elapsed);
                debug!(
                    job_id = %record.id,
                    attempt = record.attempt,
                    elapsed_ms = elapsed.as_millis(),
                    since_submit_ms = now_ms().saturating_sub(record.submitted_at_ms),
                    "job succeeded"
                );
                self.release(record.id);
                record.settle(Ok(value));
            }
            Err(err) => {
                self.metrics.record_failure(elapsed);
                self.on_failure(record, err);
            }
        }

        // A slot just freed; reuse it whatever happened above.
        self.drain();
    }

    /// Failed attempt: requeue with a demoted priority or settle terminally.
    /// Leaving the in-flight set and re-entering the queue happen under one lock.
    fn on_failure(&self, mut record: JobRecord<T>, err: SchedulerError) {
        let mut state = self.state.lock();
        state.in_flight.remove(&record.id);

        let decision = if state.is_shutdown {
            RetryDecision::Exhausted
        } else {
            self.retry.decide(record.attempt, record.priority)
        };

        match decision {
            RetryDecision::Requeue { attempt, priority } => {
                warn!(
                    job_id = %record.id,
                    attempt = record.attempt,
                    next_priority = priority.value(),
                    error = %err,
                    "job attempt failed, requeueing"
                );
                record.attempt = attempt;
                record.priority = priority;
                state.queue.push(record);
                self.notify_if_idle(&state);
            }
            RetryDecision::Exhausted => {
                self.notify_if_idle(&state);
                drop(state);
                warn!(
                    job_id = %record.id,
                    attempts = record.attempt + 1,
                    label = record.metadata.label_or_dash(),
                    error = %err,
                    "job failed"
                );
                record.settle(Err(err));
            }
        }
    }
}

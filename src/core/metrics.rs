//! Execution counters and running latency average.

use std::time::Duration;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::core::probe::ResourceSample;
use crate::util::clock::now_ms;

/// Point-in-time view of controller metrics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    /// Finished attempts, successful or not.
    pub total_executed: u64,
    /// Failed attempts, including timeouts.
    pub total_failed: u64,
    /// Running mean of attempt wall time.
    pub average_execution_time_ms: f64,
    /// Last update, milliseconds since epoch. Zero until the first update.
    pub last_updated_ms: u128,
    /// Latest advisory resource sample, if a probe is running.
    pub resources: Option<ResourceSample>,
}

/// Accumulator written by the executor after each attempt.
///
/// The lock only guards the struct against torn reads from `snapshot`; there
/// is a single logical writer per finished attempt.
#[derive(Debug, Default)]
pub struct MetricsCollector {
    inner: Mutex<MetricsSnapshot>,
}

impl MetricsCollector {
    /// Empty collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a successful attempt.
    pub fn record_success(&self, elapsed: Duration) {
        self.record_attempt(elapsed, false);
    }

    /// Record a failed or timed-out attempt.
    pub fn record_failure(&self, elapsed: Duration) {
        self.record_attempt(elapsed, true);
    }

    fn record_attempt(&self, elapsed: Duration, failed: bool) {
        let sample = elapsed.as_secs_f64() * 1000.0;
        let mut m = self.inner.lock();
        m.total_executed += 1;
        if failed {
            m.total_failed += 1;
        }
        #[allow(clippy::cast_precision_loss)]
        let n = m.total_executed as f64;
        m.average_execution_time_ms += (sample - m.average_execution_time_ms) / n;
        m.last_updated_ms = now_ms();
    }

    /// Merge an advisory resource sample.
    pub fn record_resources(&self, sample: ResourceSample) {
        let mut m = self.inner.lock();
        m.resources = Some(sample);
        m.last_updated_ms = now_ms();
    }

    /// Copy of the current values.
    #[must_use]
    pub fn snapshot(&self) -> MetricsSnapshot {
        self.inner.lock().clone()
    }
}

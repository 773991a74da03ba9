//! Graceful shutdown and resource-monitor lifecycle.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::core::controller::{AdmissionController, Inner};
use crate::core::executor::Spawn;
use crate::core::probe::{ResourceMonitor, ResourceProbe};

impl<T, S> AdmissionController<T, S>
where
    T: Send + 'static,
    S: Spawn + Send + Sync + 'static,
{
    /// Stop admitting work, wait up to `drain_timeout` for in-flight jobs,
    /// then discard the queue.
    ///
    /// Discarded jobs are never settled: their handles stay pending. Callers
    /// racing a shutdown should apply their own timeout. In-flight jobs still
    /// running when the drain timeout elapses are not interrupted.
    pub async fn shutdown(&self, drain_timeout: Duration) {
        let (active, queued) = {
            let mut state = self.inner.state.lock();
            state.is_shutdown = true;
            (state.in_flight.len(), state.queue.len())
        };
        info!(active, queued, drain_timeout_ms = drain_timeout.as_millis(), "shutdown started");

        self.stop_resource_monitor();

        if tokio::time::timeout(drain_timeout, self.inner.wait_idle())
            .await
            .is_err()
        {
            let still_running = self.inner.state.lock().in_flight.len();
            warn!(still_running, "drain timeout elapsed, abandoning running jobs");
        }

        let abandoned = self.inner.state.lock().queue.clear();
        if abandoned > 0 {
            warn!(abandoned, "queued jobs discarded without settling");
        }
        info!("shutdown complete");
    }

    /// True once [`AdmissionController::shutdown`] has been called.
    #[must_use]
    pub fn is_shutdown(&self) -> bool {
        self.inner.state.lock().is_shutdown
    }

    /// Sample `probe` every `interval` into the metrics snapshot, replacing any
    /// running monitor. Samples are advisory and never affect admission.
    pub fn start_resource_monitor(&self, probe: Arc<dyn ResourceProbe>, interval: Duration) {
        let monitor = ResourceMonitor::start(
            &self.inner.spawner,
            probe,
            interval,
            Arc::clone(&self.inner.metrics),
            self.inner.config.resource_limits,
        );
        let previous = self.inner.monitor.lock().replace(monitor);
        if let Some(previous) = previous {
            previous.stop();
        }
        info!(interval_ms = interval.as_millis(), "resource monitor started");
    }

    /// Stop the resource monitor, if one is running.
    pub fn stop_resource_monitor(&self) {
        let monitor = self.inner.monitor.lock().take();
        if let Some(monitor) = monitor {
            monitor.stop();
            info!("resource monitor stopped");
        }
    }
}

impl<T, S> Inner<T, S> {
    /// Resolve once the in-flight set is empty.
    pub(crate) async fn wait_idle(&self) {
        loop {
            let notified = self.idle.notified();
            tokio::pin!(notified);
            // Register before checking so a release in between is not missed.
            notified.as_mut().enable();
            let idle = self.state.lock().in_flight.is_empty();
            if idle {
                return;
            }
            notified.await;
        }
    }
}

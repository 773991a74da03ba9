//! Optional resource telemetry.
//!
//! A [`ResourceProbe`] is sampled on an interval by a [`ResourceMonitor`] and
//! the result is merged into the metrics snapshot. Samples are advisory: they
//! are logged against [`ResourceLimits`] but never gate admission. Nothing is
//! sampled unless a monitor is started explicitly, and the monitor stops when
//! it is dropped.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;
use tracing::{debug, warn};

use crate::config::ResourceLimits;
use crate::core::executor::Spawn;
use crate::core::metrics::MetricsCollector;

/// Utilisation figures, in percent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceSample {
    /// CPU utilisation.
    pub cpu_percent: f64,
    /// Memory utilisation.
    pub memory_percent: f64,
    /// Disk utilisation.
    pub disk_percent: f64,
}

impl ResourceSample {
    /// Names of the thresholds this sample exceeds.
    #[must_use]
    pub fn exceeded(&self, limits: &ResourceLimits) -> Vec<&'static str> {
        let mut over = Vec::new();
        if self.cpu_percent > limits.cpu_percent {
            over.push("cpu");
        }
        if self.memory_percent > limits.memory_percent {
            over.push("memory");
        }
        if self.disk_percent > limits.disk_percent {
            over.push("disk");
        }
        over
    }
}

/// Source of resource samples, e.g. a procfs or cgroup reader.
#[async_trait]
pub trait ResourceProbe: Send + Sync + 'static {
    /// Take one sample.
    async fn sample(&self) -> anyhow::Result<ResourceSample>;
}

/// Owned sampling task. Stops on [`ResourceMonitor::stop`] or drop.
#[derive(Debug)]
pub struct ResourceMonitor {
    stop_tx: oneshot::Sender<()>,
}

impl ResourceMonitor {
    pub(crate) fn start<S: Spawn>(
        spawner: &S,
        probe: Arc<dyn ResourceProbe>,
        interval: Duration,
        metrics: Arc<MetricsCollector>,
        limits: Option<ResourceLimits>,
    ) -> Self {
        let (stop_tx, mut stop_rx) = oneshot::channel::<()>();
        spawner.spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    _ = &mut stop_rx => break,
                    _ = ticker.tick() => {}
                }
                match probe.sample().await {
                    Ok(sample) => {
                        if let Some(limits) = &limits {
                            let over = sample.exceeded(limits);
                            if !over.is_empty() {
                                warn!(
                                    exceeded = ?over,
                                    cpu = sample.cpu_percent,
                                    memory = sample.memory_percent,
                                    disk = sample.disk_percent,
                                    "resource limits exceeded (advisory)"
                                );
                            }
                        }
                        metrics.record_resources(sample);
                    }
                    Err(e) => warn!(error = %e, "resource probe failed"),
                }
            }
            debug!("resource monitor stopped");
        });
        Self { stop_tx }
    }

    /// Stop sampling.
    pub fn stop(self) {
        let _ = self.stop_tx.send(());
    }
}

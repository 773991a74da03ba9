//! Race one attempt of a job against a deadline.

use std::time::Duration;

use anyhow::anyhow;
use tokio::sync::oneshot;

use crate::core::executor::Spawn;
use crate::core::job::Work;
use crate::core::SchedulerError;

/// Invoke `work` on its own task and wait at most `limit` for the attempt.
///
/// Both the call and the returned future run on that task, so a panic in
/// either surfaces as a job failure. On timeout the attempt is not cancelled:
/// its task keeps running in the background and its eventual output is
/// discarded. Work that must not leak has to carry its own cancellation.
pub async fn race_deadline<T, S>(
    spawner: &S,
    work: Work<T>,
    limit: Duration,
) -> Result<T, SchedulerError>
where
    T: Send + 'static,
    S: Spawn,
{
    let (tx, rx) = oneshot::channel();
    spawner.spawn(async move {
        let _ = tx.send(work().await);
    });

    match tokio::time::timeout(limit, rx).await {
        Ok(Ok(Ok(value))) => Ok(value),
        Ok(Ok(Err(e))) => Err(SchedulerError::Job(e)),
        Ok(Err(_)) => Err(SchedulerError::Job(anyhow!(
            "job task ended without a result (panicked or runtime shut down)"
        ))),
        Err(_) => Err(SchedulerError::Timeout(limit)),
    }
}

//! Job records, caller-facing handles and batch submissions.

use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;

use crate::core::SchedulerError;
use crate::infra::queue::Prioritized;
use crate::util::types::{JobId, Priority};

/// Future produced by one attempt of a job.
pub type JobFuture<T> = BoxFuture<'static, anyhow::Result<T>>;

/// Zero-argument job body, invoked once per attempt.
pub type Work<T> = Arc<dyn Fn() -> JobFuture<T> + Send + Sync>;

/// Box a closure returning a future into a [`Work`].
pub fn work_fn<T, F, Fut>(f: F) -> Work<T>
where
    T: 'static,
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<T>> + Send + 'static,
{
    Arc::new(move || Box::pin(f()) as JobFuture<T>)
}

/// Caller-supplied context attached to a job; used for logging only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobMetadata {
    /// Human-readable label, e.g. `"build:frontend"`.
    pub label: Option<String>,
    /// Free-form attributes.
    pub attributes: BTreeMap<String, String>,
}

impl JobMetadata {
    /// Metadata carrying only a label.
    #[must_use]
    pub fn labeled(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            attributes: BTreeMap::new(),
        }
    }

    /// Add an attribute.
    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub(crate) fn label_or_dash(&self) -> &str {
        self.label.as_deref().unwrap_or("-")
    }
}

pub(crate) type Settle<T> = oneshot::Sender<Result<T, SchedulerError>>;

/// One admitted unit of work. Lives in exactly one of the in-flight set or
/// the queue until its settle handle is consumed.
pub(crate) struct JobRecord<T> {
    pub id: JobId,
    pub priority: Priority,
    pub attempt: u32,
    pub submitted_at_ms: u128,
    pub metadata: JobMetadata,
    pub work: Work<T>,
    pub settle: Settle<T>,
}

impl<T> JobRecord<T> {
    pub(crate) fn new(
        work: Work<T>,
        priority: Priority,
        metadata: JobMetadata,
        submitted_at_ms: u128,
    ) -> (Self, JobHandle<T>) {
        let (settle, rx) = oneshot::channel();
        let id = JobId::new();
        let record = Self {
            id,
            priority,
            attempt: 0,
            submitted_at_ms,
            metadata,
            work,
            settle,
        };
        (record, JobHandle::new(id, rx))
    }

    /// Terminal transition. Consumes the record.
    pub(crate) fn settle(self, outcome: Result<T, SchedulerError>) {
        // The caller may have dropped its handle; nothing to report then.
        let _ = self.settle.send(outcome);
    }
}

impl<T> Prioritized for JobRecord<T> {
    fn priority(&self) -> Priority {
        self.priority
    }
}

/// Caller-facing future for a submitted job.
///
/// Resolves exactly once, on success or after retries are exhausted. A job
/// abandoned at shutdown never resolves.
#[must_use = "a job handle does nothing unless awaited"]
pub struct JobHandle<T> {
    id: JobId,
    rx: oneshot::Receiver<Result<T, SchedulerError>>,
    abandoned: bool,
}

impl<T> JobHandle<T> {
    const fn new(id: JobId, rx: oneshot::Receiver<Result<T, SchedulerError>>) -> Self {
        Self {
            id,
            rx,
            abandoned: false,
        }
    }

    /// Identifier assigned at submission.
    #[must_use]
    pub const fn id(&self) -> JobId {
        self.id
    }

    /// True once the scheduler has dropped the job without settling it.
    #[must_use]
    pub const fn is_abandoned(&self) -> bool {
        self.abandoned
    }
}

impl<T> Future for JobHandle<T> {
    type Output = Result<T, SchedulerError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        if this.abandoned {
            return Poll::Pending;
        }
        match Pin::new(&mut this.rx).poll(cx) {
            Poll::Ready(Ok(outcome)) => Poll::Ready(outcome),
            Poll::Ready(Err(_)) => {
                // Settle handle dropped unsent: the job was discarded from the queue.
                this.abandoned = true;
                Poll::Pending
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

/// One element of a batch submission.
pub struct BatchJob<T> {
    /// Job body.
    pub work: Work<T>,
    /// Priority; `None` uses the controller default.
    pub priority: Option<Priority>,
    /// Logging context.
    pub metadata: JobMetadata,
}

impl<T> BatchJob<T> {
    /// Batch element with default priority and empty metadata.
    pub fn new<F, Fut>(f: F) -> Self
    where
        T: 'static,
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<T>> + Send + 'static,
    {
        Self {
            work: work_fn(f),
            priority: None,
            metadata: JobMetadata::default(),
        }
    }

    /// Set the priority.
    #[must_use]
    pub fn with_priority(mut self, priority: impl Into<Priority>) -> Self {
        self.priority = Some(priority.into());
        self
    }

    /// Set the metadata.
    #[must_use]
    pub fn with_metadata(mut self, metadata: JobMetadata) -> Self {
        self.metadata = metadata;
        self
    }
}

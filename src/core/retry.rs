//! Retry decisions for failed attempts.

use crate::util::types::Priority;

/// Fate of a job whose attempt just failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Put the job back in the queue with the given attempt count and priority.
    Requeue {
        /// Attempt counter after the increment.
        attempt: u32,
        /// Demoted priority.
        priority: Priority,
    },
    /// Attempts exhausted; settle the caller with the error.
    Exhausted,
}

/// Retry-with-deprioritization policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    retry_attempts: u32,
}

impl RetryPolicy {
    /// Allow `retry_attempts` retries after the first attempt.
    #[must_use]
    pub const fn new(retry_attempts: u32) -> Self {
        Self { retry_attempts }
    }

    /// Decide the fate of a job that failed on `attempt` (0-based) at `priority`.
    #[must_use]
    pub fn decide(&self, attempt: u32, priority: Priority) -> RetryDecision {
        if attempt < self.retry_attempts {
            RetryDecision::Requeue {
                attempt: attempt + 1,
                priority: priority.demoted(),
            }
        } else {
            RetryDecision::Exhausted
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requeue_demotes_priority() {
        let policy = RetryPolicy::new(2);
        assert_eq!(
            policy.decide(0, Priority::new(5)),
            RetryDecision::Requeue {
                attempt: 1,
                priority: Priority::new(4)
            }
        );
    }

    #[test]
    fn test_priority_floor() {
        let policy = RetryPolicy::new(3);
        assert_eq!(
            policy.decide(1, Priority::LOWEST),
            RetryDecision::Requeue {
                attempt: 2,
                priority: Priority::LOWEST
            }
        );
    }

    #[test]
    fn test_exhausted_after_budget() {
        let policy = RetryPolicy::new(2);
        assert!(matches!(policy.decide(1, Priority::new(3)), RetryDecision::Requeue { .. }));
        assert_eq!(policy.decide(2, Priority::new(3)), RetryDecision::Exhausted);
    }

    #[test]
    fn test_zero_retries() {
        assert_eq!(RetryPolicy::new(0).decide(0, Priority::new(9)), RetryDecision::Exhausted);
    }
}

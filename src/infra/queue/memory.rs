//! In-memory priority queue, highest priority first and FIFO within a tier.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::util::types::Priority;

/// Anything the queue can order.
pub trait Prioritized {
    /// Priority at the moment of insertion.
    fn priority(&self) -> Priority;
}

/// Heap entry. `seq` is a monotonically increasing insertion stamp that keeps
/// equal-priority entries in insertion order.
struct Entry<J> {
    priority: Priority,
    seq: u64,
    job: J,
}

impl<J> PartialEq for Entry<J> {
    fn eq(&self, other: &Self) -> bool {
        self.seq == other.seq
    }
}

impl<J> Eq for Entry<J> {}

impl<J> PartialOrd for Entry<J> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<J> Ord for Entry<J> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Higher priority first, then lower seq first (reversed for max-heap)
        self.priority
            .cmp(&other.priority)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Priority queue of pending jobs.
///
/// Capacity is enforced by the admission path, not here: retried jobs were
/// already admitted and must always find a place.
pub struct PriorityQueue<J> {
    heap: BinaryHeap<Entry<J>>,
    next_seq: u64,
}

impl<J: Prioritized> PriorityQueue<J> {
    /// Create an empty queue with room for `capacity` entries.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: BinaryHeap::with_capacity(capacity.min(1024)),
            next_seq: 0,
        }
    }

    /// Insert behind every queued entry of greater or equal priority.
    pub fn push(&mut self, job: J) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Entry {
            priority: job.priority(),
            seq,
            job,
        });
    }

    /// Remove and return the head.
    pub fn pop(&mut self) -> Option<J> {
        self.heap.pop().map(|entry| entry.job)
    }

    /// Priority of the head, if any.
    #[must_use]
    pub fn peek_priority(&self) -> Option<Priority> {
        self.heap.peek().map(|entry| entry.priority)
    }

    /// Discard every entry and return how many were dropped.
    pub fn clear(&mut self) -> usize {
        let dropped = self.heap.len();
        self.heap.clear();
        dropped
    }

    /// Current length.
    #[must_use]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// True when nothing is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

impl<J: Prioritized> Default for PriorityQueue<J> {
    fn default() -> Self {
        Self::with_capacity(0)
    }
}

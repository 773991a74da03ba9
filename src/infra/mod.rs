//! Infrastructure adapters backing the controller state.

pub mod queue;

pub use queue::PriorityQueue;

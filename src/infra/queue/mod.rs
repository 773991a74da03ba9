//! Queue backends.

pub mod memory;

pub use memory::{Prioritized, PriorityQueue};

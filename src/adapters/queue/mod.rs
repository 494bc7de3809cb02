//! Queue transport adapter
//!
//! The worker loop only depends on [`MessageQueue`]. [`InMemoryQueue`] is the
//! local implementation, with the lease, redelivery and dead-letter behaviour
//! of a hosted queue.

pub mod memory;
pub mod traits;

pub use memory::{DeadLetter, InMemoryQueue, MAX_RECEIVES_EXCEEDED};
pub use traits::{MessageQueue, QueueDepth, QueueMessage};

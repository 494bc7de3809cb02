//! Message queue trait definition

use crate::domain::Result;
use async_trait::async_trait;
use std::time::Duration;

/// A leased queue message
///
/// The message stays hidden from other consumers until it is acknowledged,
/// released, rejected, or its visibility timeout expires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueMessage {
    /// Handle for this delivery; a redelivery gets a new receipt
    pub receipt: String,

    /// Raw message body
    pub body: String,

    /// How many times this message has been delivered, including this time
    pub receive_count: u32,
}

/// Message counts by state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueueDepth {
    /// Visible and waiting for a consumer
    pub ready: usize,
    /// Released with a delay that has not elapsed yet
    pub delayed: usize,
    /// Leased to a consumer
    pub in_flight: usize,
    /// Moved to the dead-letter store
    pub dead_lettered: usize,
}

impl QueueDepth {
    /// Messages that may still be delivered
    pub fn pending(&self) -> usize {
        self.ready + self.delayed + self.in_flight
    }
}

/// Queue transport consumed by the worker loop
#[async_trait]
pub trait MessageQueue: Send + Sync {
    /// Enqueues a message body
    async fn send(&self, body: String) -> Result<()>;

    /// Leases the next visible message, if any
    async fn receive(&self) -> Result<Option<QueueMessage>>;

    /// Deletes a leased message after successful processing
    async fn ack(&self, receipt: &str) -> Result<()>;

    /// Makes a leased message visible again after `delay`
    async fn release(&self, receipt: &str, delay: Duration) -> Result<()>;

    /// Moves a leased message to the dead-letter store
    async fn reject(&self, receipt: &str, reason: &str) -> Result<()>;

    /// Current message counts
    async fn depth(&self) -> Result<QueueDepth>;
}

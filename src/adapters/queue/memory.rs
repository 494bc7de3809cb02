//! In-memory queue implementation.

use std::collections::{BinaryHeap, HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::time::Instant;
use uuid::Uuid;

use super::traits::{MessageQueue, QueueDepth, QueueMessage};
use crate::config::{WorkerPoolConfig, MAX_RETRY_DELAY_SECS, MAX_VISIBILITY_TIMEOUT_SECS};
use crate::domain::{Result, WorkerError};

/// Reason recorded when a message exceeds its delivery budget
pub const MAX_RECEIVES_EXCEEDED: &str = "max receive count exceeded";

/// Most recent dead letters kept for inspection; older ones are only counted
pub const DEAD_LETTER_RETENTION: usize = 1000;

type MessageId = u64;

/// Delayed message entry; the heap pops the earliest `visible_at` first.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Delayed {
    visible_at: Instant,
    id: MessageId,
}

impl PartialOrd for Delayed {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Delayed {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        other
            .visible_at
            .cmp(&self.visible_at)
            .then_with(|| other.id.cmp(&self.id))
    }
}

#[derive(Debug)]
struct StoredMessage {
    body: String,
    receive_count: u32,
}

#[derive(Debug)]
struct Lease {
    id: MessageId,
    expires_at: Instant,
}

/// A message that will not be delivered again
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeadLetter {
    pub body: String,
    pub reason: String,
    pub receive_count: u32,
}

#[derive(Debug, Default)]
struct QueueState {
    next_id: MessageId,
    messages: HashMap<MessageId, StoredMessage>,
    ready: VecDeque<MessageId>,
    delayed: BinaryHeap<Delayed>,
    leases: HashMap<String, Lease>,
    dead_letters: VecDeque<DeadLetter>,
    dead_lettered: usize,
}

impl QueueState {
    /// Moves due delayed messages and expired leases back to the ready queue.
    fn promote(&mut self, now: Instant) {
        while let Some(entry) = self.delayed.peek() {
            if entry.visible_at > now {
                break;
            }
            if let Some(entry) = self.delayed.pop() {
                self.ready.push_back(entry.id);
            }
        }

        let expired: Vec<String> = self
            .leases
            .iter()
            .filter(|(_, lease)| lease.expires_at <= now)
            .map(|(receipt, _)| receipt.clone())
            .collect();
        for receipt in expired {
            if let Some(lease) = self.leases.remove(&receipt) {
                tracing::debug!(receipt = %receipt, "Lease expired, message visible again");
                self.ready.push_back(lease.id);
            }
        }
    }

    fn take_lease(&mut self, receipt: &str) -> Result<MessageId> {
        self.leases
            .remove(receipt)
            .map(|lease| lease.id)
            .ok_or_else(|| WorkerError::Queue(format!("Unknown or expired receipt: {receipt}")))
    }

    fn dead_letter(&mut self, id: MessageId, reason: &str) {
        if let Some(message) = self.messages.remove(&id) {
            if self.dead_letters.len() == DEAD_LETTER_RETENTION {
                self.dead_letters.pop_front();
            }
            self.dead_letters.push_back(DeadLetter {
                body: message.body,
                reason: reason.to_string(),
                receive_count: message.receive_count,
            });
            self.dead_lettered += 1;
        }
    }
}

/// In-memory queue with visibility timeouts and dead-lettering
///
/// Stands in for a hosted queue when running locally or in tests. Clones
/// share the same underlying queue. Only the last [`DEAD_LETTER_RETENTION`]
/// dead letters are kept; [`QueueDepth::dead_lettered`] counts all of them.
///
/// Visibility timeouts and redelivery delays are capped at the worker pool
/// limits so deadlines always fit in an [`Instant`].
#[derive(Clone)]
pub struct InMemoryQueue {
    state: Arc<Mutex<QueueState>>,
    visibility_timeout: Duration,
    max_receive_count: u32,
}

impl InMemoryQueue {
    pub fn new(visibility_timeout: Duration, max_receive_count: u32) -> Self {
        Self {
            state: Arc::new(Mutex::new(QueueState::default())),
            visibility_timeout: visibility_timeout
                .min(Duration::from_secs(MAX_VISIBILITY_TIMEOUT_SECS)),
            max_receive_count,
        }
    }

    /// Builds a queue from the worker pool settings
    pub fn from_config(config: &WorkerPoolConfig) -> Self {
        Self::new(
            Duration::from_secs(config.visibility_timeout_secs),
            config.max_receive_count,
        )
    }

    /// Most recent dead letters, oldest first
    pub async fn dead_letters(&self) -> Vec<DeadLetter> {
        self.state.lock().await.dead_letters.iter().cloned().collect()
    }
}

#[async_trait]
impl MessageQueue for InMemoryQueue {
    async fn send(&self, body: String) -> Result<()> {
        let mut state = self.state.lock().await;
        let id = state.next_id;
        state.next_id += 1;
        state.messages.insert(
            id,
            StoredMessage {
                body,
                receive_count: 0,
            },
        );
        state.ready.push_back(id);
        Ok(())
    }

    async fn receive(&self) -> Result<Option<QueueMessage>> {
        let now = Instant::now();
        let mut state = self.state.lock().await;
        state.promote(now);

        while let Some(id) = state.ready.pop_front() {
            let Some(message) = state.messages.get_mut(&id) else {
                continue;
            };
            message.receive_count += 1;
            let receive_count = message.receive_count;
            let body = message.body.clone();

            if receive_count > self.max_receive_count {
                tracing::warn!(
                    receive_count = receive_count,
                    max_receive_count = self.max_receive_count,
                    "Dead-lettering message"
                );
                state.dead_letter(id, MAX_RECEIVES_EXCEEDED);
                continue;
            }

            let receipt = Uuid::new_v4().to_string();
            state.leases.insert(
                receipt.clone(),
                Lease {
                    id,
                    expires_at: now + self.visibility_timeout,
                },
            );

            return Ok(Some(QueueMessage {
                receipt,
                body,
                receive_count,
            }));
        }

        Ok(None)
    }

    async fn ack(&self, receipt: &str) -> Result<()> {
        let mut state = self.state.lock().await;
        let id = state.take_lease(receipt)?;
        state.messages.remove(&id);
        Ok(())
    }

    async fn release(&self, receipt: &str, delay: Duration) -> Result<()> {
        let mut state = self.state.lock().await;
        let id = state.take_lease(receipt)?;
        let delay = delay.min(Duration::from_secs(MAX_RETRY_DELAY_SECS));
        if delay.is_zero() {
            state.ready.push_back(id);
        } else {
            state.delayed.push(Delayed {
                visible_at: Instant::now() + delay,
                id,
            });
        }
        Ok(())
    }

    async fn reject(&self, receipt: &str, reason: &str) -> Result<()> {
        let mut state = self.state.lock().await;
        let id = state.take_lease(receipt)?;
        state.dead_letter(id, reason);
        Ok(())
    }

    async fn depth(&self) -> Result<QueueDepth> {
        let mut state = self.state.lock().await;
        state.promote(Instant::now());
        Ok(QueueDepth {
            ready: state.ready.len(),
            delayed: state.delayed.len(),
            in_flight: state.leases.len(),
            dead_lettered: state.dead_lettered,
        })
    }
}

//! Worker dispatch loop
//!
//! Each worker pulls one message at a time, hands it to its own pipeline and
//! maps the result onto a queue operation:
//!
//! | Result | Queue operation |
//! |---|---|
//! | `Ok` | ack |
//! | `BadRequest` | reject (dead-letter) |
//! | anything else | release after the retry delay |

use crate::adapters::queue::{MessageQueue, QueueMessage};
use crate::config::WorkerPoolConfig;
use crate::core::export::ExportPipeline;
use crate::core::worker::summary::WorkerSummary;
use crate::logging::duration_ms;
use rand::Rng;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;

/// Fraction of the retry delay used as random jitter in each direction
const RETRY_JITTER: f64 = 0.1;

/// Loop settings shared by every worker in a pool
#[derive(Debug, Clone)]
pub struct WorkerSettings {
    /// Number of worker slots
    pub worker_count: usize,
    /// Sleep between polls of an empty queue
    pub poll_interval: Duration,
    /// Base delay before a failed message is redelivered
    pub retry_delay: Duration,
    /// Heartbeat log interval; `None` disables it
    pub heartbeat_interval: Option<Duration>,
    /// Upper bound on waiting for workers to stop
    pub shutdown_timeout: Duration,
    /// Stop once the queue has nothing left to deliver
    pub exit_when_idle: bool,
}

impl WorkerSettings {
    pub fn from_config(config: &WorkerPoolConfig) -> Self {
        Self {
            worker_count: config.worker_count,
            poll_interval: Duration::from_millis(config.poll_interval_ms),
            retry_delay: Duration::from_secs(config.retry_delay_secs),
            heartbeat_interval: (config.heartbeat_interval_secs > 0)
                .then(|| Duration::from_secs(config.heartbeat_interval_secs)),
            shutdown_timeout: Duration::from_secs(config.shutdown_timeout_secs),
            exit_when_idle: false,
        }
    }

    pub fn with_worker_count(mut self, worker_count: usize) -> Self {
        self.worker_count = worker_count;
        self
    }

    pub fn with_exit_when_idle(mut self, exit_when_idle: bool) -> Self {
        self.exit_when_idle = exit_when_idle;
        self
    }
}

impl Default for WorkerSettings {
    fn default() -> Self {
        Self::from_config(&WorkerPoolConfig::default())
    }
}

/// Applies ±10% random jitter so released messages do not come back in lockstep
pub fn jittered(delay: Duration) -> Duration {
    if delay.is_zero() {
        return delay;
    }
    let factor = rand::thread_rng().gen_range((1.0 - RETRY_JITTER)..=(1.0 + RETRY_JITTER));
    delay.mul_f64(factor)
}

/// One worker slot
pub struct Worker {
    id: usize,
    queue: Arc<dyn MessageQueue>,
    pipeline: ExportPipeline,
    settings: WorkerSettings,
}

impl Worker {
    pub fn new(
        id: usize,
        queue: Arc<dyn MessageQueue>,
        pipeline: ExportPipeline,
        settings: WorkerSettings,
    ) -> Self {
        Self {
            id,
            queue,
            pipeline,
            settings,
        }
    }

    /// Runs until shutdown is signalled, or until the queue drains when
    /// `exit_when_idle` is set
    ///
    /// A message already being processed is always finished before the
    /// worker stops.
    pub async fn run(self, mut shutdown_rx: watch::Receiver<bool>) -> WorkerSummary {
        let started = Instant::now();
        let mut summary = WorkerSummary::new(self.id);

        tracing::info!(worker_id = self.id, "Worker started");

        loop {
            if *shutdown_rx.borrow() {
                break;
            }

            let message = match self.queue.receive().await {
                Ok(message) => message,
                Err(e) => {
                    summary.queue_errors += 1;
                    tracing::error!(worker_id = self.id, error = %e, "Failed to receive message");
                    None
                }
            };

            let Some(message) = message else {
                if self.settings.exit_when_idle && self.queue_drained().await {
                    tracing::debug!(worker_id = self.id, "Queue drained, worker exiting");
                    break;
                }

                tokio::select! {
                    changed = shutdown_rx.changed() => {
                        if changed.is_err() {
                            break;
                        }
                    }
                    _ = tokio::time::sleep(self.settings.poll_interval) => {}
                }
                continue;
            };

            summary.received += 1;
            self.handle(message, &mut summary).await;
        }

        let summary = summary.with_duration(started.elapsed());
        summary.log_summary();
        summary
    }

    async fn queue_drained(&self) -> bool {
        match self.queue.depth().await {
            Ok(depth) => depth.pending() == 0,
            Err(_) => false,
        }
    }

    /// Processes one message and settles it with the queue
    pub async fn handle(&self, message: QueueMessage, summary: &mut WorkerSummary) {
        tracing::debug!(
            worker_id = self.id,
            receive_count = message.receive_count,
            "Processing message"
        );

        let settled = match self.pipeline.accept(&message.body).await {
            Ok(outcome) => {
                summary.record_success(&outcome);
                self.queue.ack(&message.receipt).await
            }
            Err(err) => {
                summary.record_failure(&err);
                if err.is_retryable() {
                    let delay = jittered(self.settings.retry_delay);
                    tracing::warn!(
                        worker_id = self.id,
                        kind = err.kind(),
                        error = %err,
                        receive_count = message.receive_count,
                        retry_in_ms = duration_ms(delay),
                        "Export failed, message released for redelivery"
                    );
                    self.queue.release(&message.receipt, delay).await
                } else {
                    tracing::error!(
                        worker_id = self.id,
                        kind = err.kind(),
                        error = %err,
                        "Rejecting malformed message"
                    );
                    self.queue.reject(&message.receipt, &err.to_string()).await
                }
            }
        };

        if let Err(e) = settled {
            summary.queue_errors += 1;
            tracing::error!(worker_id = self.id, error = %e, "Failed to settle message");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jitter_bounds() {
        let base = Duration::from_secs(30);
        for _ in 0..100 {
            let delay = jittered(base);
            assert!(delay >= Duration::from_secs(27));
            assert!(delay <= Duration::from_secs(33));
        }
        assert_eq!(jittered(Duration::ZERO), Duration::ZERO);
    }

    #[test]
    fn test_settings_from_config() {
        let mut config = WorkerPoolConfig::default();
        config.heartbeat_interval_secs = 0;
        let settings = WorkerSettings::from_config(&config).with_worker_count(5);

        assert_eq!(settings.worker_count, 5);
        assert_eq!(settings.poll_interval, Duration::from_millis(1000));
        assert!(settings.heartbeat_interval.is_none());
        assert!(!settings.exit_when_idle);
    }
}

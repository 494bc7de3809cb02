//! Worker summary and reporting
//!
//! Per-worker counters, logged when the worker stops.

use crate::core::export::ProcessOutcome;
use crate::domain::ProcessError;
use std::time::Duration;

/// Counters for one worker slot
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkerSummary {
    /// Worker slot index
    pub worker_id: usize,

    /// Messages received from the queue
    pub received: usize,

    /// Requests that wrote to at least one destination
    pub exported: usize,

    /// Requests skipped because export is disabled or nothing is configured
    pub skipped: usize,

    /// Messages dead-lettered as bad requests
    pub rejected: usize,

    /// Messages released for redelivery
    pub released: usize,

    /// Appends that reported a row count other than 1
    pub anomalies: usize,

    /// Queue operations that failed
    pub queue_errors: usize,

    /// Time the worker ran for
    pub duration: Duration,
}

impl WorkerSummary {
    /// Create a new empty summary for a worker slot
    pub fn new(worker_id: usize) -> Self {
        Self {
            worker_id,
            ..Self::default()
        }
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Record a successful request
    pub fn record_success(&mut self, outcome: &ProcessOutcome) {
        match outcome {
            ProcessOutcome::ExportDisabled
            | ProcessOutcome::Exported {
                destinations: 0, ..
            } => self.skipped += 1,
            ProcessOutcome::Exported { anomalies, .. } => {
                self.exported += 1;
                self.anomalies += anomalies;
            }
        }
    }

    /// Record a failed request
    pub fn record_failure(&mut self, error: &ProcessError) {
        if error.is_retryable() {
            self.released += 1;
        } else {
            self.rejected += 1;
        }
    }

    /// Requests that completed without error
    pub fn succeeded(&self) -> usize {
        self.exported + self.skipped
    }

    /// Combine counters from several workers
    pub fn merge(&mut self, other: &WorkerSummary) {
        self.received += other.received;
        self.exported += other.exported;
        self.skipped += other.skipped;
        self.rejected += other.rejected;
        self.released += other.released;
        self.anomalies += other.anomalies;
        self.queue_errors += other.queue_errors;
        self.duration = self.duration.max(other.duration);
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            worker_id = self.worker_id,
            received = self.received,
            exported = self.exported,
            skipped = self.skipped,
            rejected = self.rejected,
            released = self.released,
            anomalies = self.anomalies,
            duration_secs = self.duration.as_secs(),
            "Worker stopped"
        );

        if self.queue_errors > 0 {
            tracing::warn!(
                worker_id = self.worker_id,
                queue_errors = self.queue_errors,
                "Worker stopped with queue errors"
            );
        }
    }
}

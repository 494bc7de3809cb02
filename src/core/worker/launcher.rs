//! Worker pool launcher

use super::dispatch::{Worker, WorkerSettings};
use super::heartbeat::run_heartbeat;
use super::summary::WorkerSummary;
use crate::adapters::queue::MessageQueue;
use crate::core::export::ExportPipeline;
use crate::domain::{Result, WorkerError};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::{JoinError, JoinHandle};

/// Running worker pool
///
/// - one tokio task per worker slot, each with its own pipeline clone
/// - an optional heartbeat task
/// - a shared `watch` channel used to stop them
pub struct WorkerPool {
    shutdown_tx: watch::Sender<bool>,
    workers: Vec<JoinHandle<WorkerSummary>>,
    heartbeat: Option<JoinHandle<()>>,
    shutdown_timeout: Duration,
}

impl WorkerPool {
    /// Spawns `settings.worker_count` workers against a shared queue
    pub fn launch(
        queue: Arc<dyn MessageQueue>,
        pipeline: ExportPipeline,
        settings: WorkerSettings,
    ) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let mut workers = Vec::with_capacity(settings.worker_count);
        for worker_id in 0..settings.worker_count {
            let worker = Worker::new(
                worker_id,
                Arc::clone(&queue),
                pipeline.clone(),
                settings.clone(),
            );
            workers.push(tokio::spawn(worker.run(shutdown_rx.clone())));
        }

        let heartbeat = settings
            .heartbeat_interval
            .map(|interval| tokio::spawn(run_heartbeat(Arc::clone(&queue), interval, shutdown_rx)));

        tracing::info!(
            worker_count = settings.worker_count,
            heartbeat = settings.heartbeat_interval.is_some(),
            "Worker pool launched"
        );

        Self {
            shutdown_tx,
            workers,
            heartbeat,
            shutdown_timeout: settings.shutdown_timeout,
        }
    }

    /// Number of worker tasks
    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Asks every worker to stop after its current message
    pub fn request_shutdown(&self) {
        // Receivers may already be gone
        let _ = self.shutdown_tx.send(true);
    }

    /// Runs until every worker exits on its own or `signal` resolves
    ///
    /// After the signal, workers get `shutdown_timeout` to finish their
    /// current message.
    ///
    /// # Errors
    ///
    /// Returns an error if the workers do not stop within the shutdown timeout.
    pub async fn run_until<F>(self, signal: F) -> Result<Vec<WorkerSummary>>
    where
        F: Future<Output = ()>,
    {
        let WorkerPool {
            shutdown_tx,
            workers,
            heartbeat,
            shutdown_timeout,
        } = self;

        let mut all_workers = Box::pin(futures::future::join_all(workers));

        let results = tokio::select! {
            results = &mut all_workers => Some(results),
            _ = signal => None,
        };

        let results = match results {
            Some(results) => results,
            None => {
                tracing::info!(
                    timeout_secs = shutdown_timeout.as_secs(),
                    "Shutdown requested, waiting for workers to finish"
                );
                let _ = shutdown_tx.send(true);
                match tokio::time::timeout(shutdown_timeout, &mut all_workers).await {
                    Ok(results) => results,
                    Err(_) => {
                        tracing::error!(
                            timeout_secs = shutdown_timeout.as_secs(),
                            "Workers did not stop in time; in-flight messages will be redelivered"
                        );
                        return Err(WorkerError::Other(format!(
                            "Workers did not stop within {} seconds",
                            shutdown_timeout.as_secs()
                        )));
                    }
                }
            }
        };

        let _ = shutdown_tx.send(true);
        if let Some(heartbeat) = heartbeat {
            let _ = heartbeat.await;
        }

        Ok(collect_summaries(results))
    }

    /// Signals shutdown and waits for the workers, bounded by the shutdown timeout
    pub async fn shutdown_and_join(self) -> Result<Vec<WorkerSummary>> {
        self.run_until(std::future::ready(())).await
    }
}

fn collect_summaries(results: Vec<std::result::Result<WorkerSummary, JoinError>>) -> Vec<WorkerSummary> {
    results
        .into_iter()
        .filter_map(|result| match result {
            Ok(summary) => Some(summary),
            Err(e) => {
                tracing::error!(error = %e, "Worker task panicked");
                None
            }
        })
        .collect()
}

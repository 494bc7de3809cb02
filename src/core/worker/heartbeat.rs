//! Periodic liveness log for the worker pool

use crate::adapters::queue::MessageQueue;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// Logs queue depth every `interval` until shutdown
pub async fn run_heartbeat(
    queue: Arc<dyn MessageQueue>,
    interval: Duration,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    let mut ticker = tokio::time::interval(interval);
    // The first tick completes immediately
    ticker.tick().await;

    loop {
        tokio::select! {
            changed = shutdown_rx.changed() => {
                if changed.is_err() || *shutdown_rx.borrow() {
                    break;
                }
            }
            _ = ticker.tick() => {
                match queue.depth().await {
                    Ok(depth) => tracing::info!(
                        ready = depth.ready,
                        delayed = depth.delayed,
                        in_flight = depth.in_flight,
                        dead_lettered = depth.dead_lettered,
                        "Worker pool heartbeat"
                    ),
                    Err(e) => tracing::warn!(error = %e, "Worker pool heartbeat: queue depth unavailable"),
                }
            }
        }
    }

    tracing::debug!("Heartbeat stopped");
}

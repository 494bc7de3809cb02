//! Run command implementation
//!
//! Starts the worker pool against an in-process queue, optionally seeded
//! from a JSON-lines file of export requests.

use crate::adapters::queue::{InMemoryQueue, MessageQueue};
use crate::config::load_config;
use crate::core::export::ExportPipeline;
use crate::core::worker::{WorkerPool, WorkerSettings, WorkerSummary};
use anyhow::Context;
use clap::Args;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::watch;

/// Arguments for the run command
#[derive(Args, Debug)]
pub struct RunArgs {
    /// JSON-lines file of export requests to enqueue at startup ("-" for stdin)
    #[arg(short, long)]
    pub input: Option<String>,

    /// Number of workers (overrides config file)
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Exit once the queue has drained instead of waiting for new messages
    #[arg(long)]
    pub exit_when_idle: bool,
}

impl RunArgs {
    /// Execute the run command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Starting export workers");

        let config = match load_config(config_path) {
            Ok(config) => config,
            Err(e) => {
                println!("❌ Failed to load configuration: {e}");
                return Ok(2);
            }
        };

        let mut settings = WorkerSettings::from_config(&config.worker)
            .with_exit_when_idle(self.exit_when_idle);
        if let Some(workers) = self.workers {
            if !(1..=64).contains(&workers) {
                println!("❌ --workers must be between 1 and 64, got {workers}");
                return Ok(2);
            }
            settings = settings.with_worker_count(workers);
        }

        let pipeline = ExportPipeline::from_config(&config)
            .context("Failed to build export pipeline")?;
        let queue = Arc::new(InMemoryQueue::from_config(&config.worker));

        if let Some(input) = &self.input {
            let seeded = seed_queue(queue.as_ref(), input)
                .await
                .with_context(|| format!("Failed to enqueue requests from {input}"))?;
            println!("📥 Enqueued {seeded} export requests from {input}");
        }

        println!(
            "🚀 Running {} workers against {}",
            settings.worker_count, config.warehouse.base_url
        );

        let pool = WorkerPool::launch(queue.clone(), pipeline, settings);
        let summaries = pool.run_until(wait_for_shutdown(shutdown_signal)).await?;

        let total = merge_summaries(&summaries);
        let dead_lettered = queue.depth().await.map(|d| d.dead_lettered).unwrap_or(0);
        print_summary(&total, dead_lettered);

        Ok(0)
    }
}

/// Enqueues every non-blank line of `input`
async fn seed_queue(queue: &dyn MessageQueue, input: &str) -> anyhow::Result<usize> {
    if input == "-" {
        enqueue_lines(queue, BufReader::new(tokio::io::stdin())).await
    } else {
        let file = tokio::fs::File::open(input).await?;
        enqueue_lines(queue, BufReader::new(file)).await
    }
}

async fn enqueue_lines<R>(queue: &dyn MessageQueue, reader: R) -> anyhow::Result<usize>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut count = 0;
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        queue.send(line.to_string()).await?;
        count += 1;
    }
    Ok(count)
}

/// Resolves once the shutdown flag is set
async fn wait_for_shutdown(mut shutdown_signal: watch::Receiver<bool>) {
    while !*shutdown_signal.borrow() {
        if shutdown_signal.changed().await.is_err() {
            // Sender gone: nothing can ask us to stop any more
            std::future::pending::<()>().await;
        }
    }
}

fn merge_summaries(summaries: &[WorkerSummary]) -> WorkerSummary {
    let mut total = WorkerSummary::new(0);
    for summary in summaries {
        total.merge(summary);
    }
    total
}

fn print_summary(total: &WorkerSummary, dead_letters: usize) {
    println!();
    println!("📊 Worker Summary");
    println!("   Received:  {}", total.received);
    println!("   Exported:  {}", total.exported);
    println!("   Skipped:   {}", total.skipped);
    println!("   Rejected:  {}", total.rejected);
    println!("   Released:  {}", total.released);
    if total.anomalies > 0 {
        println!("   ⚠️  Row count anomalies: {}", total.anomalies);
    }
    if dead_letters > 0 {
        println!("   ⚠️  Dead-lettered messages: {dead_letters}");
    }
    println!("   Duration:  {:.1}s", total.duration.as_secs_f64());
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_enqueue_lines_skips_blank_lines() {
        let queue = InMemoryQueue::new(Duration::from_secs(30), 3);
        let input = "{\"applicationId\":\"a\"}\n\n   \n{\"applicationId\":\"b\"}\n";

        let count = enqueue_lines(&queue, BufReader::new(input.as_bytes()))
            .await
            .unwrap();

        assert_eq!(count, 2);
        assert_eq!(queue.depth().await.unwrap().ready, 2);
    }

    #[tokio::test]
    async fn test_seed_queue_missing_file() {
        let queue = InMemoryQueue::new(Duration::from_secs(30), 3);
        assert!(seed_queue(&queue, "/nonexistent/events.jsonl").await.is_err());
    }

    #[tokio::test]
    async fn test_wait_for_shutdown_resolves_on_signal() {
        let (tx, rx) = watch::channel(false);
        let waiter = tokio::spawn(wait_for_shutdown(rx));
        tx.send(true).unwrap();
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("shutdown wait did not resolve")
            .unwrap();
    }

    #[test]
    fn test_merge_summaries() {
        let mut first = WorkerSummary::new(0);
        first.received = 2;
        first.exported = 2;
        let mut second = WorkerSummary::new(1);
        second.received = 1;
        second.rejected = 1;

        let total = merge_summaries(&[first, second]);
        assert_eq!(total.received, 3);
        assert_eq!(total.exported, 2);
        assert_eq!(total.rejected, 1);
    }
}

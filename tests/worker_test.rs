//! Integration tests for worker dispatch against the in-memory queue
//!
//! These tests verify that:
//! - Successful requests are acknowledged
//! - Malformed requests are dead-lettered and never retried
//! - Failed requests are released for redelivery
//! - The pool drains the queue and shuts down cleanly

mod common;

use common::*;
use pvexport::adapters::queue::{InMemoryQueue, MessageQueue, MAX_RECEIVES_EXCEEDED};
use pvexport::core::export::ExportPipeline;
use pvexport::core::worker::{Worker, WorkerPool, WorkerSettings, WorkerSummary};
use std::sync::Arc;
use std::time::Duration;

fn settings() -> WorkerSettings {
    let mut settings = WorkerSettings::default()
        .with_worker_count(2)
        .with_exit_when_idle(true);
    settings.poll_interval = Duration::from_millis(10);
    settings.retry_delay = Duration::ZERO;
    settings.heartbeat_interval = None;
    settings.shutdown_timeout = Duration::from_secs(5);
    settings
}

fn pipeline(writable: bool) -> ExportPipeline {
    let log = Arc::new(CallLog::default());
    let metadata = FakeMetadata::new(
        log.clone(),
        app_config(Some(true), Some("T_APP")),
        record(1, &[("A", "extA")]),
    )
    .with_study(study_config("A", Some(true), Some("T_A")));
    let tables = if writable {
        FakeTables::new(log.clone())
    } else {
        FakeTables::new(log.clone()).read_only()
    };
    Harness::new(log, metadata, tables).pipeline
}

fn total(summaries: &[WorkerSummary]) -> WorkerSummary {
    let mut total = WorkerSummary::new(0);
    for summary in summaries {
        total.merge(summary);
    }
    total
}

#[tokio::test]
async fn test_successful_request_is_acknowledged() {
    let queue = Arc::new(InMemoryQueue::new(Duration::from_secs(30), 3));
    queue.send(event(1)).await.unwrap();
    let worker = Worker::new(0, queue.clone(), pipeline(true), settings());

    let message = queue.receive().await.unwrap().unwrap();
    let mut summary = WorkerSummary::new(0);
    worker.handle(message, &mut summary).await;

    assert_eq!(summary.exported, 1);
    assert_eq!(summary.queue_errors, 0);
    let depth = queue.depth().await.unwrap();
    assert_eq!(depth.pending(), 0);
    assert_eq!(depth.dead_lettered, 0);
}

#[tokio::test]
async fn test_malformed_request_is_rejected() {
    let queue = Arc::new(InMemoryQueue::new(Duration::from_secs(30), 3));
    queue.send("{\"applicationId\":\"api\"}".to_string()).await.unwrap();
    let worker = Worker::new(0, queue.clone(), pipeline(true), settings());

    let message = queue.receive().await.unwrap().unwrap();
    let mut summary = WorkerSummary::new(0);
    worker.handle(message, &mut summary).await;

    assert_eq!(summary.rejected, 1);
    assert!(queue.receive().await.unwrap().is_none());
    let dead_letters = queue.dead_letters().await;
    assert_eq!(dead_letters.len(), 1);
    assert!(dead_letters[0].reason.starts_with("Bad request"));
    assert_eq!(dead_letters[0].receive_count, 1);
}

#[tokio::test]
async fn test_failed_request_is_released_for_redelivery() {
    let queue = Arc::new(InMemoryQueue::new(Duration::from_secs(30), 3));
    queue.send(event(1)).await.unwrap();
    let worker = Worker::new(0, queue.clone(), pipeline(false), settings());

    let message = queue.receive().await.unwrap().unwrap();
    let mut summary = WorkerSummary::new(0);
    worker.handle(message, &mut summary).await;

    assert_eq!(summary.released, 1);
    let redelivered = queue.receive().await.unwrap().unwrap();
    assert_eq!(redelivered.body, event(1));
    assert_eq!(redelivered.receive_count, 2);
    assert!(queue.dead_letters().await.is_empty());
}

#[tokio::test]
async fn test_pool_drains_queue_and_exits() {
    let queue = Arc::new(InMemoryQueue::new(Duration::from_secs(30), 3));
    for version in 1..=3 {
        queue.send(event(version)).await.unwrap();
    }
    queue.send("not json".to_string()).await.unwrap();

    let pool = WorkerPool::launch(queue.clone(), pipeline(true), settings());
    assert_eq!(pool.worker_count(), 2);

    let summaries = tokio::time::timeout(
        Duration::from_secs(5),
        pool.run_until(std::future::pending::<()>()),
    )
    .await
    .expect("pool did not drain")
    .unwrap();

    let total = total(&summaries);
    assert_eq!(summaries.len(), 2);
    assert_eq!(total.received, 4);
    assert_eq!(total.exported, 3);
    assert_eq!(total.rejected, 1);
    assert_eq!(queue.dead_letters().await.len(), 1);
}

#[tokio::test]
async fn test_repeatedly_failing_request_is_dead_lettered() {
    let queue = Arc::new(InMemoryQueue::new(Duration::from_secs(30), 2));
    queue.send(event(1)).await.unwrap();

    let pool = WorkerPool::launch(queue.clone(), pipeline(false), settings());
    let summaries = tokio::time::timeout(
        Duration::from_secs(5),
        pool.run_until(std::future::pending::<()>()),
    )
    .await
    .expect("pool did not drain")
    .unwrap();

    assert_eq!(total(&summaries).released, 2);
    let dead_letters = queue.dead_letters().await;
    assert_eq!(dead_letters.len(), 1);
    assert_eq!(dead_letters[0].reason, MAX_RECEIVES_EXCEEDED);
}

#[tokio::test]
async fn test_idle_pool_stops_on_shutdown() {
    let queue = Arc::new(InMemoryQueue::new(Duration::from_secs(30), 3));
    let pool = WorkerPool::launch(
        queue,
        pipeline(true),
        settings().with_exit_when_idle(false),
    );

    tokio::time::sleep(Duration::from_millis(30)).await;
    let summaries = pool.shutdown_and_join().await.unwrap();

    assert_eq!(summaries.len(), 2);
    assert_eq!(total(&summaries).received, 0);
}

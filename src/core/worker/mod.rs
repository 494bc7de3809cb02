//! Worker dispatch
//!
//! Runs export pipelines against a shared queue. Each worker slot is a tokio
//! task with its own [`ExportPipeline`](crate::core::export::ExportPipeline)
//! clone; workers share nothing but the queue handle. Retry is entirely the
//! queue's job: failed messages are released and redelivered later.

pub mod dispatch;
pub mod heartbeat;
pub mod launcher;
pub mod summary;

pub use dispatch::{jittered, Worker, WorkerSettings};
pub use launcher::WorkerPool;
pub use summary::WorkerSummary;

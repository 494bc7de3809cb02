//! Core business logic for pvexport.
//!
//! # Modules
//!
//! - [`export`] - Destination resolution, row export and the request pipeline
//! - [`worker`] - Worker loop, pool launcher and heartbeat
//!
//! # Export Workflow
//!
//! For each queue message:
//!
//! 1. **Decode**: parse the event into an `ExportRequest`; malformed events are rejected
//! 2. **Liveness check**: fail as retryable if the table service is not writable
//! 3. **Fetch**: app config, participant version, then every membership study
//! 4. **Resolve**: compute the destination tables
//! 5. **Export**: append one row per destination
//! 6. **Settle**: ack, reject or release the message
//!
//! # Example
//!
//! ```rust,no_run
//! use pvexport::adapters::metadata::RestMetadataClient;
//! use pvexport::adapters::queue::InMemoryQueue;
//! use pvexport::adapters::rows::RecordRowBuilder;
//! use pvexport::adapters::warehouse::RestTableClient;
//! use pvexport::config::load_config;
//! use pvexport::core::export::ExportPipeline;
//! use pvexport::core::worker::{WorkerPool, WorkerSettings};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("pvexport.toml")?;
//!
//! let pipeline = ExportPipeline::new(
//!     Arc::new(RestMetadataClient::new(&config.metadata)?),
//!     Arc::new(RecordRowBuilder::new()),
//!     Arc::new(RestTableClient::new(&config.warehouse)?),
//! );
//! let queue = Arc::new(InMemoryQueue::from_config(&config.worker));
//!
//! let pool = WorkerPool::launch(queue, pipeline, WorkerSettings::from_config(&config.worker));
//! let summaries = pool
//!     .run_until(async {
//!         let _ = tokio::signal::ctrl_c().await;
//!     })
//!     .await?;
//! println!("Workers stopped: {}", summaries.len());
//! # Ok(())
//! # }
//! ```

pub mod export;
pub mod worker;

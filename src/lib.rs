// pvexport - Participant Version Export Worker
// Copyright (c) 2025 pvexport Contributors
// Licensed under the MIT License

//! # pvexport - Participant Version Export Worker
//!
//! pvexport consumes participant version export requests from a queue and
//! appends one row per request to every configured destination table.
//!
//! ## Overview
//!
//! For each request the worker:
//! - **Checks** that the table service accepts writes, failing as retryable if not
//! - **Fetches** the app's export settings, the participant version and every
//!   study the participant belongs to
//! - **Resolves** destinations: the app-level table plus each configured study table
//! - **Appends** one row per destination, logging row-count anomalies
//!
//! An app that is not export-enabled turns every request into a no-op.
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Export pipeline and worker pool
//! - [`adapters`] - Metadata service, table service, row builder and queue
//! - [`domain`] - Identifiers, requests, records and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pvexport::config::load_config;
//! use pvexport::core::export::ExportPipeline;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("pvexport.toml")?;
//!     let pipeline = ExportPipeline::from_config(&config)?;
//!
//!     let body = r#"{"applicationId":"api","subjectHealthCode":"hc","recordVersion":3}"#;
//!     let outcome = pipeline.accept(body).await?;
//!
//!     println!("{outcome:?}");
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Collaborator failures use [`domain::WorkerError`]. The pipeline classifies
//! them with [`domain::ProcessError`], which tells the queue whether to
//! redeliver:
//!
//! ```rust
//! use pvexport::domain::{ProcessError, WorkerError};
//!
//! let bad = ProcessError::BadRequest("missing recordVersion".to_string());
//! assert!(!bad.is_retryable());
//!
//! let failed: ProcessError = WorkerError::Other("timeout".to_string()).into();
//! assert!(failed.is_retryable());
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;

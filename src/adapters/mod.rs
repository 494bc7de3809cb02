//! External system integrations for pvexport.
//!
//! This module provides adapters for the collaborators of the export pipeline:
//!
//! - [`metadata`] - Application, study and participant version lookups
//! - [`warehouse`] - Table service liveness check and row appends
//! - [`rows`] - Mapping participant versions onto table rows
//! - [`queue`] - Queue transport consumed by the worker loop
//!
//! # Design Pattern
//!
//! Adapters follow the **Adapter Pattern** to isolate external dependencies and
//! enable testing with fake implementations. Each adapter exposes a trait that
//! the pipeline receives through its constructor.
//!
//! ```rust,no_run
//! use pvexport::adapters::metadata::RestMetadataClient;
//! use pvexport::adapters::warehouse::RestTableClient;
//! use pvexport::config::ServiceConfig;
//!
//! # fn example() -> pvexport::domain::Result<()> {
//! let metadata = RestMetadataClient::new(&ServiceConfig::new("https://metadata.example.org"))?;
//! let tables = RestTableClient::new(&ServiceConfig::new("https://warehouse.example.org"))?;
//! # Ok(())
//! # }
//! ```

pub(crate) mod http;
pub mod metadata;
pub mod queue;
pub mod rows;
pub mod warehouse;

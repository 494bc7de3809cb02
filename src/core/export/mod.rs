//! Participant version export
//!
//! This module provides the core export logic for pvexport:
//! - Destination resolution
//! - Single-row export with row count checking
//! - The per-request pipeline and its failure classification

pub mod executor;
pub mod pipeline;
pub mod resolver;

pub use executor::{ExportOutcome, RowExporter};
pub use pipeline::{ExportPipeline, ProcessOutcome, RequestTimer, Stage};
pub use resolver::resolve_destinations;

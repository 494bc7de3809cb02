//! Metadata service adapter
//!
//! Fetches application and study export configuration and versioned
//! participant records.

pub mod client;
pub mod models;
pub mod traits;

pub use client::RestMetadataClient;
pub use models::{ExportConfigurationResponse, ExportOwnerResponse};
pub use traits::MetadataService;

//! Domain models and types for pvexport.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`AppId`], [`StudyId`], [`HealthCode`], [`TableId`])
//! - **Request and snapshot models** ([`ExportRequest`], [`VersionedRecord`])
//! - **Export configuration** ([`AppConfig`], [`StudyConfig`], [`ExportSettings`])
//! - **Destinations and rows** ([`Destination`], [`TableRow`])
//! - **Error types** ([`WorkerError`], [`MetadataError`], [`WarehouseError`], [`ProcessError`])
//! - **Result type alias** ([`Result`])
//!
//! # Type Safety
//!
//! Identifiers use the newtype pattern so an app id can never be passed where
//! a study id is expected:
//!
//! ```rust
//! use pvexport::domain::{AppId, StudyId};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let app_id = AppId::new("api")?;
//! let study_id = StudyId::new("studyA")?;
//!
//! // let wrong: AppId = study_id;  // Compile error!
//! # Ok(())
//! # }
//! ```

pub mod destination;
pub mod errors;
pub mod ids;
pub mod record;
pub mod request;
pub mod result;
pub mod row;
pub mod settings;

// Re-export commonly used types for convenience
pub use destination::Destination;
pub use errors::{MetadataError, ProcessError, WarehouseError, WorkerError};
pub use ids::{AppId, HealthCode, StudyId, TableId};
pub use record::VersionedRecord;
pub use request::ExportRequest;
pub use result::Result;
pub use row::TableRow;
pub use settings::{AppConfig, ExportSettings, StudyConfig};

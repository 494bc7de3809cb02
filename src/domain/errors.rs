//! Domain error types
//!
//! This module defines the error hierarchy for pvexport. Adapter errors never
//! expose third-party types; HTTP and parse failures are converted to strings
//! at the adapter boundary.

use thiserror::Error;

/// Main pvexport error type
///
/// This is the primary error type used throughout the crate. Collaborator
/// failures are wrapped here and propagated unmodified through the export
/// pipeline.
#[derive(Debug, Error)]
pub enum WorkerError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Metadata service errors
    #[error("Metadata service error: {0}")]
    Metadata(#[from] MetadataError),

    /// Warehouse table service errors
    #[error("Warehouse error: {0}")]
    Warehouse(#[from] WarehouseError),

    /// Row construction errors
    #[error("Row build error: {0}")]
    RowBuild(String),

    /// Queue transport errors
    #[error("Queue error: {0}")]
    Queue(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Metadata service errors
///
/// Errors that occur when fetching application, study or record metadata.
#[derive(Debug, Error)]
pub enum MetadataError {
    /// Failed to reach the metadata service
    #[error("Failed to connect to metadata service: {0}")]
    ConnectionFailed(String),

    /// Requested entity does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid response body
    #[error("Invalid response from metadata service: {0}")]
    InvalidResponse(String),

    /// Server error (5xx)
    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    /// Client error (4xx other than 404)
    #[error("Client error: {status} - {message}")]
    ClientError { status: u16, message: String },
}

/// Warehouse table service errors
#[derive(Debug, Error)]
pub enum WarehouseError {
    /// Failed to reach the table service
    #[error("Failed to connect to table service: {0}")]
    ConnectionFailed(String),

    /// Destination table does not exist
    #[error("Table not found: {0}")]
    TableNotFound(String),

    /// Append rejected by the service
    #[error("Append to table {table_id} failed: {message}")]
    AppendFailed { table_id: String, message: String },

    /// Invalid response body
    #[error("Invalid response from table service: {0}")]
    InvalidResponse(String),

    /// Server error (5xx)
    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },
}

/// Outcome classification of a failed export request
///
/// The worker loop maps these onto queue operations: a `BadRequest` is
/// dead-lettered, everything else is released for redelivery.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// The inbound event could not be decoded into a well-formed request
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// A transient condition; the queue should redeliver the event
    #[error("Retryable: {0}")]
    Retryable(String),

    /// Any other collaborator failure, passed through unmodified
    #[error(transparent)]
    Propagated(#[from] WorkerError),
}

impl ProcessError {
    /// Whether the queue should redeliver the event
    ///
    /// Unclassified failures are retried rather than dropped.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, ProcessError::BadRequest(_))
    }

    /// Short label used in structured logs
    pub fn kind(&self) -> &'static str {
        match self {
            ProcessError::BadRequest(_) => "bad_request",
            ProcessError::Retryable(_) => "retryable",
            ProcessError::Propagated(_) => "unclassified",
        }
    }
}

impl From<MetadataError> for ProcessError {
    fn from(err: MetadataError) -> Self {
        ProcessError::Propagated(err.into())
    }
}

impl From<WarehouseError> for ProcessError {
    fn from(err: WarehouseError) -> Self {
        ProcessError::Propagated(err.into())
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for WorkerError {
    fn from(err: std::io::Error) -> Self {
        WorkerError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for WorkerError {
    fn from(err: serde_json::Error) -> Self {
        WorkerError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for WorkerError {
    fn from(err: toml::de::Error) -> Self {
        WorkerError::Configuration(format!("TOML parse error: {err}"))
    }
}

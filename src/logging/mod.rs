//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - JSON-formatted logs
//! - Configurable log levels
//! - Local file logging with rotation
//!
//! # Example
//!
//! ```no_run
//! use pvexport::logging::init_logging;
//! use pvexport::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! // Use tracing macros for logging
//! tracing::info!("Worker started");
//! tracing::error!(error = "Something went wrong", "Error occurred");
//! ```

pub mod structured;

// Re-export commonly used items
pub use structured::{init_logging, LoggingGuard};

use std::time::Duration;

/// Whole milliseconds in `duration`, saturating at `u64::MAX`
pub fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Log the end of a request, with its identity and elapsed time
///
/// Emitted once per request whatever the outcome.
///
/// # Example
///
/// ```no_run
/// use pvexport::log_request_complete;
/// use std::time::Duration;
///
/// log_request_complete!("api", "health-code", 3, Duration::from_millis(120));
/// ```
#[macro_export]
macro_rules! log_request_complete {
    ($app_id:expr, $health_code:expr, $record_version:expr, $elapsed:expr) => {
        tracing::info!(
            app_id = %$app_id,
            health_code = %$health_code,
            record_version = $record_version,
            elapsed_ms = $crate::logging::duration_ms($elapsed),
            "Participant version export request took {} ms",
            $crate::logging::duration_ms($elapsed)
        );
    };
}

/// Log a row append that did not report exactly one row
///
/// # Example
///
/// ```no_run
/// use pvexport::log_row_count_anomaly;
///
/// log_row_count_anomaly!("syn-table", "api", "health-code", 3, 0usize);
/// ```
#[macro_export]
macro_rules! log_row_count_anomaly {
    ($table_id:expr, $app_id:expr, $health_code:expr, $record_version:expr, $row_count:expr) => {
        tracing::error!(
            table_id = %$table_id,
            app_id = %$app_id,
            health_code = %$health_code,
            record_version = $record_version,
            row_count = $row_count,
            "Expected to write 1 participant version row, instead wrote {}",
            $row_count
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use pvexport::log_error_with_context;
/// use pvexport::domain::WorkerError;
///
/// let error = WorkerError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}

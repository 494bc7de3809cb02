//! Result type alias for pvexport

use super::errors::WorkerError;

/// Result type alias for pvexport operations
///
/// # Examples
///
/// ```
/// use pvexport::domain::result::Result;
/// use pvexport::domain::errors::WorkerError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(WorkerError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, WorkerError>;

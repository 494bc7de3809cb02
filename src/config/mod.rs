//! Configuration management for pvexport.
//!
//! This module provides TOML-based configuration loading, parsing, and validation.
//!
//! # Overview
//!
//! pvexport uses TOML configuration files with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `PVEXPORT_<SECTION>_<KEY>` environment overrides
//! - Default values for optional settings
//! - Validation on load
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use pvexport::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("pvexport.toml")?;
//!
//! println!("Metadata service: {}", config.metadata.base_url);
//! println!("Workers: {}", config.worker.worker_count);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Application settings (log level)
//! - [`ServiceConfig`] - Metadata and warehouse service connections
//! - [`WorkerPoolConfig`] - Worker pool and queue settings
//! - [`LoggingConfig`] - Logging configuration
//!
//! # Example Configuration
//!
//! ```toml
//! environment = "production"
//!
//! [application]
//! log_level = "info"
//!
//! [metadata]
//! base_url = "https://metadata.example.org"
//! api_token = "${PVEXPORT_METADATA_TOKEN}"
//!
//! [warehouse]
//! base_url = "https://warehouse.example.org"
//! api_token = "${PVEXPORT_WAREHOUSE_TOKEN}"
//!
//! [worker]
//! worker_count = 4
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::{load_config, load_config_str};
pub use schema::{
    ApplicationConfig, Environment, LoggingConfig, ServiceConfig, WorkerConfig, WorkerPoolConfig,
    MAX_RETRY_DELAY_SECS, MAX_VISIBILITY_TIMEOUT_SECS,
};
pub use secret::{secret_string, SecretString, SecretValue};

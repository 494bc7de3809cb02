//! Configuration schema types
//!
//! This module defines the configuration structure for pvexport.

use crate::config::SecretString;
use serde::{Deserialize, Serialize};

/// Runtime environment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Development environment
    #[default]
    Development,
    /// Staging environment
    Staging,
    /// Production environment
    Production,
}

/// Main pvexport configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Runtime environment (development, staging, production)
    #[serde(default)]
    pub environment: Environment,

    /// Metadata service (apps, studies, participant versions)
    pub metadata: ServiceConfig,

    /// Warehouse table service
    pub warehouse: ServiceConfig,

    /// Worker pool settings
    #[serde(default)]
    pub worker: WorkerPoolConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl WorkerConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.metadata.validate("metadata", &self.environment)?;
        self.warehouse.validate("warehouse", &self.environment)?;
        self.worker.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Connection settings for a remote REST service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Base URL of the service
    pub base_url: String,

    /// Bearer token (optional)
    /// Stored securely in memory and automatically zeroized on drop
    #[serde(default)]
    pub api_token: Option<SecretString>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// TLS certificate verification enabled
    ///
    /// Cannot be disabled in production.
    #[serde(default = "default_true")]
    pub tls_verify: bool,
}

impl ServiceConfig {
    /// Creates settings for a base URL with all defaults
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_token: None,
            timeout_seconds: default_timeout_seconds(),
            tls_verify: true,
        }
    }

    fn validate(&self, section: &str, environment: &Environment) -> Result<(), String> {
        use secrecy::ExposeSecret;

        if self.base_url.is_empty() {
            return Err(format!("{section}.base_url cannot be empty"));
        }

        let url = url::Url::parse(&self.base_url)
            .map_err(|e| format!("{section}.base_url is not a valid URL: {e}"))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(format!(
                "{section}.base_url must start with http:// or https://"
            ));
        }

        if self.timeout_seconds == 0 || self.timeout_seconds > 600 {
            return Err(format!(
                "{section}.timeout_seconds must be between 1 and 600, got {}",
                self.timeout_seconds
            ));
        }

        if *environment == Environment::Production {
            if url.scheme() != "https" {
                return Err(format!(
                    "{section}.base_url must use https:// in production environments"
                ));
            }
            if !self.tls_verify {
                return Err(format!(
                    "{section}.tls_verify cannot be disabled in production environments"
                ));
            }
            let token_missing = self
                .api_token
                .as_ref()
                .map(|t| t.expose_secret().is_empty())
                .unwrap_or(true);
            if token_missing {
                return Err(format!(
                    "{section}.api_token is required in production environments"
                ));
            }
        }

        Ok(())
    }
}

/// Longest a received message may stay hidden (12 hours)
pub const MAX_VISIBILITY_TIMEOUT_SECS: u64 = 43_200;

/// Longest redelivery delay after a retryable failure (15 minutes)
pub const MAX_RETRY_DELAY_SECS: u64 = 900;

/// Worker pool configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerPoolConfig {
    /// Number of concurrent worker slots
    #[serde(default = "default_worker_count")]
    pub worker_count: usize,

    /// Idle sleep between polls of an empty queue
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// How long a received message stays hidden before it is redelivered
    #[serde(default = "default_visibility_timeout_secs")]
    pub visibility_timeout_secs: u64,

    /// Delay before a failed message becomes visible again
    #[serde(default = "default_retry_delay_secs")]
    pub retry_delay_secs: u64,

    /// Deliveries after which a message is dead-lettered
    #[serde(default = "default_max_receive_count")]
    pub max_receive_count: u32,

    /// Heartbeat log interval (0 disables the heartbeat)
    #[serde(default = "default_heartbeat_interval_secs")]
    pub heartbeat_interval_secs: u64,

    /// Graceful shutdown timeout in seconds
    /// Maximum time to wait for in-flight requests before workers are abandoned.
    #[serde(default = "default_shutdown_timeout_secs")]
    pub shutdown_timeout_secs: u64,
}

impl WorkerPoolConfig {
    fn validate(&self) -> Result<(), String> {
        if self.worker_count == 0 || self.worker_count > 64 {
            return Err(format!(
                "worker.worker_count must be between 1 and 64, got {}",
                self.worker_count
            ));
        }

        if self.poll_interval_ms == 0 {
            return Err("worker.poll_interval_ms must be > 0".to_string());
        }

        if self.visibility_timeout_secs == 0
            || self.visibility_timeout_secs > MAX_VISIBILITY_TIMEOUT_SECS
        {
            return Err(format!(
                "worker.visibility_timeout_secs must be between 1 and {MAX_VISIBILITY_TIMEOUT_SECS}, got {}",
                self.visibility_timeout_secs
            ));
        }

        if self.retry_delay_secs > MAX_RETRY_DELAY_SECS {
            return Err(format!(
                "worker.retry_delay_secs must be at most {MAX_RETRY_DELAY_SECS}, got {}",
                self.retry_delay_secs
            ));
        }

        if self.max_receive_count == 0 {
            return Err("worker.max_receive_count must be > 0".to_string());
        }

        Ok(())
    }
}

impl Default for WorkerPoolConfig {
    fn default() -> Self {
        Self {
            worker_count: default_worker_count(),
            poll_interval_ms: default_poll_interval_ms(),
            visibility_timeout_secs: default_visibility_timeout_secs(),
            retry_delay_secs: default_retry_delay_secs(),
            max_receive_count: default_max_receive_count(),
            heartbeat_interval_secs: default_heartbeat_interval_secs(),
            shutdown_timeout_secs: default_shutdown_timeout_secs(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local file logging
    #[serde(default = "default_true")]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy (daily or hourly)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    /// Console-only logging, used by one-shot CLI commands
    pub fn console_only() -> Self {
        Self {
            local_enabled: false,
            ..Self::default()
        }
    }

    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.is_empty() {
            return Err("logging.local_path cannot be empty when local_enabled".to_string());
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: true,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_timeout_seconds() -> u64 {
    60
}

fn default_worker_count() -> usize {
    2
}

fn default_poll_interval_ms() -> u64 {
    1000
}

fn default_visibility_timeout_secs() -> u64 {
    300
}

fn default_retry_delay_secs() -> u64 {
    30
}

fn default_max_receive_count() -> u32 {
    10
}

fn default_heartbeat_interval_secs() -> u64 {
    60
}

fn default_shutdown_timeout_secs() -> u64 {
    30
}

fn default_local_path() -> String {
    "/var/log/pvexport".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::secret_string;
    use test_case::test_case;

    fn service(base_url: &str) -> ServiceConfig {
        ServiceConfig::new(base_url)
    }

    #[test]
    fn test_application_config_validation() {
        let mut config = ApplicationConfig::default();
        assert!(config.validate().is_ok());

        config.log_level = "invalid".to_string();
        assert!(config.validate().is_err());
    }

    #[test_case("https://metadata.example.org", true ; "https")]
    #[test_case("http://localhost:8080", true ; "http")]
    #[test_case("", false ; "empty")]
    #[test_case("ftp://metadata.example.org", false ; "wrong scheme")]
    #[test_case("not a url", false ; "unparseable")]
    fn test_service_base_url(base_url: &str, valid: bool) {
        let result = service(base_url).validate("metadata", &Environment::Development);
        assert_eq!(result.is_ok(), valid, "{result:?}");
    }

    #[test]
    fn test_service_timeout_bounds() {
        let mut config = service("https://metadata.example.org");
        config.timeout_seconds = 0;
        assert!(config
            .validate("metadata", &Environment::Development)
            .is_err());

        config.timeout_seconds = 601;
        assert!(config
            .validate("metadata", &Environment::Development)
            .is_err());
    }

    #[test]
    fn test_production_requires_https_and_token() {
        let mut config = service("http://warehouse.example.org");
        let err = config
            .validate("warehouse", &Environment::Production)
            .unwrap_err();
        assert!(err.contains("https"));

        config.base_url = "https://warehouse.example.org".to_string();
        let err = config
            .validate("warehouse", &Environment::Production)
            .unwrap_err();
        assert!(err.contains("warehouse.api_token is required"));

        config.api_token = Some(secret_string("token".to_string()));
        assert!(config.validate("warehouse", &Environment::Production).is_ok());

        config.tls_verify = false;
        assert!(config.validate("warehouse", &Environment::Production).is_err());
        assert!(config.validate("warehouse", &Environment::Staging).is_ok());
    }

    #[test]
    fn test_worker_pool_validation() {
        let mut config = WorkerPoolConfig::default();
        assert!(config.validate().is_ok());

        config.worker_count = 0;
        assert!(config.validate().is_err());

        config.worker_count = 65;
        assert!(config.validate().is_err());

        config.worker_count = 4;
        config.max_receive_count = 0;
        assert!(config.validate().is_err());
    }

    #[test_case(0, 30, false ; "zero visibility timeout")]
    #[test_case(43_200, 30, true ; "visibility timeout at limit")]
    #[test_case(43_201, 30, false ; "visibility timeout over limit")]
    #[test_case(i64::MAX as u64, 30, false ; "visibility timeout overflowing instant")]
    #[test_case(300, 0, true ; "immediate retry")]
    #[test_case(300, 900, true ; "retry delay at limit")]
    #[test_case(300, 901, false ; "retry delay over limit")]
    #[test_case(300, u64::MAX, false ; "retry delay overflowing instant")]
    fn test_worker_pool_duration_bounds(
        visibility_timeout_secs: u64,
        retry_delay_secs: u64,
        valid: bool,
    ) {
        let config = WorkerPoolConfig {
            visibility_timeout_secs,
            retry_delay_secs,
            ..WorkerPoolConfig::default()
        };
        let result = config.validate();
        assert_eq!(result.is_ok(), valid, "{result:?}");
    }

    #[test]
    fn test_logging_config_default() {
        let config = LoggingConfig::default();
        assert!(config.local_enabled);
        assert_eq!(config.local_path, "/var/log/pvexport");
        assert_eq!(config.local_rotation, "daily");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_logging_rotation_validation() {
        let mut config = LoggingConfig::console_only();
        assert!(!config.local_enabled);

        config.local_rotation = "weekly".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_default_values() {
        let worker = WorkerPoolConfig::default();
        assert_eq!(worker.worker_count, 2);
        assert_eq!(worker.poll_interval_ms, 1000);
        assert_eq!(worker.visibility_timeout_secs, 300);
        assert_eq!(worker.retry_delay_secs, 30);
        assert_eq!(worker.max_receive_count, 10);
        assert_eq!(default_log_level(), "info");
        assert_eq!(default_timeout_seconds(), 60);
    }
}

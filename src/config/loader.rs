//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::{Environment, WorkerConfig};
use super::secret::secret_string;
use crate::domain::errors::WorkerError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Prefix for environment variable overrides
pub const ENV_PREFIX: &str = "PVEXPORT";

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into WorkerConfig
/// 4. Applies environment variable overrides (PVEXPORT_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - Environment variable substitution fails
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use pvexport::config::loader::load_config;
///
/// let config = load_config("pvexport.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<WorkerConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(WorkerError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        WorkerError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    load_config_str(&contents)
}

/// Loads configuration from TOML text
///
/// Runs the same substitution, override and validation steps as
/// [`load_config`].
pub fn load_config_str(contents: &str) -> Result<WorkerConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: WorkerConfig = toml::from_str(&contents)
        .map_err(|e| WorkerError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        WorkerError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched.
///
/// # Errors
///
/// Returns an error listing every referenced environment variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| WorkerError::Configuration(format!("Invalid substitution pattern: {e}")))?;
    let mut lines = Vec::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            lines.push(line.to_string());
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        lines.push(processed_line);
    }

    if !missing_vars.is_empty() {
        return Err(WorkerError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(lines.join("\n"))
}

fn env_override(section: &str, key: &str) -> Option<String> {
    std::env::var(format!("{ENV_PREFIX}_{section}_{key}")).ok()
}

fn parse_override<T: std::str::FromStr>(section: &str, key: &str) -> Result<Option<T>> {
    match env_override(section, key) {
        Some(raw) => raw.trim().parse().map(Some).map_err(|_| {
            WorkerError::Configuration(format!(
                "Invalid value '{raw}' for {ENV_PREFIX}_{section}_{key}"
            ))
        }),
        None => Ok(None),
    }
}

/// Applies environment variable overrides using PVEXPORT_* prefix
///
/// Environment variables follow the pattern: PVEXPORT_<SECTION>_<KEY>
/// For example: PVEXPORT_METADATA_BASE_URL, PVEXPORT_WORKER_WORKER_COUNT
fn apply_env_overrides(config: &mut WorkerConfig) -> Result<()> {
    if let Ok(val) = std::env::var(format!("{ENV_PREFIX}_ENVIRONMENT")) {
        config.environment = match val.to_lowercase().as_str() {
            "development" => Environment::Development,
            "staging" => Environment::Staging,
            "production" => Environment::Production,
            other => {
                return Err(WorkerError::Configuration(format!(
                    "Invalid value '{other}' for {ENV_PREFIX}_ENVIRONMENT"
                )))
            }
        };
    }

    if let Some(val) = env_override("APPLICATION", "LOG_LEVEL") {
        config.application.log_level = val;
    }

    for (section, service) in [
        ("METADATA", &mut config.metadata),
        ("WAREHOUSE", &mut config.warehouse),
    ] {
        if let Some(val) = env_override(section, "BASE_URL") {
            service.base_url = val;
        }
        if let Some(val) = env_override(section, "API_TOKEN") {
            service.api_token = Some(secret_string(val));
        }
        if let Some(val) = parse_override(section, "TIMEOUT_SECONDS")? {
            service.timeout_seconds = val;
        }
        if let Some(val) = parse_override(section, "TLS_VERIFY")? {
            service.tls_verify = val;
        }
    }

    let worker = &mut config.worker;
    if let Some(val) = parse_override("WORKER", "WORKER_COUNT")? {
        worker.worker_count = val;
    }
    if let Some(val) = parse_override("WORKER", "POLL_INTERVAL_MS")? {
        worker.poll_interval_ms = val;
    }
    if let Some(val) = parse_override("WORKER", "VISIBILITY_TIMEOUT_SECS")? {
        worker.visibility_timeout_secs = val;
    }
    if let Some(val) = parse_override("WORKER", "RETRY_DELAY_SECS")? {
        worker.retry_delay_secs = val;
    }
    if let Some(val) = parse_override("WORKER", "MAX_RECEIVE_COUNT")? {
        worker.max_receive_count = val;
    }
    if let Some(val) = parse_override("WORKER", "HEARTBEAT_INTERVAL_SECS")? {
        worker.heartbeat_interval_secs = val;
    }
    if let Some(val) = parse_override("WORKER", "SHUTDOWN_TIMEOUT_SECS")? {
        worker.shutdown_timeout_secs = val;
    }

    if let Some(val) = parse_override("LOGGING", "LOCAL_ENABLED")? {
        config.logging.local_enabled = val;
    }
    if let Some(val) = env_override("LOGGING", "LOCAL_PATH") {
        config.logging.local_path = val;
    }
    if let Some(val) = env_override("LOGGING", "LOCAL_ROTATION") {
        config.logging.local_rotation = val;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const MINIMAL: &str = r#"
[metadata]
base_url = "https://metadata.example.org"

[warehouse]
base_url = "https://warehouse.example.org"
"#;

    #[test]
    fn test_substitute_env_vars() {
        std::env::set_var("PVX_LOADER_TEST_VAR", "test_value");
        let input = "api_token = \"${PVX_LOADER_TEST_VAR}\"";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, "api_token = \"test_value\"");
        std::env::remove_var("PVX_LOADER_TEST_VAR");
    }

    #[test]
    fn test_substitute_env_vars_missing() {
        std::env::remove_var("PVX_LOADER_MISSING_VAR");
        let input = "api_token = \"${PVX_LOADER_MISSING_VAR}\"";
        let err = substitute_env_vars(input).unwrap_err();
        assert!(err.to_string().contains("PVX_LOADER_MISSING_VAR"));
    }

    #[test]
    fn test_substitute_skips_comments() {
        std::env::remove_var("PVX_LOADER_COMMENTED_VAR");
        let input = "# api_token = \"${PVX_LOADER_COMMENTED_VAR}\"\nkey = 1";
        let result = substitute_env_vars(input).unwrap();
        assert!(result.contains("${PVX_LOADER_COMMENTED_VAR}"));
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("nonexistent.toml");
        assert!(matches!(result, Err(WorkerError::Configuration(_))));
    }

    #[test]
    fn test_load_config_minimal_uses_defaults() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(MINIMAL.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.metadata.base_url, "https://metadata.example.org");
        assert_eq!(config.worker.worker_count, 2);
        assert_eq!(config.environment, Environment::Development);
        assert!(config.metadata.api_token.is_none());
    }

    #[test]
    fn test_load_config_full() {
        std::env::set_var("PVX_LOADER_WAREHOUSE_TOKEN", "wh-secret");
        let toml_content = r#"
environment = "staging"

[application]
log_level = "debug"

[metadata]
base_url = "https://metadata.example.org"
api_token = "md-secret"
timeout_seconds = 15

[warehouse]
base_url = "https://warehouse.example.org"
api_token = "${PVX_LOADER_WAREHOUSE_TOKEN}"

[worker]
worker_count = 8
retry_delay_secs = 5

[logging]
local_enabled = false
local_rotation = "hourly"
"#;

        let config = load_config_str(toml_content).unwrap();
        std::env::remove_var("PVX_LOADER_WAREHOUSE_TOKEN");

        assert_eq!(config.environment, Environment::Staging);
        assert_eq!(config.application.log_level, "debug");
        assert_eq!(config.metadata.timeout_seconds, 15);
        assert_eq!(
            config.warehouse.api_token.as_ref().unwrap().expose_secret(),
            "wh-secret"
        );
        assert_eq!(config.worker.worker_count, 8);
        assert_eq!(config.worker.retry_delay_secs, 5);
        assert!(!config.logging.local_enabled);
    }

    #[test]
    fn test_load_config_invalid_toml() {
        let result = load_config_str("[metadata\nbase_url = ");
        let err = result.unwrap_err();
        assert!(err.to_string().contains("Failed to parse TOML"));
    }

    #[test]
    fn test_load_config_validation_failure() {
        let toml_content = format!("{MINIMAL}\n[worker]\nworker_count = 0\n");
        let err = load_config_str(&toml_content).unwrap_err();
        assert!(err.to_string().contains("worker_count"));
    }
}

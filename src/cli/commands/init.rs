//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "pvexport.toml")]
    pub output: String,

    /// Include example values and comments
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing pvexport configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2); // Configuration error exit code
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your service URLs", self.output);
                println!("  2. Create a .env file with your credentials:");
                println!("     - Set PVEXPORT_METADATA_TOKEN");
                println!("     - Set PVEXPORT_WAREHOUSE_TOKEN");
                println!("  3. Validate configuration: pvexport validate-config");
                println!("  4. Start the workers: pvexport run --input events.jsonl");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {}", e);
                Ok(5) // Fatal error exit code
            }
        }
    }

    /// Generate minimal configuration
    fn generate_minimal_config() -> String {
        r#"# pvexport Configuration File
# Participant Version Export Worker

environment = "development"

[application]
log_level = "info"

[metadata]
base_url = "https://bridge.example.org"
api_token = "${PVEXPORT_METADATA_TOKEN}"
timeout_seconds = 30

[warehouse]
base_url = "https://tables.example.org"
api_token = "${PVEXPORT_WAREHOUSE_TOKEN}"
timeout_seconds = 60

[worker]
worker_count = 2
poll_interval_ms = 1000
visibility_timeout_secs = 300
retry_delay_secs = 30
max_receive_count = 10

[logging]
local_enabled = true
local_path = "/var/log/pvexport"
local_rotation = "daily"
"#
        .to_string()
    }

    /// Generate configuration with examples and comments
    fn generate_config_with_examples() -> String {
        r#"# pvexport Configuration File
# Participant Version Export Worker
#
# Every key below can be overridden with an environment variable named
# PVEXPORT_<SECTION>_<KEY>, e.g. PVEXPORT_WORKER_WORKER_COUNT=4.
# Values may reference environment variables with ${VAR_NAME}.

# ============================================================================
# Environment
# ============================================================================
# development | staging | production
# Production requires https, TLS verification and API tokens for both services.
environment = "development"

# ============================================================================
# Application Settings
# ============================================================================
[application]
# Log level (trace, debug, info, warn, error)
log_level = "info"

# ============================================================================
# Metadata Service
# ============================================================================
# Serves app and study export settings plus participant versions.
[metadata]
base_url = "https://bridge.example.org"

# Bearer token (use environment variable)
api_token = "${PVEXPORT_METADATA_TOKEN}"

# Request timeout in seconds (1-600)
timeout_seconds = 30

# TLS certificate verification
tls_verify = true

# ============================================================================
# Table Service
# ============================================================================
# Receives one appended row per destination table.
[warehouse]
base_url = "https://tables.example.org"
api_token = "${PVEXPORT_WAREHOUSE_TOKEN}"
timeout_seconds = 60
tls_verify = true

# ============================================================================
# Worker Pool
# ============================================================================
[worker]
# Concurrent workers (1-64)
worker_count = 2

# Wait between polls of an empty queue
poll_interval_ms = 1000

# How long a received message stays hidden before redelivery
visibility_timeout_secs = 300

# Delay before a failed request is redelivered (jittered by 10%)
retry_delay_secs = 30

# Deliveries before a message is dead-lettered
max_receive_count = 10

# Queue depth heartbeat; 0 disables it
heartbeat_interval_secs = 60

# Grace period for in-flight requests on shutdown
shutdown_timeout_secs = 30

# ============================================================================
# Logging Configuration
# ============================================================================
[logging]
# Enable local file logging (JSON lines)
local_enabled = true

# Local log directory
local_path = "/var/log/pvexport"

# Log rotation (daily or hourly)
local_rotation = "daily"
"#
        .to_string()
    }
}

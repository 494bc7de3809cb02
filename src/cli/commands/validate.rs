//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the pvexport configuration file.

use crate::config::{load_config, ServiceConfig};
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    ///
    /// Loading already validates, so a config that loads is valid.
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                println!();
                return Ok(2); // Configuration error exit code
            }
        };

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Environment: {:?}", config.environment);
        println!("  Log Level: {}", config.application.log_level);
        print_service("Metadata Service", &config.metadata);
        print_service("Table Service", &config.warehouse);
        println!("  Workers: {}", config.worker.worker_count);
        println!("  Poll Interval: {}ms", config.worker.poll_interval_ms);
        println!(
            "  Visibility Timeout: {}s",
            config.worker.visibility_timeout_secs
        );
        println!("  Retry Delay: {}s", config.worker.retry_delay_secs);
        println!("  Max Receive Count: {}", config.worker.max_receive_count);
        if config.logging.local_enabled {
            println!(
                "  File Logging: {} ({})",
                config.logging.local_path, config.logging.local_rotation
            );
        } else {
            println!("  File Logging: disabled");
        }
        println!();
        Ok(0)
    }
}

fn print_service(label: &str, service: &ServiceConfig) {
    println!("  {label}: {}", service.base_url);
    println!("    API Token: {}", token_status(service));
    println!("    Timeout: {}s", service.timeout_seconds);
    if !service.tls_verify {
        println!("    ⚠️  TLS verification disabled");
    }
}

fn token_status(service: &ServiceConfig) -> &'static str {
    if service.api_token.is_some() {
        "set (redacted)"
    } else {
        "not set"
    }
}

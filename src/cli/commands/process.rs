//! Process command implementation
//!
//! Runs one export request through the pipeline without a queue. Useful for
//! replaying a single participant version by hand.

use crate::config::load_config;
use crate::core::export::{ExportPipeline, ProcessOutcome};
use crate::domain::ProcessError;
use anyhow::Context;
use clap::Args;
use tokio::io::AsyncReadExt;

/// Exit code for a request that may succeed if retried later
pub const EXIT_RETRYABLE: i32 = 3;

/// Arguments for the process command
#[derive(Args, Debug)]
pub struct ProcessArgs {
    /// Export request JSON ("-" reads it from stdin)
    pub event: String,
}

impl ProcessArgs {
    /// Execute the process command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let config = match load_config(config_path) {
            Ok(config) => config,
            Err(e) => {
                println!("❌ Failed to load configuration: {e}");
                return Ok(2);
            }
        };

        let body = self.read_event().await?;
        let pipeline = ExportPipeline::from_config(&config)
            .context("Failed to build export pipeline")?;

        Ok(report(pipeline.accept(&body).await))
    }

    async fn read_event(&self) -> anyhow::Result<String> {
        if self.event != "-" {
            return Ok(self.event.clone());
        }
        let mut body = String::new();
        tokio::io::stdin()
            .read_to_string(&mut body)
            .await
            .context("Failed to read export request from stdin")?;
        Ok(body)
    }
}

/// Prints the outcome and maps it to an exit code
fn report(result: Result<ProcessOutcome, ProcessError>) -> i32 {
    match result {
        Ok(ProcessOutcome::ExportDisabled) => {
            println!("⏭️  Export is not enabled for this app, nothing written");
            0
        }
        Ok(ProcessOutcome::Exported {
            destinations,
            anomalies,
        }) => {
            println!("✅ Exported to {destinations} destination table(s)");
            if anomalies > 0 {
                println!("   ⚠️  {anomalies} append(s) reported an unexpected row count");
            }
            0
        }
        Err(e @ ProcessError::BadRequest(_)) => {
            println!("❌ Invalid export request: {e}");
            2
        }
        Err(e) => {
            println!("❌ Export failed: {e}");
            println!("   The request can be retried");
            EXIT_RETRYABLE
        }
    }
}

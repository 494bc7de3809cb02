//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for pvexport using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// pvexport - Participant Version Export Worker
#[derive(Parser, Debug)]
#[command(name = "pvexport")]
#[command(version, about, long_about = None)]
#[command(author = "pvexport Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "pvexport.toml", env = "PVEXPORT_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "PVEXPORT_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the worker pool against the export request queue
    Run(commands::run::RunArgs),

    /// Process a single export request and exit
    Process(commands::process::ProcessArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

impl Commands {
    /// Whether the command runs long enough to warrant file logging
    pub fn is_long_running(&self) -> bool {
        matches!(self, Commands::Run(_))
    }
}

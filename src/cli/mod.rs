//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for PiiScope using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// PiiScope - PII detection and compliance policy evaluation
#[derive(Parser, Debug)]
#[command(name = "piiscope")]
#[command(version, about, long_about = None)]
#[command(author = "PiiScope Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "piiscope.toml", env = "PIISCOPE_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "PIISCOPE_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan files (or stdin) for PII
    Scan(commands::scan::ScanArgs),

    /// Count PII spans per type
    Count(commands::count::CountArgs),

    /// Evaluate a policy decision for a PII type and operation
    Evaluate(commands::evaluate::EvaluateArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the PiiScope configuration file.

use super::{EXIT_CONFIG_ERROR, EXIT_SUCCESS};
use crate::config::load_config;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // Loading runs substitution, overrides and validation
        let config = match load_config(config_path) {
            Ok(c) => {
                println!("✅ Configuration file loaded successfully");
                c
            }
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(EXIT_CONFIG_ERROR);
            }
        };

        let registry = match config.detection.build_registry() {
            Ok(r) => r,
            Err(e) => {
                println!("❌ Pattern library could not be loaded");
                println!("   Error: {e}");
                return Ok(EXIT_CONFIG_ERROR);
            }
        };

        let engine = match config.policy.build_engine() {
            Ok(engine) => engine,
            Err(e) => {
                println!("❌ Policy configuration is invalid");
                println!("   Error: {e}");
                return Ok(EXIT_CONFIG_ERROR);
            }
        };

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Output Format: {}", config.application.output_format);
        println!("  NLP Enabled: {}", config.detection.enable_nlp);
        println!(
            "  Confidence Threshold: {}",
            config.detection.confidence_threshold
        );
        println!("  Max Text Length: {}", config.detection.max_text_length);
        println!("  Strict Detection: {}", config.detection.strict_mode);
        println!("  Patterns: {}", registry.len());
        println!("  Policy Preset: {}", config.policy.preset);
        println!("  Policy Strict Mode: {}", engine.is_strict());
        println!("  Policy Rules: {}", engine.get_rules().len());
        println!("  Rule Overrides: {}", config.policy.rules.len());
        println!();
        Ok(EXIT_SUCCESS)
    }
}

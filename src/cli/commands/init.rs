//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use super::{EXIT_CONFIG_ERROR, EXIT_FATAL, EXIT_SUCCESS};
use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "piiscope.toml")]
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
    pub fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing PiiScope configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(EXIT_CONFIG_ERROR);
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
                println!("  1. Edit {} with your settings", self.output);
                println!("  2. Pick a policy preset: strict, permissive, gdpr, hipaa or ccpa");
                println!("  3. Validate configuration: piiscope validate-config");
                println!("  4. Scan some text: piiscope scan notes.txt --report");
                println!();
                Ok(EXIT_SUCCESS)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {}", e);
                Ok(EXIT_FATAL)
            }
        }
    }

    /// Generate minimal configuration
    fn generate_minimal_config() -> String {
        r#"# PiiScope Configuration File

[application]
log_level = "info"
output_format = "json"

[detection]
enable_nlp = true
confidence_threshold = 0.7
max_text_length = 50000
strict_mode = false

[policy]
preset = "strict"

[logging]
local_enabled = false
local_path = "./logs"
local_rotation = "daily"
"#
        .to_string()
    }

    /// Generate configuration with examples and comments
    fn generate_config_with_examples() -> String {
        r#"# PiiScope Configuration File
#
# This file contains all configuration options with examples and explanations.
# Every key can be overridden with a PIISCOPE_<SECTION>_<KEY> environment
# variable, and values may reference ${VARIABLES}.

# ============================================================================
# Application Settings
# ============================================================================
[application]
# Log level (trace, debug, info, warn, error)
log_level = "info"

# Output format for scan results (json, pretty)
output_format = "json"

# ============================================================================
# Detection Settings
# ============================================================================
[detection]
# Detect person names and places with the entity extractor
enable_nlp = true

# Spans below this weight are dropped (0.0-1.0)
# Weights: low 0.3, medium 0.5, high 0.7, very_high 0.9
confidence_threshold = 0.7

# Longest accepted input, in characters
max_text_length = 50000

# Drop candidates that fail structural validation
strict_mode = false

# Record surrounding text in span metadata
include_context = false
context_window = 20

# Optional: extra patterns in TOML form
# pattern_library = "patterns.toml"

# ============================================================================
# Policy Settings
# ============================================================================
[policy]
# Preset: strict, permissive, gdpr, hipaa, ccpa
preset = "strict"

# Optional: override the preset's default for types without a rule
# strict_mode = true

# Optional: rule overrides, applied on top of the preset
# [[policy.rules]]
# type = "email"
# risk_level = "medium"
# allow_logging = false
# require_masking = true
# require_encryption = false
# retention_days = 90
# allowed_operations = ["store", "process"]

# ============================================================================
# Logging Settings
# ============================================================================
[logging]
# JSON file logging (console logs always go to stderr)
local_enabled = false
local_path = "./logs"

# Rotation: daily, hourly, never
local_rotation = "daily"
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_config_str;

    #[test]
    fn test_generated_configs_are_valid() {
        for content in [
            InitArgs::generate_minimal_config(),
            InitArgs::generate_config_with_examples(),
        ] {
            let config = load_config_str(&content).unwrap();
            assert_eq!(config.policy.preset, "strict");
        }
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("piiscope.toml");
        fs::write(&path, "# existing").unwrap();

        let args = InitArgs {
            output: path.to_string_lossy().to_string(),
            with_examples: false,
            force: false,
        };
        assert_eq!(args.execute().unwrap(), EXIT_CONFIG_ERROR);
        assert_eq!(fs::read_to_string(&path).unwrap(), "# existing");

        let forced = InitArgs { force: true, ..args };
        assert_eq!(forced.execute().unwrap(), EXIT_SUCCESS);
        assert!(fs::read_to_string(&path).unwrap().contains("[policy]"));
    }
}

//! Configuration management for PiiScope.
//!
//! This module provides TOML-based configuration loading, parsing, and validation.
//!
//! # Overview
//!
//! PiiScope uses TOML configuration files with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `PIISCOPE_<SECTION>_<KEY>` environment overrides
//! - Default values for every setting
//! - Validation that names the offending field
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use piiscope::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("piiscope.toml")?;
//!
//! let options = config.detection.to_options();
//! let engine = config.policy.build_engine()?;
//! println!("Threshold: {}", options.confidence_threshold);
//! println!("Strict policy: {}", engine.is_strict());
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Log level and output format
//! - [`DetectionConfig`] - Detection options and pattern library
//! - [`PolicyConfig`] - Policy preset and rule overrides
//! - [`LoggingConfig`] - Local file logging
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//! output_format = "json"
//!
//! [detection]
//! confidence_threshold = 0.7
//! enable_nlp = true
//! pattern_library = "${PIISCOPE_PATTERNS}"
//!
//! [policy]
//! preset = "gdpr"
//!
//! [[policy.rules]]
//! type = "email"
//! risk_level = "high"
//! allowed_operations = ["store", "process"]
//! retention_days = 90
//! ```

pub mod loader;
pub mod schema;

pub use loader::{load_config, load_config_or_default, load_config_str};
pub use schema::{ApplicationConfig, DetectionConfig, LoggingConfig, PiiScopeConfig, PolicyConfig};

//! Configuration schema types
//!
//! This module defines the configuration structure for PiiScope.

use crate::detection::options::{
    DetectionOptions, DEFAULT_CONFIDENCE_THRESHOLD, DEFAULT_CONTEXT_WINDOW,
    DEFAULT_MAX_TEXT_LENGTH,
};
use crate::detection::PatternRegistry;
use crate::domain::{PiiScopeError, Result};
use crate::policy::{PolicyEngine, PolicyPreset, PolicyRule, PolicyRuleConfig};
use serde::{Deserialize, Serialize};

/// Main PiiScope configuration
///
/// This is the root configuration structure that maps to the TOML file.
/// Every section is optional; an empty file yields the defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PiiScopeConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Detection settings
    #[serde(default)]
    pub detection: DetectionConfig,

    /// Policy settings
    #[serde(default)]
    pub policy: PolicyConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl PiiScopeConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> std::result::Result<(), String> {
        self.application.validate()?;
        self.detection.validate()?;
        self.policy.validate()?;
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

    /// Output format for scan results (json, pretty)
    #[serde(default = "default_output_format")]
    pub output_format: String,
}

impl ApplicationConfig {
    fn validate(&self) -> std::result::Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }

        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.output_format.as_str()) {
            return Err(format!(
                "Invalid output_format '{}'. Must be one of: {}",
                self.output_format,
                valid_formats.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            output_format: default_output_format(),
        }
    }
}

/// Detection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// Run the entity extractor for names and places
    #[serde(default = "default_true")]
    pub enable_nlp: bool,

    /// Minimum span weight to report (0.0-1.0)
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: f64,

    /// Input length ceiling in characters
    #[serde(default = "default_max_text_length")]
    pub max_text_length: usize,

    /// Drop candidates that fail structural validation
    #[serde(default)]
    pub strict_mode: bool,

    /// Record surrounding text in span metadata
    #[serde(default)]
    pub include_context: bool,

    /// Characters of context on each side of a span
    #[serde(default = "default_context_window")]
    pub context_window: usize,

    /// Optional TOML pattern library scanned after the built-in patterns
    #[serde(default)]
    pub pattern_library: Option<String>,
}

impl DetectionConfig {
    fn validate(&self) -> std::result::Result<(), String> {
        self.to_options()
            .validate()
            .map_err(|e| format!("detection: {e}"))?;

        if let Some(ref path) = self.pattern_library {
            if path.trim().is_empty() {
                return Err("detection.pattern_library must not be empty".to_string());
            }
        }
        Ok(())
    }

    /// Detection options described by this section
    pub fn to_options(&self) -> DetectionOptions {
        DetectionOptions {
            enable_nlp: self.enable_nlp,
            confidence_threshold: self.confidence_threshold,
            max_text_length: self.max_text_length,
            strict_mode: self.strict_mode,
            include_context: self.include_context,
            context_window: self.context_window,
            ..DetectionOptions::default()
        }
    }

    /// Built-in patterns plus the configured pattern library, if any
    pub fn build_registry(&self) -> Result<PatternRegistry> {
        let mut registry = PatternRegistry::default_patterns()?;
        if let Some(ref path) = self.pattern_library {
            let library = PatternRegistry::from_file(path)?;
            registry.extend(library.list().iter().cloned())?;
        }
        Ok(registry)
    }
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            enable_nlp: true,
            confidence_threshold: default_confidence_threshold(),
            max_text_length: default_max_text_length(),
            strict_mode: false,
            include_context: false,
            context_window: default_context_window(),
            pattern_library: None,
        }
    }
}

/// Policy configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Preset name (strict, permissive, gdpr, hipaa, ccpa)
    #[serde(default = "default_preset")]
    pub preset: String,

    /// Override the preset's strict/permissive default
    #[serde(default)]
    pub strict_mode: Option<bool>,

    /// Rule overrides applied on top of the preset
    #[serde(default)]
    pub rules: Vec<PolicyRuleConfig>,
}

impl PolicyConfig {
    fn validate(&self) -> std::result::Result<(), String> {
        self.preset.parse::<PolicyPreset>()?;
        for (index, rule) in self.rules.iter().enumerate() {
            PolicyRule::try_from(rule.clone())
                .map_err(|e| format!("policy.rules[{index}]: {e}"))?;
        }
        Ok(())
    }

    /// Engine for the preset with overrides applied
    ///
    /// # Errors
    ///
    /// Fails on an unknown preset or the first invalid rule override.
    pub fn build_engine(&self) -> Result<PolicyEngine> {
        let preset: PolicyPreset = self.preset.parse().map_err(PiiScopeError::Configuration)?;
        let mut engine = preset.engine();
        if let Some(strict) = self.strict_mode {
            engine.set_strict_mode(strict);
        }
        for rule in &self.rules {
            engine.add_rule_config(rule.clone())?;
        }
        Ok(engine)
    }
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            preset: default_preset(),
            strict_mode: None,
            rules: Vec::new(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local JSON file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy (daily, hourly, never)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> std::result::Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path must not be empty when local logging is enabled".to_string());
        }
        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_output_format() -> String {
    "json".to_string()
}

fn default_true() -> bool {
    true
}

fn default_confidence_threshold() -> f64 {
    DEFAULT_CONFIDENCE_THRESHOLD
}

fn default_max_text_length() -> usize {
    DEFAULT_MAX_TEXT_LENGTH
}

fn default_context_window() -> usize {
    DEFAULT_CONTEXT_WINDOW
}

fn default_preset() -> String {
    "strict".to_string()
}

fn default_local_path() -> String {
    "./logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}

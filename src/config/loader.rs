//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::PiiScopeConfig;
use crate::domain::errors::PiiScopeError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into PiiScopeConfig
/// 4. Applies environment variable overrides (PIISCOPE_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - A referenced environment variable is not set
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use piiscope::config::loader::load_config;
///
/// let config = load_config("piiscope.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<PiiScopeConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(PiiScopeError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        PiiScopeError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    load_config_str(&contents)
}

/// Loads configuration from TOML text, with the same steps as [`load_config`]
pub fn load_config_str(contents: &str) -> Result<PiiScopeConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: PiiScopeConfig = toml::from_str(&contents)
        .map_err(|e| PiiScopeError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        PiiScopeError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Load the file if it exists, otherwise fall back to defaults (with
/// environment overrides still applied)
pub fn load_config_or_default(path: impl AsRef<Path>) -> Result<PiiScopeConfig> {
    let path = path.as_ref();
    if path.exists() {
        return load_config(path);
    }

    tracing::debug!(path = %path.display(), "Configuration file not found, using defaults");
    load_config_str("")
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched.
///
/// # Errors
///
/// Returns an error listing every referenced variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| PiiScopeError::Configuration(e.to_string()))?;
    let mut result = String::new();
    let mut missing_vars = Vec::new();

    for line in input.lines() {
        let trimmed = line.trim_start();

        if trimmed.starts_with('#') {
            result.push_str(line);
            result.push('\n');
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
                    if !missing_vars.contains(&var_name.to_string()) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(PiiScopeError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

fn parse_env<T: std::str::FromStr>(name: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| {
        PiiScopeError::Configuration(format!("Invalid value for {name}: '{value}'"))
    })
}

/// Applies environment variable overrides using PIISCOPE_* prefix
///
/// Environment variables follow the pattern: PIISCOPE_<SECTION>_<KEY>
/// For example: PIISCOPE_DETECTION_CONFIDENCE_THRESHOLD, PIISCOPE_POLICY_PRESET
fn apply_env_overrides(config: &mut PiiScopeConfig) -> Result<()> {
    const APPLICATION_LOG_LEVEL: &str = "PIISCOPE_APPLICATION_LOG_LEVEL";
    const APPLICATION_OUTPUT_FORMAT: &str = "PIISCOPE_APPLICATION_OUTPUT_FORMAT";
    const DETECTION_ENABLE_NLP: &str = "PIISCOPE_DETECTION_ENABLE_NLP";
    const DETECTION_CONFIDENCE_THRESHOLD: &str = "PIISCOPE_DETECTION_CONFIDENCE_THRESHOLD";
    const DETECTION_MAX_TEXT_LENGTH: &str = "PIISCOPE_DETECTION_MAX_TEXT_LENGTH";
    const DETECTION_STRICT_MODE: &str = "PIISCOPE_DETECTION_STRICT_MODE";
    const DETECTION_INCLUDE_CONTEXT: &str = "PIISCOPE_DETECTION_INCLUDE_CONTEXT";
    const DETECTION_CONTEXT_WINDOW: &str = "PIISCOPE_DETECTION_CONTEXT_WINDOW";
    const DETECTION_PATTERN_LIBRARY: &str = "PIISCOPE_DETECTION_PATTERN_LIBRARY";
    const POLICY_PRESET: &str = "PIISCOPE_POLICY_PRESET";
    const POLICY_STRICT_MODE: &str = "PIISCOPE_POLICY_STRICT_MODE";
    const LOGGING_LOCAL_ENABLED: &str = "PIISCOPE_LOGGING_LOCAL_ENABLED";
    const LOGGING_LOCAL_PATH: &str = "PIISCOPE_LOGGING_LOCAL_PATH";
    const LOGGING_LOCAL_ROTATION: &str = "PIISCOPE_LOGGING_LOCAL_ROTATION";

    // Application overrides
    if let Ok(val) = std::env::var(APPLICATION_LOG_LEVEL) {
        config.application.log_level = val;
    }
    if let Ok(val) = std::env::var(APPLICATION_OUTPUT_FORMAT) {
        config.application.output_format = val;
    }

    // Detection overrides
    if let Ok(val) = std::env::var(DETECTION_ENABLE_NLP) {
        config.detection.enable_nlp = parse_env(DETECTION_ENABLE_NLP, &val)?;
    }
    if let Ok(val) = std::env::var(DETECTION_CONFIDENCE_THRESHOLD) {
        config.detection.confidence_threshold = parse_env(DETECTION_CONFIDENCE_THRESHOLD, &val)?;
    }
    if let Ok(val) = std::env::var(DETECTION_MAX_TEXT_LENGTH) {
        config.detection.max_text_length = parse_env(DETECTION_MAX_TEXT_LENGTH, &val)?;
    }
    if let Ok(val) = std::env::var(DETECTION_STRICT_MODE) {
        config.detection.strict_mode = parse_env(DETECTION_STRICT_MODE, &val)?;
    }
    if let Ok(val) = std::env::var(DETECTION_INCLUDE_CONTEXT) {
        config.detection.include_context = parse_env(DETECTION_INCLUDE_CONTEXT, &val)?;
    }
    if let Ok(val) = std::env::var(DETECTION_CONTEXT_WINDOW) {
        config.detection.context_window = parse_env(DETECTION_CONTEXT_WINDOW, &val)?;
    }
    if let Ok(val) = std::env::var(DETECTION_PATTERN_LIBRARY) {
        config.detection.pattern_library = Some(val);
    }

    // Policy overrides
    if let Ok(val) = std::env::var(POLICY_PRESET) {
        config.policy.preset = val;
    }
    if let Ok(val) = std::env::var(POLICY_STRICT_MODE) {
        config.policy.strict_mode = Some(parse_env(POLICY_STRICT_MODE, &val)?);
    }

    // Logging overrides
    if let Ok(val) = std::env::var(LOGGING_LOCAL_ENABLED) {
        config.logging.local_enabled = parse_env(LOGGING_LOCAL_ENABLED, &val)?;
    }
    if let Ok(val) = std::env::var(LOGGING_LOCAL_PATH) {
        config.logging.local_path = val;
    }
    if let Ok(val) = std::env::var(LOGGING_LOCAL_ROTATION) {
        config.logging.local_rotation = val;
    }

    Ok(())
}

//! Integration tests for configuration loading and validation
//!
//! Tests that modify environment variables hold `ENV_MUTEX` so they do not
//! interfere with each other.

use piiscope::config::{load_config, load_config_or_default, load_config_str};
use piiscope::detection::{DetectionPipeline, PiiType};
use piiscope::policy::PolicyOperation;
use std::io::Write;
use std::sync::Mutex;
use tempfile::NamedTempFile;

// Mutex to serialize tests that modify environment variables
static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Helper function to clean up environment variables
fn cleanup_env_vars() {
    std::env::remove_var("PIISCOPE_APPLICATION_LOG_LEVEL");
    std::env::remove_var("PIISCOPE_DETECTION_CONFIDENCE_THRESHOLD");
    std::env::remove_var("PIISCOPE_DETECTION_ENABLE_NLP");
    std::env::remove_var("PIISCOPE_DETECTION_MAX_TEXT_LENGTH");
    std::env::remove_var("PIISCOPE_POLICY_PRESET");
    std::env::remove_var("PIISCOPE_POLICY_STRICT_MODE");
    std::env::remove_var("TEST_PIISCOPE_PRESET");
    std::env::remove_var("TEST_PIISCOPE_LOG_DIR");
}

fn write_config(content: &str) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(content.as_bytes()).unwrap();
    temp_file.flush().unwrap();
    temp_file
}

#[test]
fn test_load_complete_config() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let toml_content = r#"
[application]
log_level = "debug"
output_format = "pretty"

[detection]
enable_nlp = false
confidence_threshold = 0.5
max_text_length = 1000
strict_mode = true
include_context = true
context_window = 10

[policy]
preset = "hipaa"
strict_mode = false

[[policy.rules]]
type = "zip_code"
risk_level = "low"
allow_logging = true
retention_days = 30
allowed_operations = ["log", "store"]

[logging]
local_enabled = false
local_path = "/tmp/piiscope"
local_rotation = "hourly"
"#;
    let temp_file = write_config(toml_content);

    let config = load_config(temp_file.path()).expect("Failed to load config");

    assert_eq!(config.application.log_level, "debug");
    assert_eq!(config.application.output_format, "pretty");

    assert!(!config.detection.enable_nlp);
    assert_eq!(config.detection.max_text_length, 1000);
    assert!(config.detection.strict_mode);
    assert!(config.detection.include_context);
    assert_eq!(config.detection.context_window, 10);

    assert_eq!(config.policy.preset, "hipaa");
    assert_eq!(config.policy.rules.len(), 1);

    assert_eq!(config.logging.local_path, "/tmp/piiscope");
    assert_eq!(config.logging.local_rotation, "hourly");

    let engine = config.policy.build_engine().unwrap();
    assert!(!engine.is_strict());
    assert!(engine.evaluate(PiiType::ZipCode, PolicyOperation::Log).allowed);
    assert!(!engine.evaluate(PiiType::Ssn, PolicyOperation::Export).allowed);
}

#[test]
fn test_load_minimal_config_with_defaults() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let config = load_config_str("[detection]\n").expect("Failed to load config");

    assert_eq!(config.application.log_level, "info");
    assert_eq!(config.application.output_format, "json");
    assert!(config.detection.enable_nlp);
    assert!((config.detection.confidence_threshold - 0.7).abs() < f64::EPSILON);
    assert_eq!(config.detection.max_text_length, 50_000);
    assert_eq!(config.policy.preset, "strict");
    assert!(!config.logging.local_enabled);
}

#[test]
fn test_env_var_substitution() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();
    std::env::set_var("TEST_PIISCOPE_PRESET", "ccpa");
    std::env::set_var("TEST_PIISCOPE_LOG_DIR", "/var/log/piiscope");

    let toml_content = r#"
[policy]
preset = "${TEST_PIISCOPE_PRESET}"

[logging]
local_path = "${TEST_PIISCOPE_LOG_DIR}"
"#;
    let config = load_config_str(toml_content).unwrap();
    assert_eq!(config.policy.preset, "ccpa");
    assert_eq!(config.logging.local_path, "/var/log/piiscope");

    cleanup_env_vars();
}

#[test]
fn test_missing_env_var_is_error() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let err = load_config_str("[policy]\npreset = \"${TEST_PIISCOPE_PRESET}\"\n").unwrap_err();
    assert!(err.to_string().contains("TEST_PIISCOPE_PRESET"));
}

#[test]
fn test_env_overrides() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();
    std::env::set_var("PIISCOPE_APPLICATION_LOG_LEVEL", "trace");
    std::env::set_var("PIISCOPE_DETECTION_CONFIDENCE_THRESHOLD", "0.3");
    std::env::set_var("PIISCOPE_DETECTION_ENABLE_NLP", "false");
    std::env::set_var("PIISCOPE_POLICY_PRESET", "permissive");
    std::env::set_var("PIISCOPE_POLICY_STRICT_MODE", "true");

    let config = load_config_str("[policy]\npreset = \"gdpr\"\n").unwrap();
    assert_eq!(config.application.log_level, "trace");
    assert!((config.detection.confidence_threshold - 0.3).abs() < f64::EPSILON);
    assert!(!config.detection.enable_nlp);
    assert_eq!(config.policy.preset, "permissive");
    assert!(config.policy.build_engine().unwrap().is_strict());

    cleanup_env_vars();
}

#[test]
fn test_invalid_env_override() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();
    std::env::set_var("PIISCOPE_DETECTION_MAX_TEXT_LENGTH", "lots");

    let err = load_config_str("").unwrap_err();
    assert!(err.to_string().contains("PIISCOPE_DETECTION_MAX_TEXT_LENGTH"));

    cleanup_env_vars();
}

#[test]
fn test_validation_errors() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let cases = [
        ("[application]\nlog_level = \"loud\"\n", "log_level"),
        ("[detection]\nconfidence_threshold = 1.5\n", "confidence_threshold"),
        ("[detection]\nmax_text_length = 0\n", "max_text_length"),
        ("[policy]\npreset = \"lenient\"\n", "lenient"),
        ("[logging]\nlocal_rotation = \"weekly\"\n", "local_rotation"),
        (
            "[[policy.rules]]\ntype = \"passport\"\nallowed_operations = [\"store\"]\n",
            "policy.rules[0]",
        ),
    ];

    for (content, expected) in cases {
        let err = load_config_str(content).unwrap_err();
        assert!(
            err.to_string().contains(expected),
            "{expected:?} not in {err}"
        );
    }
}

#[test]
fn test_missing_file_falls_back_to_defaults() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    assert!(load_config("does-not-exist.toml").is_err());
    let config = load_config_or_default("does-not-exist.toml").unwrap();
    assert_eq!(config.policy.preset, "strict");
}

#[test]
fn test_pattern_library_reference() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let library = write_config(
        r#"
[patterns.member]
category = "ssn"
description = "Member number"
patterns = ['\bMBR\d{6}\b']
"#,
    );
    let content = format!(
        "[detection]\nenable_nlp = false\npattern_library = \"{}\"\n",
        library.path().display()
    );
    let config = load_config_str(&content).unwrap();

    let registry = config.detection.build_registry().unwrap();
    let pipeline = DetectionPipeline::with_registry(registry);
    let result = pipeline
        .detect("member MBR123456", &config.detection.to_options())
        .unwrap();
    assert!(result.detected_types.contains(&PiiType::Ssn));
}

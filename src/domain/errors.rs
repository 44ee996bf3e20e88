//! Domain error types
//!
//! This module defines the error hierarchy for PiiScope. Errors never carry a
//! matched PII value: only types, offsets, counts and field names.

use crate::detection::models::PiiType;
use thiserror::Error;

/// Main PiiScope error type
///
/// This is the primary error type used throughout the library.
/// It wraps specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum PiiScopeError {
    /// Detection pipeline errors (invalid input, size limit, matcher failure)
    #[error("Detection error: {0}")]
    Detection(#[from] DetectionError),

    /// Malformed policy rule
    #[error("Policy configuration error: {0}")]
    PolicyConfiguration(#[from] PolicyConfigurationError),

    /// Configuration file or environment errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

/// Errors raised by the detection pipeline
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DetectionError {
    /// Input exceeds the configured length ceiling
    #[error("Text length {length} exceeds maximum of {max} characters")]
    TextTooLong { length: usize, max: usize },

    /// A detection option is out of range
    #[error("Invalid option '{field}': {reason}")]
    InvalidOption { field: String, reason: String },

    /// A matcher failed while scanning
    #[error("Matcher for {pii_type} pattern '{pattern}' failed during scan")]
    MatcherFailed { pii_type: PiiType, pattern: String },
}

impl DetectionError {
    /// Creates an invalid option error
    pub fn invalid_option(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidOption {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// A policy rule failed validation
///
/// `field` names the offending rule field so callers can point at the
/// exact configuration entry.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid rule field '{field}': {reason}")]
pub struct PolicyConfigurationError {
    /// Rule field that failed validation
    pub field: String,
    /// Human-readable reason
    pub reason: String,
}

impl PolicyConfigurationError {
    /// Creates a new policy configuration error
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Failure reported by an external collaborator (NLP extractor, validator)
///
/// These are recovered inside the pipeline and surface only as advisory
/// suggestions.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CollaboratorError {
    /// Collaborator is not available in this build or configuration
    #[error("{0} collaborator unavailable")]
    Unavailable(String),

    /// Collaborator raised an error while processing
    #[error("{collaborator} collaborator failed: {message}")]
    Failed {
        collaborator: String,
        message: String,
    },
}

// Conversion from std::io::Error
impl From<std::io::Error> for PiiScopeError {
    fn from(err: std::io::Error) -> Self {
        PiiScopeError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for PiiScopeError {
    fn from(err: serde_json::Error) -> Self {
        PiiScopeError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for PiiScopeError {
    fn from(err: toml::de::Error) -> Self {
        PiiScopeError::Configuration(format!("TOML parse error: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_too_long_display() {
        let err = DetectionError::TextTooLong {
            length: 60_000,
            max: 50_000,
        };
        assert_eq!(
            err.to_string(),
            "Text length 60000 exceeds maximum of 50000 characters"
        );
    }

    #[test]
    fn test_detection_error_conversion() {
        let err: PiiScopeError = DetectionError::invalid_option("confidence_threshold", "x").into();
        assert!(matches!(err, PiiScopeError::Detection(_)));
    }

    #[test]
    fn test_policy_error_names_field() {
        let err = PolicyConfigurationError::new("retention_days", "must be >= 0");
        let wrapped: PiiScopeError = err.into();
        assert!(wrapped.to_string().contains("retention_days"));
    }

    #[test]
    fn test_matcher_failed_names_type_only() {
        let err = DetectionError::MatcherFailed {
            pii_type: PiiType::Email,
            pattern: "Employee email".to_string(),
        };
        assert!(err.to_string().contains("EMAIL"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let err: PiiScopeError = io_err.into();
        assert!(matches!(err, PiiScopeError::Io(_)));
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: PiiScopeError = json_err.into();
        assert!(matches!(err, PiiScopeError::Serialization(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let err: PiiScopeError = toml_err.into();
        assert!(matches!(err, PiiScopeError::Configuration(_)));
        assert!(err.to_string().contains("TOML parse error"));
    }

    #[test]
    fn test_collaborator_error_display() {
        let err = CollaboratorError::Failed {
            collaborator: "nlp".to_string(),
            message: "model not loaded".to_string(),
        };
        assert_eq!(err.to_string(), "nlp collaborator failed: model not loaded");
    }
}

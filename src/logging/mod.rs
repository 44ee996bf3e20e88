//! Logging and observability
//!
//! Structured logging through `tracing`, with:
//! - Human-readable console output on stderr
//! - Optional JSON file logging with rotation
//! - Configurable log levels (`RUST_LOG` wins when set)
//!
//! Log events carry PII types, offsets and counts only. Matched text is
//! never logged.
//!
//! # Example
//!
//! ```no_run
//! use piiscope::logging::init_logging;
//! use piiscope::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Scan started");
//! ```

pub mod structured;

pub use structured::{init_logging, parse_log_level, LoggingGuard};

/// Log the completion of a detection run
///
/// # Example
///
/// ```no_run
/// use piiscope::log_detection_complete;
/// use piiscope::detection::ConfidenceLevel;
///
/// log_detection_complete!(3, 2, ConfidenceLevel::High, 12u64);
/// ```
#[macro_export]
macro_rules! log_detection_complete {
    ($spans:expr, $types:expr, $confidence:expr, $elapsed_ms:expr) => {
        tracing::info!(
            spans = $spans,
            types = $types,
            confidence = %$confidence,
            elapsed_ms = $elapsed_ms,
            "Detection completed"
        );
    };
}

/// Log a policy decision
///
/// # Example
///
/// ```no_run
/// use piiscope::log_policy_decision;
/// use piiscope::detection::PiiType;
/// use piiscope::policy::PolicyOperation;
///
/// log_policy_decision!(PiiType::Email, PolicyOperation::Log, false, "Logging not permitted");
/// ```
#[macro_export]
macro_rules! log_policy_decision {
    ($pii_type:expr, $operation:expr, $allowed:expr, $reason:expr) => {
        tracing::debug!(
            pii_type = %$pii_type,
            operation = %$operation,
            allowed = $allowed,
            reason = %$reason,
            "Policy decision"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use piiscope::log_error_with_context;
/// use piiscope::domain::PiiScopeError;
///
/// let error = PiiScopeError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}

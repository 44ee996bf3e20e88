// PiiScope - PII detection and compliance policy evaluation
// Copyright (c) 2025 PiiScope Contributors
// Licensed under the MIT License

//! # PiiScope - PII Detection and Compliance Policies
//!
//! PiiScope finds personally identifiable information in free text and
//! decides how each detected type may be handled under a compliance policy.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Detecting** emails, phone numbers, SSNs, credit cards, IP addresses,
//!   dates of birth, ZIP codes, street addresses and person names
//! - **Scoring** each span and the document with a confidence level
//! - **Evaluating** operations (log, store, display, ...) against per-type
//!   policy rules, with strict, permissive, GDPR, HIPAA and CCPA presets
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`detection`] - Pattern registry, validators, entity extraction and the pipeline
//! - [`policy`] - Rule store, evaluator and presets
//! - [`domain`] - Error types
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging and observability
//!
//! ## Quick Start
//!
//! ```rust
//! use piiscope::detection::{DetectionOptions, PiiType};
//! use piiscope::policy::PolicyOperation;
//!
//! # fn main() -> piiscope::domain::Result<()> {
//! let result = piiscope::detect_pii(
//!     "Reach me at jane@example.com",
//!     &DetectionOptions::default(),
//! )?;
//! assert!(result.detected_types.contains(&PiiType::Email));
//!
//! let engine = piiscope::create_policy_engine("strict")?;
//! let decisions = engine.evaluate_result(&result, PolicyOperation::Log);
//! assert!(!decisions[&PiiType::Email].allowed);
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Fallible operations return [`domain::Result`], whose error type is
//! [`domain::PiiScopeError`]. Results and errors never carry matched text
//! into log events.

pub mod cli;
pub mod config;
pub mod detection;
pub mod domain;
pub mod logging;
pub mod policy;

pub use detection::{DetectionOptions, DetectionPipeline, PiiDetectionResult, PiiType};
pub use domain::{PiiScopeError, Result};
pub use policy::{create_policy_engine, PolicyDecision, PolicyEngine, PolicyOperation};

use std::collections::BTreeMap;

/// Detect PII in a single text with the built-in patterns
pub fn detect_pii(text: &str, options: &DetectionOptions) -> Result<PiiDetectionResult> {
    Ok(DetectionPipeline::new()?.detect(text, options)?)
}

/// Detect PII in each text, preserving input order
pub fn detect_pii_multiple<S: AsRef<str>>(
    texts: &[S],
    options: &DetectionOptions,
) -> Result<Vec<PiiDetectionResult>> {
    Ok(DetectionPipeline::new()?.detect_multiple(texts, options)?)
}

/// Whether the text contains any qualifying PII span
pub fn has_pii(text: &str, options: &DetectionOptions) -> Result<bool> {
    Ok(DetectionPipeline::new()?.has_pii(text, options)?)
}

/// Span counts for every PII type
pub fn count_pii_by_type(
    text: &str,
    options: &DetectionOptions,
) -> Result<BTreeMap<PiiType, usize>> {
    Ok(DetectionPipeline::new()?.count_pii_by_type(text, options)?)
}

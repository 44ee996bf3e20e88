//! Compliance policy engine
//!
//! Maps (PII type, operation) pairs to allow/deny decisions with masking
//! and encryption obligations. Engines are built from a [`PolicyPreset`]
//! and may be adjusted with [`PolicyEngine::add_rule`] and
//! [`PolicyEngine::remove_rule`].
//!
//! # Examples
//!
//! ```
//! use piiscope::detection::PiiType;
//! use piiscope::policy::{create_policy_engine, PolicyOperation};
//!
//! let engine = create_policy_engine("permissive")?;
//! let decision = engine.evaluate(PiiType::IpAddress, PolicyOperation::Log);
//! assert!(decision.allowed);
//! # Ok::<(), piiscope::domain::PiiScopeError>(())
//! ```

pub mod engine;
pub mod presets;
pub mod rules;

pub use engine::PolicyEngine;
pub use presets::PolicyPreset;
pub use rules::{PolicyDecision, PolicyOperation, PolicyRule, PolicyRuleConfig};

use crate::domain::{PiiScopeError, Result};

/// Build an engine from a preset name
///
/// # Errors
///
/// Returns [`PiiScopeError::Configuration`] for an unknown preset name.
pub fn create_policy_engine(preset: &str) -> Result<PolicyEngine> {
    let preset: PolicyPreset = preset.parse().map_err(PiiScopeError::Configuration)?;
    Ok(preset.engine())
}

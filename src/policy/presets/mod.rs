//! Named policy presets
//!
//! Every preset starts from [`base_rules`] and overlays its own rule
//! changes plus a strict/permissive default for unknown types.
//!
//! # Presets
//!
//! - **strict**: risk levels elevated one step, no logging, encryption for
//!   contact and name data, unknown types denied
//! - **permissive**: low and medium risk data may be logged (masked),
//!   unknown types allowed
//! - **gdpr**: strict default, personal data masked, storage limited
//! - **hipaa**: strict default, identifiers never exported
//! - **ccpa**: permissive default, consumer data exportable on request
//!
//! # Examples
//!
//! ```
//! use piiscope::detection::PiiType;
//! use piiscope::policy::{PolicyOperation, PolicyPreset};
//!
//! let engine = PolicyPreset::Strict.engine();
//! let decision = engine.evaluate(PiiType::Email, PolicyOperation::Log);
//! assert!(!decision.allowed);
//! assert!(decision.requires_masking);
//! ```

pub mod ccpa;
pub mod gdpr;
pub mod hipaa;

use super::engine::PolicyEngine;
use super::rules::{PolicyOperation, PolicyRule};
use crate::detection::models::{PiiType, RiskLevel};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use PolicyOperation::*;

/// Built-in policy configurations
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyPreset {
    #[default]
    Strict,
    Permissive,
    Gdpr,
    Hipaa,
    Ccpa,
}

impl PolicyPreset {
    pub const ALL: [PolicyPreset; 5] = [
        Self::Strict,
        Self::Permissive,
        Self::Gdpr,
        Self::Hipaa,
        Self::Ccpa,
    ];

    /// Rules and default mode for this preset
    pub fn rules(&self) -> (Vec<PolicyRule>, bool) {
        match self {
            Self::Strict => (strict_rules(), true),
            Self::Permissive => (permissive_rules(), false),
            Self::Gdpr => (gdpr::rules(), true),
            Self::Hipaa => (hipaa::rules(), true),
            Self::Ccpa => (ccpa::rules(), false),
        }
    }

    /// Build an engine for this preset
    pub fn engine(&self) -> PolicyEngine {
        let (rules, strict_mode) = self.rules();
        let mut engine = PolicyEngine::new();
        engine.set_strict_mode(strict_mode);
        for rule in rules {
            // Preset rules always list operations
            if let Err(e) = engine.add_rule(rule) {
                tracing::error!(preset = %self, error = %e, "Preset rule rejected");
            }
        }
        engine
    }
}

impl fmt::Display for PolicyPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Strict => write!(f, "strict"),
            Self::Permissive => write!(f, "permissive"),
            Self::Gdpr => write!(f, "gdpr"),
            Self::Hipaa => write!(f, "hipaa"),
            Self::Ccpa => write!(f, "ccpa"),
        }
    }
}

impl FromStr for PolicyPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "permissive" => Ok(Self::Permissive),
            "gdpr" => Ok(Self::Gdpr),
            "hipaa" => Ok(Self::Hipaa),
            "ccpa" => Ok(Self::Ccpa),
            _ => Err(format!(
                "Unknown policy preset: {s}. Must be one of: strict, permissive, gdpr, hipaa, ccpa"
            )),
        }
    }
}

/// Baseline rule for every PII type
pub fn base_rules() -> Vec<PolicyRule> {
    let contact = |t: PiiType| {
        PolicyRule::new(t)
            .with_masking(true)
            .with_retention_days(365)
            .with_operations([Store, Process, Display, Transfer])
    };

    vec![
        contact(PiiType::Email),
        contact(PiiType::Phone),
        contact(PiiType::Name),
        PolicyRule::new(PiiType::Ssn)
            .with_masking(true)
            .with_encryption(true)
            .with_retention_days(2555)
            .with_operations([Store, Process]),
        PolicyRule::new(PiiType::CreditCard)
            .with_masking(true)
            .with_encryption(true)
            .with_retention_days(1095)
            .with_operations([Store, Process]),
        PolicyRule::new(PiiType::IpAddress)
            .with_logging(true)
            .with_retention_days(90)
            .with_operations(PolicyOperation::ALL),
        PolicyRule::new(PiiType::Address)
            .with_masking(true)
            .with_encryption(true)
            .with_retention_days(365)
            .with_operations([Store, Process, Display]),
        PolicyRule::new(PiiType::DateOfBirth)
            .with_masking(true)
            .with_encryption(true)
            .with_retention_days(365)
            .with_operations([Store, Process, Display]),
        PolicyRule::new(PiiType::ZipCode)
            .with_logging(true)
            .with_retention_days(365)
            .with_operations(PolicyOperation::ALL),
    ]
}

/// Base rules with elevated risk, no logging and encryption for contact data
pub fn strict_rules() -> Vec<PolicyRule> {
    base_rules()
        .into_iter()
        .map(|rule| {
            let encrypt = rule.require_encryption
                || matches!(rule.pii_type, PiiType::Email | PiiType::Name | PiiType::Phone);
            let mut operations = rule.allowed_operations.clone();
            operations.remove(&Log);

            let risk_level = rule.risk_level.elevated();
            rule.with_risk_level(risk_level)
                .with_logging(false)
                .with_masking(true)
                .with_encryption(encrypt)
                .with_operations(operations)
        })
        .collect()
}

/// Base rules with masked logging for low and medium risk data
pub fn permissive_rules() -> Vec<PolicyRule> {
    base_rules().into_iter().map(allow_masked_logging).collect()
}

/// Permit masked logging on a rule below high risk
pub(crate) fn allow_masked_logging(rule: PolicyRule) -> PolicyRule {
    if rule.risk_level >= RiskLevel::High {
        return rule;
    }
    let mut operations = rule.allowed_operations.clone();
    operations.insert(Log);
    rule.with_logging(true).with_operations(operations)
}

/// Replace the rule for `rule.pii_type` inside `rules`
pub(crate) fn overlay(rules: &mut Vec<PolicyRule>, rule: PolicyRule) {
    match rules.iter_mut().find(|r| r.pii_type == rule.pii_type) {
        Some(existing) => *existing = rule,
        None => rules.push(rule),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_base_covers_every_type() {
        let rules = base_rules();
        for pii_type in PiiType::ALL {
            assert!(rules.iter().any(|r| r.pii_type == pii_type), "{pii_type}");
        }
        assert!(rules.iter().all(|r| r.validate().is_ok()));
    }

    #[test]
    fn test_strict_email_log_denied_with_masking() {
        let decision = PolicyPreset::Strict
            .engine()
            .evaluate(PiiType::Email, PolicyOperation::Log);
        assert!(!decision.allowed);
        assert!(decision.requires_masking);
    }

    #[test]
    fn test_strict_elevates_and_encrypts() {
        let engine = PolicyPreset::Strict.engine();
        let email = engine.get_rule_for_type(PiiType::Email).unwrap();
        assert_eq!(email.risk_level, RiskLevel::High);
        assert!(email.require_encryption);
        assert!(engine.is_strict());
        assert!(engine.get_rules().iter().all(|r| !r.allow_logging));
    }

    #[test]
    fn test_permissive_allows_masked_email_logging() {
        let decision = PolicyPreset::Permissive
            .engine()
            .evaluate(PiiType::Email, PolicyOperation::Log);
        assert!(decision.allowed);
        assert!(decision.requires_masking);

        let ssn = PolicyPreset::Permissive
            .engine()
            .evaluate(PiiType::Ssn, PolicyOperation::Log);
        assert!(!ssn.allowed);
    }

    #[test_case("strict", PolicyPreset::Strict)]
    #[test_case("Permissive", PolicyPreset::Permissive)]
    #[test_case(" GDPR ", PolicyPreset::Gdpr)]
    #[test_case("hipaa", PolicyPreset::Hipaa)]
    #[test_case("ccpa", PolicyPreset::Ccpa)]
    fn test_preset_from_str(input: &str, expected: PolicyPreset) {
        assert_eq!(input.parse::<PolicyPreset>().unwrap(), expected);
        assert_eq!(expected.to_string().parse::<PolicyPreset>().unwrap(), expected);
    }

    #[test]
    fn test_default_preset_is_strict() {
        assert_eq!(PolicyPreset::default(), PolicyPreset::Strict);
        assert_eq!(
            serde_json::to_string(&PolicyPreset::default()).unwrap(),
            "\"strict\""
        );
    }

    #[test]
    fn test_unknown_preset() {
        assert!("lenient".parse::<PolicyPreset>().is_err());
    }

    #[test]
    fn test_every_preset_builds_full_rule_set() {
        for preset in PolicyPreset::ALL {
            let (rules, _) = preset.rules();
            let engine = preset.engine();
            assert_eq!(engine.get_rules().len(), PiiType::ALL.len(), "{preset}");
            assert_eq!(rules.len(), PiiType::ALL.len(), "{preset}");
        }
    }
}

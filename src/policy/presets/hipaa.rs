//! HIPAA Safe Harbor policy rules
//!
//! Names, geographic subdivisions, dates, contact numbers, SSNs and IP
//! addresses are Safe Harbor identifiers (45 CFR §164.514(b)(2)). They may
//! be stored and processed under encryption but never exported or
//! transferred, and retention follows the six-year documentation rule.

use super::{base_rules, overlay};
use crate::detection::models::{PiiType, RiskLevel};
use crate::policy::rules::{PolicyOperation, PolicyRule};

use PolicyOperation::*;

/// Six years, in days
pub const RETENTION_DAYS: u32 = 2190;

/// Safe Harbor identifier types covered by this crate
pub fn hipaa_identifiers() -> Vec<PiiType> {
    vec![
        PiiType::Name,
        PiiType::Address,
        PiiType::ZipCode,
        PiiType::DateOfBirth,
        PiiType::Phone,
        PiiType::Email,
        PiiType::Ssn,
        PiiType::IpAddress,
    ]
}

/// Get the HIPAA rule set
pub fn rules() -> Vec<PolicyRule> {
    let mut rules = base_rules();

    for pii_type in hipaa_identifiers() {
        let risk_level = pii_type.default_risk_level().max(RiskLevel::High);
        overlay(
            &mut rules,
            PolicyRule::new(pii_type)
                .with_risk_level(risk_level)
                .with_masking(true)
                .with_encryption(true)
                .with_retention_days(RETENTION_DAYS)
                .with_operations([Store, Process, Display]),
        );
    }

    rules
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::PolicyPreset;

    #[test]
    fn test_identifiers_not_exportable() {
        let engine = PolicyPreset::Hipaa.engine();
        for pii_type in hipaa_identifiers() {
            let decision = engine.evaluate(pii_type, Export);
            assert!(!decision.allowed, "{pii_type}");
            assert!(decision.requires_encryption, "{pii_type}");
        }
    }

    #[test]
    fn test_credit_card_keeps_base_rule() {
        let engine = PolicyPreset::Hipaa.engine();
        let rule = engine.get_rule_for_type(PiiType::CreditCard).unwrap();
        assert_eq!(rule.retention_days, 1095);
    }

    #[test]
    fn test_zip_elevated() {
        let engine = PolicyPreset::Hipaa.engine();
        let rule = engine.get_rule_for_type(PiiType::ZipCode).unwrap();
        assert_eq!(rule.risk_level, RiskLevel::High);
        assert!(!rule.allow_logging);
    }
}

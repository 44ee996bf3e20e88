//! GDPR policy rules
//!
//! Every identifier is personal data: values are masked wherever they
//! surface, logging is off, and retention is capped to one year. IP
//! addresses lose the free handling the base set gives them.

use super::{base_rules, overlay};
use crate::detection::models::{PiiType, RiskLevel};
use crate::policy::rules::{PolicyOperation, PolicyRule};

use PolicyOperation::*;

/// Longest retention, in days, any GDPR rule may carry
pub const MAX_RETENTION_DAYS: u32 = 365;

/// Get the GDPR rule set
pub fn rules() -> Vec<PolicyRule> {
    let mut rules: Vec<PolicyRule> = base_rules()
        .into_iter()
        .map(|rule| {
            let retention = rule.retention_days.min(MAX_RETENTION_DAYS);
            rule.with_logging(false)
                .with_masking(true)
                .with_retention_days(retention)
        })
        .collect();

    overlay(
        &mut rules,
        PolicyRule::new(PiiType::IpAddress)
            .with_risk_level(RiskLevel::Medium)
            .with_masking(true)
            .with_retention_days(30)
            .with_operations([Store, Process]),
    );
    overlay(
        &mut rules,
        PolicyRule::new(PiiType::Name)
            .with_risk_level(RiskLevel::High)
            .with_masking(true)
            .with_encryption(true)
            .with_retention_days(MAX_RETENTION_DAYS)
            .with_operations([Store, Process, Display]),
    );

    rules
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::PolicyPreset;

    #[test]
    fn test_retention_capped() {
        assert!(rules().iter().all(|r| r.retention_days <= MAX_RETENTION_DAYS));
    }

    #[test]
    fn test_ip_address_not_loggable() {
        let decision = PolicyPreset::Gdpr.engine().evaluate(PiiType::IpAddress, Log);
        assert!(!decision.allowed);
        assert!(decision.requires_masking);
    }

    #[test]
    fn test_name_transfer_denied() {
        let decision = PolicyPreset::Gdpr.engine().evaluate(PiiType::Name, Transfer);
        assert!(!decision.allowed);
        assert!(decision.requires_encryption);
    }
}

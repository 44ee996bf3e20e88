//! Policy evaluator
//!
//! Resolves a decision for a (PII type, operation) pair:
//!
//! 1. No rule for the type: strict engines deny with masking and encryption,
//!    permissive engines allow with no obligations.
//! 2. Operation not in the rule's allowed set: deny.
//! 3. Logging when the rule forbids it: deny with masking, even if `log`
//!    is in the allowed set.
//! 4. Otherwise allow, carrying the rule's obligations and retention.

use super::rules::{PolicyDecision, PolicyOperation, PolicyRule, PolicyRuleConfig};
use crate::detection::models::{PiiDetectionResult, PiiType};
use crate::domain::PolicyConfigurationError;
use std::collections::BTreeMap;

/// Rule store plus strict/permissive default
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PolicyEngine {
    rules: BTreeMap<PiiType, PolicyRule>,
    strict_mode: bool,
}

impl PolicyEngine {
    /// Empty permissive engine
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine seeded with the given rules
    ///
    /// # Errors
    ///
    /// Fails on the first invalid rule.
    pub fn with_rules<I>(rules: I, strict_mode: bool) -> Result<Self, PolicyConfigurationError>
    where
        I: IntoIterator<Item = PolicyRule>,
    {
        let mut engine = Self {
            rules: BTreeMap::new(),
            strict_mode,
        };
        for rule in rules {
            engine.add_rule(rule)?;
        }
        Ok(engine)
    }

    /// Decide whether `operation` may be applied to `pii_type`
    pub fn evaluate(&self, pii_type: PiiType, operation: PolicyOperation) -> PolicyDecision {
        let decision = self.resolve(pii_type, operation);
        crate::log_policy_decision!(pii_type, operation, decision.allowed, &decision.reason);
        decision
    }

    fn resolve(&self, pii_type: PiiType, operation: PolicyOperation) -> PolicyDecision {
        let Some(rule) = self.rules.get(&pii_type) else {
            return if self.strict_mode {
                PolicyDecision::deny(format!(
                    "No policy rule for {pii_type}; strict mode denies {operation}"
                ))
                .with_masking(true)
                .with_encryption(true)
                .with_metadata("default", true)
            } else {
                PolicyDecision::allow(format!(
                    "No policy rule for {pii_type}; permissive default allows {operation}"
                ))
                .with_metadata("default", true)
            };
        };

        if !rule.allows(operation) {
            return PolicyDecision::deny(format!(
                "Operation {operation} not allowed for {pii_type} (risk level: {})",
                rule.risk_level
            ))
            .with_masking(rule.require_masking)
            .with_encryption(rule.require_encryption)
            .with_metadata("risk_level", rule.risk_level.to_string());
        }

        if operation == PolicyOperation::Log && !rule.allow_logging {
            return PolicyDecision::deny(format!(
                "Logging {pii_type} is not permitted (risk level: {})",
                rule.risk_level
            ))
            .with_masking(true)
            .with_encryption(rule.require_encryption)
            .with_metadata("risk_level", rule.risk_level.to_string());
        }

        PolicyDecision::allow(format!(
            "Operation {operation} allowed for {pii_type} (risk level: {})",
            rule.risk_level
        ))
        .with_masking(rule.require_masking)
        .with_encryption(rule.require_encryption)
        .with_metadata("risk_level", rule.risk_level.to_string())
        .with_metadata("retention_days", rule.retention_days)
    }

    /// One decision per detected type, in type order
    pub fn evaluate_result(
        &self,
        result: &PiiDetectionResult,
        operation: PolicyOperation,
    ) -> BTreeMap<PiiType, PolicyDecision> {
        result
            .detected_types
            .iter()
            .map(|t| (*t, self.evaluate(*t, operation)))
            .collect()
    }

    /// Install a rule, replacing any rule for the same type
    ///
    /// # Errors
    ///
    /// Returns a [`PolicyConfigurationError`] naming the offending field; the
    /// store is left unchanged.
    pub fn add_rule(&mut self, rule: PolicyRule) -> Result<(), PolicyConfigurationError> {
        rule.validate()?;
        tracing::debug!(pii_type = %rule.pii_type, risk_level = %rule.risk_level, "Policy rule added");
        self.rules.insert(rule.pii_type, rule);
        Ok(())
    }

    /// Validate and install a string-typed rule from configuration
    pub fn add_rule_config(
        &mut self,
        config: PolicyRuleConfig,
    ) -> Result<(), PolicyConfigurationError> {
        self.add_rule(PolicyRule::try_from(config)?)
    }

    /// Remove the rule for a type, returning it
    pub fn remove_rule(&mut self, pii_type: PiiType) -> Option<PolicyRule> {
        self.rules.remove(&pii_type)
    }

    /// All rules, in type order
    pub fn get_rules(&self) -> Vec<&PolicyRule> {
        self.rules.values().collect()
    }

    pub fn get_rule_for_type(&self, pii_type: PiiType) -> Option<&PolicyRule> {
        self.rules.get(&pii_type)
    }

    pub fn set_strict_mode(&mut self, strict: bool) {
        self.strict_mode = strict;
    }

    pub fn is_strict(&self) -> bool {
        self.strict_mode
    }
}

//! CCPA policy rules
//!
//! Consumers may request a copy of their data, so contact details, names
//! and addresses are exportable. Low and medium risk data may be logged
//! masked. Financial identifiers keep the base restrictions.

use super::{allow_masked_logging, base_rules};
use crate::detection::models::PiiType;
use crate::policy::rules::{PolicyOperation, PolicyRule};

/// Types exportable on a consumer access request
const PORTABLE_TYPES: &[PiiType] = &[
    PiiType::Email,
    PiiType::Phone,
    PiiType::Name,
    PiiType::Address,
];

/// Get the CCPA rule set
pub fn rules() -> Vec<PolicyRule> {
    base_rules()
        .into_iter()
        .map(allow_masked_logging)
        .map(|rule| {
            if !PORTABLE_TYPES.contains(&rule.pii_type) {
                return rule;
            }
            let mut operations = rule.allowed_operations.clone();
            operations.insert(PolicyOperation::Export);
            rule.with_operations(operations)
        })
        .collect()
}

//! Structural validators
//!
//! A structural validator checks a single candidate value (an email, a phone
//! number, a name) and reports whether it is valid, merely possible, or
//! invalid. The [`ValidatorTable`] maps each PII type to zero or one
//! validator; types without one keep the confidence their filters earned.

pub mod email;
pub mod name;
pub mod phone;

pub use email::EmailValidator;
pub use name::{AddressValidator, NameValidator};
pub use phone::PhoneValidator;

use crate::detection::models::{ConfidenceLevel, PiiType};
use crate::domain::CollaboratorError;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Outcome of validating one candidate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationOutcome {
    /// Candidate is confirmed valid
    pub is_valid: bool,
    /// Candidate is structurally plausible but unconfirmed
    pub is_possible: bool,
    /// Validator-specific classification (e.g. `domestic`, `full_name`)
    pub classification: Option<String>,
}

impl ValidationOutcome {
    pub fn valid(classification: impl Into<String>) -> Self {
        Self {
            is_valid: true,
            is_possible: true,
            classification: Some(classification.into()),
        }
    }

    pub fn possible(classification: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            is_possible: true,
            classification: Some(classification.into()),
        }
    }

    pub fn invalid() -> Self {
        Self {
            is_valid: false,
            is_possible: false,
            classification: None,
        }
    }

    /// Confidence earned by this outcome
    pub fn confidence(&self) -> ConfidenceLevel {
        if self.is_valid {
            ConfidenceLevel::High
        } else if self.is_possible {
            ConfidenceLevel::Medium
        } else {
            ConfidenceLevel::Low
        }
    }

    /// Short status label recorded in span metadata
    pub fn status(&self) -> &'static str {
        if self.is_valid {
            "valid"
        } else if self.is_possible {
            "possible"
        } else {
            "invalid"
        }
    }
}

/// Checks a single PII value's syntactic or semantic validity
pub trait StructuralValidator: Send + Sync {
    /// Validator name used in logs and suggestions
    fn name(&self) -> &str;

    /// Validate a candidate value
    fn validate(&self, candidate: &str) -> Result<ValidationOutcome, CollaboratorError>;
}

/// Type → validator dispatch table
#[derive(Clone, Default)]
pub struct ValidatorTable {
    validators: BTreeMap<PiiType, Arc<dyn StructuralValidator>>,
}

impl ValidatorTable {
    /// Empty table: every type is unvalidated
    pub fn new() -> Self {
        Self::default()
    }

    /// Built-in validators for email, phone, name and address
    pub fn builtin() -> Self {
        Self::new()
            .with_validator(PiiType::Email, Arc::new(EmailValidator))
            .with_validator(PiiType::Phone, Arc::new(PhoneValidator))
            .with_validator(PiiType::Name, Arc::new(NameValidator))
            .with_validator(PiiType::Address, Arc::new(AddressValidator))
    }

    /// Install or replace the validator for a type
    pub fn with_validator(
        mut self,
        pii_type: PiiType,
        validator: Arc<dyn StructuralValidator>,
    ) -> Self {
        self.validators.insert(pii_type, validator);
        self
    }

    /// Remove the validator for a type
    pub fn without(mut self, pii_type: PiiType) -> Self {
        self.validators.remove(&pii_type);
        self
    }

    pub fn get(&self, pii_type: PiiType) -> Option<&dyn StructuralValidator> {
        self.validators.get(&pii_type).map(|v| v.as_ref())
    }
}

impl fmt::Debug for ValidatorTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.validators.iter().map(|(t, v)| (t, v.name())))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_confidence_mapping() {
        assert_eq!(ValidationOutcome::valid("x").confidence(), ConfidenceLevel::High);
        assert_eq!(ValidationOutcome::possible("x").confidence(), ConfidenceLevel::Medium);
        assert_eq!(ValidationOutcome::invalid().confidence(), ConfidenceLevel::Low);
    }

    #[test]
    fn test_builtin_table_covers_validated_types() {
        let table = ValidatorTable::builtin();
        assert!(table.get(PiiType::Email).is_some());
        assert!(table.get(PiiType::Phone).is_some());
        assert!(table.get(PiiType::Ssn).is_none());
        assert!(table.get(PiiType::CreditCard).is_none());
    }

    #[test]
    fn test_without_removes_validator() {
        let table = ValidatorTable::builtin().without(PiiType::Email);
        assert!(table.get(PiiType::Email).is_none());
        assert!(format!("{table:?}").contains("phone"));
    }
}

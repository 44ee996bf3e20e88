//! Phone number validator
//!
//! Numbers starting with `+` are treated as international (E.164 length
//! rules). Everything else is checked against the North American numbering
//! plan: ten digits, or eleven with a leading `1`, and an area code that does
//! not start with 0 or 1.

use super::{StructuralValidator, ValidationOutcome};
use crate::domain::CollaboratorError;

/// Phone number validator
#[derive(Debug, Clone, Copy, Default)]
pub struct PhoneValidator;

impl PhoneValidator {
    fn validate_international(digits: &str) -> ValidationOutcome {
        match digits.len() {
            8..=15 if !digits.starts_with('0') => ValidationOutcome::valid("international"),
            7..=15 => ValidationOutcome::possible("international"),
            _ => ValidationOutcome::invalid(),
        }
    }

    fn validate_domestic(digits: &str) -> ValidationOutcome {
        let national = match digits.len() {
            10 => digits,
            11 if digits.starts_with('1') => &digits[1..],
            7..=15 => return ValidationOutcome::possible("unrecognized"),
            _ => return ValidationOutcome::invalid(),
        };

        match national.as_bytes().first() {
            Some(b'2'..=b'9') => ValidationOutcome::valid("domestic"),
            _ => ValidationOutcome::possible("domestic"),
        }
    }
}

impl StructuralValidator for PhoneValidator {
    fn name(&self) -> &str {
        "phone"
    }

    fn validate(&self, candidate: &str) -> Result<ValidationOutcome, CollaboratorError> {
        let digits: String = candidate.chars().filter(|c| c.is_ascii_digit()).collect();
        let outcome = if candidate.trim_start().starts_with('+') && !digits.starts_with('1') {
            Self::validate_international(&digits)
        } else {
            Self::validate_domestic(&digits)
        };
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("(555) 123-4567", "valid")]
    #[test_case("555-123-4567", "valid")]
    #[test_case("+1 555 123 4567", "valid")]
    #[test_case("1-555-123-4567", "valid")]
    #[test_case("(155) 123-4567", "possible"; "area code starting with one")]
    #[test_case("+44 20 7946 0958", "valid")]
    #[test_case("12-3456-789", "possible"; "nine digits")]
    #[test_case("12345", "invalid")]
    fn test_phone_validation(candidate: &str, expected: &str) {
        let outcome = PhoneValidator.validate(candidate).unwrap();
        assert_eq!(outcome.status(), expected);
    }

    #[test]
    fn test_classification_recorded() {
        let outcome = PhoneValidator.validate("+44 20 7946 0958").unwrap();
        assert_eq!(outcome.classification.as_deref(), Some("international"));
    }
}

//! Email syntax validator

use super::{StructuralValidator, ValidationOutcome};
use crate::domain::CollaboratorError;

const MAX_LOCAL_LEN: usize = 64;
const MAX_DOMAIN_LEN: usize = 253;

/// Syntactic email check: local part, dotted domain labels, alphabetic TLD
#[derive(Debug, Clone, Copy, Default)]
pub struct EmailValidator;

impl EmailValidator {
    fn local_part_ok(local: &str) -> bool {
        !local.is_empty()
            && local.len() <= MAX_LOCAL_LEN
            && !local.starts_with('.')
            && !local.ends_with('.')
            && !local.contains("..")
            && local
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || "._%+-".contains(c))
    }

    fn domain_ok(domain: &str) -> bool {
        if domain.is_empty() || domain.len() > MAX_DOMAIN_LEN {
            return false;
        }

        let labels: Vec<&str> = domain.split('.').collect();
        if labels.len() < 2 {
            return false;
        }

        let labels_ok = labels.iter().all(|label| {
            !label.is_empty()
                && label.len() <= 63
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        });

        let tld_ok = labels
            .last()
            .map(|tld| tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic()))
            .unwrap_or(false);

        labels_ok && tld_ok
    }
}

impl StructuralValidator for EmailValidator {
    fn name(&self) -> &str {
        "email"
    }

    fn validate(&self, candidate: &str) -> Result<ValidationOutcome, CollaboratorError> {
        let Some((local, domain)) = candidate.split_once('@') else {
            return Ok(ValidationOutcome::invalid());
        };

        if domain.contains('@') || !Self::local_part_ok(local) || !Self::domain_ok(domain) {
            return Ok(ValidationOutcome::invalid());
        }

        Ok(ValidationOutcome::valid("email"))
    }
}

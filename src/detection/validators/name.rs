//! Person-name and address validators used for NLP mentions

use super::{StructuralValidator, ValidationOutcome};
use crate::domain::CollaboratorError;
use regex::Regex;
use std::sync::OnceLock;

/// Capitalised words that start sentences or label fields rather than name people
pub(crate) const NON_NAME_WORDS: &[&str] = &[
    "A", "About", "Address", "After", "An", "And", "Ask", "At", "Attn", "Best", "By", "Call",
    "Contact", "Customer", "Dear", "Dr", "Email", "Emails", "For", "From", "Hello", "Hi", "If",
    "In", "Meet", "Mr", "Mrs", "Ms", "My", "Name", "Near", "Note", "Of", "On", "Or", "Our",
    "Patient", "Phone", "Please", "Prof", "Regards", "Send", "Sincerely", "Thank", "Thanks",
    "That", "The", "This", "To", "User", "Via", "We", "With", "Your",
    "Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday",
    "January", "February", "April", "June", "July", "August", "September", "October",
    "November", "December",
];

/// Street-type suffixes recognised in addresses
pub(crate) const STREET_SUFFIXES: &str =
    "Street|St|Avenue|Ave|Road|Rd|Boulevard|Blvd|Lane|Ln|Drive|Dr|Court|Ct|Way|Place|Pl|Terrace|Circle";

/// Whether a word is title-cased: leading uppercase letter, at least one
/// lowercase letter, letters plus `'`/`-` only
pub(crate) fn is_title_word(word: &str) -> bool {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) if first.is_uppercase() => {}
        _ => return false,
    }
    word.chars().any(|c| c.is_lowercase())
        && word.chars().all(|c| c.is_alphabetic() || c == '\'' || c == '-')
}

pub(crate) fn is_non_name_word(word: &str) -> bool {
    NON_NAME_WORDS.contains(&word)
}

fn street_address_regex() -> &'static Regex {
    static STREET: OnceLock<Regex> = OnceLock::new();
    STREET.get_or_init(|| {
        Regex::new(&format!(
            r"^\d{{1,6}}\s+(?:[A-Z][A-Za-z]*\.?\s+){{0,3}}(?:{STREET_SUFFIXES})\.?$"
        ))
        .expect("street address regex is valid")
    })
}

/// Person-name validator
///
/// Two to four title-cased tokens is a full name; a single one is only a
/// possible name.
#[derive(Debug, Clone, Copy, Default)]
pub struct NameValidator;

impl StructuralValidator for NameValidator {
    fn name(&self) -> &str {
        "name"
    }

    fn validate(&self, candidate: &str) -> Result<ValidationOutcome, CollaboratorError> {
        let tokens: Vec<&str> = candidate.split_whitespace().collect();
        let all_name_like = !tokens.is_empty()
            && tokens
                .iter()
                .all(|t| t.chars().count() >= 2 && is_title_word(t) && !is_non_name_word(t));

        let outcome = match tokens.len() {
            _ if !all_name_like => ValidationOutcome::invalid(),
            1 => ValidationOutcome::possible("single_name"),
            2..=4 => ValidationOutcome::valid("full_name"),
            _ => ValidationOutcome::invalid(),
        };
        Ok(outcome)
    }
}

/// Address-fragment validator
///
/// A house number, optional street words and a street suffix is a street
/// address; a short run of title-cased words is a possible place.
#[derive(Debug, Clone, Copy, Default)]
pub struct AddressValidator;

impl StructuralValidator for AddressValidator {
    fn name(&self) -> &str {
        "address"
    }

    fn validate(&self, candidate: &str) -> Result<ValidationOutcome, CollaboratorError> {
        let trimmed = candidate.trim();
        if street_address_regex().is_match(trimmed) {
            return Ok(ValidationOutcome::valid("street_address"));
        }

        let tokens: Vec<&str> = trimmed.split_whitespace().collect();
        let place_like = (1..=3).contains(&tokens.len())
            && tokens.iter().all(|t| is_title_word(t) && !is_non_name_word(t));

        if place_like {
            Ok(ValidationOutcome::possible("place"))
        } else {
            Ok(ValidationOutcome::invalid())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("John Doe", "valid")]
    #[test_case("Mary Ann O'Neil", "valid")]
    #[test_case("Jean-Luc Picard", "valid")]
    #[test_case("Madonna", "possible")]
    #[test_case("Contact John", "invalid")]
    #[test_case("john doe", "invalid")]
    #[test_case("ACME CORP", "invalid")]
    #[test_case("A B", "invalid"; "single letters")]
    fn test_name_validation(candidate: &str, expected: &str) {
        assert_eq!(NameValidator.validate(candidate).unwrap().status(), expected);
    }

    #[test_case("123 Main Street", "valid")]
    #[test_case("42 Elm St.", "valid")]
    #[test_case("1600 Pennsylvania Ave", "valid")]
    #[test_case("Springfield", "possible")]
    #[test_case("New York", "possible")]
    #[test_case("the corner shop", "invalid")]
    fn test_address_validation(candidate: &str, expected: &str) {
        assert_eq!(AddressValidator.validate(candidate).unwrap().status(), expected);
    }

    #[test]
    fn test_title_word() {
        assert!(is_title_word("McDonald"));
        assert!(!is_title_word("SSN"));
        assert!(!is_title_word("doe"));
        assert!(!is_title_word("R2d2"));
    }
}

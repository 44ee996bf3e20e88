//! False-positive filters
//!
//! A filter is a predicate over the matched text. Returning `false` rejects
//! the candidate. Filters run in registration order and stop at the first
//! rejection.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Well-known placeholder and advertising SSNs
const PLACEHOLDER_SSNS: [&str; 6] = [
    "000000000",
    "111111111",
    "123456789",
    "987654321",
    "078051120",
    "219099999",
];

/// Built-in filters, addressable by name from pattern library files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamedFilter {
    /// Card number passes the Luhn checksum
    Luhn,
    /// SSN is not a placeholder and has valid area/group/serial
    SsnNotPlaceholder,
    /// Every IPv4 octet is at most 255
    Ipv4Octets,
    /// 10 or 11 digits
    DomesticPhoneDigits,
    /// 7 to 15 digits
    InternationalPhoneDigits,
    /// ZIP is not all zeroes
    ZipNotPlaceholder,
    /// Parses as a real calendar date
    CalendarDate,
}

impl NamedFilter {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Luhn => "luhn",
            Self::SsnNotPlaceholder => "ssn_not_placeholder",
            Self::Ipv4Octets => "ipv4_octets",
            Self::DomesticPhoneDigits => "domestic_phone_digits",
            Self::InternationalPhoneDigits => "international_phone_digits",
            Self::ZipNotPlaceholder => "zip_not_placeholder",
            Self::CalendarDate => "calendar_date",
        }
    }

    /// Apply the filter
    pub fn accepts(&self, candidate: &str) -> bool {
        match self {
            Self::Luhn => passes_luhn(candidate),
            Self::SsnNotPlaceholder => is_plausible_ssn(candidate),
            Self::Ipv4Octets => has_valid_ipv4_octets(candidate),
            Self::DomesticPhoneDigits => (10..=11).contains(&digit_count(candidate)),
            Self::InternationalPhoneDigits => (7..=15).contains(&digit_count(candidate)),
            Self::ZipNotPlaceholder => !candidate.starts_with("00000"),
            Self::CalendarDate => is_calendar_date(candidate),
        }
    }
}

impl fmt::Display for NamedFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for NamedFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "luhn" => Ok(Self::Luhn),
            "ssn_not_placeholder" => Ok(Self::SsnNotPlaceholder),
            "ipv4_octets" => Ok(Self::Ipv4Octets),
            "domestic_phone_digits" => Ok(Self::DomesticPhoneDigits),
            "international_phone_digits" => Ok(Self::InternationalPhoneDigits),
            "zip_not_placeholder" => Ok(Self::ZipNotPlaceholder),
            "calendar_date" => Ok(Self::CalendarDate),
            _ => Err(format!("Unknown filter: {s}")),
        }
    }
}

/// A named predicate over matched text
#[derive(Clone)]
pub struct PatternFilter {
    name: String,
    predicate: Arc<dyn Fn(&str) -> bool + Send + Sync>,
}

impl PatternFilter {
    /// Wrap an arbitrary predicate
    pub fn new<F>(name: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            predicate: Arc::new(predicate),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn accepts(&self, candidate: &str) -> bool {
        (self.predicate)(candidate)
    }
}

impl From<NamedFilter> for PatternFilter {
    fn from(filter: NamedFilter) -> Self {
        Self::new(filter.name(), move |candidate| filter.accepts(candidate))
    }
}

impl fmt::Debug for PatternFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PatternFilter").field("name", &self.name).finish()
    }
}

/// Count ASCII digits in a candidate
pub fn digit_count(candidate: &str) -> usize {
    candidate.chars().filter(|c| c.is_ascii_digit()).count()
}

fn digits_of(candidate: &str) -> String {
    candidate.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Luhn checksum over the digits of a 13–19 digit card number
pub fn passes_luhn(candidate: &str) -> bool {
    let digits: Vec<u32> = candidate.chars().filter_map(|c| c.to_digit(10)).collect();

    if digits.len() < 13 || digits.len() > 19 {
        return false;
    }

    let sum: u32 = digits
        .iter()
        .rev()
        .enumerate()
        .map(|(idx, &d)| {
            if idx % 2 == 1 {
                let doubled = d * 2;
                if doubled > 9 {
                    doubled - 9
                } else {
                    doubled
                }
            } else {
                d
            }
        })
        .sum();

    sum % 10 == 0
}

/// SSN structure check plus placeholder rejection
pub fn is_plausible_ssn(candidate: &str) -> bool {
    let digits = digits_of(candidate);
    if digits.len() != 9 || PLACEHOLDER_SSNS.contains(&digits.as_str()) {
        return false;
    }

    let area = &digits[0..3];
    let group = &digits[3..5];
    let serial = &digits[5..9];
    area != "000" && area != "666" && group != "00" && serial != "0000"
}

/// Every dotted octet must be 0..=255
pub fn has_valid_ipv4_octets(candidate: &str) -> bool {
    let octets: Vec<&str> = candidate.split('.').collect();
    octets.len() == 4
        && octets
            .iter()
            .all(|o| !o.is_empty() && o.parse::<u16>().map(|v| v <= 255).unwrap_or(false))
}

/// Date in `MM/DD/YYYY`, `MM-DD-YYYY` or `YYYY-MM-DD` form that exists on the calendar
pub fn is_calendar_date(candidate: &str) -> bool {
    ["%m/%d/%Y", "%m-%d-%Y", "%Y-%m-%d"]
        .iter()
        .any(|fmt| NaiveDate::parse_from_str(candidate, fmt).is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("4111 1111 1111 1111", true)]
    #[test_case("4111-1111-1111-1112", false)]
    #[test_case("378282246310005", true)]
    #[test_case("1234", false)]
    fn test_luhn(candidate: &str, expected: bool) {
        assert_eq!(passes_luhn(candidate), expected);
    }

    #[test_case("555-55-5555", true)]
    #[test_case("123-45-6789", false; "sequential placeholder")]
    #[test_case("000-00-0000", false)]
    #[test_case("078-05-1120", false; "woolworth wallet card")]
    #[test_case("666-12-3456", false)]
    #[test_case("123-00-4567", false)]
    #[test_case("123-45-0000", false)]
    fn test_ssn_plausibility(candidate: &str, expected: bool) {
        assert_eq!(is_plausible_ssn(candidate), expected);
    }

    #[test_case("192.168.1.1", true)]
    #[test_case("255.255.255.255", true)]
    #[test_case("256.1.1.1", false)]
    #[test_case("10.0.0.999", false)]
    fn test_ipv4_octets(candidate: &str, expected: bool) {
        assert_eq!(has_valid_ipv4_octets(candidate), expected);
    }

    #[test]
    fn test_phone_digit_filters() {
        assert!(NamedFilter::DomesticPhoneDigits.accepts("(555) 123-4567"));
        assert!(NamedFilter::DomesticPhoneDigits.accepts("1-555-123-4567"));
        assert!(!NamedFilter::DomesticPhoneDigits.accepts("123-4567"));
        assert!(NamedFilter::InternationalPhoneDigits.accepts("+44 20 7946 0958"));
        assert!(!NamedFilter::InternationalPhoneDigits.accepts("+1 234"));
    }

    #[test_case("03/15/1985", true)]
    #[test_case("1985-03-15", true)]
    #[test_case("02/30/1990", false)]
    fn test_calendar_date(candidate: &str, expected: bool) {
        assert_eq!(is_calendar_date(candidate), expected);
    }

    #[test]
    fn test_named_filter_round_trip() {
        let filter: NamedFilter = "ipv4_octets".parse().unwrap();
        assert_eq!(filter, NamedFilter::Ipv4Octets);
        assert_eq!(filter.to_string(), "ipv4_octets");
        assert!("entropy".parse::<NamedFilter>().is_err());
    }

    #[test]
    fn test_custom_filter() {
        let filter = PatternFilter::new("not_test_domain", |c| !c.ends_with("@test.local"));
        assert!(filter.accepts("a@corp.com"));
        assert!(!filter.accepts("a@test.local"));
        assert_eq!(filter.name(), "not_test_domain");
    }
}

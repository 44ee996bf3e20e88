//! PII type, confidence and risk enumerations

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Category of personally identifiable information
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PiiType {
    /// Email addresses
    Email,
    /// Telephone numbers (domestic and international forms)
    Phone,
    /// US Social Security Numbers
    Ssn,
    /// Payment card numbers
    CreditCard,
    /// IPv4 and IPv6 addresses
    IpAddress,
    /// Person names
    Name,
    /// Street addresses and place names
    Address,
    /// Dates that look like birth dates
    DateOfBirth,
    /// US ZIP and ZIP+4 codes
    ZipCode,
}

impl PiiType {
    /// Every PII type, in declaration order
    pub const ALL: [PiiType; 9] = [
        PiiType::Email,
        PiiType::Phone,
        PiiType::Ssn,
        PiiType::CreditCard,
        PiiType::IpAddress,
        PiiType::Name,
        PiiType::Address,
        PiiType::DateOfBirth,
        PiiType::ZipCode,
    ];

    /// Get the canonical label for the type
    pub fn label(&self) -> &'static str {
        match self {
            Self::Email => "EMAIL",
            Self::Phone => "PHONE",
            Self::Ssn => "SSN",
            Self::CreditCard => "CREDIT_CARD",
            Self::IpAddress => "IP_ADDRESS",
            Self::Name => "NAME",
            Self::Address => "ADDRESS",
            Self::DateOfBirth => "DATE_OF_BIRTH",
            Self::ZipCode => "ZIP_CODE",
        }
    }

    /// Baseline risk of the type before any regime adjusts it
    pub fn default_risk_level(&self) -> RiskLevel {
        match self {
            Self::Ssn | Self::CreditCard => RiskLevel::Critical,
            Self::Address | Self::DateOfBirth => RiskLevel::High,
            Self::Email | Self::Phone | Self::Name => RiskLevel::Medium,
            Self::IpAddress | Self::ZipCode => RiskLevel::Low,
        }
    }

    /// Types whose exposure is treated as critical (financial/government identifiers)
    pub fn is_critical(&self) -> bool {
        matches!(self, Self::Ssn | Self::CreditCard)
    }

    /// Types that are contact channels and need consent to process
    pub fn is_contact(&self) -> bool {
        matches!(self, Self::Email | Self::Phone)
    }
}

impl fmt::Display for PiiType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PiiType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().replace(['-', ' '], "_").as_str() {
            "EMAIL" => Ok(Self::Email),
            "PHONE" => Ok(Self::Phone),
            "SSN" => Ok(Self::Ssn),
            "CREDIT_CARD" | "CREDITCARD" => Ok(Self::CreditCard),
            "IP_ADDRESS" | "IPADDRESS" | "IP" => Ok(Self::IpAddress),
            "NAME" | "PERSON" => Ok(Self::Name),
            "ADDRESS" | "LOCATION" => Ok(Self::Address),
            "DATE_OF_BIRTH" | "DATEOFBIRTH" | "DOB" => Ok(Self::DateOfBirth),
            "ZIP_CODE" | "ZIPCODE" | "ZIP" => Ok(Self::ZipCode),
            _ => Err(format!("Unknown PII type: {s}")),
        }
    }
}

/// Ordinal strength-of-belief label
///
/// Each level maps to a fixed weight used for thresholding and averaging.
/// The weight never leaves the crate as a raw score on a span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceLevel {
    Low,
    Medium,
    High,
    VeryHigh,
}

impl ConfidenceLevel {
    /// Numeric weight of the level
    pub fn weight(&self) -> f64 {
        match self {
            Self::Low => 0.3,
            Self::Medium => 0.5,
            Self::High => 0.7,
            Self::VeryHigh => 0.9,
        }
    }

    /// Bucket an averaged weight back into a level
    pub fn from_weight(weight: f64) -> Self {
        if weight >= 0.8 {
            Self::VeryHigh
        } else if weight >= 0.6 {
            Self::High
        } else if weight >= 0.4 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::VeryHigh => "very_high",
        };
        f.write_str(s)
    }
}

/// Severity classification of a PII type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    /// The next level up, saturating at `Critical`
    pub fn elevated(&self) -> Self {
        match self {
            Self::Low => Self::Medium,
            Self::Medium => Self::High,
            Self::High | Self::Critical => Self::Critical,
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        };
        f.write_str(s)
    }
}

impl FromStr for RiskLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "critical" => Ok(Self::Critical),
            _ => Err(format!("Unknown risk level: {s}")),
        }
    }
}

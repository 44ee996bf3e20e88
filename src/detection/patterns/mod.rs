//! Pattern library for PII detection
//!
//! The [`PatternRegistry`] holds an ordered list of [`PiiPattern`]s. Several
//! patterns may share a type (domestic and international phone forms, for
//! instance); registering another pattern for a type is additive.
//!
//! Custom patterns can be loaded from a TOML pattern library:
//!
//! ```toml
//! [patterns.employee_id]
//! category = "SSN"
//! description = "Employee ID in SSN form"
//! risk_level = "high"
//! engine = "fancy"
//! patterns = ['(?<=EMP-)\d{3}-\d{2}-\d{4}']
//! filters = ["ssn_not_placeholder"]
//! ```

pub mod filters;
pub mod matcher;

pub use filters::{NamedFilter, PatternFilter};
pub use matcher::{MatchRange, Matcher, MatcherEngine};

use crate::detection::models::{PiiType, RiskLevel};
use crate::domain::{PiiScopeError, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// A PII pattern definition
#[derive(Debug, Clone)]
pub struct PiiPattern {
    /// PII type produced by this pattern
    pub pii_type: PiiType,
    /// Compiled matcher
    pub matcher: Matcher,
    /// Human-readable description, recorded in span metadata
    pub description: String,
    /// Risk level recorded in span metadata
    pub risk_level: RiskLevel,
    /// False-positive filters, applied in order
    pub filters: Vec<PatternFilter>,
}

impl PiiPattern {
    /// Create a pattern with the type's default risk level and no filters
    pub fn new(pii_type: PiiType, matcher: Matcher, description: impl Into<String>) -> Self {
        Self {
            pii_type,
            matcher,
            description: description.into(),
            risk_level: pii_type.default_risk_level(),
            filters: Vec::new(),
        }
    }

    /// Compile a `regex` pattern
    pub fn regex(pii_type: PiiType, pattern: &str, description: impl Into<String>) -> Result<Self> {
        Ok(Self::new(pii_type, Matcher::regex(pattern)?, description))
    }

    /// Set the risk level
    pub fn with_risk_level(mut self, risk_level: RiskLevel) -> Self {
        self.risk_level = risk_level;
        self
    }

    /// Append a false-positive filter
    pub fn with_filter(mut self, filter: impl Into<PatternFilter>) -> Self {
        self.filters.push(filter.into());
        self
    }

    /// Run the filter chain; `false` on the first rejection
    pub fn passes_filters(&self, candidate: &str) -> bool {
        self.filters.iter().all(|f| f.accepts(candidate))
    }
}

/// Pattern definition from TOML
#[derive(Debug, Clone, Deserialize)]
pub struct PatternDefinition {
    /// Regex patterns for this category
    pub patterns: Vec<String>,
    /// PII type label
    pub category: String,
    /// Description (defaults to the table name)
    #[serde(default)]
    pub description: Option<String>,
    /// Risk level (defaults to the type's baseline)
    #[serde(default)]
    pub risk_level: Option<String>,
    /// Matching engine
    #[serde(default)]
    pub engine: MatcherEngine,
    /// Named false-positive filters
    #[serde(default)]
    pub filters: Vec<String>,
}

/// Pattern library container
#[derive(Debug, Deserialize)]
struct PatternLibrary {
    patterns: BTreeMap<String, PatternDefinition>,
}

/// Ordered registry of PII patterns
#[derive(Debug, Clone, Default)]
pub struct PatternRegistry {
    patterns: Vec<PiiPattern>,
}

impl PatternRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the built-in patterns
    pub fn default_patterns() -> Result<Self> {
        let mut registry = Self::new();
        for pattern in builtin_patterns()? {
            registry.register(pattern)?;
        }
        Ok(registry)
    }

    /// Create a pattern registry from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            PiiScopeError::Configuration(format!(
                "Failed to read pattern library {}: {e}",
                path.as_ref().display()
            ))
        })?;

        Self::from_toml(&content)
    }

    /// Create a pattern registry from TOML content
    ///
    /// Tables are registered in name order.
    pub fn from_toml(content: &str) -> Result<Self> {
        let library: PatternLibrary = toml::from_str(content)?;
        let mut registry = Self::new();

        for (name, def) in library.patterns {
            let pii_type: PiiType = def.category.parse().map_err(|e| {
                PiiScopeError::Configuration(format!("Invalid category in pattern '{name}': {e}"))
            })?;

            let risk_level = match def.risk_level.as_deref() {
                Some(level) => level.parse().map_err(|e| {
                    PiiScopeError::Configuration(format!(
                        "Invalid risk_level in pattern '{name}': {e}"
                    ))
                })?,
                None => pii_type.default_risk_level(),
            };

            let filters = def
                .filters
                .iter()
                .map(|f| {
                    f.parse::<NamedFilter>().map_err(|e| {
                        PiiScopeError::Configuration(format!("Invalid filter in pattern '{name}': {e}"))
                    })
                })
                .collect::<Result<Vec<_>>>()?;

            let description = def.description.clone().unwrap_or_else(|| name.clone());

            for pattern_str in &def.patterns {
                let matcher = Matcher::compile(def.engine, pattern_str).map_err(|e| {
                    PiiScopeError::Configuration(format!("Pattern '{name}': {e}"))
                })?;

                let mut pattern = PiiPattern::new(pii_type, matcher, description.clone())
                    .with_risk_level(risk_level);
                for filter in &filters {
                    pattern = pattern.with_filter(*filter);
                }
                registry.register(pattern)?;
            }
        }

        Ok(registry)
    }

    /// Register a pattern after the existing ones
    ///
    /// Only an empty matcher is rejected; everything else fails at match time.
    pub fn register(&mut self, pattern: PiiPattern) -> Result<()> {
        if pattern.matcher.is_empty() {
            return Err(PiiScopeError::Configuration(format!(
                "Pattern '{}' for {} has an empty matcher",
                pattern.description, pattern.pii_type
            )));
        }
        self.patterns.push(pattern);
        Ok(())
    }

    /// Register several patterns in order
    pub fn extend<I: IntoIterator<Item = PiiPattern>>(&mut self, patterns: I) -> Result<()> {
        for pattern in patterns {
            self.register(pattern)?;
        }
        Ok(())
    }

    /// Remove every pattern of a type, returning how many were removed
    pub fn unregister(&mut self, pii_type: PiiType) -> usize {
        let before = self.patterns.len();
        self.patterns.retain(|p| p.pii_type != pii_type);
        before - self.patterns.len()
    }

    /// All patterns in registration order
    pub fn list(&self) -> &[PiiPattern] {
        &self.patterns
    }

    /// Patterns for a specific type
    pub fn patterns_for_type(&self, pii_type: PiiType) -> impl Iterator<Item = &PiiPattern> {
        self.patterns.iter().filter(move |p| p.pii_type == pii_type)
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

/// Built-in pattern set, in registration order
fn builtin_patterns() -> Result<Vec<PiiPattern>> {
    Ok(vec![
        PiiPattern::regex(
            PiiType::Email,
            r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b",
            "Email address",
        )?,
        PiiPattern::regex(
            PiiType::Phone,
            r"(?:\+?1[-.\s]?)?(?:\(\d{3}\)|\b\d{3})[-.\s]?\d{3}[-.\s]?\d{4}\b",
            "Domestic phone number",
        )?
        .with_filter(NamedFilter::DomesticPhoneDigits),
        PiiPattern::regex(
            PiiType::Phone,
            r"\+[2-9]\d{0,2}(?:[-.\s]?\d{2,4}){2,5}\b",
            "International phone number",
        )?
        .with_filter(NamedFilter::InternationalPhoneDigits),
        PiiPattern::regex(PiiType::Ssn, r"\b\d{3}-\d{2}-\d{4}\b", "Social Security Number")?
            .with_filter(NamedFilter::SsnNotPlaceholder),
        PiiPattern::regex(
            PiiType::CreditCard,
            r"\b(?:\d{4}[-\s]?){3}\d{4}\b|\b3[47]\d{2}[-\s]?\d{6}[-\s]?\d{5}\b",
            "Payment card number",
        )?
        .with_filter(NamedFilter::Luhn),
        PiiPattern::regex(PiiType::IpAddress, r"\b(?:\d{1,3}\.){3}\d{1,3}\b", "IPv4 address")?
            .with_filter(NamedFilter::Ipv4Octets),
        PiiPattern::regex(
            PiiType::IpAddress,
            r"\b(?:[0-9A-Fa-f]{1,4}:){7}[0-9A-Fa-f]{1,4}\b",
            "IPv6 address",
        )?,
        PiiPattern::regex(
            PiiType::DateOfBirth,
            r"\b(?:0?[1-9]|1[0-2])[/-](?:0?[1-9]|[12]\d|3[01])[/-](?:19|20)\d{2}\b",
            "Date (US form)",
        )?
        .with_filter(NamedFilter::CalendarDate),
        PiiPattern::regex(
            PiiType::DateOfBirth,
            r"\b(?:19|20)\d{2}-(?:0[1-9]|1[0-2])-(?:0[1-9]|[12]\d|3[01])\b",
            "Date (ISO form)",
        )?
        .with_filter(NamedFilter::CalendarDate),
        PiiPattern::regex(PiiType::ZipCode, r"\b\d{5}(?:-\d{4})?\b", "US ZIP code")?
            .with_filter(NamedFilter::ZipNotPlaceholder),
        PiiPattern::regex(
            PiiType::Address,
            r"\b\d{1,6}\s+(?:[A-Z][a-z]+\s+){1,3}(?:Street|St|Avenue|Ave|Road|Rd|Boulevard|Blvd|Lane|Ln|Drive|Dr|Court|Ct|Way|Place|Pl|Terrace|Circle)\b",
            "Street address",
        )?,
    ])
}

//! Policy rule types
//!
//! A [`PolicyRule`] describes how one PII type may be handled. Rules coming
//! from configuration files arrive as [`PolicyRuleConfig`] with string-typed
//! fields and are validated on conversion.

use crate::detection::models::{PiiType, RiskLevel};
use crate::detection::Metadata;
use crate::domain::PolicyConfigurationError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// An action a system might take on PII
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyOperation {
    Log,
    Store,
    Process,
    Display,
    Transfer,
    Export,
}

impl PolicyOperation {
    pub const ALL: [PolicyOperation; 6] = [
        Self::Log,
        Self::Store,
        Self::Process,
        Self::Display,
        Self::Transfer,
        Self::Export,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Log => "log",
            Self::Store => "store",
            Self::Process => "process",
            Self::Display => "display",
            Self::Transfer => "transfer",
            Self::Export => "export",
        }
    }
}

impl fmt::Display for PolicyOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PolicyOperation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "log" | "logging" => Ok(Self::Log),
            "store" | "storage" => Ok(Self::Store),
            "process" | "processing" => Ok(Self::Process),
            "display" => Ok(Self::Display),
            "transfer" => Ok(Self::Transfer),
            "export" => Ok(Self::Export),
            _ => Err(format!("Unknown policy operation: {s}")),
        }
    }
}

/// Compliance rule for one PII type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyRule {
    #[serde(rename = "type")]
    pub pii_type: PiiType,
    pub risk_level: RiskLevel,
    pub allow_logging: bool,
    pub require_masking: bool,
    pub require_encryption: bool,
    pub retention_days: u32,
    pub allowed_operations: BTreeSet<PolicyOperation>,
}

impl PolicyRule {
    /// Rule with the type's default risk level, no obligations and no operations
    pub fn new(pii_type: PiiType) -> Self {
        Self {
            pii_type,
            risk_level: pii_type.default_risk_level(),
            allow_logging: false,
            require_masking: false,
            require_encryption: false,
            retention_days: 0,
            allowed_operations: BTreeSet::new(),
        }
    }

    pub fn with_risk_level(mut self, risk_level: RiskLevel) -> Self {
        self.risk_level = risk_level;
        self
    }

    pub fn with_logging(mut self, allow: bool) -> Self {
        self.allow_logging = allow;
        self
    }

    pub fn with_masking(mut self, require: bool) -> Self {
        self.require_masking = require;
        self
    }

    pub fn with_encryption(mut self, require: bool) -> Self {
        self.require_encryption = require;
        self
    }

    pub fn with_retention_days(mut self, days: u32) -> Self {
        self.retention_days = days;
        self
    }

    pub fn with_operations<I: IntoIterator<Item = PolicyOperation>>(mut self, ops: I) -> Self {
        self.allowed_operations = ops.into_iter().collect();
        self
    }

    pub fn allows(&self, operation: PolicyOperation) -> bool {
        self.allowed_operations.contains(&operation)
    }

    /// Check the structural requirements of a rule
    pub fn validate(&self) -> Result<(), PolicyConfigurationError> {
        if self.allowed_operations.is_empty() {
            return Err(PolicyConfigurationError::new(
                "allowed_operations",
                "must list at least one operation",
            ));
        }
        Ok(())
    }
}

/// Rule as written in configuration, before validation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyRuleConfig {
    #[serde(rename = "type")]
    pub pii_type: String,
    pub risk_level: String,
    pub allow_logging: bool,
    pub require_masking: bool,
    pub require_encryption: bool,
    pub retention_days: i64,
    pub allowed_operations: Vec<String>,
}

impl TryFrom<PolicyRuleConfig> for PolicyRule {
    type Error = PolicyConfigurationError;

    fn try_from(config: PolicyRuleConfig) -> Result<Self, Self::Error> {
        if config.pii_type.trim().is_empty() {
            return Err(PolicyConfigurationError::new("type", "is required"));
        }
        let pii_type: PiiType = config
            .pii_type
            .parse()
            .map_err(|e: String| PolicyConfigurationError::new("type", e))?;

        let risk_level = if config.risk_level.trim().is_empty() {
            pii_type.default_risk_level()
        } else {
            config
                .risk_level
                .parse()
                .map_err(|e: String| PolicyConfigurationError::new("risk_level", e))?
        };

        if config.retention_days < 0 {
            return Err(PolicyConfigurationError::new(
                "retention_days",
                format!("must be >= 0, got {}", config.retention_days),
            ));
        }
        let retention_days = u32::try_from(config.retention_days).map_err(|_| {
            PolicyConfigurationError::new("retention_days", "exceeds the supported range")
        })?;

        let allowed_operations = config
            .allowed_operations
            .iter()
            .map(|op| op.parse::<PolicyOperation>())
            .collect::<Result<BTreeSet<_>, _>>()
            .map_err(|e| PolicyConfigurationError::new("allowed_operations", e))?;

        let rule = PolicyRule {
            pii_type,
            risk_level,
            allow_logging: config.allow_logging,
            require_masking: config.require_masking,
            require_encryption: config.require_encryption,
            retention_days,
            allowed_operations,
        };
        rule.validate()?;
        Ok(rule)
    }
}

/// Allow/deny outcome plus handling obligations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyDecision {
    pub allowed: bool,
    pub requires_masking: bool,
    pub requires_encryption: bool,
    pub reason: String,
    #[serde(default)]
    pub metadata: Metadata,
}

impl PolicyDecision {
    pub fn allow(reason: impl Into<String>) -> Self {
        Self {
            allowed: true,
            requires_masking: false,
            requires_encryption: false,
            reason: reason.into(),
            metadata: Metadata::new(),
        }
    }

    pub fn deny(reason: impl Into<String>) -> Self {
        Self {
            allowed: false,
            ..Self::allow(reason)
        }
    }

    pub fn with_masking(mut self, require: bool) -> Self {
        self.requires_masking = require;
        self
    }

    pub fn with_encryption(mut self, require: bool) -> Self {
        self.requires_encryption = require;
        self
    }

    pub fn with_metadata(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.metadata.insert(key.to_string(), value.into());
        self
    }
}

//! Matcher abstraction over the regex engines
//!
//! A matcher finds all non-overlapping matches in a text, with byte offsets.
//! `regex` is the default engine; `fancy-regex` is available for custom
//! patterns that need look-around or back-references.

use crate::domain::{PiiScopeError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Matching engine selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatcherEngine {
    /// `regex` crate, linear-time matching
    #[default]
    Regex,
    /// `fancy-regex` crate, backtracking with look-around
    Fancy,
}

impl fmt::Display for MatcherEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Regex => write!(f, "regex"),
            Self::Fancy => write!(f, "fancy"),
        }
    }
}

/// A match location
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchRange {
    pub start: usize,
    pub end: usize,
}

/// Compiled matcher
#[derive(Debug, Clone)]
pub enum Matcher {
    Regex(regex::Regex),
    Fancy(fancy_regex::Regex),
}

/// Runtime failure of a matcher (only the fancy engine can fail mid-scan)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatcherError(pub String);

impl Matcher {
    /// Compile a pattern with the given engine
    pub fn compile(engine: MatcherEngine, pattern: &str) -> Result<Self> {
        match engine {
            MatcherEngine::Regex => regex::Regex::new(pattern)
                .map(Self::Regex)
                .map_err(|e| PiiScopeError::Configuration(format!("Invalid regex pattern: {e}"))),
            MatcherEngine::Fancy => fancy_regex::Regex::new(pattern)
                .map(Self::Fancy)
                .map_err(|e| {
                    PiiScopeError::Configuration(format!("Invalid fancy-regex pattern: {e}"))
                }),
        }
    }

    /// Compile with the default `regex` engine
    pub fn regex(pattern: &str) -> Result<Self> {
        Self::compile(MatcherEngine::Regex, pattern)
    }

    pub fn engine(&self) -> MatcherEngine {
        match self {
            Self::Regex(_) => MatcherEngine::Regex,
            Self::Fancy(_) => MatcherEngine::Fancy,
        }
    }

    /// Source pattern text
    pub fn as_str(&self) -> &str {
        match self {
            Self::Regex(re) => re.as_str(),
            Self::Fancy(re) => re.as_str(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.as_str().is_empty()
    }

    /// Find all non-overlapping matches, in order
    pub fn find_all(&self, text: &str) -> std::result::Result<Vec<MatchRange>, MatcherError> {
        match self {
            Self::Regex(re) => Ok(re
                .find_iter(text)
                .map(|m| MatchRange {
                    start: m.start(),
                    end: m.end(),
                })
                .collect()),
            Self::Fancy(re) => {
                let mut ranges = Vec::new();
                for found in re.find_iter(text) {
                    let m = found.map_err(|e| MatcherError(e.to_string()))?;
                    ranges.push(MatchRange {
                        start: m.start(),
                        end: m.end(),
                    });
                }
                Ok(ranges)
            }
        }
    }
}

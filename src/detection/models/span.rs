//! Detection span and result models

use super::pii_type::{ConfidenceLevel, PiiType};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Opaque key-value metadata attached to spans, results and decisions
pub type Metadata = BTreeMap<String, serde_json::Value>;

/// Where a span came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpanSource {
    /// Pattern matcher plus false-positive filters
    Pattern,
    /// External natural-language entity extractor
    Nlp,
}

impl SpanSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pattern => "pattern",
            Self::Nlp => "nlp",
        }
    }
}

/// A located, typed, confidence-scored substring identified as PII
///
/// `start`/`end` are half-open UTF-8 byte offsets into the scanned text,
/// so `&text[span.start..span.end] == span.text`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionSpan {
    /// PII type
    #[serde(rename = "type")]
    pub pii_type: PiiType,
    /// Start offset (inclusive)
    pub start: usize,
    /// End offset (exclusive)
    pub end: usize,
    /// Matched substring
    pub text: String,
    /// Resolved confidence
    pub confidence: ConfidenceLevel,
    /// Span metadata (pattern description, risk level, source, context)
    #[serde(default)]
    pub metadata: Metadata,
}

impl DetectionSpan {
    /// Create a span over `text[start..end]`
    pub fn new(
        pii_type: PiiType,
        start: usize,
        end: usize,
        text: impl Into<String>,
        confidence: ConfidenceLevel,
    ) -> Self {
        Self {
            pii_type,
            start,
            end,
            text: text.into(),
            confidence,
            metadata: Metadata::new(),
        }
    }

    /// Attach a metadata entry
    pub fn with_metadata(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.metadata.insert(key.to_string(), value.into());
        self
    }

    /// Span length in bytes
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Source recorded in metadata, defaulting to pattern
    pub fn source(&self) -> SpanSource {
        match self.metadata.get("source").and_then(|v| v.as_str()) {
            Some("nlp") => SpanSource::Nlp,
            _ => SpanSource::Pattern,
        }
    }
}

/// Unified result of a detection run
///
/// Invariants: `has_pii == !spans.is_empty()`, and `detected_types` is
/// exactly the set of span types. Build through [`PiiDetectionResult::new`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PiiDetectionResult {
    /// Whether any span survived threshold filtering
    pub has_pii: bool,
    /// Distinct span types
    pub detected_types: BTreeSet<PiiType>,
    /// Spans in document order
    pub spans: Vec<DetectionSpan>,
    /// Advisory suggestions
    pub suggestions: Vec<String>,
    /// Aggregate (pre-filter) confidence
    pub confidence: ConfidenceLevel,
    /// Run metadata
    #[serde(default)]
    pub metadata: Metadata,
}

impl PiiDetectionResult {
    /// Build a result, deriving `has_pii` and `detected_types` from the spans
    pub fn new(
        spans: Vec<DetectionSpan>,
        suggestions: Vec<String>,
        confidence: ConfidenceLevel,
        metadata: Metadata,
    ) -> Self {
        let detected_types = spans.iter().map(|s| s.pii_type).collect();
        Self {
            has_pii: !spans.is_empty(),
            detected_types,
            spans,
            suggestions,
            confidence,
            metadata,
        }
    }

    /// Result with no spans
    pub fn empty() -> Self {
        Self::new(Vec::new(), Vec::new(), ConfidenceLevel::Low, Metadata::new())
    }

    /// Span count per type, with every type present (zero when absent)
    pub fn count_by_type(&self) -> BTreeMap<PiiType, usize> {
        let mut counts: BTreeMap<PiiType, usize> =
            PiiType::ALL.iter().map(|t| (*t, 0)).collect();
        for span in &self.spans {
            *counts.entry(span.pii_type).or_insert(0) += 1;
        }
        counts
    }

    /// Spans of a single type
    pub fn spans_of(&self, pii_type: PiiType) -> impl Iterator<Item = &DetectionSpan> {
        self.spans.iter().filter(move |s| s.pii_type == pii_type)
    }

    /// Total number of spans
    pub fn total_spans(&self) -> usize {
        self.spans.len()
    }
}

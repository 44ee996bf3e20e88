//! Pattern-based span extractor
//!
//! For every pattern in registration order (registry first, then the
//! caller's custom patterns) the extractor scans the whole text, runs the
//! false-positive filter chain, consults the type's structural validator and
//! emits a [`DetectionSpan`]. Spans from different patterns are never
//! deduplicated against each other.

use crate::detection::models::{ConfidenceLevel, DetectionSpan, PiiType, SpanSource};
use crate::detection::options::DetectionOptions;
use crate::detection::patterns::{PatternRegistry, PiiPattern};
use crate::detection::validators::ValidatorTable;
use crate::domain::{CollaboratorError, DetectionError};
use std::collections::BTreeMap;
use std::ops::ControlFlow;
use std::sync::Arc;

/// Spans plus the collaborator failures met while producing them
#[derive(Debug, Default)]
pub struct Extraction {
    /// Emitted spans, in pattern-then-match order
    pub spans: Vec<DetectionSpan>,
    /// Validator failures, one per affected type
    pub validator_failures: BTreeMap<PiiType, CollaboratorError>,
    /// Raw matches before filtering
    pub candidates: usize,
    /// Matches rejected by a false-positive filter
    pub filtered: usize,
}

/// Pattern-based span extractor
#[derive(Debug, Clone)]
pub struct SpanExtractor {
    registry: Arc<PatternRegistry>,
    validators: Arc<ValidatorTable>,
}

impl SpanExtractor {
    /// Create an extractor over a registry and validator table
    pub fn new(registry: Arc<PatternRegistry>, validators: Arc<ValidatorTable>) -> Self {
        Self {
            registry,
            validators,
        }
    }

    pub fn registry(&self) -> &PatternRegistry {
        &self.registry
    }

    pub fn validators(&self) -> &ValidatorTable {
        &self.validators
    }

    /// Swap the validator table, sharing the same pattern registry
    pub fn with_validators(self, validators: Arc<ValidatorTable>) -> Self {
        Self {
            registry: self.registry,
            validators,
        }
    }

    /// Extract every span
    pub fn extract(
        &self,
        text: &str,
        options: &DetectionOptions,
    ) -> Result<Extraction, DetectionError> {
        self.scan(text, options, |_| ControlFlow::Continue(()))
    }

    /// Stop at the first span whose confidence meets `threshold`
    pub fn extract_first(
        &self,
        text: &str,
        options: &DetectionOptions,
    ) -> Result<Extraction, DetectionError> {
        let threshold = options.confidence_threshold;
        self.scan(text, options, |span| {
            if span.confidence.weight() >= threshold {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        })
    }

    fn scan<F>(
        &self,
        text: &str,
        options: &DetectionOptions,
        mut on_span: F,
    ) -> Result<Extraction, DetectionError>
    where
        F: FnMut(&DetectionSpan) -> ControlFlow<()>,
    {
        let mut extraction = Extraction::default();
        let patterns = self
            .registry
            .list()
            .iter()
            .chain(options.custom_patterns.iter());

        for pattern in patterns {
            let ranges = pattern.matcher.find_all(text).map_err(|e| {
                tracing::warn!(
                    pii_type = %pattern.pii_type,
                    pattern = %pattern.description,
                    error = %e.0,
                    "Matcher failed"
                );
                DetectionError::MatcherFailed {
                    pii_type: pattern.pii_type,
                    pattern: pattern.description.clone(),
                }
            })?;

            tracing::debug!(
                pii_type = %pattern.pii_type,
                pattern = %pattern.description,
                matches = ranges.len(),
                "Pattern scanned"
            );

            for range in ranges {
                extraction.candidates += 1;
                let candidate = &text[range.start..range.end];

                if !pattern.passes_filters(candidate) {
                    extraction.filtered += 1;
                    continue;
                }

                let Some(span) = self.build_span(
                    pattern,
                    text,
                    range.start,
                    range.end,
                    options,
                    &mut extraction.validator_failures,
                ) else {
                    continue;
                };

                let flow = on_span(&span);
                extraction.spans.push(span);
                if flow.is_break() {
                    return Ok(extraction);
                }
            }
        }

        Ok(extraction)
    }

    /// Resolve confidence for one filtered candidate; `None` drops it
    fn build_span(
        &self,
        pattern: &PiiPattern,
        text: &str,
        start: usize,
        end: usize,
        options: &DetectionOptions,
        failures: &mut BTreeMap<PiiType, CollaboratorError>,
    ) -> Option<DetectionSpan> {
        let candidate = &text[start..end];

        let (confidence, status, classification) = match self.validators.get(pattern.pii_type) {
            None => (ConfidenceLevel::High, "unvalidated", None),
            Some(validator) => match validator.validate(candidate) {
                Ok(outcome) => {
                    if options.strict_mode && !outcome.is_valid {
                        return None;
                    }
                    (outcome.confidence(), outcome.status(), outcome.classification)
                }
                Err(e) => {
                    tracing::warn!(
                        pii_type = %pattern.pii_type,
                        validator = validator.name(),
                        error = %e,
                        "Structural validator failed"
                    );
                    failures.entry(pattern.pii_type).or_insert(e);
                    if options.strict_mode {
                        return None;
                    }
                    (ConfidenceLevel::Low, "error", None)
                }
            },
        };

        let mut span = DetectionSpan::new(pattern.pii_type, start, end, candidate, confidence)
            .with_metadata("source", SpanSource::Pattern.as_str())
            .with_metadata("description", pattern.description.as_str())
            .with_metadata("risk_level", pattern.risk_level.to_string())
            .with_metadata("validation", status);

        if let Some(classification) = classification {
            span = span.with_metadata("classification", classification);
        }
        if options.include_context {
            span = span.with_metadata(
                "context",
                capture_context(text, start, end, options.context_window),
            );
        }

        Some(span)
    }
}

/// Up to `window` characters either side of `text[start..end]`, span included
pub(crate) fn capture_context(text: &str, start: usize, end: usize, window: usize) -> String {
    let before_start = text[..start]
        .char_indices()
        .rev()
        .nth(window.saturating_sub(1))
        .map(|(idx, _)| idx)
        .unwrap_or(0);
    let before_start = if window == 0 { start } else { before_start };

    let after_end = text[end..]
        .char_indices()
        .nth(window)
        .map(|(idx, _)| end + idx)
        .unwrap_or(text.len());

    text[before_start..after_end].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::validators::{StructuralValidator, ValidationOutcome};

    fn extractor() -> SpanExtractor {
        SpanExtractor::new(
            Arc::new(PatternRegistry::default_patterns().unwrap()),
            Arc::new(ValidatorTable::builtin()),
        )
    }

    #[test]
    fn test_detect_email() {
        let extraction = extractor()
            .extract("Contact: john.doe@example.com", &DetectionOptions::default())
            .unwrap();

        let email = extraction
            .spans
            .iter()
            .find(|s| s.pii_type == PiiType::Email)
            .unwrap();
        assert_eq!(email.text, "john.doe@example.com");
        assert_eq!(email.confidence, ConfidenceLevel::High);
        assert_eq!(email.metadata["validation"], "valid");
    }

    #[test]
    fn test_ssn_without_validator_is_high() {
        let text = "My SSN is 555-55-5555";
        let extraction = extractor().extract(text, &DetectionOptions::default()).unwrap();
        let ssn: Vec<_> = extraction
            .spans
            .iter()
            .filter(|s| s.pii_type == PiiType::Ssn)
            .collect();

        assert_eq!(ssn.len(), 1);
        assert_eq!(ssn[0].confidence, ConfidenceLevel::High);
        assert_eq!(&text[ssn[0].start..ssn[0].end], "555-55-5555");
    }

    #[test]
    fn test_placeholder_ssn_filtered() {
        let extraction = extractor()
            .extract("SSN 123-45-6789", &DetectionOptions::default())
            .unwrap();
        assert!(extraction.spans.iter().all(|s| s.pii_type != PiiType::Ssn));
        assert!(extraction.filtered >= 1);
    }

    #[test]
    fn test_invalid_ipv4_filtered() {
        let extraction = extractor()
            .extract("host 999.1.1.1 and 10.0.0.1", &DetectionOptions::default())
            .unwrap();
        let ips: Vec<_> = extraction
            .spans
            .iter()
            .filter(|s| s.pii_type == PiiType::IpAddress)
            .map(|s| s.text.as_str())
            .collect();
        assert_eq!(ips, vec!["10.0.0.1"]);
    }

    #[test]
    fn test_possible_phone_downgraded_then_dropped_in_strict() {
        let text = "dial (155) 123-4567";
        let lenient = extractor().extract(text, &DetectionOptions::default()).unwrap();
        let phone = lenient
            .spans
            .iter()
            .find(|s| s.pii_type == PiiType::Phone)
            .unwrap();
        assert_eq!(phone.confidence, ConfidenceLevel::Medium);

        let strict = extractor()
            .extract(text, &DetectionOptions::default().with_strict_mode(true))
            .unwrap();
        assert!(strict.spans.iter().all(|s| s.pii_type != PiiType::Phone));
    }

    #[test]
    fn test_custom_patterns_scanned_after_registry() {
        let custom = PiiPattern::regex(PiiType::Ssn, r"\bEMP\d{6}\b", "Employee number").unwrap();
        let options = DetectionOptions::default().with_custom_pattern(custom);
        let extraction = extractor().extract("badge EMP123456", &options).unwrap();

        let span = extraction.spans.last().unwrap();
        assert_eq!(span.text, "EMP123456");
        assert_eq!(span.metadata["description"], "Employee number");
    }

    #[test]
    fn test_context_capture_is_bounded() {
        let text = "prefix text before a@b.com and after text";
        let options = DetectionOptions::default().with_context(4);
        let extraction = extractor().extract(text, &options).unwrap();
        let email = extraction
            .spans
            .iter()
            .find(|s| s.pii_type == PiiType::Email)
            .unwrap();
        assert_eq!(email.metadata["context"], "ore a@b.com and");
    }

    #[test]
    fn test_capture_context_handles_multibyte() {
        let text = "héllo X wörld";
        let start = text.find('X').unwrap();
        assert_eq!(capture_context(text, start, start + 1, 2), "o X w");
        assert_eq!(capture_context(text, start, start + 1, 100), text);
        assert_eq!(capture_context(text, start, start + 1, 0), "X");
    }

    struct FailingValidator;

    impl StructuralValidator for FailingValidator {
        fn name(&self) -> &str {
            "failing"
        }

        fn validate(&self, _candidate: &str) -> Result<ValidationOutcome, CollaboratorError> {
            Err(CollaboratorError::Failed {
                collaborator: "failing".to_string(),
                message: "boom".to_string(),
            })
        }
    }

    #[test]
    fn test_validator_failure_degrades() {
        let table = ValidatorTable::builtin().with_validator(PiiType::Email, Arc::new(FailingValidator));
        let extractor = SpanExtractor::new(
            Arc::new(PatternRegistry::default_patterns().unwrap()),
            Arc::new(table),
        );

        let extraction = extractor
            .extract("a@b.com", &DetectionOptions::default())
            .unwrap();
        assert_eq!(extraction.spans[0].confidence, ConfidenceLevel::Low);
        assert!(extraction.validator_failures.contains_key(&PiiType::Email));
    }

    #[test]
    fn test_extract_first_stops_early() {
        let text = "a@b.com c@d.com e@f.com";
        let extraction = extractor()
            .extract_first(text, &DetectionOptions::default())
            .unwrap();
        assert_eq!(extraction.spans.len(), 1);
    }

    #[test]
    fn test_with_validators_shares_registry() {
        let base = extractor();
        let swapped = base
            .clone()
            .with_validators(Arc::new(ValidatorTable::new()));

        assert!(std::ptr::eq(base.registry(), swapped.registry()));
        assert!(swapped.validators().get(PiiType::Email).is_none());
        assert!(base.validators().get(PiiType::Email).is_some());
    }
}

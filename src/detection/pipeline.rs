//! Detection pipeline
//!
//! Runs the span extractor and the NLP adapter over a text, aggregates the
//! document confidence, filters spans below the caller's threshold and
//! attaches advisory suggestions.
//!
//! # Examples
//!
//! ```
//! use piiscope::detection::{DetectionOptions, DetectionPipeline, PiiType};
//!
//! let pipeline = DetectionPipeline::new()?;
//! let result = pipeline.detect("My SSN is 555-55-5555", &DetectionOptions::default())?;
//!
//! assert!(result.has_pii);
//! assert!(result.detected_types.contains(&PiiType::Ssn));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::detection::confidence::{aggregate_confidence, filter_by_threshold};
use crate::detection::extractor::SpanExtractor;
use crate::detection::models::{Metadata, PiiDetectionResult, PiiType};
use crate::detection::nlp::{EntityExtractor, HeuristicEntityExtractor, NlpAdapter};
use crate::detection::options::DetectionOptions;
use crate::detection::patterns::PatternRegistry;
use crate::detection::validators::ValidatorTable;
use crate::domain::{DetectionError, Result};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

pub const SUGGESTION_MASKING: &str =
    "Consider masking or redacting detected PII before logging or storing this text";
pub const SUGGESTION_CRITICAL: &str =
    "Critical PII detected (SSN or credit card): apply encryption and restrict access";
pub const SUGGESTION_CONSENT: &str =
    "Contact information detected (email or phone): ensure user consent for processing";
pub const SUGGESTION_NLP_UNAVAILABLE: &str =
    "Name and address detection unavailable; manual review recommended";

/// Orchestrates pattern extraction, NLP mentions and confidence filtering
///
/// The pipeline owns its registry and validator table behind `Arc`, so a
/// clone is cheap and can be handed to worker threads. Use a new pipeline
/// rather than mutating a shared registry.
#[derive(Debug, Clone)]
pub struct DetectionPipeline {
    extractor: SpanExtractor,
    nlp: Option<NlpAdapter>,
}

impl DetectionPipeline {
    /// Built-in patterns, built-in validators and the heuristic entity extractor
    pub fn new() -> Result<Self> {
        Ok(Self::with_registry(PatternRegistry::default_patterns()?))
    }

    /// Custom registry with the built-in validators and heuristic entity extractor
    pub fn with_registry(registry: PatternRegistry) -> Self {
        Self {
            extractor: SpanExtractor::new(Arc::new(registry), Arc::new(ValidatorTable::builtin())),
            nlp: Some(NlpAdapter::new(Arc::new(HeuristicEntityExtractor::new()))),
        }
    }

    /// Replace the structural validator table
    ///
    /// The table also validates NLP name and place mentions.
    pub fn with_validators(self, validators: ValidatorTable) -> Self {
        Self {
            extractor: self.extractor.with_validators(Arc::new(validators)),
            nlp: self.nlp,
        }
    }

    /// Replace the entity extractor used for names and places
    pub fn with_entity_extractor(mut self, extractor: Arc<dyn EntityExtractor>) -> Self {
        self.nlp = Some(NlpAdapter::new(extractor));
        self
    }

    /// Run without any entity extractor
    pub fn without_entity_extractor(mut self) -> Self {
        self.nlp = None;
        self
    }

    pub fn registry(&self) -> &PatternRegistry {
        self.extractor.registry()
    }

    /// Detect PII in a single text
    ///
    /// # Errors
    ///
    /// Returns [`DetectionError::InvalidOption`] for out-of-range options,
    /// [`DetectionError::TextTooLong`] when the text exceeds
    /// `max_text_length` characters and [`DetectionError::MatcherFailed`]
    /// when a matcher cannot complete a scan.
    pub fn detect(
        &self,
        text: &str,
        options: &DetectionOptions,
    ) -> std::result::Result<PiiDetectionResult, DetectionError> {
        options.validate()?;

        let length = text.chars().count();
        if length > options.max_text_length {
            return Err(DetectionError::TextTooLong {
                length,
                max: options.max_text_length,
            });
        }

        let detection_id = Uuid::new_v4();
        let span = tracing::info_span!("detect", detection_id = %detection_id);
        let _entered = span.enter();
        let start = Instant::now();

        let extraction = if options.enable_span_extraction {
            self.extractor.extract(text, options)?
        } else {
            self.extractor.extract_first(text, options)?
        };

        let mut spans = extraction.spans;
        let mut validator_failures = extraction.validator_failures;
        let mut nlp_unavailable = false;

        let presence_found = !options.enable_span_extraction
            && spans
                .iter()
                .any(|s| s.confidence.weight() >= options.confidence_threshold);

        if options.enable_nlp && !presence_found {
            match &self.nlp {
                Some(nlp) => {
                    let outcome = nlp.detect(text, self.extractor.validators(), options);
                    spans.extend(outcome.spans);
                    for (pii_type, error) in outcome.validator_failures {
                        validator_failures.entry(pii_type).or_insert(error);
                    }
                    if let Some(error) = outcome.failure {
                        tracing::warn!(
                            extractor = nlp.extractor_name(),
                            error = %error,
                            "Entity extractor failed"
                        );
                        nlp_unavailable = true;
                    }
                }
                None => nlp_unavailable = true,
            }
        }

        let mut review_suggestions: Vec<String> = validator_failures
            .iter()
            .map(|(pii_type, error)| {
                format!("{pii_type} validation unavailable ({error}); manual review recommended")
            })
            .collect();
        if nlp_unavailable {
            review_suggestions.push(SUGGESTION_NLP_UNAVAILABLE.to_string());
        }

        spans.sort_by_key(|s| (s.start, s.end));

        let confidence = aggregate_confidence(&spans);
        let spans_before_filter = spans.len();
        let mut spans = filter_by_threshold(spans, options.confidence_threshold);
        if !options.enable_span_extraction {
            spans.truncate(1);
        }

        let detected: BTreeSet<PiiType> = spans.iter().map(|s| s.pii_type).collect();
        let mut suggestions = build_suggestions(&detected);
        suggestions.extend(review_suggestions);

        let elapsed_ms = start.elapsed().as_millis() as u64;

        let mut metadata = Metadata::new();
        metadata.insert("detection_id".into(), detection_id.to_string().into());
        metadata.insert("text_length".into(), length.into());
        metadata.insert("spans_before_filter".into(), spans_before_filter.into());
        metadata.insert(
            "confidence_threshold".into(),
            options.confidence_threshold.into(),
        );
        metadata.insert("nlp_enabled".into(), options.enable_nlp.into());
        metadata.insert("processing_time_ms".into(), elapsed_ms.into());

        let result = PiiDetectionResult::new(spans, suggestions, confidence, metadata);

        crate::log_detection_complete!(
            result.total_spans(),
            result.detected_types.len(),
            result.confidence,
            elapsed_ms
        );

        Ok(result)
    }

    /// Detect each text independently, preserving input order
    pub fn detect_multiple<S: AsRef<str>>(
        &self,
        texts: &[S],
        options: &DetectionOptions,
    ) -> std::result::Result<Vec<PiiDetectionResult>, DetectionError> {
        texts
            .iter()
            .map(|text| self.detect(text.as_ref(), options))
            .collect()
    }

    /// Whether the text contains at least one qualifying span
    pub fn has_pii(
        &self,
        text: &str,
        options: &DetectionOptions,
    ) -> std::result::Result<bool, DetectionError> {
        let presence = options.clone().with_span_extraction(false);
        Ok(self.detect(text, &presence)?.has_pii)
    }

    /// Span counts for every PII type, zero for absent types
    pub fn count_pii_by_type(
        &self,
        text: &str,
        options: &DetectionOptions,
    ) -> std::result::Result<BTreeMap<PiiType, usize>, DetectionError> {
        let full = options.clone().with_span_extraction(true);
        Ok(self.detect(text, &full)?.count_by_type())
    }
}

/// Advisory suggestions for a set of detected types
pub fn build_suggestions(detected: &BTreeSet<PiiType>) -> Vec<String> {
    let mut suggestions = Vec::new();
    if detected.is_empty() {
        return suggestions;
    }

    suggestions.push(SUGGESTION_MASKING.to_string());
    if detected.iter().any(PiiType::is_critical) {
        suggestions.push(SUGGESTION_CRITICAL.to_string());
    }
    if detected.iter().any(PiiType::is_contact) {
        suggestions.push(SUGGESTION_CONSENT.to_string());
    }
    suggestions
}

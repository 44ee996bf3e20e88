//! Detection options

use crate::detection::patterns::PiiPattern;
use crate::domain::DetectionError;
use serde::{Deserialize, Serialize};

/// Default maximum input length, in characters
pub const DEFAULT_MAX_TEXT_LENGTH: usize = 50_000;

/// Default confidence threshold (keeps High and VeryHigh spans)
pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.7;

/// Default number of characters captured on each side of a span
pub const DEFAULT_CONTEXT_WINDOW: usize = 20;

/// Options for a detection run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionOptions {
    /// Run the NLP collaborator for names and places
    pub enable_nlp: bool,
    /// Spans weighted below this are dropped (0.0–1.0)
    pub confidence_threshold: f64,
    /// Input length ceiling in characters
    pub max_text_length: usize,
    /// Collect every span; when false, stop at the first qualifying span
    pub enable_span_extraction: bool,
    /// Extra patterns scanned after the registry's own
    #[serde(skip)]
    pub custom_patterns: Vec<PiiPattern>,
    /// Drop candidates that fail structural validation instead of downgrading them
    pub strict_mode: bool,
    /// Record surrounding text in span metadata
    pub include_context: bool,
    /// Characters of context on each side
    pub context_window: usize,
}

impl Default for DetectionOptions {
    fn default() -> Self {
        Self {
            enable_nlp: true,
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            max_text_length: DEFAULT_MAX_TEXT_LENGTH,
            enable_span_extraction: true,
            custom_patterns: Vec::new(),
            strict_mode: false,
            include_context: false,
            context_window: DEFAULT_CONTEXT_WINDOW,
        }
    }
}

impl DetectionOptions {
    /// Validate option ranges
    pub fn validate(&self) -> Result<(), DetectionError> {
        if !self.confidence_threshold.is_finite()
            || !(0.0..=1.0).contains(&self.confidence_threshold)
        {
            return Err(DetectionError::invalid_option(
                "confidence_threshold",
                "must be between 0.0 and 1.0",
            ));
        }
        if self.max_text_length == 0 {
            return Err(DetectionError::invalid_option(
                "max_text_length",
                "must be greater than 0",
            ));
        }
        Ok(())
    }

    pub fn with_confidence_threshold(mut self, threshold: f64) -> Self {
        self.confidence_threshold = threshold;
        self
    }

    pub fn with_nlp(mut self, enabled: bool) -> Self {
        self.enable_nlp = enabled;
        self
    }

    pub fn with_max_text_length(mut self, max: usize) -> Self {
        self.max_text_length = max;
        self
    }

    pub fn with_strict_mode(mut self, strict: bool) -> Self {
        self.strict_mode = strict;
        self
    }

    pub fn with_span_extraction(mut self, enabled: bool) -> Self {
        self.enable_span_extraction = enabled;
        self
    }

    /// Capture `window` characters of context on each side of every span
    pub fn with_context(mut self, window: usize) -> Self {
        self.include_context = true;
        self.context_window = window;
        self
    }

    pub fn with_custom_pattern(mut self, pattern: PiiPattern) -> Self {
        self.custom_patterns.push(pattern);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = DetectionOptions::default();
        assert!(options.enable_nlp);
        assert!(options.enable_span_extraction);
        assert!(!options.strict_mode);
        assert_eq!(options.max_text_length, 50_000);
        assert!((options.confidence_threshold - 0.7).abs() < f64::EPSILON);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_threshold_out_of_range() {
        let err = DetectionOptions::default()
            .with_confidence_threshold(1.5)
            .validate()
            .unwrap_err();
        assert!(matches!(err, DetectionError::InvalidOption { ref field, .. } if field == "confidence_threshold"));

        assert!(DetectionOptions::default()
            .with_confidence_threshold(f64::NAN)
            .validate()
            .is_err());
    }

    #[test]
    fn test_zero_max_length_rejected() {
        assert!(DetectionOptions::default()
            .with_max_text_length(0)
            .validate()
            .is_err());
    }

    #[test]
    fn test_deserialize_partial() {
        let options: DetectionOptions =
            serde_json::from_str(r#"{"strict_mode": true, "context_window": 5}"#).unwrap();
        assert!(options.strict_mode);
        assert_eq!(options.context_window, 5);
        assert!(options.enable_nlp);
    }
}

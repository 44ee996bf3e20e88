//! Confidence aggregation and threshold filtering

use crate::detection::models::{ConfidenceLevel, DetectionSpan};

/// Document-level confidence for a set of spans
///
/// The arithmetic mean of the span weights, bucketed back into a
/// [`ConfidenceLevel`]. No spans means [`ConfidenceLevel::Low`].
pub fn aggregate_confidence(spans: &[DetectionSpan]) -> ConfidenceLevel {
    if spans.is_empty() {
        return ConfidenceLevel::Low;
    }

    let total: f64 = spans.iter().map(|s| s.confidence.weight()).sum();
    ConfidenceLevel::from_weight(total / spans.len() as f64)
}

/// Keep spans whose weight is at least `threshold`, preserving order
pub fn filter_by_threshold(spans: Vec<DetectionSpan>, threshold: f64) -> Vec<DetectionSpan> {
    spans
        .into_iter()
        .filter(|s| s.confidence.weight() >= threshold)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::models::PiiType;
    use test_case::test_case;

    fn span(confidence: ConfidenceLevel) -> DetectionSpan {
        DetectionSpan::new(PiiType::Email, 0, 3, "a@b", confidence)
    }

    #[test]
    fn test_empty_is_low() {
        assert_eq!(aggregate_confidence(&[]), ConfidenceLevel::Low);
    }

    #[test_case(&[ConfidenceLevel::High], ConfidenceLevel::High)]
    #[test_case(&[ConfidenceLevel::VeryHigh, ConfidenceLevel::VeryHigh, ConfidenceLevel::High], ConfidenceLevel::VeryHigh; "mostly very high")]
    #[test_case(&[ConfidenceLevel::High, ConfidenceLevel::High, ConfidenceLevel::Medium], ConfidenceLevel::High; "mostly high")]
    #[test_case(&[ConfidenceLevel::High, ConfidenceLevel::Low], ConfidenceLevel::Medium; "mean 0.5")]
    #[test_case(&[ConfidenceLevel::Low, ConfidenceLevel::Low], ConfidenceLevel::Low)]
    fn test_aggregate(levels: &[ConfidenceLevel], expected: ConfidenceLevel) {
        let spans: Vec<_> = levels.iter().copied().map(span).collect();
        assert_eq!(aggregate_confidence(&spans), expected);
    }

    #[test]
    fn test_filter_keeps_at_threshold() {
        let spans = vec![
            span(ConfidenceLevel::Low),
            span(ConfidenceLevel::High),
            span(ConfidenceLevel::Medium),
            span(ConfidenceLevel::VeryHigh),
        ];
        let kept = filter_by_threshold(spans, 0.7);
        let levels: Vec<_> = kept.iter().map(|s| s.confidence).collect();
        assert_eq!(levels, vec![ConfidenceLevel::High, ConfidenceLevel::VeryHigh]);
    }

    #[test]
    fn test_filter_zero_threshold_keeps_all() {
        let spans = vec![span(ConfidenceLevel::Low), span(ConfidenceLevel::Medium)];
        assert_eq!(filter_by_threshold(spans, 0.0).len(), 2);
    }
}

//! Batch scan reporting
//!
//! Summarises a batch of detection results: how many inputs carried PII,
//! span counts by type and confidence, and the distinct suggestions raised.
//! Reports never contain matched text.

use crate::detection::models::{ConfidenceLevel, PiiDetectionResult, PiiType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-input summary line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanEntry {
    /// Input label (file path or `<stdin>`)
    pub source: String,
    pub has_pii: bool,
    pub span_count: usize,
    pub detected_types: Vec<PiiType>,
    pub confidence: ConfidenceLevel,
}

/// Summary of a batch of detection runs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    pub generated_at: DateTime<Utc>,

    /// Total inputs scanned
    pub texts_scanned: usize,

    pub texts_with_pii: usize,

    pub texts_without_pii: usize,

    /// Total spans across every input
    pub total_spans: usize,

    pub spans_by_type: BTreeMap<PiiType, usize>,

    pub spans_by_confidence: BTreeMap<ConfidenceLevel, usize>,

    /// Distinct suggestions, in first-seen order
    pub suggestions: Vec<String>,

    pub entries: Vec<ScanEntry>,
}

impl ScanReport {
    /// Create an empty report stamped with the current time
    pub fn new() -> Self {
        Self {
            generated_at: Utc::now(),
            texts_scanned: 0,
            texts_with_pii: 0,
            texts_without_pii: 0,
            total_spans: 0,
            spans_by_type: BTreeMap::new(),
            spans_by_confidence: BTreeMap::new(),
            suggestions: Vec::new(),
            entries: Vec::new(),
        }
    }

    /// Fold one detection result into the report
    pub fn add_result(&mut self, source: impl Into<String>, result: &PiiDetectionResult) {
        self.texts_scanned += 1;
        if result.has_pii {
            self.texts_with_pii += 1;
        } else {
            self.texts_without_pii += 1;
        }

        self.total_spans += result.spans.len();
        for span in &result.spans {
            *self.spans_by_type.entry(span.pii_type).or_insert(0) += 1;
            *self.spans_by_confidence.entry(span.confidence).or_insert(0) += 1;
        }

        for suggestion in &result.suggestions {
            if !self.suggestions.contains(suggestion) {
                self.suggestions.push(suggestion.clone());
            }
        }

        self.entries.push(ScanEntry {
            source: source.into(),
            has_pii: result.has_pii,
            span_count: result.spans.len(),
            detected_types: result.detected_types.iter().copied().collect(),
            confidence: result.confidence,
        });
    }

    /// Format report for console output
    pub fn format_console(&self) -> String {
        let mut output = String::new();

        output.push('\n');
        output.push_str("═══════════════════════════════════════════════════════════════\n");
        output.push_str("                      PII SCAN REPORT                          \n");
        output.push_str("═══════════════════════════════════════════════════════════════\n");
        output.push('\n');

        output.push_str("📊 SUMMARY\n");
        output.push_str("───────────────────────────────────────────────────────────────\n");
        output.push_str(&format!("  Texts Scanned:       {}\n", self.texts_scanned));
        output.push_str(&format!("  Texts with PII:      {}\n", self.texts_with_pii));
        output.push_str(&format!("  Texts without PII:   {}\n", self.texts_without_pii));
        output.push_str(&format!("  Total Spans:         {}\n", self.total_spans));
        output.push('\n');

        if !self.spans_by_type.is_empty() {
            output.push_str("🔍 SPANS BY TYPE\n");
            output.push_str("───────────────────────────────────────────────────────────────\n");

            let mut types: Vec<_> = self.spans_by_type.iter().collect();
            types.sort_by(|a, b| b.1.cmp(a.1));

            for (pii_type, count) in types {
                output.push_str(&format!("  {:30} {:>5}\n", pii_type.label(), count));
            }
            output.push('\n');
        }

        if !self.spans_by_confidence.is_empty() {
            output.push_str("📈 SPANS BY CONFIDENCE\n");
            output.push_str("───────────────────────────────────────────────────────────────\n");
            for (level, count) in self.spans_by_confidence.iter().rev() {
                output.push_str(&format!("  {:30} {:>5}\n", level.to_string(), count));
            }
            output.push('\n');
        }

        if !self.suggestions.is_empty() {
            output.push_str("⚠️  SUGGESTIONS\n");
            output.push_str("───────────────────────────────────────────────────────────────\n");
            for suggestion in &self.suggestions {
                output.push_str(&format!("  • {}\n", suggestion));
            }
            output.push('\n');
        }

        output.push_str("═══════════════════════════════════════════════════════════════\n");
        output.push('\n');

        output
    }

    /// Format report as JSON
    pub fn format_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write the JSON report to a file
    pub fn write_to_file(&self, path: &std::path::Path) -> crate::domain::Result<()> {
        let json = self.format_json()?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

impl Default for ScanReport {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::models::{DetectionSpan, Metadata};

    fn result_with(spans: Vec<DetectionSpan>, suggestions: Vec<&str>) -> PiiDetectionResult {
        PiiDetectionResult::new(
            spans,
            suggestions.into_iter().map(String::from).collect(),
            ConfidenceLevel::High,
            Metadata::new(),
        )
    }

    #[test]
    fn test_report_creation() {
        let report = ScanReport::new();
        assert_eq!(report.texts_scanned, 0);
        assert_eq!(report.total_spans, 0);
        assert!(report.spans_by_type.is_empty());
        assert!(report.entries.is_empty());
    }

    #[test]
    fn test_add_results() {
        let mut report = ScanReport::new();
        let email = DetectionSpan::new(PiiType::Email, 0, 7, "a@b.com", ConfidenceLevel::High);
        let ssn = DetectionSpan::new(PiiType::Ssn, 8, 19, "555-55-5555", ConfidenceLevel::High);

        report.add_result("one.txt", &result_with(vec![email, ssn], vec!["mask", "encrypt"]));
        report.add_result("two.txt", &PiiDetectionResult::empty());
        report.add_result(
            "three.txt",
            &result_with(
                vec![DetectionSpan::new(PiiType::Email, 0, 7, "c@d.com", ConfidenceLevel::VeryHigh)],
                vec!["mask"],
            ),
        );

        assert_eq!(report.texts_scanned, 3);
        assert_eq!(report.texts_with_pii, 2);
        assert_eq!(report.texts_without_pii, 1);
        assert_eq!(report.total_spans, 3);
        assert_eq!(report.spans_by_type[&PiiType::Email], 2);
        assert_eq!(report.spans_by_confidence[&ConfidenceLevel::High], 2);
        assert_eq!(report.suggestions, vec!["mask", "encrypt"]);
        assert_eq!(report.entries[0].detected_types, vec![PiiType::Email, PiiType::Ssn]);
    }

    #[test]
    fn test_report_never_contains_matched_text() {
        let mut report = ScanReport::new();
        let span = DetectionSpan::new(PiiType::Email, 0, 7, "a@b.com", ConfidenceLevel::High);
        report.add_result("in.txt", &result_with(vec![span], vec![]));

        let json = report.format_json().unwrap();
        assert!(!json.contains("a@b.com"));
        assert!(!report.format_console().contains("a@b.com"));
    }

    #[test]
    fn test_format_console() {
        let mut report = ScanReport::new();
        report.texts_scanned = 4;
        report.texts_with_pii = 1;
        report.total_spans = 2;

        let output = report.format_console();
        assert!(output.contains("PII SCAN REPORT"));
        assert!(output.contains("Texts Scanned:       4"));
        assert!(output.contains("Total Spans:         2"));
    }

    #[test]
    fn test_write_to_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("report.json");
        ScanReport::new().write_to_file(&path).unwrap();

        let parsed: ScanReport =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed.texts_scanned, 0);
    }
}

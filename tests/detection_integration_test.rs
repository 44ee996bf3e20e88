//! Integration tests for the detection pipeline through the public API

use fake::faker::lorem::en::Words;
use fake::Fake;
use piiscope::detection::{
    ConfidenceLevel, DetectionOptions, DetectionPipeline, PatternRegistry, PiiPattern, PiiType,
    ScanReport,
};
use piiscope::{count_pii_by_type, detect_pii, detect_pii_multiple, has_pii};
use std::io::Write;
use tempfile::NamedTempFile;

/// Random 16-digit Visa-style number with a correct Luhn check digit
fn luhn_valid_card() -> String {
    let mut digits: Vec<u32> = vec![4];
    for _ in 0..14 {
        digits.push((0..10u32).fake());
    }

    // Check digit sits at an even position from the right, so doubling
    // starts with the last payload digit
    let sum: u32 = digits
        .iter()
        .rev()
        .enumerate()
        .map(|(idx, &d)| {
            if idx % 2 == 0 {
                let doubled = d * 2;
                if doubled > 9 {
                    doubled - 9
                } else {
                    doubled
                }
            } else {
                d
            }
        })
        .sum();
    digits.push((10 - sum % 10) % 10);

    digits.iter().map(|d| d.to_string()).collect()
}

fn group_card(card: &str, separator: &str) -> String {
    card.as_bytes()
        .chunks(4)
        .map(|chunk| String::from_utf8_lossy(chunk).to_string())
        .collect::<Vec<_>>()
        .join(separator)
}

fn lorem_text() -> String {
    let words: Vec<String> = Words(3..20).fake();
    words.join(" ")
}

#[test]
fn test_luhn_valid_cards_are_detected() {
    for i in 0..50 {
        let card = luhn_valid_card();
        let separator = ["", " ", "-"][i % 3];
        let text = format!("{} card on file {} thanks", lorem_text(), group_card(&card, separator));

        let result = detect_pii(&text, &DetectionOptions::default()).unwrap();
        assert!(
            result.detected_types.contains(&PiiType::CreditCard),
            "card not detected in {text:?}"
        );
    }
}

#[test]
fn test_plain_text_without_nlp_has_no_pii() {
    let options = DetectionOptions::default().with_nlp(false);
    for _ in 0..50 {
        let text = lorem_text();
        let result = detect_pii(&text, &options).unwrap();
        assert!(!result.has_pii, "unexpected PII in {text:?}");
        assert!(result.spans.is_empty());
        assert!(!has_pii(&text, &options).unwrap());
    }
}

#[test]
fn test_detected_types_match_span_types() {
    let texts = [
        "",
        "nothing here",
        "Contact John Doe at john@example.com or call (555) 123-4567",
        "SSN 555-55-5555, card 4111 1111 1111 1111, host 192.168.1.20",
        "Born 04/12/1985, lives at 42 Maple Street near Springfield, zip 90210",
        "Server at 2001:0db8:85a3:0000:0000:8a2e:0370:7334 and +44 20 7946 0958",
    ];

    for text in texts {
        for threshold in [0.0, 0.5, 0.7, 1.0] {
            let options = DetectionOptions::default().with_confidence_threshold(threshold);
            let result = detect_pii(text, &options).unwrap();
            let span_types: std::collections::BTreeSet<PiiType> =
                result.spans.iter().map(|s| s.pii_type).collect();
            assert_eq!(result.detected_types, span_types, "{text:?} @ {threshold}");
            assert_eq!(result.has_pii, !result.spans.is_empty());
        }
    }
}

#[test]
fn test_raising_threshold_never_adds_spans() {
    let text = "John Doe (john@example.com, (155) 123-4567, 555-123-4567) paid with \
                4111-1111-1111-1111 from 10.0.0.1 on 2023-02-28 at 42 Maple Street";
    let thresholds = [0.0, 0.1, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9, 1.0];

    let counts: Vec<usize> = thresholds
        .iter()
        .map(|t| {
            detect_pii(text, &DetectionOptions::default().with_confidence_threshold(*t))
                .unwrap()
                .total_spans()
        })
        .collect();

    for pair in counts.windows(2) {
        assert!(pair[0] >= pair[1], "span counts not monotonic: {counts:?}");
    }
    assert!(counts[0] > 0);
    assert_eq!(*counts.last().unwrap(), 0);
}

#[test]
fn test_contact_scenario() {
    let result = detect_pii(
        "Contact John Doe at john@example.com or call (555) 123-4567",
        &DetectionOptions::default(),
    )
    .unwrap();

    assert!(result.has_pii);
    assert!(result.detected_types.contains(&PiiType::Email));
    assert!(result.detected_types.contains(&PiiType::Phone));
}

#[test]
fn test_ssn_scenario() {
    let text = "My SSN is 555-55-5555";
    let result = detect_pii(text, &DetectionOptions::default()).unwrap();

    let ssn: Vec<_> = result.spans_of(PiiType::Ssn).collect();
    assert_eq!(ssn.len(), 1);
    assert_eq!(ssn[0].text, "555-55-5555");
    assert_eq!(&text[ssn[0].start..ssn[0].end], "555-55-5555");
    assert_eq!(ssn[0].confidence, ConfidenceLevel::High);
}

#[test]
fn test_placeholder_ssn_is_ignored() {
    let result = detect_pii("SSN 123-45-6789", &DetectionOptions::default()).unwrap();
    assert!(!result.detected_types.contains(&PiiType::Ssn));
}

#[test]
fn test_count_scenario() {
    let counts = count_pii_by_type(
        "Emails: a@b.com, c@d.com. Phone: 555-123-4567",
        &DetectionOptions::default(),
    )
    .unwrap();

    assert_eq!(counts.len(), PiiType::ALL.len());
    for (pii_type, count) in counts {
        let expected = match pii_type {
            PiiType::Email => 2,
            PiiType::Phone => 1,
            _ => 0,
        };
        assert_eq!(count, expected, "{pii_type}");
    }
}

#[test]
fn test_offsets_are_byte_offsets_into_unicode_text() {
    let text = "Grüße an José: jose@example.com";
    let result = detect_pii(text, &DetectionOptions::default().with_nlp(false)).unwrap();
    let email = result.spans_of(PiiType::Email).next().unwrap();
    assert_eq!(&text[email.start..email.end], "jose@example.com");
}

#[test]
fn test_text_length_limit() {
    let options = DetectionOptions::default().with_max_text_length(20);
    assert!(detect_pii(&"a".repeat(21), &options).is_err());
    assert!(detect_pii(&"a".repeat(20), &options).is_ok());
}

#[test]
fn test_invalid_threshold_rejected() {
    let options = DetectionOptions::default().with_confidence_threshold(1.5);
    assert!(detect_pii("a@b.com", &options).is_err());
}

#[test]
fn test_detect_multiple_keeps_order() {
    let texts = ["a@b.com", "nothing", "555-55-5555"];
    let results = detect_pii_multiple(&texts, &DetectionOptions::default()).unwrap();
    assert_eq!(results.len(), 3);
    assert!(results[0].detected_types.contains(&PiiType::Email));
    assert!(!results[1].has_pii);
    assert!(results[2].detected_types.contains(&PiiType::Ssn));
}

#[test]
fn test_custom_pattern_in_options() {
    let pattern = PiiPattern::regex(PiiType::Ssn, r"\bEMP\d{6}\b", "Employee number")
        .unwrap();
    let options = DetectionOptions::default()
        .with_nlp(false)
        .with_custom_pattern(pattern);

    let result = detect_pii("badge EMP123456 issued", &options).unwrap();
    let span = result.spans_of(PiiType::Ssn).next().unwrap();
    assert_eq!(span.text, "EMP123456");
    assert_eq!(span.metadata["description"], "Employee number");
}

#[test]
fn test_pattern_library_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
[patterns.member_id]
category = "ssn"
description = "Member ID"
risk_level = "critical"
patterns = ['\bMBR-\d{{3}}-\d{{2}}-\d{{4}}\b']
"#
    )
    .unwrap();
    file.flush().unwrap();

    let mut registry = PatternRegistry::default_patterns().unwrap();
    let library = PatternRegistry::from_file(file.path()).unwrap();
    registry.extend(library.list().iter().cloned()).unwrap();

    let pipeline = DetectionPipeline::with_registry(registry).without_entity_extractor();
    let options = DetectionOptions::default().with_nlp(false);
    let result = pipeline.detect("member MBR-555-55-5555", &options).unwrap();

    let descriptions: Vec<_> = result
        .spans_of(PiiType::Ssn)
        .map(|s| s.metadata["description"].clone())
        .collect();
    assert!(descriptions.contains(&serde_json::json!("Member ID")));
}

#[test]
fn test_context_capture() {
    let options = DetectionOptions::default().with_nlp(false).with_context(5);
    let result = detect_pii("mail a@b.com today", &options).unwrap();
    let span = result.spans_of(PiiType::Email).next().unwrap();
    assert_eq!(span.metadata["context"], "mail a@b.com toda");
}

#[test]
fn test_scan_report_summarises_batch() {
    let pipeline = DetectionPipeline::new().unwrap();
    let options = DetectionOptions::default();
    let mut report = ScanReport::new();

    for (source, text) in [
        ("a.txt", "mail a@b.com"),
        ("b.txt", "plain words"),
        ("c.txt", "SSN 555-55-5555 and c@d.com"),
    ] {
        report.add_result(source, &pipeline.detect(text, &options).unwrap());
    }

    assert_eq!(report.texts_scanned, 3);
    assert_eq!(report.texts_with_pii, 2);
    assert_eq!(report.texts_without_pii, 1);
    assert_eq!(report.spans_by_type[&PiiType::Email], 2);

    let json = report.format_json().unwrap();
    assert!(!json.contains("a@b.com"));
    assert!(!json.contains("555-55-5555"));
}

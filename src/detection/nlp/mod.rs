//! Natural-language entity adapter
//!
//! Entity extractors return unlocated mentions. The adapter validates each
//! person or place mention with the type's structural validator, then finds
//! every case-insensitive whole-word occurrence of the accepted mentions in a
//! single pass over the source text and emits one span per occurrence.

pub mod heuristic;

pub use heuristic::HeuristicEntityExtractor;

use crate::detection::extractor::capture_context;
use crate::detection::models::{ConfidenceLevel, DetectionSpan, PiiType, SpanSource};
use crate::detection::options::DetectionOptions;
use crate::detection::validators::ValidatorTable;
use crate::domain::CollaboratorError;
use regex::{Regex, RegexBuilder};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// Compiled size ceiling for the combined mention matcher
const MENTION_REGEX_SIZE_LIMIT: usize = 64 * (1 << 20);

/// External named-entity extractor
pub trait EntityExtractor: Send + Sync {
    /// Extractor name for diagnostics
    fn name(&self) -> &str;

    /// Person-name mentions
    fn extract_persons(&self, text: &str) -> Result<Vec<String>, CollaboratorError>;

    /// Place and address mentions
    fn extract_places(&self, text: &str) -> Result<Vec<String>, CollaboratorError>;

    /// Organisation mentions
    fn extract_organizations(&self, text: &str) -> Result<Vec<String>, CollaboratorError>;
}

/// NLP spans for one text, or the failure that prevented them
#[derive(Debug, Default)]
pub struct NlpOutcome {
    pub spans: Vec<DetectionSpan>,
    /// Entity extractor failure
    pub failure: Option<CollaboratorError>,
    /// Mention validator failures, one per affected type
    pub validator_failures: BTreeMap<PiiType, CollaboratorError>,
}

/// Converts entity-extractor mentions into located spans
#[derive(Clone)]
pub struct NlpAdapter {
    extractor: Arc<dyn EntityExtractor>,
}

impl std::fmt::Debug for NlpAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NlpAdapter")
            .field("extractor", &self.extractor.name())
            .finish()
    }
}

/// Confidence and labels earned by one accepted mention
struct MentionVerdict {
    confidence: ConfidenceLevel,
    status: &'static str,
    classification: Option<String>,
}

impl NlpAdapter {
    pub fn new(extractor: Arc<dyn EntityExtractor>) -> Self {
        Self { extractor }
    }

    pub fn extractor_name(&self) -> &str {
        self.extractor.name()
    }

    /// Locate validated person and place mentions in `text`
    ///
    /// Mentions are checked against the `Name` and `Address` entries of
    /// `validators`; a type without a validator is accepted unvalidated. A
    /// collaborator failure is returned in [`NlpOutcome::failure`] together
    /// with whatever spans were produced before it.
    pub fn detect(
        &self,
        text: &str,
        validators: &ValidatorTable,
        options: &DetectionOptions,
    ) -> NlpOutcome {
        let mut outcome = NlpOutcome::default();

        let persons = match self.extractor.extract_persons(text) {
            Ok(persons) => persons,
            Err(e) => {
                outcome.failure = Some(e);
                return outcome;
            }
        };
        tracing::debug!(
            extractor = self.extractor.name(),
            mentions = persons.len(),
            "Person mentions extracted"
        );
        if let Err(e) = self.locate_all(
            text,
            &persons,
            PiiType::Name,
            "person",
            validators,
            options,
            &mut outcome,
        ) {
            outcome.failure = Some(e);
            return outcome;
        }

        let places = match self.extractor.extract_places(text) {
            Ok(places) => places,
            Err(e) => {
                outcome.failure = Some(e);
                return outcome;
            }
        };
        tracing::debug!(
            extractor = self.extractor.name(),
            mentions = places.len(),
            "Place mentions extracted"
        );
        if let Err(e) = self.locate_all(
            text,
            &places,
            PiiType::Address,
            "place",
            validators,
            options,
            &mut outcome,
        ) {
            outcome.failure = Some(e);
        }

        outcome
    }

    #[allow(clippy::too_many_arguments)]
    fn locate_all(
        &self,
        text: &str,
        mentions: &[String],
        pii_type: PiiType,
        entity: &str,
        validators: &ValidatorTable,
        options: &DetectionOptions,
        outcome: &mut NlpOutcome,
    ) -> Result<(), CollaboratorError> {
        let validator = validators.get(pii_type);
        let mut accepted: Vec<&str> = Vec::new();
        let mut verdicts: HashMap<String, MentionVerdict> = HashMap::new();

        for mention in mentions {
            let mention = mention.trim();
            let key = mention.to_lowercase();
            if mention.is_empty() || verdicts.contains_key(&key) {
                continue;
            }

            let verdict = match validator {
                None => MentionVerdict {
                    confidence: ConfidenceLevel::High,
                    status: "unvalidated",
                    classification: None,
                },
                Some(validator) => match validator.validate(mention) {
                    Ok(result) => {
                        if !result.is_valid && (options.strict_mode || !result.is_possible) {
                            continue;
                        }
                        MentionVerdict {
                            confidence: result.confidence(),
                            status: result.status(),
                            classification: result.classification,
                        }
                    }
                    Err(e) => {
                        tracing::warn!(
                            validator = validator.name(),
                            pii_type = %pii_type,
                            error = %e,
                            "Mention validation failed"
                        );
                        outcome.validator_failures.entry(pii_type).or_insert(e);
                        if options.strict_mode {
                            continue;
                        }
                        MentionVerdict {
                            confidence: ConfidenceLevel::Low,
                            status: "error",
                            classification: None,
                        }
                    }
                },
            };

            verdicts.insert(key, verdict);
            accepted.push(mention);
        }

        if accepted.is_empty() {
            return Ok(());
        }

        let matcher = MentionMatcher::new(&accepted).map_err(|e| {
            tracing::warn!(
                pii_type = %pii_type,
                mentions = accepted.len(),
                error = %e,
                "Mention matcher could not be built"
            );
            CollaboratorError::Failed {
                collaborator: self.extractor.name().to_string(),
                message: format!("{} {entity} mentions could not be located", accepted.len()),
            }
        })?;

        for (start, end, mention) in matcher.find_all(text) {
            let Some(verdict) = verdicts.get(&mention.to_lowercase()) else {
                continue;
            };
            let mut span =
                DetectionSpan::new(pii_type, start, end, &text[start..end], verdict.confidence)
                    .with_metadata("source", SpanSource::Nlp.as_str())
                    .with_metadata("entity", entity)
                    .with_metadata("extractor", self.extractor.name())
                    .with_metadata("validation", verdict.status)
                    .with_metadata("risk_level", pii_type.default_risk_level().to_string());
            if let Some(classification) = &verdict.classification {
                span = span.with_metadata("classification", classification.as_str());
            }
            if options.include_context {
                span = span.with_metadata(
                    "context",
                    capture_context(text, start, end, options.context_window),
                );
            }
            outcome.spans.push(span);
        }

        Ok(())
    }
}

/// Case-insensitive whole-word matcher over a set of literal mentions
///
/// All mentions are compiled into one alternation, longest first, and the
/// text is scanned once. Word boundaries are checked on each hit, not in the
/// pattern.
struct MentionMatcher<'m> {
    regex: Regex,
    /// Mentions ordered longest first
    mentions: Vec<&'m str>,
    /// Lowercased mention to its entry in `mentions`
    index: HashMap<String, usize>,
}

impl<'m> MentionMatcher<'m> {
    fn new(mentions: &[&'m str]) -> Result<Self, regex::Error> {
        let mut mentions = mentions.to_vec();
        mentions.sort_by_key(|m| std::cmp::Reverse(m.chars().count()));

        let alternation = mentions
            .iter()
            .map(|m| regex::escape(m))
            .collect::<Vec<_>>()
            .join("|");
        let regex = RegexBuilder::new(&format!("(?:{alternation})"))
            .case_insensitive(true)
            .size_limit(MENTION_REGEX_SIZE_LIMIT)
            .build()?;

        let index = mentions
            .iter()
            .enumerate()
            .map(|(i, m)| (m.to_lowercase(), i))
            .collect();

        Ok(Self {
            regex,
            mentions,
            index,
        })
    }

    /// `(start, end, mention)` for every whole-word occurrence, in text order
    fn find_all(&self, text: &str) -> Vec<(usize, usize, &'m str)> {
        let mut found = Vec::new();
        let mut pos = 0;

        while let Some(m) = self.regex.find_at(text, pos) {
            let start = m.start();
            let hit = if is_word_boundary(text, start) && is_word_boundary(text, m.end()) {
                self.index
                    .get(&m.as_str().to_lowercase())
                    .map(|&i| (m.end(), self.mentions[i]))
            } else {
                None
            };

            match hit.or_else(|| self.longest_at(text, start)) {
                Some((end, mention)) => {
                    found.push((start, end, mention));
                    pos = end;
                }
                None => {
                    pos = start + text[start..].chars().next().map_or(1, char::len_utf8);
                }
            }
        }

        found
    }

    /// Longest mention forming a whole word at `start`
    fn longest_at(&self, text: &str, start: usize) -> Option<(usize, &'m str)> {
        if !is_word_boundary(text, start) {
            return None;
        }
        self.mentions.iter().find_map(|mention| {
            let end = start + prefix_len_ignore_case(&text[start..], mention)?;
            is_word_boundary(text, end).then_some((end, *mention))
        })
    }
}

/// Byte length of the prefix of `haystack` equal to `needle` ignoring case
fn prefix_len_ignore_case(haystack: &str, needle: &str) -> Option<usize> {
    let mut chars = haystack.char_indices();
    for expected in needle.chars() {
        let (_, actual) = chars.next()?;
        if !actual.to_lowercase().eq(expected.to_lowercase()) {
            return None;
        }
    }
    Some(chars.next().map_or(haystack.len(), |(idx, _)| idx))
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn is_word_boundary(text: &str, idx: usize) -> bool {
    let before = text[..idx].chars().next_back().is_some_and(is_word_char);
    let after = text[idx..].chars().next().is_some_and(is_word_char);
    before != after
}

/// Byte ranges of every case-insensitive whole-word occurrence of `needle`
pub fn find_whole_word(text: &str, needle: &str) -> Vec<(usize, usize)> {
    if needle.is_empty() {
        return Vec::new();
    }
    match MentionMatcher::new(&[needle]) {
        Ok(matcher) => matcher
            .find_all(text)
            .into_iter()
            .map(|(start, end, _)| (start, end))
            .collect(),
        Err(_) => Vec::new(),
    }
}

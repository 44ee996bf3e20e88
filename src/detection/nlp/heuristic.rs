//! Deterministic capitalisation-based entity extractor
//!
//! Finds runs of title-cased words and classifies them:
//! - a run introduced by `in`, `from`, `near` or `to` is a place
//! - a run ending in an organisation suffix (`Inc`, `Corp`, ...) is an organisation
//! - any other run of two to four name-like words is a person
//!
//! It is a fallback for hosts without a real NLP service. Recall is modest
//! and it never sees lower-cased names.

use super::EntityExtractor;
use crate::detection::validators::name::{is_non_name_word, is_title_word};
use crate::domain::CollaboratorError;
use regex::Regex;
use std::sync::OnceLock;

const LOCATIVES: &[&str] = &["in", "from", "near", "to"];

const ORGANIZATION_SUFFIXES: &[&str] = &[
    "Inc", "Corp", "Corporation", "LLC", "Ltd", "Company", "University", "Bank", "Hospital",
];

/// A run of capitalised words separated by spaces or tabs only
fn capitalised_run_regex() -> &'static Regex {
    static RUN: OnceLock<Regex> = OnceLock::new();
    RUN.get_or_init(|| {
        Regex::new(r"\p{Lu}[\p{L}'-]*(?:[ \t]+\p{Lu}[\p{L}'-]*)*")
            .expect("capitalised run regex is valid")
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntityKind {
    Person,
    Place,
    Organization,
}

/// Capitalisation heuristics over plain text
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicEntityExtractor;

impl HeuristicEntityExtractor {
    pub fn new() -> Self {
        Self
    }

    fn entities(&self, text: &str, wanted: EntityKind) -> Vec<String> {
        let mut found = Vec::new();

        for run in capitalised_run_regex().find_iter(text) {
            let mut locative = preceding_word(text, run.start())
                .map(|w| LOCATIVES.contains(&w.to_lowercase().as_str()))
                .unwrap_or(false);
            let mut group: Vec<&str> = Vec::new();

            for word in run.as_str().split_whitespace() {
                let name_like = is_title_word(word) || ORGANIZATION_SUFFIXES.contains(&word);
                if name_like && !is_non_name_word(word) {
                    group.push(word);
                    continue;
                }
                flush(&mut group, locative, wanted, &mut found);
                locative = LOCATIVES.contains(&word.to_lowercase().as_str());
            }
            flush(&mut group, locative, wanted, &mut found);
        }

        found
    }
}

fn flush(group: &mut Vec<&str>, locative: bool, wanted: EntityKind, found: &mut Vec<String>) {
    if group.is_empty() {
        return;
    }

    let kind = classify(group, locative);
    if kind == Some(wanted) {
        found.push(group.join(" "));
    }
    group.clear();
}

fn classify(group: &[&str], locative: bool) -> Option<EntityKind> {
    let last = group.last()?;
    if ORGANIZATION_SUFFIXES.contains(last) {
        return Some(EntityKind::Organization);
    }
    if locative {
        return (group.len() <= 3).then_some(EntityKind::Place);
    }
    (2..=4)
        .contains(&group.len())
        .then_some(EntityKind::Person)
}

/// The word immediately before byte offset `start`, if separated only by whitespace
fn preceding_word(text: &str, start: usize) -> Option<&str> {
    let before = &text[..start];
    let trimmed = before.trim_end();
    if trimmed.len() == before.len() && !before.is_empty() {
        return None;
    }
    trimmed
        .rsplit(|c: char| !c.is_alphanumeric())
        .next()
        .filter(|w| !w.is_empty())
}

impl EntityExtractor for HeuristicEntityExtractor {
    fn name(&self) -> &str {
        "heuristic"
    }

    fn extract_persons(&self, text: &str) -> Result<Vec<String>, CollaboratorError> {
        Ok(self.entities(text, EntityKind::Person))
    }

    fn extract_places(&self, text: &str) -> Result<Vec<String>, CollaboratorError> {
        Ok(self.entities(text, EntityKind::Place))
    }

    fn extract_organizations(&self, text: &str) -> Result<Vec<String>, CollaboratorError> {
        Ok(self.entities(text, EntityKind::Organization))
    }
}

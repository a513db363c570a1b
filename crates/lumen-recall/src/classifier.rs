//! Lexical memory-query classification.
//!
//! A fast, zero-dependency filter deciding whether an utterance asks about
//! past captured experience. False positives only cost an extra retrieval
//! pass; false negatives mean a memory question is answered without
//! evidence — an accepted limitation of the English-only tables.

use lumen_config::ClassifierConfig;

/// Utterance prefixes that signal a recall question.
const RECALL_PREFIXES: &[&str] = &[
    "where",
    "find",
    "search",
    "what did",
    "when did",
    "who was",
    "show me",
    "did i",
    "have i",
];

/// Substrings that signal recall regardless of position.
const RECALL_SUBSTRINGS: &[&str] = &["lost", "seen", "remember", "misplaced", "last time", "left my"];

/// Transient classification of one user utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryIntent {
    /// Whether the utterance asks about past captured experience.
    pub is_memory_query: bool,
}

/// Classifier driven by prefix and substring tables.
#[derive(Debug, Clone)]
pub struct QueryClassifier {
    prefixes: Vec<String>,
    substrings: Vec<String>,
}

impl Default for QueryClassifier {
    /// Classifier with the built-in English tables.
    fn default() -> Self {
        Self::new(
            RECALL_PREFIXES.iter().map(|entry| entry.to_string()).collect(),
            RECALL_SUBSTRINGS.iter().map(|entry| entry.to_string()).collect(),
        )
    }
}

impl QueryClassifier {
    /// Create a classifier from explicit tables. Entries are matched
    /// case-insensitively against the lowercased utterance.
    pub fn new(prefixes: Vec<String>, substrings: Vec<String>) -> Self {
        let normalize = |table: Vec<String>| {
            table
                .into_iter()
                .map(|entry| entry.trim().to_lowercase())
                .filter(|entry| !entry.is_empty())
                .collect()
        };
        Self {
            prefixes: normalize(prefixes),
            substrings: normalize(substrings),
        }
    }

    /// Build a classifier from config; empty tables fall back to the
    /// built-in ones.
    pub fn from_config(config: &ClassifierConfig) -> Self {
        let defaults = Self::default();
        let prefixes = if config.prefixes.is_empty() {
            defaults.prefixes
        } else {
            config.prefixes.clone()
        };
        let substrings = if config.substrings.is_empty() {
            defaults.substrings
        } else {
            config.substrings.clone()
        };
        Self::new(prefixes, substrings)
    }

    /// Classify one utterance. Always returns a value.
    pub fn classify(&self, text: &str) -> QueryIntent {
        let lowered = text.trim().to_lowercase();
        let is_memory_query = self
            .prefixes
            .iter()
            .any(|prefix| lowered.starts_with(prefix.as_str()))
            || self
                .substrings
                .iter()
                .any(|substring| lowered.contains(substring.as_str()));
        QueryIntent { is_memory_query }
    }
}

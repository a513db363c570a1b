//! Configuration schema for the recall pipeline.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Root config for the Lumen recall core.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct RecallConfig {
    #[serde(default, rename = "$schema")]
    pub schema: Option<String>,
    #[serde(default)]
    pub classifier: ClassifierConfig,
    #[serde(default)]
    pub ranker: RankerConfig,
    #[serde(default)]
    pub evidence: EvidenceConfig,
    #[serde(default)]
    pub timeouts: TimeoutConfig,
}

impl RecallConfig {
    /// Start building a config programmatically with defaults applied.
    pub fn builder() -> RecallConfigBuilder {
        RecallConfigBuilder::new()
    }

    /// Validate field constraints, returning the path of the first failure.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ranker.max_candidates == 0 {
            return Err(ConfigError::InvalidField {
                path: "ranker.max_candidates".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if let Some(min_score) = self.ranker.min_score {
            if !min_score.is_finite() || min_score < 0.0 {
                return Err(ConfigError::InvalidField {
                    path: "ranker.min_score".to_string(),
                    message: "must be a finite value >= 0".to_string(),
                });
            }
        }
        if self.evidence.max_entries == 0 {
            return Err(ConfigError::InvalidField {
                path: "evidence.max_entries".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.evidence.max_entries > self.ranker.max_candidates {
            return Err(ConfigError::InvalidField {
                path: "evidence.max_entries".to_string(),
                message: "must not exceed ranker.max_candidates".to_string(),
            });
        }
        if self.timeouts.search_ms == 0 {
            return Err(ConfigError::InvalidField {
                path: "timeouts.search_ms".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        if self.timeouts.reasoner_ms == 0 {
            return Err(ConfigError::InvalidField {
                path: "timeouts.reasoner_ms".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        Ok(())
    }
}

/// Builder for assembling a `RecallConfig` in code.
#[derive(Debug, Default, Clone)]
pub struct RecallConfigBuilder {
    config: RecallConfig,
}

impl RecallConfigBuilder {
    /// Create a new builder seeded with default config values.
    pub fn new() -> Self {
        Self {
            config: RecallConfig::default(),
        }
    }

    /// Replace the classifier configuration.
    pub fn classifier(mut self, classifier: ClassifierConfig) -> Self {
        self.config.classifier = classifier;
        self
    }

    /// Replace the ranker configuration.
    pub fn ranker(mut self, ranker: RankerConfig) -> Self {
        self.config.ranker = ranker;
        self
    }

    /// Replace the evidence configuration.
    pub fn evidence(mut self, evidence: EvidenceConfig) -> Self {
        self.config.evidence = evidence;
        self
    }

    /// Replace the timeout configuration.
    pub fn timeouts(mut self, timeouts: TimeoutConfig) -> Self {
        self.config.timeouts = timeouts;
        self
    }

    /// Finalize and return the built `RecallConfig`.
    pub fn build(self) -> RecallConfig {
        self.config
    }
}

/// Configuration for the lexical memory-query classifier.
///
/// Empty tables mean the built-in English tables are used.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ClassifierConfig {
    /// Utterance prefixes that signal a recall question.
    #[serde(default)]
    pub prefixes: Vec<String>,
    /// Substrings that signal recall regardless of position.
    #[serde(default)]
    pub substrings: Vec<String>,
}

/// Configuration for the relevance ranker.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RankerConfig {
    /// Maximum candidates considered before assembly.
    #[serde(default = "default_max_candidates")]
    pub max_candidates: usize,
    /// Optional minimum relevance score for a candidate to survive.
    #[serde(default)]
    pub min_score: Option<f32>,
}

impl Default for RankerConfig {
    fn default() -> Self {
        Self {
            max_candidates: default_max_candidates(),
            min_score: None,
        }
    }
}

/// Configuration for evidence assembly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EvidenceConfig {
    /// Maximum evidence entries surfaced to the reasoner and the UI.
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
}

impl Default for EvidenceConfig {
    fn default() -> Self {
        Self {
            max_entries: default_max_entries(),
        }
    }
}

/// Deadlines for external calls, in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimeoutConfig {
    /// Deadline for the store listing and search step.
    #[serde(default = "default_search_ms")]
    pub search_ms: u64,
    /// Deadline for the reasoner call.
    #[serde(default = "default_reasoner_ms")]
    pub reasoner_ms: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            search_ms: default_search_ms(),
            reasoner_ms: default_reasoner_ms(),
        }
    }
}

fn default_max_candidates() -> usize {
    50
}

fn default_max_entries() -> usize {
    10
}

fn default_search_ms() -> u64 {
    5_000
}

fn default_reasoner_ms() -> u64 {
    30_000
}

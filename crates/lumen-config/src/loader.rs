//! Config file loading.
//!
//! Configs are JSON5 files so app deployments can carry comments. A loaded
//! config is always validated before it is returned.

use crate::error::ConfigError;
use crate::model::RecallConfig;
use log::{debug, info};
use serde_json::Value;
use std::fs;
use std::path::Path;

impl RecallConfig {
    /// Load a config from a path.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        info!("loading recall config from path: {}", path.as_ref().display());
        let contents = fs::read_to_string(path)?;
        Self::load_from_str(&contents)
    }

    /// Load a config from JSON5 contents.
    pub fn load_from_str(contents: &str) -> Result<Self, ConfigError> {
        debug!("loading recall config from raw contents (len={})", contents.len());
        let value: Value = json5::from_str(contents)?;
        let config: RecallConfig = serde_json::from_value(value)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use crate::error::ConfigError;
    use crate::model::{EvidenceConfig, RankerConfig, RecallConfig};
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn defaults_apply_when_fields_are_omitted() {
        let config = RecallConfig::load_from_str("{}").expect("config");
        assert_eq!(config.ranker.max_candidates, 50);
        assert_eq!(config.evidence.max_entries, 10);
        assert_eq!(config.timeouts.search_ms, 5_000);
        assert_eq!(config.timeouts.reasoner_ms, 30_000);
        assert!(config.classifier.prefixes.is_empty());
    }

    #[test]
    fn json5_comments_and_partial_sections_parse() {
        let contents = r#"{
            // tuned for a small demo corpus
            ranker: { max_candidates: 20 },
            classifier: { substrings: ["perdu"] },
        }"#;
        let config = RecallConfig::load_from_str(contents).expect("config");
        assert_eq!(config.ranker.max_candidates, 20);
        assert_eq!(config.classifier.substrings, vec!["perdu".to_string()]);
        assert_eq!(config.evidence.max_entries, 10);
    }

    #[test]
    fn load_from_path_reads_a_file() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        write!(file, "{{ evidence: {{ max_entries: 5 }} }}").expect("write");
        let config = RecallConfig::load_from_path(file.path()).expect("config");
        assert_eq!(config.evidence.max_entries, 5);
    }

    #[test]
    fn validation_rejects_zero_evidence_cap() {
        let result = RecallConfig::load_from_str("{ evidence: { max_entries: 0 } }");
        match result {
            Err(ConfigError::InvalidField { path, .. }) => {
                assert_eq!(path, "evidence.max_entries");
            }
            other => panic!("expected InvalidField, got {other:?}"),
        }
    }

    #[test]
    fn validation_rejects_evidence_cap_above_candidate_cap() {
        let config = RecallConfig::builder()
            .ranker(RankerConfig {
                max_candidates: 5,
                min_score: None,
            })
            .evidence(EvidenceConfig { max_entries: 10 })
            .build();
        let result = config.validate();
        match result {
            Err(ConfigError::InvalidField { path, .. }) => {
                assert_eq!(path, "evidence.max_entries");
            }
            other => panic!("expected InvalidField, got {other:?}"),
        }
    }

    #[test]
    fn validation_rejects_negative_min_score() {
        let result = RecallConfig::load_from_str("{ ranker: { min_score: -0.5 } }");
        assert!(matches!(result, Err(ConfigError::InvalidField { .. })));
    }
}

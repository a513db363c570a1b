//! Integration tests for the recall pipeline.
//!
//! These live in `tests/` rather than inside `src/pipeline.rs` because they
//! rely on `lumen-test-utils`, which itself depends on `lumen-recall`. A
//! unit-test build would compile a second copy of this crate and its stub
//! reasoners/stores would not satisfy the traits seen by the test module; an
//! integration test links the same library instance `lumen-test-utils` was
//! built against, so the types unify.

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use lumen_memory::{InMemoryStore, MemoryRecord, MemoryStore, Modality};
use lumen_recall::error::RecallError;
use lumen_recall::pipeline::{QueryOutcome, RecallOptions, RecallPipeline};
use lumen_recall::protocol::REFUSAL;
use lumen_recall::ranker::{MatchSource, RankedCandidate, RelevanceScorer};
use lumen_recall::reasoner::{Reasoner, ReasonerError};
use lumen_test_utils::{FailingReasoner, FixedReasoner, RecordingReasoner, UnscopedStore};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

fn keys_record(owner: &str) -> MemoryRecord {
    MemoryRecord {
        id: Uuid::new_v4(),
        owner_id: owner.to_string(),
        modality: Modality::Photo,
        captured_at: Utc.with_ymd_and_hms(2024, 1, 5, 8, 0, 0).unwrap(),
        source_uri: "media/keys.jpg".to_string(),
        ai_description: Some("a set of keys on a kitchen counter".to_string()),
        transcription: None,
        detected_labels: vec!["keys".to_string()],
    }
}

fn keys_answer() -> String {
    "Answer: Your keys are on the kitchen counter.\n\
     Evidence:\n\
     - file: media/keys.jpg | time: 2024-01-05T08:00:00Z | modality: photo | confirmation: visual\n\
     Context: A set of keys lying on a kitchen counter.\n\
     Confidence: High - A single clear visual confirmation."
        .to_string()
}

async fn store_with_keys() -> Arc<InMemoryStore> {
    let store = Arc::new(InMemoryStore::new());
    store.append(keys_record("u1")).await.expect("append");
    store
}

#[tokio::test]
async fn memory_query_with_matching_record_is_answered() {
    let store = store_with_keys().await;
    let reasoner = Arc::new(FixedReasoner::new(keys_answer()));
    let pipeline = RecallPipeline::new(store, reasoner);

    let outcome = pipeline.answer("u1", "where are my keys").await.expect("answer");
    let QueryOutcome::Answered { answer, evidence, .. } = outcome else {
        panic!("expected an answer, got {outcome:?}");
    };
    assert_eq!(evidence.len(), 1);
    assert_eq!(evidence.entries[0].source_uri, "media/keys.jpg");
    assert_eq!(answer.citations[0].source_uri, "media/keys.jpg");
}

#[tokio::test]
async fn other_owner_gets_the_exact_refusal_without_the_reasoner() {
    let store = store_with_keys().await;
    let reasoner = Arc::new(RecordingReasoner::new(keys_answer()));
    let pipeline = RecallPipeline::new(store, reasoner.clone());

    let outcome = pipeline.answer("u2", "where are my keys").await.expect("answer");
    let QueryOutcome::Refused { text, evidence } = outcome else {
        panic!("expected a refusal, got {outcome:?}");
    };
    assert_eq!(text, REFUSAL);
    assert!(evidence.is_none());
    assert_eq!(reasoner.calls().len(), 0);
}

#[tokio::test]
async fn general_conversation_bypasses_the_pipeline() {
    let store = store_with_keys().await;
    let reasoner = Arc::new(RecordingReasoner::new(keys_answer()));
    let pipeline = RecallPipeline::new(store, reasoner.clone());

    let outcome = pipeline.answer("u1", "hello, how are you").await.expect("answer");
    assert!(matches!(outcome, QueryOutcome::Bypassed));
    assert_eq!(reasoner.calls().len(), 0);
}

#[tokio::test]
async fn empty_query_is_an_error() {
    let store = store_with_keys().await;
    let reasoner = Arc::new(FixedReasoner::new(keys_answer()));
    let pipeline = RecallPipeline::new(store, reasoner);
    let result = pipeline.answer("u1", "   ").await;
    assert!(matches!(result, Err(RecallError::EmptyQuery)));
}

#[tokio::test]
async fn leaked_foreign_records_fail_the_query_loudly() {
    let store = Arc::new(UnscopedStore::new(vec![keys_record("u1")]));
    let reasoner = Arc::new(FixedReasoner::new(keys_answer()));
    let pipeline = RecallPipeline::new(store, reasoner);

    let result = pipeline.answer("u2", "where are my keys").await;
    assert!(matches!(
        result,
        Err(RecallError::OwnerScopeViolation { .. })
    ));
}

#[tokio::test]
async fn reasoner_failure_fails_closed_to_refusal() {
    let store = store_with_keys().await;
    let pipeline = RecallPipeline::new(store, Arc::new(FailingReasoner));

    let outcome = pipeline.answer("u1", "where are my keys").await.expect("answer");
    let QueryOutcome::Refused { text, evidence } = outcome else {
        panic!("expected a refusal, got {outcome:?}");
    };
    assert_eq!(text, REFUSAL);
    assert!(evidence.is_some());
}

#[tokio::test]
async fn malformed_reasoner_output_fails_closed_to_refusal() {
    let store = store_with_keys().await;
    let reasoner = Arc::new(FixedReasoner::new(
        "They are probably on the counter, I guess!".to_string(),
    ));
    let pipeline = RecallPipeline::new(store, reasoner);

    let outcome = pipeline.answer("u1", "where are my keys").await.expect("answer");
    let QueryOutcome::Refused { text, .. } = outcome else {
        panic!("expected a refusal, got {outcome:?}");
    };
    assert_eq!(text, REFUSAL);
}

#[tokio::test]
async fn slow_reasoner_times_out_to_refusal() {
    struct SleepyReasoner;

    #[async_trait]
    impl Reasoner for SleepyReasoner {
        async fn reason(&self, _query: &str, _evidence: &str) -> Result<String, ReasonerError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(String::new())
        }
    }

    let store = store_with_keys().await;
    let options = RecallOptions {
        reasoner_timeout: Duration::from_millis(20),
        ..RecallOptions::default()
    };
    let pipeline =
        RecallPipeline::new(store, Arc::new(SleepyReasoner)).with_options(options);

    let outcome = pipeline.answer("u1", "where are my keys").await.expect("answer");
    let QueryOutcome::Refused { text, .. } = outcome else {
        panic!("expected a refusal, got {outcome:?}");
    };
    assert_eq!(text, REFUSAL);
}

#[tokio::test]
async fn from_config_applies_classifier_tables_and_caps() {
    let config = lumen_config::RecallConfig::load_from_str(
        r#"{
            classifier: { prefixes: ["wo sind"] },
            evidence: { max_entries: 1 },
        }"#,
    )
    .expect("config");
    let store = store_with_keys().await;
    let reasoner = Arc::new(RecordingReasoner::new(keys_answer()));
    let pipeline = RecallPipeline::from_config(store, reasoner.clone(), &config);

    // The configured prefix table replaces the built-in one, so the
    // German query enters retrieval instead of bypassing it; no record
    // matches, so it still refuses without the reasoner.
    let outcome = pipeline.answer("u1", "wo sind meine Schlüssel").await.expect("answer");
    let QueryOutcome::Refused { text, evidence } = outcome else {
        panic!("expected a refusal, got {outcome:?}");
    };
    assert_eq!(text, REFUSAL);
    assert!(evidence.is_none());
    assert_eq!(reasoner.calls().len(), 0);

    // The built-in prefixes are gone entirely.
    let outcome = pipeline.answer("u1", "hello, how are you").await.expect("answer");
    assert!(matches!(outcome, QueryOutcome::Bypassed));
}

#[tokio::test]
async fn stub_scorer_relevances_flow_through_assembly_in_order() {
    struct FixedScorer;

    #[async_trait]
    impl RelevanceScorer for FixedScorer {
        async fn search(
            &self,
            _query: &str,
            records: &[MemoryRecord],
            _owner_id: &str,
        ) -> Result<Vec<RankedCandidate>, RecallError> {
            // Transcript match outranks a label match on another record.
            Ok(vec![
                RankedCandidate {
                    record: records[0].clone(),
                    match_source: MatchSource::Transcript,
                    relevance: 0.8,
                },
                RankedCandidate {
                    record: records[1].clone(),
                    match_source: MatchSource::DetectedLabel,
                    relevance: 0.5,
                },
            ])
        }
    }

    let store = Arc::new(InMemoryStore::new());
    let mut spoken = keys_record("u1");
    spoken.source_uri = "media/spoken.mp4".to_string();
    spoken.modality = Modality::Video;
    spoken.transcription = Some("I put the wallet on the dresser".to_string());
    let mut labeled = keys_record("u1");
    labeled.source_uri = "media/labeled.jpg".to_string();
    labeled.detected_labels = vec!["wallet".to_string()];
    store.append(spoken).await.expect("append");
    store.append(labeled).await.expect("append");

    let answer = "Answer: Your wallet is on the dresser.\n\
         Evidence:\n\
         - file: media/spoken.mp4 | time: 2024-01-05T08:00:00Z | modality: video | confirmation: audio\n\
         Context: A wallet placed on a dresser.\n\
         Confidence: Medium - Heard but not seen."
        .to_string();
    let pipeline = RecallPipeline::new(store, Arc::new(FixedReasoner::new(answer)))
        .with_scorer(Arc::new(FixedScorer));

    let outcome = pipeline.answer("u1", "find my wallet").await.expect("answer");
    let QueryOutcome::Answered { evidence, .. } = outcome else {
        panic!("expected an answer, got {outcome:?}");
    };
    assert_eq!(evidence.len(), 2);
    assert_eq!(evidence.entries[0].source_uri, "media/spoken.mp4");
    assert_eq!(evidence.entries[0].relevance, 0.8);
    assert_eq!(evidence.entries[1].source_uri, "media/labeled.jpg");
    assert_eq!(evidence.entries[1].relevance, 0.5);
}

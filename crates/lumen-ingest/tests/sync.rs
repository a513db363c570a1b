//! Integration tests for the sync service.
//!
//! These live in `tests/` rather than inside `src/sync.rs` because they rely
//! on `lumen-test-utils`, which itself depends on `lumen-ingest`. A unit-test
//! build would compile a second copy of this crate and its stub
//! implementations would not satisfy the traits seen by the test module; an
//! integration test links the same library instance `lumen-test-utils` was
//! built against, so the types unify.

use chrono::Utc;
use lumen_ingest::model::{MediaAnalysis, MediaKind, MediaObject};
use lumen_ingest::{SyncReport, SyncService};
use lumen_memory::{InMemoryStore, MemoryStore, Modality};
use lumen_test_utils::{FailingAnalyzer, StubAnalyzer, StubMediaSource};
use pretty_assertions::assert_eq;
use std::sync::Arc;

fn media_item(id: &str, owner: &str, file_url: &str) -> MediaObject {
    MediaObject {
        id: id.to_string(),
        owner_id: owner.to_string(),
        kind: MediaKind::Video,
        file_url: file_url.to_string(),
        file_name: format!("{id}.mp4"),
        captured_at: Utc::now(),
    }
}

#[tokio::test]
async fn sync_records_analyzed_media() {
    let source = Arc::new(StubMediaSource::new(vec![
        media_item("m1", "u1", "media/m1.mp4"),
        media_item("m2", "u1", "media/m2.mp4"),
    ]));
    let analyzer = Arc::new(StubAnalyzer::new(MediaAnalysis {
        description: Some("a wallet on a dresser".to_string()),
        transcript: Some("leaving the wallet here".to_string()),
        labels: vec!["wallet".to_string()],
    }));
    let store = Arc::new(InMemoryStore::new());
    let service = SyncService::new(source, analyzer, store.clone());

    let report = service.sync_owner("u1").await.expect("sync");
    assert_eq!(
        report,
        SyncReport {
            total: 2,
            processed: 2,
            errors: 0
        }
    );

    let records = store.list_records("u1").await.expect("list");
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].modality, Modality::Video);
    assert_eq!(records[0].source_uri, "media/m1.mp4");
    assert_eq!(
        records[0].ai_description.as_deref(),
        Some("a wallet on a dresser")
    );
    assert!(records[0].has_text_surface());
}

#[tokio::test]
async fn items_without_a_file_url_are_skipped() {
    let source = Arc::new(StubMediaSource::new(vec![
        media_item("m1", "u1", ""),
        media_item("m2", "u1", "media/m2.mp4"),
    ]));
    let analyzer = Arc::new(StubAnalyzer::new(MediaAnalysis::default()));
    let store = Arc::new(InMemoryStore::new());
    let service = SyncService::new(source, analyzer, store.clone());

    let report = service.sync_owner("u1").await.expect("sync");
    assert_eq!(report.total, 2);
    assert_eq!(report.processed, 1);
    assert_eq!(report.errors, 0);
    assert_eq!(store.list_records("u1").await.expect("list").len(), 1);
}

#[tokio::test]
async fn one_failing_item_does_not_stall_the_rest() {
    let source = Arc::new(StubMediaSource::new(vec![
        media_item("m1", "u1", "media/m1.mp4"),
        media_item("m2", "u1", "media/m2.mp4"),
    ]));
    let store = Arc::new(InMemoryStore::new());
    let service = SyncService::new(source, Arc::new(FailingAnalyzer), store.clone());

    let report = service.sync_owner("u1").await.expect("sync");
    assert_eq!(report.processed, 0);
    assert_eq!(report.errors, 2);
    assert_eq!(store.list_records("u1").await.expect("list").len(), 0);
}

#[tokio::test]
async fn sync_is_scoped_to_the_requested_owner() {
    let source = Arc::new(StubMediaSource::new(vec![
        media_item("m1", "u1", "media/m1.mp4"),
        media_item("m2", "u2", "media/m2.mp4"),
    ]));
    let analyzer = Arc::new(StubAnalyzer::new(MediaAnalysis::default()));
    let store = Arc::new(InMemoryStore::new());
    let service = SyncService::new(source, analyzer, store.clone());

    let report = service.sync_owner("u1").await.expect("sync");
    assert_eq!(report.total, 1);
    assert_eq!(store.list_records("u1").await.expect("list").len(), 1);
    assert_eq!(store.list_records("u2").await.expect("list").len(), 0);
}

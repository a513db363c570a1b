//! Sync service: fetch media metadata, analyze, append memory records.

use crate::analyzer::MediaAnalyzer;
use crate::error::IngestError;
use crate::model::{MediaAnalysis, MediaObject};
use crate::source::MediaSource;
use log::{info, warn};
use lumen_memory::{MemoryRecord, MemoryStore};
use std::sync::Arc;
use uuid::Uuid;

/// Summary of one sync pass for an owner.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Media items reported by the source.
    pub total: usize,
    /// Items analyzed and recorded.
    pub processed: usize,
    /// Items that failed analysis or recording.
    pub errors: usize,
}

/// Fetch → analyze → append loop over an owner's media.
///
/// Per-item failures are tolerated: the item is counted and skipped so one
/// broken file cannot stall the rest of the owner's history.
pub struct SyncService {
    source: Arc<dyn MediaSource>,
    analyzer: Arc<dyn MediaAnalyzer>,
    store: Arc<dyn MemoryStore>,
}

impl SyncService {
    /// Create a sync service from its collaborators.
    pub fn new(
        source: Arc<dyn MediaSource>,
        analyzer: Arc<dyn MediaAnalyzer>,
        store: Arc<dyn MemoryStore>,
    ) -> Self {
        Self {
            source,
            analyzer,
            store,
        }
    }

    /// Run one full sync pass for `owner_id`.
    pub async fn sync_owner(&self, owner_id: &str) -> Result<SyncReport, IngestError> {
        info!("starting media sync (owner={owner_id})");
        let media = self.source.list_media(owner_id).await?;
        let total = media.len();
        let mut processed = 0;
        let mut errors = 0;

        for item in media {
            if item.file_url.is_empty() {
                continue;
            }
            match self.ingest_item(owner_id, &item).await {
                Ok(()) => processed += 1,
                Err(err) => {
                    warn!("failed to ingest media item (id={}): {err}", item.id);
                    errors += 1;
                }
            }
        }

        info!(
            "media sync complete (owner={owner_id}, processed={processed}/{total}, errors={errors})"
        );
        Ok(SyncReport {
            total,
            processed,
            errors,
        })
    }

    async fn ingest_item(&self, owner_id: &str, item: &MediaObject) -> Result<(), IngestError> {
        let analysis = self.analyzer.analyze(item).await?;
        let record = build_record(owner_id, item, analysis);
        self.store.append(record).await?;
        Ok(())
    }
}

/// Convert an analyzed media item into a memory record.
pub fn build_record(owner_id: &str, item: &MediaObject, analysis: MediaAnalysis) -> MemoryRecord {
    MemoryRecord {
        id: Uuid::new_v4(),
        owner_id: owner_id.to_string(),
        modality: item.kind.to_modality(),
        captured_at: item.captured_at,
        source_uri: item.file_url.clone(),
        ai_description: analysis.description,
        transcription: analysis.transcript,
        detected_labels: analysis.labels,
    }
}

//! Ingestion stubs.

use async_trait::async_trait;
use lumen_ingest::{IngestError, MediaAnalysis, MediaAnalyzer, MediaObject, MediaSource};

/// Media source serving a fixed list, scoped by owner.
pub struct StubMediaSource {
    items: Vec<MediaObject>,
}

impl StubMediaSource {
    /// Create a source seeded with items.
    pub fn new(items: Vec<MediaObject>) -> Self {
        Self { items }
    }
}

#[async_trait]
impl MediaSource for StubMediaSource {
    async fn list_media(&self, owner_id: &str) -> Result<Vec<MediaObject>, IngestError> {
        Ok(self
            .items
            .iter()
            .filter(|item| item.owner_id == owner_id)
            .cloned()
            .collect())
    }
}

/// Analyzer that returns the same analysis for every item.
pub struct StubAnalyzer {
    analysis: MediaAnalysis,
}

impl StubAnalyzer {
    /// Create an analyzer returning `analysis` for every call.
    pub fn new(analysis: MediaAnalysis) -> Self {
        Self { analysis }
    }
}

#[async_trait]
impl MediaAnalyzer for StubAnalyzer {
    async fn analyze(&self, _media: &MediaObject) -> Result<MediaAnalysis, IngestError> {
        Ok(self.analysis.clone())
    }
}

/// Analyzer that always fails.
pub struct FailingAnalyzer;

#[async_trait]
impl MediaAnalyzer for FailingAnalyzer {
    async fn analyze(&self, media: &MediaObject) -> Result<MediaAnalysis, IngestError> {
        Err(IngestError::Analysis(format!(
            "stubbed failure for {}",
            media.id
        )))
    }
}

//! Media analysis interface.

use crate::error::IngestError;
use crate::model::{MediaAnalysis, MediaObject};
use async_trait::async_trait;

#[async_trait]
/// Analysis collaborator turning media into textual by-products.
///
/// Implementations typically transcribe audio/video speech and describe
/// image/video frames; this crate never reads file bytes itself.
pub trait MediaAnalyzer: Send + Sync {
    /// Produce textual by-products for one media item.
    async fn analyze(&self, media: &MediaObject) -> Result<MediaAnalysis, IngestError>;
}

//! Error types for media ingestion.

use lumen_memory::MemoryError;
use thiserror::Error;

/// Errors returned by ingestion collaborators.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Transport-level failure talking to the media service.
    #[error("transport error: {0}")]
    Transport(String),
    /// The media service answered with a non-success status.
    #[error("media service returned status {0}")]
    Status(u16),
    /// Analysis of a media item failed.
    #[error("analysis failed: {0}")]
    Analysis(String),
    /// Appending to the memory store failed.
    #[error("store error: {0}")]
    Store(#[from] MemoryError),
}

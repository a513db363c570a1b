//! Media ingestion for the Lumen recall core.
//!
//! Runs outside the query path: fetch an owner's captured media metadata,
//! analyze each item into textual by-products, and append the resulting
//! records to the memory store.

pub mod analyzer;
pub mod error;
pub mod model;
pub mod source;
pub mod sync;

/// Media analysis interface.
pub use analyzer::MediaAnalyzer;
/// Ingestion error type.
pub use error::IngestError;
/// Fetched media models.
pub use model::{MediaAnalysis, MediaKind, MediaObject};
/// Media metadata sources.
pub use source::{MediaSource, RestMediaSource};
/// Sync service and report.
pub use sync::{SyncReport, SyncService, build_record};

//! Error types for the recall pipeline.

use lumen_memory::MemoryError;
use thiserror::Error;
use uuid::Uuid;

/// Errors produced inside a query-answer cycle.
///
/// Only `OwnerScopeViolation` and `EmptyQuery` escape the pipeline as
/// errors; every other kind is absorbed at the boundary and converted to
/// the refusal sentence, with the kind retained in logs.
#[derive(Debug, Error)]
pub enum RecallError {
    /// A record outside the requesting owner's scope reached the ranker.
    /// This indicates an upstream scoping bug and fails the whole query.
    #[error("owner scope violation: record {record_id} belongs to {record_owner}, not {requested_owner}")]
    OwnerScopeViolation {
        record_id: Uuid,
        record_owner: String,
        requested_owner: String,
    },
    /// The query text is empty.
    #[error("empty query")]
    EmptyQuery,
    /// Memory store failure.
    #[error("store error: {0}")]
    Store(#[from] MemoryError),
    /// A delegated search backend failed.
    #[error("search error: {0}")]
    Search(String),
    /// The reasoner call failed.
    #[error("reasoner error: {0}")]
    Reasoner(String),
    /// The reasoner's output matched neither permitted shape.
    #[error("protocol violation: {0}")]
    Protocol(String),
    /// An external call exceeded its deadline.
    #[error("timed out waiting for {0}")]
    Timeout(&'static str),
}

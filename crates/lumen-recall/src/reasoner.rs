//! Reasoner interface for grounded answering.

use async_trait::async_trait;
use thiserror::Error;

/// Errors returned by reasoner implementations.
#[derive(Debug, Error)]
pub enum ReasonerError {
    /// Transport-level failure.
    #[error("transport error: {0}")]
    Transport(String),
    /// The service answered with a non-success status.
    #[error("service returned status {0}")]
    Status(u16),
    /// The response carried no usable content.
    #[error("response carried no content")]
    MissingContent,
    /// The service is not configured or unavailable.
    #[error("reasoner unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
/// Downstream text-generation collaborator bound to the answer protocol.
///
/// Implementations receive the user's literal query and the rendered
/// evidence block, and nothing else. Callers never invoke a reasoner with
/// empty evidence; that case short-circuits to refusal upstream.
pub trait Reasoner: Send + Sync {
    /// Generate a raw response for `query` grounded in `evidence`.
    async fn reason(&self, query: &str, evidence: &str) -> Result<String, ReasonerError>;
}

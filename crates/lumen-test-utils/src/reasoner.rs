//! Reasoner stubs.

use async_trait::async_trait;
use lumen_recall::{Reasoner, ReasonerError};
use parking_lot::Mutex;

/// Reasoner that always returns the same response.
pub struct FixedReasoner {
    response: String,
}

impl FixedReasoner {
    /// Create a reasoner returning `response` for every call.
    pub fn new(response: String) -> Self {
        Self { response }
    }
}

#[async_trait]
impl Reasoner for FixedReasoner {
    async fn reason(&self, _query: &str, _evidence: &str) -> Result<String, ReasonerError> {
        Ok(self.response.clone())
    }
}

/// Reasoner that always fails.
pub struct FailingReasoner;

#[async_trait]
impl Reasoner for FailingReasoner {
    async fn reason(&self, _query: &str, _evidence: &str) -> Result<String, ReasonerError> {
        Err(ReasonerError::Unavailable("stubbed failure".to_string()))
    }
}

/// Reasoner that records every call and returns a fixed response.
pub struct RecordingReasoner {
    response: String,
    calls: Mutex<Vec<(String, String)>>,
}

impl RecordingReasoner {
    /// Create a recording reasoner returning `response` for every call.
    pub fn new(response: String) -> Self {
        Self {
            response,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// All `(query, evidence)` pairs seen so far.
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl Reasoner for RecordingReasoner {
    async fn reason(&self, query: &str, evidence: &str) -> Result<String, ReasonerError> {
        self.calls
            .lock()
            .push((query.to_string(), evidence.to_string()));
        Ok(self.response.clone())
    }
}

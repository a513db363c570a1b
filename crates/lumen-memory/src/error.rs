//! Error types for memory stores.

/// Errors returned by memory stores.
#[derive(Debug, thiserror::Error)]
pub enum MemoryError {
    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Serialization error.
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    /// Owner identifier unusable as a storage key.
    #[error("invalid owner id: {0}")]
    InvalidOwner(String),
}

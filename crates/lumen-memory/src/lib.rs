//! Captured-memory records and stores for the Lumen recall core.

pub mod error;
pub mod model;
pub mod store;

/// Memory error type.
pub use error::MemoryError;
/// Captured record model.
pub use model::{MemoryRecord, Modality};
/// Store interface and default implementations.
pub use store::{FileMemoryStore, InMemoryStore, MemoryStore};

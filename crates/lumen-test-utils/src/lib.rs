//! Test helpers shared across Lumen crates.

pub mod ingest;
pub mod memory;
pub mod reasoner;

pub use ingest::{FailingAnalyzer, StubAnalyzer, StubMediaSource};
pub use memory::UnscopedStore;
pub use reasoner::{FailingReasoner, FixedReasoner, RecordingReasoner};

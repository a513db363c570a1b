//! Memory store stubs.

use async_trait::async_trait;
use lumen_memory::{MemoryError, MemoryRecord, MemoryStore};
use parking_lot::RwLock;

/// Store that ignores owner scoping on reads.
///
/// Returns every held record regardless of the requested owner, exercising
/// the ranker's owner-scope guard.
#[derive(Debug, Default)]
pub struct UnscopedStore {
    records: RwLock<Vec<MemoryRecord>>,
}

impl UnscopedStore {
    /// Create a store seeded with records.
    pub fn new(records: Vec<MemoryRecord>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }
}

#[async_trait]
impl MemoryStore for UnscopedStore {
    async fn append(&self, record: MemoryRecord) -> Result<(), MemoryError> {
        self.records.write().push(record);
        Ok(())
    }

    async fn list_records(&self, _owner_id: &str) -> Result<Vec<MemoryRecord>, MemoryError> {
        Ok(self.records.read().clone())
    }
}

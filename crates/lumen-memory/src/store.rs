//! Store interface and default implementations.

use crate::error::MemoryError;
use crate::model::MemoryRecord;
use async_trait::async_trait;
use log::{debug, info};
use parking_lot::RwLock;
use std::fs::OpenOptions;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

#[async_trait]
/// Access to the canonical set of captured records.
///
/// The retrieval pipeline only reads; `append` exists for the ingestion
/// side. Records are never structurally mutated or deleted here.
pub trait MemoryStore: Send + Sync {
    /// Append a record produced by the analysis pipeline.
    async fn append(&self, record: MemoryRecord) -> Result<(), MemoryError>;

    /// List all records owned by `owner_id`.
    async fn list_records(&self, owner_id: &str) -> Result<Vec<MemoryRecord>, MemoryError>;
}

/// In-memory store holding records behind a read/write lock.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    records: RwLock<Vec<MemoryRecord>>,
}

impl InMemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }

    /// Create a store seeded with records.
    pub fn with_records(records: Vec<MemoryRecord>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }
}

#[async_trait]
impl MemoryStore for InMemoryStore {
    async fn append(&self, record: MemoryRecord) -> Result<(), MemoryError> {
        let mut records = self.records.write();
        debug!(
            "appended memory record (id={}, owner={}, modality={})",
            record.id,
            record.owner_id,
            record.modality.as_str()
        );
        records.push(record);
        Ok(())
    }

    async fn list_records(&self, owner_id: &str) -> Result<Vec<MemoryRecord>, MemoryError> {
        let records = self.records.read();
        let owned: Vec<MemoryRecord> = records
            .iter()
            .filter(|record| record.owner_id == owner_id)
            .cloned()
            .collect();
        debug!("listed memory records (owner={owner_id}, returned={})", owned.len());
        Ok(owned)
    }
}

/// File-backed store holding JSONL records per owner.
#[derive(Debug, Clone)]
pub struct FileMemoryStore {
    /// Root directory for owner files.
    root: PathBuf,
}

impl FileMemoryStore {
    /// Create a new file-backed store under the given root.
    pub fn new(root: impl AsRef<Path>) -> Result<Self, MemoryError> {
        let root = root.as_ref().to_path_buf();
        std::fs::create_dir_all(&root)?;
        info!("initialized file memory store (root={})", root.display());
        Ok(Self { root })
    }

    /// Path to the owner's JSONL file.
    fn owner_path(&self, owner_id: &str) -> Result<PathBuf, MemoryError> {
        if owner_id.is_empty()
            || !owner_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(MemoryError::InvalidOwner(owner_id.to_string()));
        }
        Ok(self.root.join(format!("{owner_id}.jsonl")))
    }

    /// Load all records for an owner.
    fn load_records(&self, owner_id: &str) -> Result<Vec<MemoryRecord>, MemoryError> {
        let path = self.owner_path(owner_id)?;
        if !path.exists() {
            return Ok(Vec::new());
        }
        let file = OpenOptions::new().read(true).open(path)?;
        let reader = BufReader::new(file);
        let mut records = Vec::new();
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let record: MemoryRecord = serde_json::from_str(&line)?;
            records.push(record);
        }
        Ok(records)
    }
}

#[async_trait]
impl MemoryStore for FileMemoryStore {
    async fn append(&self, record: MemoryRecord) -> Result<(), MemoryError> {
        let path = self.owner_path(&record.owner_id)?;
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        let line = serde_json::to_string(&record)?;
        writeln!(file, "{line}")?;
        debug!(
            "appended memory record (id={}, owner={}, modality={})",
            record.id,
            record.owner_id,
            record.modality.as_str()
        );
        Ok(())
    }

    async fn list_records(&self, owner_id: &str) -> Result<Vec<MemoryRecord>, MemoryError> {
        let records = self.load_records(owner_id)?;
        debug!("listed memory records (owner={owner_id}, returned={})", records.len());
        Ok(records)
    }
}

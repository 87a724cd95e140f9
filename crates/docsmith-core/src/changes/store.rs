//! Persistent state for change records.
//!
//! [`StateStore`] is a small key/value seam over durable storage.
//! [`FileStateStore`] keeps one JSON file per key under `.docsmith/state/`;
//! [`MemoryStateStore`] keeps values in memory for sessions without a
//! workspace and for tests.
//!
//! [`ChangeRecordStore`] owns the newest-first record list, loads it once,
//! and rewrites the whole list after every mutation.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::changes::record::{ChangeId, ChangeRecord, ChangeStatus};
use crate::constants::CHANGE_RECORDS_KEY;
use crate::errors::DocsmithError;

// ============================================================================
// StateStore
// ============================================================================

/// Key/value persistence for session state.
pub trait StateStore: Send {
    /// Read the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<Value>, DocsmithError>;

    /// Replace the value stored under `key`.
    fn set(&mut self, key: &str, value: Value) -> Result<(), DocsmithError>;
}

/// One pretty-printed JSON file per key.
#[derive(Debug, Clone)]
pub struct FileStateStore {
    dir: PathBuf,
}

impl FileStateStore {
    /// Store values under `dir` (created on first write).
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The directory values are written to.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File backing `key`. Characters outside `[A-Za-z0-9._-]` become `_`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{}.json", name))
    }
}

impl StateStore for FileStateStore {
    fn get(&self, key: &str) -> Result<Option<Value>, DocsmithError> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        let content =
            fs::read_to_string(&path).map_err(|e| DocsmithError::file_system(&path, e))?;
        let value = serde_json::from_str(&content).map_err(|e| {
            DocsmithError::Persistence(format!("Failed to parse {}: {}", path.display(), e))
        })?;
        Ok(Some(value))
    }

    fn set(&mut self, key: &str, value: Value) -> Result<(), DocsmithError> {
        fs::create_dir_all(&self.dir).map_err(|e| DocsmithError::file_system(&self.dir, e))?;
        let path = self.path_for(key);
        let json = serde_json::to_string_pretty(&value)?;
        fs::write(&path, json).map_err(|e| DocsmithError::file_system(&path, e))
    }
}

/// In-memory state; lost when dropped.
#[derive(Debug, Clone, Default)]
pub struct MemoryStateStore {
    values: HashMap<String, Value>,
}

impl MemoryStateStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a value, e.g. to simulate previously persisted state.
    pub fn with_value(mut self, key: impl Into<String>, value: Value) -> Self {
        self.values.insert(key.into(), value);
        self
    }
}

impl StateStore for MemoryStateStore {
    fn get(&self, key: &str) -> Result<Option<Value>, DocsmithError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: Value) -> Result<(), DocsmithError> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}

// ============================================================================
// ChangeRecordStore
// ============================================================================

/// The session's change records, newest first.
pub struct ChangeRecordStore {
    state: Box<dyn StateStore>,
    records: Vec<ChangeRecord>,
}

impl std::fmt::Debug for ChangeRecordStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeRecordStore")
            .field("records", &self.records.len())
            .finish()
    }
}

impl ChangeRecordStore {
    /// Load records from `state`.
    ///
    /// Missing state starts empty. Unreadable or corrupt state also starts
    /// empty, with a warning; the next mutation overwrites it.
    pub fn load(state: Box<dyn StateStore>) -> Self {
        let records = match state.get(CHANGE_RECORDS_KEY) {
            Ok(None) => Vec::new(),
            Ok(Some(value)) => match serde_json::from_value::<Vec<ChangeRecord>>(value) {
                Ok(records) => records,
                Err(e) => {
                    tracing::warn!("Discarding corrupt change records: {}", e);
                    Vec::new()
                }
            },
            Err(e) => {
                tracing::warn!("Could not load change records: {}", e);
                Vec::new()
            }
        };
        tracing::debug!("Loaded {} change records", records.len());
        Self { state, records }
    }

    /// All records, newest first.
    pub fn records(&self) -> &[ChangeRecord] {
        &self.records
    }

    /// Look up a record by id.
    pub fn get(&self, id: &ChangeId) -> Option<&ChangeRecord> {
        self.records.iter().find(|r| &r.id == id)
    }

    /// Add a record at the front and persist.
    ///
    /// On persistence failure the record is dropped again and the error returned.
    pub fn prepend(&mut self, record: ChangeRecord) -> Result<(), DocsmithError> {
        self.records.insert(0, record);
        if let Err(e) = self.persist() {
            self.records.remove(0);
            return Err(e);
        }
        Ok(())
    }

    /// Set a record's status and persist.
    ///
    /// On persistence failure the previous status is restored and the error
    /// returned.
    pub fn set_status(&mut self, id: &ChangeId, status: ChangeStatus) -> Result<(), DocsmithError> {
        let index = self
            .records
            .iter()
            .position(|r| &r.id == id)
            .ok_or_else(|| DocsmithError::RecordNotFound(id.to_string()))?;
        let previous = std::mem::replace(&mut self.records[index].status, status);
        if let Err(e) = self.persist() {
            tracing::warn!("Failed to persist status of change {}: {}", id, e);
            self.records[index].status = previous;
            return Err(e);
        }
        Ok(())
    }

    /// Remove every record and persist the empty list.
    pub fn clear(&mut self) -> Result<(), DocsmithError> {
        self.records.clear();
        self.persist()
    }

    fn persist(&mut self) -> Result<(), DocsmithError> {
        let value = serde_json::to_value(&self.records)
            .map_err(|e| DocsmithError::Persistence(e.to_string()))?;
        self.state.set(CHANGE_RECORDS_KEY, value)
    }
}

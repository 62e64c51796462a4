//! Persistence for column-visibility snapshots.
//!
//! Snapshots are opaque JSON strings stored under a caller-supplied
//! identifier. Two stores are provided: an in-memory one for embedding
//! and tests, and a file store keeping one JSON file per identifier.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::error::DataTableError;
use crate::Result;

/// Where snapshots are read from and written to.
pub trait SnapshotStore {
    /// Snapshot stored under `id`, if any.
    fn load(&self, id: &str) -> Result<Option<String>>;

    /// Replace the snapshot stored under `id`.
    fn save(&self, id: &str, snapshot: &str) -> Result<()>;
}

/// In-process store. Clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotStore for MemoryStore {
    fn load(&self, id: &str) -> Result<Option<String>> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        Ok(entries.get(id).cloned())
    }

    fn save(&self, id: &str, snapshot: &str) -> Result<()> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(id.to_string(), snapshot.to_string());
        Ok(())
    }
}

/// Store keeping `<dir>/<id>.json` files.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store under the platform data directory (`<data>/datatable/columns`).
    pub fn default_location() -> Result<Self> {
        let base = dirs::data_dir().ok_or(DataTableError::NoDataDir)?;
        Ok(Self::new(base.join("datatable").join("columns")))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File backing `id`. Characters unsafe in file names become `_`.
    pub fn path_for(&self, id: &str) -> PathBuf {
        let name: String = id
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{}.json", name))
    }
}

impl SnapshotStore for FileStore {
    fn load(&self, id: &str) -> Result<Option<String>> {
        let path = self.path_for(id);
        if !path.exists() {
            return Ok(None);
        }
        fs::read_to_string(&path)
            .map(Some)
            .map_err(|source| DataTableError::Snapshot { path, source })
    }

    fn save(&self, id: &str, snapshot: &str) -> Result<()> {
        let path = self.path_for(id);
        fs::create_dir_all(&self.dir).map_err(|source| DataTableError::Snapshot {
            path: self.dir.clone(),
            source,
        })?;
        fs::write(&path, snapshot).map_err(|source| DataTableError::Snapshot { path, source })
    }
}

//! Local durable key-value storage
//!
//! Chat sessions are persisted as one serialized string under a fixed key.
//! [`DurableStore`] is that contract; [`SledStore`] backs it with an
//! embedded `sled` database and [`MemoryStore`] keeps values in memory.

use crate::error::{DemoError, Result};
use directories::ProjectDirs;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// String-keyed durable storage
pub trait DurableStore: Send + Sync {
    /// Read a value; `None` when the key is unset
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a value, replacing any previous one
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove a value; removing an unset key is not an error
    fn remove(&self, key: &str) -> Result<()>;
}

/// Durable store backed by an embedded `sled` database
pub struct SledStore {
    db: sled::Db,
    path: PathBuf,
}

impl SledStore {
    /// Open the store in the user's data directory
    ///
    /// # Errors
    ///
    /// Returns `DemoError::Storage` if no data directory can be determined
    /// or the database cannot be opened
    pub fn open_default() -> Result<Self> {
        let proj_dirs = ProjectDirs::from("com", "puter", "puter-demo")
            .ok_or_else(|| DemoError::Storage("Could not determine data directory".into()))?;
        Self::open(proj_dirs.data_dir().join("sessions"))
    }

    /// Open or create the store at `path`
    ///
    /// # Examples
    ///
    /// ```
    /// use puter_demo::storage::{DurableStore, SledStore};
    ///
    /// let dir = tempfile::tempdir().unwrap();
    /// let store = SledStore::open(dir.path().join("sessions")).unwrap();
    /// store.set("greeting", "hello").unwrap();
    /// assert_eq!(store.get("greeting").unwrap().as_deref(), Some("hello"));
    /// ```
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                DemoError::Storage(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }

        let db = sled::open(&path)
            .map_err(|e| DemoError::Storage(format!("Failed to open database: {}", e)))?;
        tracing::debug!("Opened session store at {}", path.display());
        Ok(Self { db, path })
    }

    /// Open the configured store, or the default location when unset
    pub fn open_configured(path: Option<&str>) -> Result<Self> {
        match path {
            Some(path) => Self::open(path),
            None => Self::open_default(),
        }
    }

    /// Location of the database directory
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DurableStore for SledStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .db
            .get(key.as_bytes())
            .map_err(|e| DemoError::Storage(format!("Get failed: {}", e)))?;
        match value {
            Some(bytes) => {
                let text = String::from_utf8(bytes.to_vec())
                    .map_err(|e| DemoError::Storage(format!("Value of {} is not UTF-8: {}", key, e)))?;
                Ok(Some(text))
            }
            None => Ok(None),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.db
            .insert(key.as_bytes(), value.as_bytes())
            .map_err(|e| DemoError::Storage(format!("Insert failed: {}", e)))?;
        self.db
            .flush()
            .map_err(|e| DemoError::Storage(format!("Flush failed: {}", e)))?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.db
            .remove(key.as_bytes())
            .map_err(|e| DemoError::Storage(format!("Remove failed: {}", e)))?;
        self.db
            .flush()
            .map_err(|e| DemoError::Storage(format!("Flush failed: {}", e)))?;
        Ok(())
    }
}

/// Volatile store used by tests and one-off runs
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    /// Empty store
    pub fn new() -> Self {
        Self::default()
    }
}

impl DurableStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let values = self
            .values
            .lock()
            .map_err(|_| DemoError::Storage("Memory store poisoned".to_string()))?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self
            .values
            .lock()
            .map_err(|_| DemoError::Storage("Memory store poisoned".to_string()))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut values = self
            .values
            .lock()
            .map_err(|_| DemoError::Storage("Memory store poisoned".to_string()))?;
        values.remove(key);
        Ok(())
    }
}

//! Key-value persistence injected into the auth gates.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::AuthError;

/// String-keyed store of string values.
pub trait KeyValueStore: Send + Sync {
    /// # Errors
    ///
    /// Returns [`AuthError::StoreIo`] or [`AuthError::Deserialize`] when the
    /// backing storage cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, AuthError>;

    /// # Errors
    ///
    /// Returns [`AuthError::StoreIo`] when the value cannot be persisted.
    fn set(&self, key: &str, value: &str) -> Result<(), AuthError>;

    /// Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::StoreIo`] when the change cannot be persisted.
    fn remove(&self, key: &str) -> Result<(), AuthError>;

    /// # Errors
    ///
    /// Returns [`AuthError::StoreIo`] when the change cannot be persisted.
    fn clear(&self) -> Result<(), AuthError>;
}

/// Reads `key` and deserializes it as JSON.
pub(crate) fn get_json<T, S>(store: &S, key: &str) -> Result<Option<T>, AuthError>
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    let Some(raw) = store.get(key)? else {
        return Ok(None);
    };
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|source| AuthError::Deserialize {
            context: format!("store key {key}"),
            source,
        })
}

/// Serializes `value` as JSON under `key`.
pub(crate) fn set_json<T, S>(store: &S, key: &str, value: &T) -> Result<(), AuthError>
where
    T: Serialize + ?Sized,
    S: KeyValueStore + ?Sized,
{
    let raw = serde_json::to_string(value).map_err(|source| AuthError::Deserialize {
        context: format!("store key {key}"),
        source,
    })?;
    store.set(key, &raw)
}

// ---------------------------------------------------------------------------
// File store
// ---------------------------------------------------------------------------

/// A JSON object on disk; every operation reads and rewrites the file.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<BTreeMap<String, String>, AuthError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(source) => {
                return Err(AuthError::StoreIo {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&raw).map_err(|source| AuthError::Deserialize {
            context: self.path.display().to_string(),
            source,
        })
    }

    fn write(&self, entries: &BTreeMap<String, String>) -> Result<(), AuthError> {
        let io_err = |source| AuthError::StoreIo {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let raw = serde_json::to_string_pretty(entries).map_err(|source| AuthError::Deserialize {
            context: self.path.display().to_string(),
            source,
        })?;
        std::fs::write(&self.path, raw).map_err(io_err)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, AuthError> {
        Ok(self.read()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), AuthError> {
        let mut entries = self.read()?;
        entries.insert(key.to_string(), value.to_string());
        self.write(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), AuthError> {
        let mut entries = self.read()?;
        if entries.remove(key).is_some() {
            self.write(&entries)?;
        }
        Ok(())
    }

    fn clear(&self) -> Result<(), AuthError> {
        self.write(&BTreeMap::new())
    }
}

// ---------------------------------------------------------------------------
// Memory store
// ---------------------------------------------------------------------------

/// Process-local store, used by tests and one-shot sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, AuthError> {
        Ok(self.entries().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), AuthError> {
        self.entries().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), AuthError> {
        self.entries().remove(key);
        Ok(())
    }

    fn clear(&self) -> Result<(), AuthError> {
        self.entries().clear();
        Ok(())
    }
}

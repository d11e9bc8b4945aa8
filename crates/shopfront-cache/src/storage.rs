//! Durable key-value string stores.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::CacheError;

/// A synchronous key-value store of strings.
///
/// Mirrors the browser's local storage: no transactions across keys, every
/// call is independent.
pub trait Storage: Send + Sync {
    /// Read a value. Returns `None` when the key is absent.
    fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Write a value, replacing any previous one.
    fn set(&self, key: &str, value: &str) -> Result<(), CacheError>;

    /// Delete a value. Deleting a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), CacheError>;

    /// Check if a key exists.
    fn exists(&self, key: &str) -> Result<bool, CacheError> {
        Ok(self.get(key)?.is_some())
    }
}

impl<S: Storage + ?Sized> Storage for std::sync::Arc<S> {
    fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CacheError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), CacheError> {
        (**self).remove(key)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// In-process store, lost when dropped.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        lock(&self.entries).len()
    }

    /// Check if the store holds no keys.
    pub fn is_empty(&self) -> bool {
        lock(&self.entries).is_empty()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        Ok(lock(&self.entries).get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CacheError> {
        lock(&self.entries).insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), CacheError> {
        lock(&self.entries).remove(key);
        Ok(())
    }
}

/// Store persisted as a single JSON object on disk.
///
/// Every write rewrites the file through a temporary sibling and a rename, so
/// a crash mid-write leaves the previous contents intact. A file that does not
/// parse is treated as empty and overwritten on the next write.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    guard: Mutex<()>,
}

impl FileStorage {
    /// Open (or lazily create) the store at `path`.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, CacheError> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    CacheError::OpenError(format!("{}: {}", parent.display(), e))
                })?;
            }
        }
        Ok(Self {
            path,
            guard: Mutex::new(()),
        })
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, CacheError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(e.into()),
        };
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        match serde_json::from_str(&content) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "storage file is corrupt, starting empty");
                Ok(BTreeMap::new())
            }
        }
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<(), CacheError> {
        let content = serde_json::to_string_pretty(entries)?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, content)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let _guard = lock(&self.guard);
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CacheError> {
        let _guard = lock(&self.guard);
        let mut entries = self.read_all()?;
        entries.insert(key.to_string(), value.to_string());
        self.write_all(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), CacheError> {
        let _guard = lock(&self.guard);
        let mut entries = self.read_all()?;
        if entries.remove(key).is_some() {
            self.write_all(&entries)?;
        }
        Ok(())
    }
}

//! Key-Value store wrapper with automatic serialization.

use crate::{CacheError, Storage};
use serde::{de::DeserializeOwned, Serialize};

/// Type-safe cache over any [`Storage`] backend.
///
/// Provides automatic JSON serialization for any type that implements
/// `Serialize` and `DeserializeOwned`.
#[derive(Debug, Clone)]
pub struct Cache<S> {
    store: S,
}

impl<S: Storage> Cache<S> {
    /// Wrap a storage backend.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Borrow the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Get a value from the cache.
    ///
    /// Returns `None` if the key doesn't exist, an error if it exists but does
    /// not deserialize into `T`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CacheError> {
        match self.store.get(key)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// Get a value, treating any failure as absence.
    ///
    /// Corrupt or unreadable entries are logged and reported as `None`; they
    /// are never surfaced to the caller.
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.get(key) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key, error = %e, "discarding unreadable cache entry");
                None
            }
        }
    }

    /// Set a value in the cache.
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), CacheError> {
        let raw = serde_json::to_string(value)?;
        self.store.set(key, &raw)
    }

    /// Delete a value from the cache.
    pub fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.store.remove(key)
    }

    /// Check if a key exists in the cache.
    pub fn exists(&self, key: &str) -> Result<bool, CacheError> {
        self.store.exists(key)
    }
}

/// Helper to build cache keys with namespacing.
///
/// # Example
///
/// ```
/// use shopfront_cache::cache_key;
///
/// let key = cache_key!("selection", 42);
/// assert_eq!(key, "selection:42");
/// ```
#[macro_export]
macro_rules! cache_key {
    ($prefix:expr, $($part:expr),+) => {{
        let mut key = String::from($prefix);
        $(
            key.push(':');
            key.push_str(&$part.to_string());
        )+
        key
    }};
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStorage;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Item {
        name: String,
        quantity: i64,
    }

    #[test]
    fn test_set_and_get_typed() {
        let cache = Cache::new(MemoryStorage::new());
        let items = vec![Item {
            name: "Tee".to_string(),
            quantity: 2,
        }];
        cache.set("cart:items", &items).unwrap();

        let loaded: Vec<Item> = cache.get("cart:items").unwrap().unwrap();
        assert_eq!(loaded, items);
    }

    #[test]
    fn test_get_corrupt_is_error_but_load_is_none() {
        let cache = Cache::new(MemoryStorage::new());
        cache.store().set("cart:items", "not json").unwrap();

        assert!(cache.get::<Vec<Item>>("cart:items").is_err());
        assert!(cache.load::<Vec<Item>>("cart:items").is_none());
    }

    #[test]
    fn test_cache_key_macro() {
        assert_eq!(cache_key!("cart", "items"), "cart:items");
        assert_eq!(cache_key!("selection", 7, "v2"), "selection:7:v2");
    }
}

//! Timestamped snapshots that expire after a time-to-live.

use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::clock::{is_expired, Clock};
use crate::{Cache, CacheError, Storage};

/// A stored snapshot and the time it was last refreshed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotData<T> {
    /// User-defined snapshot payload.
    #[serde(flatten)]
    pub data: T,
    /// Unix epoch millis of the last save or touch. Missing means expired.
    #[serde(default)]
    pub timestamp: i64,
}

/// A single storage key holding a snapshot with a TTL.
///
/// # Example
///
/// ```rust,ignore
/// let slot = SnapshotSlot::<PageState, _>::new(storage, "selection:1", ttl, clock);
/// slot.save(&state)?;
/// let restored: Option<PageState> = slot.load();
/// ```
pub struct SnapshotSlot<T, S> {
    cache: Cache<S>,
    key: String,
    ttl: Duration,
    clock: Arc<dyn Clock>,
    _phantom: PhantomData<fn() -> T>,
}

impl<T, S> SnapshotSlot<T, S>
where
    T: Serialize + DeserializeOwned,
    S: Storage,
{
    /// Create a slot for `key`.
    pub fn new(store: S, key: impl Into<String>, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            cache: Cache::new(store),
            key: key.into(),
            ttl,
            clock,
            _phantom: PhantomData,
        }
    }

    /// The storage key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Restore the snapshot if present, readable and fresh.
    ///
    /// Expired snapshots are removed from storage.
    pub fn load(&self) -> Option<T> {
        let snapshot = self.cache.load::<SnapshotData<T>>(&self.key)?;
        if is_expired(snapshot.timestamp, self.clock.now_millis(), self.ttl) {
            tracing::debug!(key = %self.key, "snapshot expired on load");
            self.discard();
            return None;
        }
        Some(snapshot.data)
    }

    /// Store `data` stamped with the current time.
    pub fn save(&self, data: &T) -> Result<(), CacheError> {
        let snapshot = SnapshotData {
            data,
            timestamp: self.clock.now_millis(),
        };
        self.cache.set(&self.key, &snapshot)
    }

    /// Refresh the timestamp of an existing snapshot.
    ///
    /// Returns `false` when there was nothing readable to refresh.
    pub fn touch(&self) -> Result<bool, CacheError> {
        match self.cache.load::<SnapshotData<T>>(&self.key) {
            Some(snapshot) => {
                self.save(&snapshot.data)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Remove the snapshot if it has expired. Returns whether it was removed.
    pub fn sweep(&self) -> bool {
        match self.cache.load::<SnapshotData<serde_json::Value>>(&self.key) {
            Some(snapshot)
                if is_expired(snapshot.timestamp, self.clock.now_millis(), self.ttl) =>
            {
                self.discard();
                true
            }
            _ => false,
        }
    }

    /// Remove the snapshot unconditionally.
    pub fn clear(&self) -> Result<(), CacheError> {
        self.cache.delete(&self.key)
    }

    fn discard(&self) {
        if let Err(e) = self.cache.delete(&self.key) {
            tracing::warn!(key = %self.key, error = %e, "failed to remove snapshot");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ManualClock, MemoryStorage};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct PageState {
        selected: Vec<Option<String>>,
    }

    const TTL: Duration = Duration::from_secs(15 * 60);

    fn slot(
        storage: &Arc<MemoryStorage>,
        clock: &Arc<ManualClock>,
    ) -> SnapshotSlot<PageState, Arc<MemoryStorage>> {
        SnapshotSlot::new(storage.clone(), "selection:1", TTL, clock.clone())
    }

    fn state() -> PageState {
        PageState {
            selected: vec![Some("Blue".to_string()), None],
        }
    }

    #[test]
    fn test_save_then_load_fresh() {
        let storage = Arc::new(MemoryStorage::new());
        let clock = Arc::new(ManualClock::new(1_000_000));
        let slot = slot(&storage, &clock);

        slot.save(&state()).unwrap();
        clock.advance(Duration::from_secs(60));
        assert_eq!(slot.load(), Some(state()));
    }

    #[test]
    fn test_expired_snapshot_is_removed_on_load() {
        let storage = Arc::new(MemoryStorage::new());
        let clock = Arc::new(ManualClock::new(1_000_000));
        let slot = slot(&storage, &clock);

        slot.save(&state()).unwrap();
        clock.advance(TTL + Duration::from_secs(1));
        assert_eq!(slot.load(), None);
        assert!(!storage.exists("selection:1").unwrap());
    }

    #[test]
    fn test_touch_extends_lifetime() {
        let storage = Arc::new(MemoryStorage::new());
        let clock = Arc::new(ManualClock::new(1_000_000));
        let slot = slot(&storage, &clock);

        slot.save(&state()).unwrap();
        clock.advance(Duration::from_secs(10 * 60));
        assert!(slot.touch().unwrap());
        clock.advance(Duration::from_secs(10 * 60));
        assert_eq!(slot.load(), Some(state()));
    }

    #[test]
    fn test_touch_without_snapshot() {
        let storage = Arc::new(MemoryStorage::new());
        let clock = Arc::new(ManualClock::new(0));
        assert!(!slot(&storage, &clock).touch().unwrap());
    }

    #[test]
    fn test_sweep_only_removes_expired() {
        let storage = Arc::new(MemoryStorage::new());
        let clock = Arc::new(ManualClock::new(1_000_000));
        let slot = slot(&storage, &clock);

        slot.save(&state()).unwrap();
        assert!(!slot.sweep());
        clock.advance(TTL + Duration::from_millis(1));
        assert!(slot.sweep());
        assert!(!storage.exists("selection:1").unwrap());
    }

    #[test]
    fn test_missing_timestamp_counts_as_expired() {
        let storage = Arc::new(MemoryStorage::new());
        let clock = Arc::new(ManualClock::new(TTL.as_millis() as i64 + 1));
        storage
            .set("selection:1", r#"{"selected":["Blue",null]}"#)
            .unwrap();

        assert_eq!(slot(&storage, &clock).load(), None);
    }

    #[test]
    fn test_corrupt_snapshot_loads_as_none() {
        let storage = Arc::new(MemoryStorage::new());
        let clock = Arc::new(ManualClock::new(0));
        storage.set("selection:1", "{{{").unwrap();

        assert_eq!(slot(&storage, &clock).load(), None);
    }
}

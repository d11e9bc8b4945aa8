//! Durable key-value storage for shopfront.
//!
//! Provides the local-storage layer the cart and product pages persist into:
//!
//! - [`Storage`]: synchronous string key-value store ([`MemoryStorage`],
//!   [`FileStorage`])
//! - [`Cache`]: typed JSON access over any store
//! - [`SnapshotSlot`]: a single key holding a timestamped snapshot with a TTL
//! - [`Clock`]: injectable wall clock for timestamps
//!
//! # Example
//!
//! ```
//! use shopfront_cache::{Cache, MemoryStorage};
//!
//! let cache = Cache::new(MemoryStorage::new());
//! cache.set("cart:items", &vec!["tee"]).unwrap();
//!
//! let items: Option<Vec<String>> = cache.load("cart:items");
//! assert_eq!(items, Some(vec!["tee".to_string()]));
//! ```

mod clock;
mod error;
mod kv;
mod snapshot;
mod storage;

pub use clock::{is_expired, Clock, ManualClock, SystemClock};
pub use error::CacheError;
pub use kv::Cache;
pub use snapshot::{SnapshotData, SnapshotSlot};
pub use storage::{FileStorage, MemoryStorage, Storage};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{Cache, CacheError, Clock, SnapshotSlot, Storage, SystemClock};
}

//! Wall-clock abstraction for snapshot timestamps.

use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

/// Source of the current time as Unix epoch milliseconds.
pub trait Clock: Send + Sync {
    /// Current time in milliseconds since the Unix epoch.
    fn now_millis(&self) -> i64;
}

/// The real system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// A clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicI64,
}

impl ManualClock {
    /// Create a clock frozen at `now_millis`.
    pub fn new(now_millis: i64) -> Self {
        Self {
            now: AtomicI64::new(now_millis),
        }
    }

    /// Move the clock forward.
    pub fn advance(&self, by: Duration) {
        let millis = i64::try_from(by.as_millis()).unwrap_or(i64::MAX);
        self.now.fetch_add(millis, Ordering::SeqCst);
    }

    /// Jump to an absolute time.
    pub fn set(&self, now_millis: i64) {
        self.now.store(now_millis, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// Whether a timestamp taken at `stamped_at` is older than `ttl` at `now`.
pub fn is_expired(stamped_at: i64, now: i64, ttl: Duration) -> bool {
    let ttl_millis = i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX);
    now.saturating_sub(stamped_at) > ttl_millis
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_advance() {
        let clock = ManualClock::new(1_000);
        clock.advance(Duration::from_secs(2));
        assert_eq!(clock.now_millis(), 3_000);
    }

    #[test]
    fn test_is_expired_boundary() {
        let ttl = Duration::from_secs(900);
        assert!(!is_expired(0, 900_000, ttl));
        assert!(is_expired(0, 900_001, ttl));
    }

    #[test]
    fn test_system_clock_is_after_2020() {
        assert!(SystemClock.now_millis() > 1_577_836_800_000);
    }
}

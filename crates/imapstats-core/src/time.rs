//! Wall-clock abstraction for cache staleness checks.
//!
//! Cache age is measured against file modification times, so this clock
//! deals in [`SystemTime`] rather than monotonic instants.
//!
//! ```
//! use std::time::{Duration, SystemTime};
//! use imapstats_core::time::{Clock, MockClock};
//!
//! let clock = MockClock::starting_at(SystemTime::UNIX_EPOCH);
//! clock.advance(Duration::from_secs(90));
//! assert_eq!(clock.now(), SystemTime::UNIX_EPOCH + Duration::from_secs(90));
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime};

/// Source of "now".
pub trait Clock: Send + Sync {
    /// Current wall-clock time.
    fn now(&self) -> SystemTime;

    /// Time elapsed since `then`; zero if `then` lies in the future.
    fn age_of(&self, then: SystemTime) -> Duration {
        self.now().duration_since(then).unwrap_or(Duration::ZERO)
    }
}

/// The real clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

/// A manually advanced clock for tests.
#[derive(Debug)]
pub struct MockClock {
    base: SystemTime,
    offset_nanos: AtomicU64,
}

impl MockClock {
    /// Creates a clock reading `base`.
    #[must_use]
    pub const fn starting_at(base: SystemTime) -> Self {
        Self {
            base,
            offset_nanos: AtomicU64::new(0),
        }
    }

    /// Moves the clock forward.
    #[allow(clippy::cast_possible_truncation)]
    pub fn advance(&self, by: Duration) {
        self.offset_nanos
            .fetch_add(by.as_nanos() as u64, Ordering::SeqCst);
    }

    /// Sets the clock to `base + offset`.
    #[allow(clippy::cast_possible_truncation)]
    pub fn set_offset(&self, offset: Duration) {
        self.offset_nanos
            .store(offset.as_nanos() as u64, Ordering::SeqCst);
    }
}

impl Clock for MockClock {
    fn now(&self) -> SystemTime {
        self.base + Duration::from_nanos(self.offset_nanos.load(Ordering::SeqCst))
    }
}

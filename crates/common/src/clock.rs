//! Wall-clock abstraction.
//!
//! Services that make time-window decisions (token expiry, cache freshness)
//! take an `Arc<dyn Clock>` instead of calling `Utc::now()` directly, so
//! tests can move time forward deterministically.

use chrono::{DateTime, Utc};

/// Source of the current time.
pub trait Clock: Send + Sync {
    /// Current instant in UTC.
    fn now(&self) -> DateTime<Utc>;
}

/// Clock backed by the system wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[cfg(any(test, feature = "test-utils"))]
pub use manual::ManualClock;

#[cfg(any(test, feature = "test-utils"))]
mod manual {
    use super::Clock;
    use chrono::{DateTime, Utc};
    use std::sync::atomic::{AtomicI64, Ordering};
    use std::time::Duration;

    /// Clock that only moves when told to.
    ///
    /// Stores milliseconds since the Unix epoch.
    #[derive(Debug)]
    pub struct ManualClock {
        millis: AtomicI64,
    }

    impl ManualClock {
        /// Create a clock frozen at `start`.
        #[must_use]
        pub fn new(start: DateTime<Utc>) -> Self {
            Self {
                millis: AtomicI64::new(start.timestamp_millis()),
            }
        }

        /// Create a clock frozen at the current wall time.
        #[must_use]
        pub fn starting_now() -> Self {
            Self::new(Utc::now())
        }

        /// Move the clock forward by `by`.
        pub fn advance(&self, by: Duration) {
            let delta = i64::try_from(by.as_millis()).unwrap_or(i64::MAX);
            self.millis.fetch_add(delta, Ordering::SeqCst);
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            DateTime::from_timestamp_millis(self.millis.load(Ordering::SeqCst)).unwrap_or_default()
        }
    }
}

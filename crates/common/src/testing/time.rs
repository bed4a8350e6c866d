//! Controllable wall clock for tests
//!
//! # Examples
//!
//! ```
//! # #[cfg(feature = "test-utils")]
//! # {
//! use chrono::{Duration, TimeZone, Utc};
//! use pharmaclock_common::testing::MockClock;
//! use pharmaclock_common::time::Clock;
//!
//! let clock = MockClock::at(Utc.with_ymd_and_hms(2025, 3, 3, 8, 0, 0).unwrap());
//! clock.advance(Duration::minutes(90));
//! assert_eq!(clock.now().to_rfc3339(), "2025-03-03T09:30:00+00:00");
//! # }
//! ```

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;

use crate::time::Clock;

/// Mock clock for deterministic testing
///
/// Cloned handles share the same underlying time, so a test can keep one
/// handle and hand another to the code under test.
#[derive(Debug, Clone)]
pub struct MockClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl MockClock {
    /// Create a mock clock frozen at `instant`
    pub fn at(instant: DateTime<Utc>) -> Self {
        Self { now: Arc::new(Mutex::new(instant)) }
    }

    /// Move the clock forward
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock();
        *now += by;
    }

    /// Jump to an absolute instant
    pub fn set(&self, instant: DateTime<Utc>) {
        *self.now.lock() = instant;
    }
}

impl Clock for MockClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }
}

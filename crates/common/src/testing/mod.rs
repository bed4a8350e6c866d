//! Testing utilities and helpers
//!
//! - [`sleeper`]: a [`Sleeper`](crate::resilience::Sleeper) that records
//!   backoff delays instead of waiting
//! - [`time`]: a controllable wall clock

pub mod sleeper;
pub mod time;

pub use sleeper::RecordingSleeper;
pub use time::MockClock;

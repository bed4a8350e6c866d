//! Resilience primitives
//!
//! PharmaClock needs exactly one resilience pattern: a bounded retry with a
//! deterministic (fixed or linear) backoff, used to reconcile local state
//! with an eventually consistent remote store after each mutation.
//!
//! - [`retry`]: the bounded retry combinator and its backoff schedule
//! - [`sleeper`]: the sleep seam that makes backoff observable in tests

pub mod retry;
pub mod sleeper;

// Re-export retry types
pub use retry::{
    retry_bounded, BackoffStrategy, RetryConfig, RetryError, RetryOutcome, RetryResult,
};
pub use sleeper::{Sleeper, TokioSleeper};

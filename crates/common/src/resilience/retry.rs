//! Bounded retry combinator with linear backoff
//!
//! This module provides the retry mechanism used wherever PharmaClock has to
//! tolerate a transiently wrong answer, most notably the re-fetch of the
//! authoritative time entry after a mutation (the remote store's read replica
//! may lag behind the primary for a few seconds).
//!
//! Attempts are capped and every delay is deterministic (fixed or linear,
//! no jitter). Delays go through a [`Sleeper`] so tests can record them
//! without waiting.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, instrument, warn};

use super::sleeper::Sleeper;

/// Errors that can occur during retry operations
#[derive(Debug, Error)]
pub enum RetryError<E> {
    /// All retry attempts have been exhausted
    #[error("All retry attempts exhausted after {attempts} tries")]
    AttemptsExhausted { attempts: u32, last_error: E },

    /// The retry strategy configuration is invalid
    #[error("Invalid retry configuration: {message}")]
    InvalidConfiguration { message: String },
}

impl<E> RetryError<E> {
    /// Consume the error and return the last error produced by the operation,
    /// if any attempt ran.
    pub fn into_last_error(self) -> Option<E> {
        match self {
            Self::AttemptsExhausted { last_error, .. } => Some(last_error),
            Self::InvalidConfiguration { .. } => None,
        }
    }
}

/// Result type for retry operations
pub type RetryResult<T, E> = Result<T, RetryError<E>>;

/// Outcome of a retry execution including result and summary statistics.
#[derive(Debug)]
pub struct RetryOutcome<T, E> {
    pub result: RetryResult<T, E>,
    /// Number of times the operation was invoked.
    pub attempts: u32,
    /// Sum of all delays handed to the sleeper.
    pub total_delay: Duration,
    /// Human-readable representation of the last error that occurred.
    pub last_error: Option<String>,
}

impl<T, E> RetryOutcome<T, E> {
    /// Consume the outcome and return only the result.
    pub fn into_result(self) -> RetryResult<T, E> {
        self.result
    }

    /// Whether the operation eventually succeeded.
    pub fn succeeded(&self) -> bool {
        self.result.is_ok()
    }
}

/// Backoff strategy for calculating retry delays
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackoffStrategy {
    /// Fixed delay between attempts
    Fixed(Duration),
    /// Linear backoff: `initial_delay + index * increment`
    Linear { initial_delay: Duration, increment: Duration },
}

impl BackoffStrategy {
    /// Calculate the delay for the given zero-based delay index
    pub fn calculate_delay(&self, index: u32) -> Duration {
        match self {
            Self::Fixed(delay) => *delay,
            Self::Linear { initial_delay, increment } => {
                initial_delay.saturating_add(increment.saturating_mul(index))
            }
        }
    }
}

/// Configuration for retry behavior
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryConfig {
    /// Maximum number of attempts (initial try included)
    pub max_attempts: u32,
    /// Backoff strategy for calculating delays
    pub backoff: BackoffStrategy,
    /// Wait `backoff.calculate_delay(0)` before the very first attempt too.
    ///
    /// Used when the first attempt is known to be premature, e.g. reading
    /// back a row immediately after writing it to an eventually consistent
    /// store.
    pub delay_first_attempt: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: BackoffStrategy::Linear {
                initial_delay: Duration::from_secs(1),
                increment: Duration::from_secs(1),
            },
            delay_first_attempt: false,
        }
    }
}

impl RetryConfig {
    /// Delay to wait before the given zero-based attempt.
    pub fn delay_before(&self, attempt: u32) -> Duration {
        if self.delay_first_attempt {
            self.backoff.calculate_delay(attempt)
        } else if attempt == 0 {
            Duration::ZERO
        } else {
            self.backoff.calculate_delay(attempt - 1)
        }
    }
}

/// Run `operation` up to `max_attempts` times, waiting `delay_fn(attempt)`
/// before each zero-based attempt and stopping at the first success.
///
/// Every error is retried until the cap; callers that can tell a permanent
/// failure apart inspect [`RetryError::into_last_error`].
#[instrument(skip_all, fields(max_attempts = max_attempts))]
pub async fn retry_bounded<F, Fut, T, E, D>(
    max_attempts: u32,
    delay_fn: D,
    sleeper: &dyn Sleeper,
    mut operation: F,
) -> RetryOutcome<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: fmt::Debug,
    D: Fn(u32) -> Duration,
{
    if max_attempts == 0 {
        return RetryOutcome {
            result: Err(RetryError::InvalidConfiguration {
                message: "max_attempts must be greater than 0".to_string(),
            }),
            attempts: 0,
            total_delay: Duration::ZERO,
            last_error: None,
        };
    }

    let mut total_delay = Duration::ZERO;
    let mut last_error: Option<String> = None;
    let mut attempt: u32 = 0;

    loop {
        let delay = delay_fn(attempt);
        if !delay.is_zero() {
            debug!(attempt = attempt + 1, ?delay, "waiting before attempt");
            sleeper.sleep(delay).await;
            total_delay += delay;
        }

        debug!("Executing operation (attempt {}/{})", attempt + 1, max_attempts);
        let attempts = attempt + 1;

        match operation().await {
            Ok(value) => {
                if attempt > 0 {
                    debug!("Operation succeeded after {} retries", attempt);
                }
                return RetryOutcome { result: Ok(value), attempts, total_delay, last_error };
            }
            Err(error) => {
                last_error = Some(format!("{error:?}"));

                if attempts >= max_attempts {
                    warn!(
                        "All retry attempts exhausted after {} tries, last error: {:?}",
                        attempts, error
                    );
                    return RetryOutcome {
                        result: Err(RetryError::AttemptsExhausted { attempts, last_error: error }),
                        attempts,
                        total_delay,
                        last_error,
                    };
                }

                attempt += 1;
            }
        }
    }
}

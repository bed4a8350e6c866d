//! Common error classification shared by every PharmaClock layer
//!
//! Each crate owns its concrete error enums (`PharmaClockError` in the
//! domain, `ClockError`/`LocationError` in core, `InfraError` in infra).
//! What they share is the *classification* vocabulary defined here, so that
//! callers (the CLI, retry policies, log statements) can make decisions
//! without matching on every variant of every error type.
//!
//! ## Classification
//!
//! | Question | Method |
//! |---|---|
//! | Can the same call succeed if repeated? | [`ErrorClassification::is_retryable`] |
//! | How loud should the log line be? | [`ErrorClassification::severity`] |
//! | Does it indicate a broken invariant? | [`ErrorClassification::is_critical`] |
//! | Is there a recommended wait? | [`ErrorClassification::retry_after`] |

use std::fmt;
use std::time::Duration;

/// Standard interface for classifying errors by their characteristics
pub trait ErrorClassification {
    /// Check if this error is retryable
    ///
    /// Retryable errors are transient conditions (timeouts, a GPS fix that
    /// could not be obtained yet, network hiccups) that may succeed if the
    /// user or the caller tries again.
    fn is_retryable(&self) -> bool;

    /// Get the error severity level
    ///
    /// Used for logging decisions.
    fn severity(&self) -> ErrorSeverity;

    /// Check if this is a critical error requiring immediate attention
    ///
    /// Critical errors indicate internal invariant violations or
    /// misconfiguration that no amount of retrying will fix.
    fn is_critical(&self) -> bool;

    /// Get the suggested retry delay if applicable
    fn retry_after(&self) -> Option<Duration> {
        None
    }
}

/// Error severity levels for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// Informational, typically a user decision rather than a fault
    Info,
    /// Warning, recoverable by the user
    Warning,
    /// Error, requires attention and action
    Error,
    /// Critical, immediate action required
    Critical,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Warning => write!(f, "WARN"),
            Self::Error => write!(f, "ERROR"),
            Self::Critical => write!(f, "CRITICAL"),
        }
    }
}

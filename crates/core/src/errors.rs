//! Error types for location acquisition and clock transitions
//!
//! Every failure a user can hit while clocking in or out is one of these
//! variants. None of them is silently dropped: each carries a message meant
//! for the employee, and [`ClockError::recovery`] tells the caller which
//! follow-up makes sense.

use std::fmt;
use std::time::Duration;

use pharmaclock_common::{ErrorClassification, ErrorSeverity};
use pharmaclock_domain::PharmaClockError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

const CONTACT_ADMINISTRATOR: &str = "Please contact your administrator.";

/// Classification of a geolocation failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationErrorKind {
    /// The runtime has no geolocation capability at all
    Unsupported,
    PermissionDenied,
    PositionUnavailable,
    Timeout,
}

impl fmt::Display for LocationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unsupported => write!(f, "unsupported"),
            Self::PermissionDenied => write!(f, "permission_denied"),
            Self::PositionUnavailable => write!(f, "position_unavailable"),
            Self::Timeout => write!(f, "timeout"),
        }
    }
}

/// A geolocation failure with a message for the employee
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct LocationError {
    pub kind: LocationErrorKind,
    pub message: String,
    /// Only set for [`LocationErrorKind::PermissionDenied`]
    pub should_prompt_permission: bool,
}

impl LocationError {
    pub fn new(kind: LocationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            should_prompt_permission: kind == LocationErrorKind::PermissionDenied,
        }
    }

    pub fn unsupported() -> Self {
        Self::new(
            LocationErrorKind::Unsupported,
            "Location services are not supported on this device.",
        )
    }

    pub fn permission_denied() -> Self {
        Self::new(
            LocationErrorKind::PermissionDenied,
            "Location access was denied. Allow location access for PharmaClock in your device \
             settings, then try again.",
        )
    }

    pub fn position_unavailable() -> Self {
        Self::new(
            LocationErrorKind::PositionUnavailable,
            "Your location could not be determined. Move somewhere with better GPS or network \
             coverage and try again.",
        )
    }

    pub fn timeout(after: Duration) -> Self {
        Self::new(
            LocationErrorKind::Timeout,
            format!(
                "Getting your location took longer than {}s. Make sure location services are \
                 on and try again.",
                after.as_secs()
            ),
        )
    }
}

impl ErrorClassification for LocationError {
    fn is_retryable(&self) -> bool {
        matches!(self.kind, LocationErrorKind::PositionUnavailable | LocationErrorKind::Timeout)
    }

    fn severity(&self) -> ErrorSeverity {
        match self.kind {
            LocationErrorKind::Unsupported => ErrorSeverity::Error,
            _ => ErrorSeverity::Warning,
        }
    }

    fn is_critical(&self) -> bool {
        false
    }
}

/// What the caller should offer the employee after a failed transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recovery {
    /// Ask for location permission again
    Reprompt,
    /// The same action may succeed if tried again
    Retry,
    /// Nothing the employee can fix this session
    ContactAdministrator,
    None,
}

/// Clock transition errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClockError {
    #[error(transparent)]
    Location(#[from] LocationError),

    #[error("no branch is assigned to this employee")]
    NoBranchAssigned,

    #[error("no workplace location is configured for branch {0}")]
    NoWorkplaceConfigured(Uuid),

    /// The store rejected a write; the message is the store's own
    #[error("{0}")]
    MutationFailed(String),

    #[error("feature unavailable: {0}")]
    FeatureUnavailable(String),

    #[error("already clocked in")]
    AlreadyClockedIn,

    #[error("not clocked in")]
    NotClockedIn,

    #[error("already on break")]
    AlreadyOnBreak,

    #[error("not on break")]
    NotOnBreak,

    #[error("another clock action is still in progress")]
    MutationInFlight,

    #[error("store error: {0}")]
    Store(PharmaClockError),
}

impl From<PharmaClockError> for ClockError {
    fn from(err: PharmaClockError) -> Self {
        match err {
            PharmaClockError::FeatureUnavailable(message) => Self::FeatureUnavailable(message),
            other => Self::Store(other),
        }
    }
}

impl ClockError {
    /// Map a failed write, keeping the store's message verbatim.
    pub fn mutation(err: PharmaClockError) -> Self {
        match err {
            PharmaClockError::FeatureUnavailable(message) => Self::FeatureUnavailable(message),
            other => Self::MutationFailed(other.detail().to_string()),
        }
    }

    pub fn recovery(&self) -> Recovery {
        match self {
            Self::Location(err) => match err.kind {
                LocationErrorKind::PermissionDenied => Recovery::Reprompt,
                LocationErrorKind::PositionUnavailable | LocationErrorKind::Timeout => {
                    Recovery::Retry
                }
                LocationErrorKind::Unsupported => Recovery::None,
            },
            Self::NoBranchAssigned | Self::NoWorkplaceConfigured(_) => {
                Recovery::ContactAdministrator
            }
            Self::MutationFailed(_) | Self::MutationInFlight => Recovery::Retry,
            Self::Store(err) => match err {
                PharmaClockError::Network(_) | PharmaClockError::Database(_) => Recovery::Retry,
                PharmaClockError::Config(_) | PharmaClockError::Auth(_) => {
                    Recovery::ContactAdministrator
                }
                _ => Recovery::None,
            },
            Self::FeatureUnavailable(_)
            | Self::AlreadyClockedIn
            | Self::NotClockedIn
            | Self::AlreadyOnBreak
            | Self::NotOnBreak => Recovery::None,
        }
    }

    /// Text to show the employee
    pub fn user_message(&self) -> String {
        match self {
            Self::Location(err) => err.message.clone(),
            Self::NoBranchAssigned => {
                format!("You are not assigned to a branch. {CONTACT_ADMINISTRATOR}")
            }
            Self::NoWorkplaceConfigured(_) => {
                format!("No workplace location is set up for your branch. {CONTACT_ADMINISTRATOR}")
            }
            Self::MutationFailed(message) => message.clone(),
            Self::FeatureUnavailable(_) => {
                "Break tracking is not available for your pharmacy yet.".to_string()
            }
            Self::AlreadyClockedIn => "You are already clocked in.".to_string(),
            Self::NotClockedIn => "You are not clocked in.".to_string(),
            Self::AlreadyOnBreak => "You are already on a break.".to_string(),
            Self::NotOnBreak => "You are not on a break.".to_string(),
            Self::MutationInFlight => {
                "Please wait for the previous action to finish.".to_string()
            }
            Self::Store(err) => match self.recovery() {
                Recovery::ContactAdministrator => format!("{err}. {CONTACT_ADMINISTRATOR}"),
                _ => err.to_string(),
            },
        }
    }
}

impl ErrorClassification for ClockError {
    fn is_retryable(&self) -> bool {
        self.recovery() == Recovery::Retry
    }

    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Location(err) => err.severity(),
            Self::NoBranchAssigned | Self::NoWorkplaceConfigured(_) | Self::MutationFailed(_) => {
                ErrorSeverity::Error
            }
            Self::Store(PharmaClockError::Internal(_) | PharmaClockError::Config(_)) => {
                ErrorSeverity::Critical
            }
            Self::Store(_) => ErrorSeverity::Error,
            Self::FeatureUnavailable(_) => ErrorSeverity::Info,
            Self::AlreadyClockedIn
            | Self::NotClockedIn
            | Self::AlreadyOnBreak
            | Self::NotOnBreak
            | Self::MutationInFlight => ErrorSeverity::Warning,
        }
    }

    fn is_critical(&self) -> bool {
        self.severity() == ErrorSeverity::Critical
    }
}

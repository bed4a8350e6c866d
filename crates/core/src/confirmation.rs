//! Human confirmation port
//!
//! The controller never blocks a transition on its own judgement when a
//! person can decide instead: out-of-radius clock-ins, clock-outs, and
//! clock-outs without a position all go through [`ConfirmationPort`].

use std::fmt;

use async_trait::async_trait;
use pharmaclock_domain::WorkingTime;

use crate::location::format::{format_accuracy, format_distance};

/// A yes/no question put to the employee
#[derive(Debug, Clone, PartialEq)]
pub enum ConfirmationRequest {
    /// The platform would show its own location permission dialog
    GrantLocationAccess,
    /// Clock in although the fix is outside the branch geofence
    OutsideRadius {
        distance_meters: u32,
        allowed_radius_meters: f64,
        accuracy_meters: Option<f64>,
    },
    ClockOut { worked: WorkingTime },
    /// Clock out although no position could be obtained
    ClockOutWithoutLocation { reason: String },
}

impl fmt::Display for ConfirmationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GrantLocationAccess => {
                write!(f, "PharmaClock would like to use your location. Allow?")
            }
            Self::OutsideRadius { distance_meters, allowed_radius_meters, accuracy_meters } => {
                write!(
                    f,
                    "You are {} from your branch ({}), outside the allowed {}. \
                     Clock in anyway? This will be recorded as a location exception.",
                    format_distance(*distance_meters),
                    format_accuracy(*accuracy_meters),
                    format_radius(*allowed_radius_meters),
                )
            }
            Self::ClockOut { worked } => {
                write!(f, "You have worked {worked} so far. Clock out now?")
            }
            Self::ClockOutWithoutLocation { reason } => {
                write!(f, "{reason} Clock out without recording your location?")
            }
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn format_radius(radius: f64) -> String {
    format_distance(radius.max(0.0).round() as u32)
}

/// Asks the employee to confirm an action
#[async_trait]
pub trait ConfirmationPort: Send + Sync {
    /// Returns `true` only on an explicit yes
    async fn confirm(&self, request: &ConfirmationRequest) -> bool;
}

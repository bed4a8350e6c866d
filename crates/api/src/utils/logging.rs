use std::time::Duration;

use pharmaclock_core::{ClockError, LocationErrorKind};
use tracing::{info, warn};

/// Log the outcome of a command execution with structured fields.
///
/// # Parameters
/// * `command` - Logical command identifier (e.g. `"clock::clock_in"`).
/// * `elapsed` - Duration the command execution took.
/// * `error` - Failure label from [`error_label`], `None` on success.
#[inline]
pub fn log_command_execution(command: &str, elapsed: Duration, error: Option<&'static str>) {
    let duration_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);

    match error {
        None => info!(command, duration_ms, "command_execution_success"),
        Some(error_type) => warn!(command, duration_ms, error_type, "command_execution_failure"),
    }
}

/// Convert a `ClockError` into a stable label suitable for logging.
#[inline]
pub fn error_label(error: &ClockError) -> &'static str {
    match error {
        ClockError::Location(err) => match err.kind {
            LocationErrorKind::Unsupported => "location_unsupported",
            LocationErrorKind::PermissionDenied => "location_permission_denied",
            LocationErrorKind::PositionUnavailable => "location_unavailable",
            LocationErrorKind::Timeout => "location_timeout",
        },
        ClockError::NoBranchAssigned => "no_branch_assigned",
        ClockError::NoWorkplaceConfigured(_) => "no_workplace_configured",
        ClockError::MutationFailed(_) => "mutation_failed",
        ClockError::FeatureUnavailable(_) => "feature_unavailable",
        ClockError::AlreadyClockedIn => "already_clocked_in",
        ClockError::NotClockedIn => "not_clocked_in",
        ClockError::AlreadyOnBreak => "already_on_break",
        ClockError::NotOnBreak => "not_on_break",
        ClockError::MutationInFlight => "mutation_in_flight",
        ClockError::Store(_) => "store",
    }
}

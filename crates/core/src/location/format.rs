//! Presentation helpers for distances, accuracy and location status

use pharmaclock_domain::PermissionState;

use super::service::WorkLocationCheck;

/// `850 m` below one kilometer, `1.25 km` from there on
pub fn format_distance(meters: u32) -> String {
    if meters < 1_000 {
        format!("{meters} m")
    } else {
        format!("{:.2} km", f64::from(meters) / 1_000.0)
    }
}

/// `±12 m`, or `accuracy unknown` when the device reported nothing usable
pub fn format_accuracy(accuracy_meters: Option<f64>) -> String {
    match accuracy_meters {
        Some(accuracy) if accuracy.is_finite() && accuracy >= 0.0 => {
            format!("±{accuracy:.0} m")
        }
        _ => "accuracy unknown".to_string(),
    }
}

pub fn permission_status_message(state: PermissionState) -> &'static str {
    match state {
        PermissionState::Granted => "Location access is enabled.",
        PermissionState::Denied => {
            "Location access is blocked. Enable it in your device settings to clock in."
        }
        PermissionState::Prompt => "You will be asked for location access when you clock in.",
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn work_location_message(check: &WorkLocationCheck) -> String {
    let accuracy = format_accuracy(check.accuracy_meters);
    if check.is_within_radius {
        format!(
            "You are at your branch: {} away ({accuracy}).",
            format_distance(check.distance_meters)
        )
    } else {
        format!(
            "You are {} from your branch, outside the allowed {} radius ({accuracy}).",
            format_distance(check.distance_meters),
            format_distance(check.allowed_radius_meters.max(0.0).round() as u32),
        )
    }
}

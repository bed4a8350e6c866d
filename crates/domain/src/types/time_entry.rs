//! Time entry types
//!
//! A time entry is opened on clock-in and closed on clock-out. A user has at
//! most one open entry at any time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::location::GeoPoint;

/// A persisted work period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub branch_id: Uuid,
    pub clock_in_time: DateTime<Utc>,
    pub clock_out_time: Option<DateTime<Utc>>,
    pub clock_in_location: GeoPoint,
    pub clock_in_accuracy_meters: Option<f64>,
    pub clock_out_location: Option<GeoPoint>,
    pub total_hours: Option<f64>,
    pub notes: Option<String>,
    /// Set when the employee confirmed a clock-in outside the branch radius
    #[serde(default)]
    pub location_exception: bool,
}

impl TimeEntry {
    pub fn is_open(&self) -> bool {
        self.clock_out_time.is_none()
    }
}

/// Insert payload for a clock-in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTimeEntry {
    pub user_id: Uuid,
    pub branch_id: Uuid,
    pub clock_in_time: DateTime<Utc>,
    pub clock_in_location: GeoPoint,
    pub clock_in_accuracy_meters: Option<f64>,
    pub notes: Option<String>,
    pub location_exception: bool,
}

/// Close payload for a clock-out
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClockOutRequest {
    /// Start of the entry being closed, for the `total_hours` column
    pub clock_in_time: DateTime<Utc>,
    pub clock_out_time: DateTime<Utc>,
    /// [`GeoPoint::ZERO`] when the employee proceeded without a position
    pub clock_out_location: GeoPoint,
    pub clock_out_accuracy_meters: Option<f64>,
}

/// Hours between two instants, rounded to two decimals and never negative
pub fn total_hours_between(clock_in: DateTime<Utc>, clock_out: DateTime<Utc>) -> f64 {
    let seconds = (clock_out - clock_in).num_seconds().max(0);
    #[allow(clippy::cast_precision_loss)]
    let hours = seconds as f64 / 3600.0;
    (hours * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;

    #[test]
    fn test_total_hours_rounding() {
        let start = Utc.with_ymd_and_hms(2024, 3, 4, 8, 0, 0).unwrap();
        let end = start + Duration::minutes(7 * 60 + 40);
        assert!((total_hours_between(start, end) - 7.67).abs() < f64::EPSILON);
    }

    #[test]
    fn test_total_hours_never_negative() {
        let start = Utc.with_ymd_and_hms(2024, 3, 4, 8, 0, 0).unwrap();
        assert!(total_hours_between(start, start - Duration::hours(1)).abs() < f64::EPSILON);
    }

    #[test]
    fn test_open_entry() {
        let entry = TimeEntry {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            branch_id: Uuid::new_v4(),
            clock_in_time: Utc::now(),
            clock_out_time: None,
            clock_in_location: GeoPoint::new(1.0, 2.0),
            clock_in_accuracy_meters: Some(8.0),
            clock_out_location: None,
            total_hours: None,
            notes: None,
            location_exception: false,
        };
        assert!(entry.is_open());
    }
}

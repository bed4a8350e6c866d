//! Location types
//!
//! Coordinates come from the device and are never stored on their own; the
//! branch location is administrative data the controller only reads.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::PharmaClockError;

/// A bare latitude/longitude pair in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    /// Submitted in place of a position when a clock-out proceeds without
    /// one.
    pub const ZERO: Self = Self { latitude: 0.0, longitude: 0.0 };

    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    pub fn is_zero(&self) -> bool {
        self.latitude == 0.0 && self.longitude == 0.0
    }

    /// Both components are finite and within the WGS84 ranges.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}, {:.6}", self.latitude, self.longitude)
    }
}

/// A position fix as reported by the geolocation capability
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
    /// Radius of the 95% confidence circle, when the device reports one
    pub accuracy_meters: Option<f64>,
    pub captured_at: DateTime<Utc>,
}

impl Coordinates {
    pub fn point(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}

/// Geofence centre and radius for one branch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchLocation {
    pub branch_id: Uuid,
    pub latitude: f64,
    pub longitude: f64,
    pub allowed_radius_meters: f64,
}

impl BranchLocation {
    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}

/// Location permission as reported by the platform
///
/// Never persisted; re-derived every time it is needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionState {
    Granted,
    Denied,
    /// The platform will ask the user on the next request
    #[default]
    Prompt,
}

impl PermissionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Granted => "granted",
            Self::Denied => "denied",
            Self::Prompt => "prompt",
        }
    }
}

impl fmt::Display for PermissionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PermissionState {
    type Err = PharmaClockError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "granted" => Ok(Self::Granted),
            "denied" => Ok(Self::Denied),
            "prompt" | "can_prompt" => Ok(Self::Prompt),
            other => {
                Err(PharmaClockError::InvalidInput(format!("unknown permission state: {other}")))
            }
        }
    }
}

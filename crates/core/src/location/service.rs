//! Location service - permission detection, position fixes, geofence checks

use std::sync::Arc;
use std::time::Duration;

use pharmaclock_domain::constants::{
    CURRENT_POSITION_MAX_AGE_SECS, CURRENT_POSITION_TIMEOUT_SECS, REQUEST_ACCESS_TIMEOUT_SECS,
};
use pharmaclock_domain::{Coordinates, GeoPoint, LocationConfig, PermissionState};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use super::distance::calculate_distance;
use super::ports::{
    GeolocationProvider, PermissionCapability, PositionErrorCode, PositionFailure,
    PositionOptions,
};
use crate::errors::LocationError;

/// Timeouts and cache ages for the two kinds of position request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocationSettings {
    /// Timeout for the fresh fix taken when asking for access
    pub request_timeout: Duration,
    pub position_timeout: Duration,
    pub position_max_age: Duration,
}

impl Default for LocationSettings {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(REQUEST_ACCESS_TIMEOUT_SECS),
            position_timeout: Duration::from_secs(CURRENT_POSITION_TIMEOUT_SECS),
            position_max_age: Duration::from_secs(CURRENT_POSITION_MAX_AGE_SECS),
        }
    }
}

impl From<&LocationConfig> for LocationSettings {
    fn from(config: &LocationConfig) -> Self {
        Self {
            request_timeout: Duration::from_secs(config.request_timeout_secs),
            position_timeout: Duration::from_secs(config.position_timeout_secs),
            position_max_age: Duration::from_secs(config.position_max_age_secs),
        }
    }
}

/// Result of comparing a fresh fix against a branch geofence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkLocationCheck {
    /// `distance_meters <= allowed_radius_meters`
    pub is_within_radius: bool,
    pub distance_meters: u32,
    pub allowed_radius_meters: f64,
    pub coordinates: Coordinates,
    pub accuracy_meters: Option<f64>,
}

/// Permission-aware facade over the device geolocation capability
#[derive(Clone)]
pub struct LocationService {
    provider: Arc<dyn GeolocationProvider>,
    permissions: PermissionCapability,
    settings: LocationSettings,
}

impl LocationService {
    /// Create a new location service
    pub fn new(provider: Arc<dyn GeolocationProvider>, permissions: PermissionCapability) -> Self {
        Self { provider, permissions, settings: LocationSettings::default() }
    }

    /// Override the default timeouts
    pub fn with_settings(mut self, settings: LocationSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn settings(&self) -> &LocationSettings {
        &self.settings
    }

    pub fn is_supported(&self) -> bool {
        self.provider.is_available()
    }

    /// Current permission state, without ever prompting.
    ///
    /// Platforms that cannot report permission ahead of a request are
    /// treated as `Prompt`.
    #[instrument(skip(self))]
    pub async fn check_permission_status(&self) -> PermissionState {
        if !self.is_supported() {
            return PermissionState::Denied;
        }

        match &self.permissions {
            PermissionCapability::Unavailable => PermissionState::Prompt,
            PermissionCapability::Introspectable(introspection) => {
                match introspection.query().await {
                    Ok(state) => state,
                    Err(err) => {
                        debug!(error = %err, "permission query failed, assuming prompt");
                        PermissionState::Prompt
                    }
                }
            }
        }
    }

    /// Ask for a fresh high-accuracy fix, triggering the platform's
    /// permission flow if needed.
    pub async fn request_location_access(&self) -> Result<Coordinates, LocationError> {
        self.acquire(PositionOptions {
            high_accuracy: true,
            maximum_age: Duration::ZERO,
            timeout: self.settings.request_timeout,
        })
        .await
    }

    /// Fix for use once permission is established; may be up to a minute
    /// old.
    pub async fn get_current_position(&self) -> Result<Coordinates, LocationError> {
        self.acquire(PositionOptions {
            high_accuracy: true,
            maximum_age: self.settings.position_max_age,
            timeout: self.settings.position_timeout,
        })
        .await
    }

    pub fn calculate_distance(a: GeoPoint, b: GeoPoint) -> u32 {
        calculate_distance(a, b)
    }

    /// Take a position and compare it against a branch geofence.
    ///
    /// # Errors
    /// Propagates the acquisition failure; never falls back to a default
    /// position.
    #[instrument(skip(self))]
    pub async fn check_work_location(
        &self,
        branch_latitude: f64,
        branch_longitude: f64,
        radius_meters: f64,
    ) -> Result<WorkLocationCheck, LocationError> {
        let coordinates = self.get_current_position().await?;
        let distance_meters =
            calculate_distance(coordinates.point(), GeoPoint::new(branch_latitude, branch_longitude));
        let is_within_radius = f64::from(distance_meters) <= radius_meters;

        debug!(distance_meters, is_within_radius, "work location checked");

        Ok(WorkLocationCheck {
            is_within_radius,
            distance_meters,
            allowed_radius_meters: radius_meters,
            accuracy_meters: coordinates.accuracy_meters,
            coordinates,
        })
    }

    #[instrument(skip(self), fields(timeout_secs = options.timeout.as_secs()))]
    async fn acquire(&self, options: PositionOptions) -> Result<Coordinates, LocationError> {
        if !self.is_supported() {
            return Err(LocationError::unsupported());
        }

        if self.provider.request_permission().await == PermissionState::Denied {
            warn!("location permission refused");
            return Err(LocationError::permission_denied());
        }

        match tokio::time::timeout(options.timeout, self.provider.current_position(options)).await
        {
            Ok(Ok(coordinates)) if !coordinates.point().is_valid() => {
                warn!(
                    latitude = coordinates.latitude,
                    longitude = coordinates.longitude,
                    "platform returned an unusable fix"
                );
                Err(LocationError::position_unavailable())
            }
            Ok(Ok(coordinates)) => {
                debug!(accuracy = ?coordinates.accuracy_meters, "position acquired");
                Ok(coordinates)
            }
            Ok(Err(failure)) => Err(classify(&failure, options.timeout)),
            Err(_) => {
                warn!("position request exceeded its timeout");
                Err(LocationError::timeout(options.timeout))
            }
        }
    }
}

fn classify(failure: &PositionFailure, timeout: Duration) -> LocationError {
    warn!(code = ?failure.code, detail = %failure.detail, "position request failed");
    match failure.code {
        PositionErrorCode::PermissionDenied => LocationError::permission_denied(),
        PositionErrorCode::PositionUnavailable => LocationError::position_unavailable(),
        PositionErrorCode::Timeout => LocationError::timeout(timeout),
    }
}

//! Configuration management

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{
    CURRENT_POSITION_MAX_AGE_SECS, CURRENT_POSITION_TIMEOUT_SECS, DEFAULT_HTTP_TIMEOUT_SECS,
    DEFAULT_LOG_LEVEL, REFRESH_MAX_ATTEMPTS, REFRESH_STEP_MS, REQUEST_ACCESS_TIMEOUT_SECS,
};
use crate::errors::{PharmaClockError, Result};
use crate::types::{GeoPoint, PermissionState};

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub store: StoreConfig,
    pub employee: EmployeeConfig,
    #[serde(default)]
    pub location: LocationConfig,
    #[serde(default)]
    pub refresh: RefreshConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Check cross-field constraints serde cannot express.
    ///
    /// # Errors
    /// Returns `PharmaClockError::Config` describing the first violation.
    pub fn validate(&self) -> Result<()> {
        if !(self.store.url.starts_with("http://") || self.store.url.starts_with("https://")) {
            return Err(PharmaClockError::Config(format!(
                "store url must be http(s): {}",
                self.store.url
            )));
        }
        if self.store.api_key.trim().is_empty() {
            return Err(PharmaClockError::Config("store api key is empty".to_string()));
        }
        if self.refresh.max_attempts == 0 {
            return Err(PharmaClockError::Config(
                "refresh.max_attempts must be greater than 0".to_string(),
            ));
        }
        if let Some(point) = self.location.fixed_point() {
            if !point.is_valid() {
                return Err(PharmaClockError::Config(format!(
                    "configured position out of range: {point}"
                )));
            }
        }
        Ok(())
    }
}

/// Remote store (PostgREST) connection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub url: String,
    #[serde(skip_serializing)]
    pub api_key: String,
    /// User session token; the anon key is used as bearer when absent
    #[serde(default, skip_serializing)]
    pub access_token: Option<String>,
    #[serde(default = "default_http_timeout")]
    pub timeout_secs: u64,
}

/// The employee this installation clocks for
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeConfig {
    pub user_id: Uuid,
}

/// Geolocation source and request tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationConfig {
    /// Fixed position reported by the device adapter; no position means the
    /// adapter reports the position as unavailable
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub accuracy_meters: Option<f64>,
    #[serde(default)]
    pub permission: PermissionState,
    /// Set to `false` on platforms without a permission query
    #[serde(default = "default_true")]
    pub permission_introspection: bool,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_position_timeout")]
    pub position_timeout_secs: u64,
    #[serde(default = "default_position_max_age")]
    pub position_max_age_secs: u64,
}

impl LocationConfig {
    /// The configured position, when both components are present
    pub fn fixed_point(&self) -> Option<GeoPoint> {
        match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => Some(GeoPoint::new(latitude, longitude)),
            _ => None,
        }
    }
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            latitude: None,
            longitude: None,
            accuracy_meters: None,
            permission: PermissionState::default(),
            permission_introspection: true,
            request_timeout_secs: REQUEST_ACCESS_TIMEOUT_SECS,
            position_timeout_secs: CURRENT_POSITION_TIMEOUT_SECS,
            position_max_age_secs: CURRENT_POSITION_MAX_AGE_SECS,
        }
    }
}

/// Post-mutation refresh schedule (linear: step, 2 x step, ...)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshConfig {
    #[serde(default = "default_refresh_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_refresh_step")]
    pub step_ms: u64,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self { max_attempts: REFRESH_MAX_ATTEMPTS, step_ms: REFRESH_STEP_MS }
    }
}

/// Tracing subscriber settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_log_level(), json: false }
    }
}

fn default_true() -> bool {
    true
}

fn default_http_timeout() -> u64 {
    DEFAULT_HTTP_TIMEOUT_SECS
}

fn default_request_timeout() -> u64 {
    REQUEST_ACCESS_TIMEOUT_SECS
}

fn default_position_timeout() -> u64 {
    CURRENT_POSITION_TIMEOUT_SECS
}

fn default_position_max_age() -> u64 {
    CURRENT_POSITION_MAX_AGE_SECS
}

fn default_refresh_attempts() -> u32 {
    REFRESH_MAX_ATTEMPTS
}

fn default_refresh_step() -> u64 {
    REFRESH_STEP_MS
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

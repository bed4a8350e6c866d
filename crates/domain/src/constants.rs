//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! application.

/// Mean Earth radius used by the great-circle distance, in meters
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

// Geolocation request tuning (mobile GPS acquisition is slow on first fix)
pub const REQUEST_ACCESS_TIMEOUT_SECS: u64 = 20;
pub const CURRENT_POSITION_TIMEOUT_SECS: u64 = 15;
pub const CURRENT_POSITION_MAX_AGE_SECS: u64 = 60;

// Post-mutation refresh: 1s, 2s, 3s
pub const REFRESH_MAX_ATTEMPTS: u32 = 3;
pub const REFRESH_STEP_MS: u64 = 1_000;

// Working-time display
pub const WORKING_TIME_TICK_SECS: u64 = 60;

// Store client
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_LOG_LEVEL: &str = "info";

//! Permission-aware geolocation and geofence checks

pub mod distance;
pub mod format;
pub mod ports;
pub mod service;

pub use distance::calculate_distance;
pub use format::{format_accuracy, format_distance, permission_status_message, work_location_message};
pub use service::{LocationService, LocationSettings, WorkLocationCheck};

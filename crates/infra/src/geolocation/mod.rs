//! Geolocation adapters for [`pharmaclock_core::GeolocationProvider`]

pub mod fixed;
pub mod unsupported;

pub use fixed::FixedGeolocationProvider;
pub use unsupported::UnsupportedGeolocation;

//! # PharmaClock Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - PostgREST adapters for time entries, branches, profiles and breaks
//! - HTTP client wrapper
//! - Geolocation adapters (fixed fix, unsupported runtime)
//! - Configuration loading and tracing setup
//!
//! ## Architecture
//! - Implements traits defined in `pharmaclock-core`
//! - Depends on `pharmaclock-common`, `pharmaclock-domain` and `pharmaclock-core`
//! - Contains all "impure" code (network, environment, files)

pub mod config;
pub mod errors;
pub mod geolocation;
pub mod http;
pub mod observability;
pub mod store;

// Re-export commonly used items
pub use errors::InfraError;
pub use geolocation::{FixedGeolocationProvider, UnsupportedGeolocation};
pub use http::{HttpClient, HttpClientBuilder};
pub use store::{
    RestBranchLocationStore, RestBreakStore, RestClient, RestEmployeeDirectory,
    RestTimeEntryStore,
};

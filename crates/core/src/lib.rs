//! # PharmaClock Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port/adapter interfaces (traits) for the remote store, the device
//!   geolocation capability and human confirmation
//! - `LocationService`: permission-aware geolocation and geofence checks
//! - `ClockController`: the clock-in/clock-out/break state machine
//!
//! ## Architecture Principles
//! - Only depends on `pharmaclock-common` and `pharmaclock-domain`
//! - No database, HTTP, or platform code
//! - All external dependencies via traits
//! - Pure, testable business logic

pub mod clock;
pub mod confirmation;
pub mod errors;
pub mod location;

// Re-export specific items to avoid ambiguity
pub use clock::ports::{
    BranchLocationStore, BreakStore, EmployeeDirectory, TimeEntryStore, UnavailableBreakStore,
};
pub use clock::{
    CancelReason, ClockController, ClockControllerBuilder, ClockOutcome, Reconciliation,
    RefreshPolicy, TransitionReport,
};
pub use confirmation::{ConfirmationPort, ConfirmationRequest};
pub use errors::{ClockError, LocationError, LocationErrorKind, Recovery};
pub use location::ports::{
    GeolocationProvider, PermissionCapability, PermissionIntrospection, PositionErrorCode,
    PositionFailure, PositionOptions,
};
pub use location::{
    calculate_distance, format_accuracy, format_distance, permission_status_message,
    work_location_message, LocationService, LocationSettings, WorkLocationCheck,
};

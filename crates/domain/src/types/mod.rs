//! Domain types and models
//!
//! Everything the clock controller reads from or writes to the remote store,
//! plus the ephemeral location and state types derived on the client.

pub mod clock;
pub mod employee;
pub mod location;
pub mod time_entry;

pub use clock::{BreakSession, ClockState, WorkingTime};
pub use employee::EmployeeProfile;
pub use location::{BranchLocation, Coordinates, GeoPoint, PermissionState};
pub use time_entry::{total_hours_between, ClockOutRequest, NewTimeEntry, TimeEntry};

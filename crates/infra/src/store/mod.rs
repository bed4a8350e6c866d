//! PostgREST store adapters
//!
//! One adapter per table, all sharing a [`RestClient`]:
//! - `time_entries` → [`RestTimeEntryStore`]
//! - `branch_locations` → [`RestBranchLocationStore`]
//! - `profiles` → [`RestEmployeeDirectory`]
//! - `break_sessions` → [`RestBreakStore`]

pub mod branches;
pub mod breaks;
pub mod client;
pub mod profiles;
pub mod time_entries;

pub use branches::RestBranchLocationStore;
pub use breaks::RestBreakStore;
pub use client::RestClient;
pub use profiles::RestEmployeeDirectory;
pub use time_entries::RestTimeEntryStore;

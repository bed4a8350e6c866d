//! Port interfaces for the remote time-entry store
//!
//! These traits define the boundaries between core business logic
//! and infrastructure implementations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pharmaclock_domain::{
    BranchLocation, BreakSession, ClockOutRequest, EmployeeProfile, NewTimeEntry,
    PharmaClockError, Result, TimeEntry,
};
use uuid::Uuid;

/// Trait for reading and writing time entries
#[async_trait]
pub trait TimeEntryStore: Send + Sync {
    /// The user's open entry (no clock-out time), if any
    async fn fetch_open_entry(&self, user_id: Uuid) -> Result<Option<TimeEntry>>;

    /// Insert a new open entry and return it as stored
    async fn insert_entry(&self, entry: NewTimeEntry) -> Result<TimeEntry>;

    /// Close an entry; the store fills in total hours
    async fn clock_out(&self, entry_id: Uuid, request: ClockOutRequest) -> Result<TimeEntry>;
}

/// Trait for reading branch geofences
#[async_trait]
pub trait BranchLocationStore: Send + Sync {
    async fn fetch_branch_location(&self, branch_id: Uuid) -> Result<Option<BranchLocation>>;
}

/// Trait for reading employee profiles
#[async_trait]
pub trait EmployeeDirectory: Send + Sync {
    async fn fetch_profile(&self, user_id: Uuid) -> Result<Option<EmployeeProfile>>;
}

/// Trait for break sessions
///
/// Deployments without a break table return
/// `PharmaClockError::FeatureUnavailable` from every method.
#[async_trait]
pub trait BreakStore: Send + Sync {
    async fn active_break(&self, time_entry_id: Uuid) -> Result<Option<BreakSession>>;

    async fn start_break(&self, time_entry_id: Uuid, at: DateTime<Utc>) -> Result<BreakSession>;

    async fn end_break(&self, break_id: Uuid, at: DateTime<Utc>) -> Result<BreakSession>;
}

/// Break store for deployments that have no break table
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableBreakStore;

impl UnavailableBreakStore {
    fn unavailable() -> PharmaClockError {
        PharmaClockError::FeatureUnavailable(
            "break sessions are not supported by this deployment".to_string(),
        )
    }
}

#[async_trait]
impl BreakStore for UnavailableBreakStore {
    async fn active_break(&self, _time_entry_id: Uuid) -> Result<Option<BreakSession>> {
        Err(Self::unavailable())
    }

    async fn start_break(&self, _time_entry_id: Uuid, _at: DateTime<Utc>) -> Result<BreakSession> {
        Err(Self::unavailable())
    }

    async fn end_break(&self, _break_id: Uuid, _at: DateTime<Utc>) -> Result<BreakSession> {
        Err(Self::unavailable())
    }
}

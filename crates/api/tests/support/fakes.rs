//! Fixed-answer ports for tests that run on paused time

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use pharmaclock_common::testing::MockClock;
use pharmaclock_core::{
    BranchLocationStore, ClockController, ConfirmationPort, ConfirmationRequest,
    EmployeeDirectory, GeolocationProvider, LocationService, PermissionCapability,
    PositionErrorCode, PositionFailure, PositionOptions, TimeEntryStore,
};
use pharmaclock_domain::{
    BranchLocation, ClockOutRequest, Coordinates, EmployeeProfile, NewTimeEntry,
    PharmaClockError, Result as DomainResult, TimeEntry,
};
use uuid::Uuid;

/// Store whose open entry never changes
pub struct FixedEntries(pub Option<TimeEntry>);

#[async_trait]
impl TimeEntryStore for FixedEntries {
    async fn fetch_open_entry(&self, _user_id: Uuid) -> DomainResult<Option<TimeEntry>> {
        Ok(self.0.clone())
    }

    async fn insert_entry(&self, _entry: NewTimeEntry) -> DomainResult<TimeEntry> {
        Err(PharmaClockError::Database("read-only store".to_string()))
    }

    async fn clock_out(&self, _entry_id: Uuid, _request: ClockOutRequest) -> DomainResult<TimeEntry> {
        Err(PharmaClockError::Database("read-only store".to_string()))
    }
}

pub struct NoBranches;

#[async_trait]
impl BranchLocationStore for NoBranches {
    async fn fetch_branch_location(&self, _branch_id: Uuid) -> DomainResult<Option<BranchLocation>> {
        Ok(None)
    }
}

pub struct FixedProfile(pub EmployeeProfile);

#[async_trait]
impl EmployeeDirectory for FixedProfile {
    async fn fetch_profile(&self, _user_id: Uuid) -> DomainResult<Option<EmployeeProfile>> {
        Ok(Some(self.0.clone()))
    }
}

pub struct NoFix;

#[async_trait]
impl GeolocationProvider for NoFix {
    fn is_available(&self) -> bool {
        true
    }

    async fn current_position(
        &self,
        _options: PositionOptions,
    ) -> Result<Coordinates, PositionFailure> {
        Err(PositionFailure::new(PositionErrorCode::PositionUnavailable, "no fix"))
    }
}

pub struct Decline;

#[async_trait]
impl ConfirmationPort for Decline {
    async fn confirm(&self, _request: &ConfirmationRequest) -> bool {
        false
    }
}

/// Controller for an employee whose open entry is `entry`, reading time
/// from `clock`.
pub fn controller(user_id: Uuid, entry: Option<TimeEntry>, clock: MockClock) -> ClockController {
    let profile = EmployeeProfile {
        user_id,
        full_name: "Maria Santos".to_string(),
        branch_id: entry.as_ref().map(|e| e.branch_id),
    };
    ClockController::builder(
        user_id,
        LocationService::new(Arc::new(NoFix), PermissionCapability::Unavailable),
        Arc::new(FixedEntries(entry)),
        Arc::new(NoBranches),
        Arc::new(FixedProfile(profile)),
        Arc::new(Decline),
    )
    .with_clock(Arc::new(clock))
    .build()
}

//! Shared test helpers for `pharmaclock-core` integration tests.
//!
//! These helpers provide reusable fixtures and lightweight fakes so that
//! controller tests can focus on behaviour instead of boilerplate.

#![allow(dead_code)]

pub mod device;
pub mod stores;

use std::f64::consts::PI;
use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use pharmaclock_common::testing::{MockClock, RecordingSleeper};
use pharmaclock_common::Sleeper;
use pharmaclock_core::{
    BreakStore, ClockController, LocationService, PermissionCapability, UnavailableBreakStore,
};
use pharmaclock_domain::constants::EARTH_RADIUS_METERS;
use pharmaclock_domain::{BranchLocation, EmployeeProfile, GeoPoint, PermissionState};
use uuid::Uuid;

use self::device::{ScriptedConfirmer, ScriptedGeolocation, StaticPermission};
use self::stores::{InMemoryTimeEntryStore, StaticBranches, StaticDirectory};

/// Branch centre used throughout the tests.
pub const BRANCH_CENTER: GeoPoint = GeoPoint::new(14.5995, 120.9842);

/// A point `meters` due north of `origin`.
pub fn north_of(origin: GeoPoint, meters: f64) -> GeoPoint {
    let meters_per_degree = EARTH_RADIUS_METERS * PI / 180.0;
    GeoPoint::new(origin.latitude + meters / meters_per_degree, origin.longitude)
}

pub fn start_of_shift() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 4, 8, 0, 0).unwrap()
}

/// All collaborators of a controller, kept so tests can inspect them.
pub struct Harness {
    pub user_id: Uuid,
    pub branch_id: Uuid,
    pub entries: Arc<InMemoryTimeEntryStore>,
    pub branches: Arc<StaticBranches>,
    pub geolocation: Arc<ScriptedGeolocation>,
    pub confirmer: Arc<ScriptedConfirmer>,
    pub sleeper: Arc<RecordingSleeper>,
    pub clock: MockClock,
    profile: Option<EmployeeProfile>,
    permission: PermissionCapability,
    breaks: Arc<dyn BreakStore>,
}

impl Harness {
    /// Employee assigned to a branch with a 50 m radius, standing `distance`
    /// meters away, permission granted, every confirmation declined.
    pub fn at_distance(distance: f64) -> Self {
        let user_id = Uuid::new_v4();
        let branch_id = Uuid::new_v4();
        Self {
            user_id,
            branch_id,
            entries: Arc::new(InMemoryTimeEntryStore::new()),
            branches: Arc::new(StaticBranches::new([BranchLocation {
                branch_id,
                latitude: BRANCH_CENTER.latitude,
                longitude: BRANCH_CENTER.longitude,
                allowed_radius_meters: 50.0,
            }])),
            geolocation: Arc::new(ScriptedGeolocation::at(
                north_of(BRANCH_CENTER, distance),
                Some(8.0),
            )),
            confirmer: Arc::new(ScriptedConfirmer::always(false)),
            sleeper: Arc::new(RecordingSleeper::new()),
            clock: MockClock::at(start_of_shift()),
            profile: Some(EmployeeProfile {
                user_id,
                full_name: "Ana Reyes".to_string(),
                branch_id: Some(branch_id),
            }),
            permission: PermissionCapability::Introspectable(Arc::new(StaticPermission(
                PermissionState::Granted,
            ))),
            breaks: Arc::new(UnavailableBreakStore),
        }
    }

    pub fn without_branch(mut self) -> Self {
        if let Some(profile) = self.profile.as_mut() {
            profile.branch_id = None;
        }
        self
    }

    pub fn with_branch_id(mut self, branch_id: Uuid) -> Self {
        if let Some(profile) = self.profile.as_mut() {
            profile.branch_id = Some(branch_id);
        }
        self
    }

    pub fn with_entries(mut self, entries: InMemoryTimeEntryStore) -> Self {
        self.entries = Arc::new(entries);
        self
    }

    pub fn with_geolocation(mut self, geolocation: ScriptedGeolocation) -> Self {
        self.geolocation = Arc::new(geolocation);
        self
    }

    pub fn with_confirmer(mut self, confirmer: ScriptedConfirmer) -> Self {
        self.confirmer = Arc::new(confirmer);
        self
    }

    pub fn with_permission(mut self, permission: PermissionCapability) -> Self {
        self.permission = permission;
        self
    }

    pub fn with_breaks(mut self, breaks: Arc<dyn BreakStore>) -> Self {
        self.breaks = breaks;
        self
    }

    pub fn location_service(&self) -> LocationService {
        LocationService::new(self.geolocation.clone(), self.permission.clone())
    }

    pub fn controller(&self) -> ClockController {
        ClockController::builder(
            self.user_id,
            self.location_service(),
            self.entries.clone(),
            self.branches.clone(),
            Arc::new(StaticDirectory::new(self.profile.clone())),
            self.confirmer.clone(),
        )
        .with_break_store(Arc::clone(&self.breaks))
        .with_clock(Arc::new(self.clock.clone()))
        .with_sleeper(self.sleeper.clone() as Arc<dyn Sleeper>)
        .build()
    }
}

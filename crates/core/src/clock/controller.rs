//! Clock controller - core business logic
//!
//! Drives `CLOCKED_OUT -> CLOCKED_IN <-> ON_BREAK -> CLOCKED_OUT`. Clock-in
//! is gated on a geofence check with a human override; clock-out stays
//! possible without a position. Every write is followed by a bounded
//! re-read of the open entry.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use pharmaclock_common::{Clock, Sleeper, SystemClock, TokioSleeper};
use pharmaclock_domain::{
    BranchLocation, BreakSession, ClockOutRequest, ClockState, EmployeeProfile, GeoPoint,
    NewTimeEntry, PermissionState, TimeEntry, WorkingTime,
};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::ports::{
    BranchLocationStore, BreakStore, EmployeeDirectory, TimeEntryStore, UnavailableBreakStore,
};
use super::refresh::{refresh_open_entry, Expectation, Reconciliation, RefreshPolicy};
use crate::confirmation::{ConfirmationPort, ConfirmationRequest};
use crate::errors::ClockError;
use crate::location::{LocationService, WorkLocationCheck};

/// Why a transition stopped before touching the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CancelReason {
    /// The employee declined to clock in outside the branch radius
    OutsideRadiusDeclined { distance_meters: u32 },
    ClockOutDeclined,
    /// The employee declined to clock out without a position
    MissingLocationDeclined,
}

impl fmt::Display for CancelReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutsideRadiusDeclined { .. } => {
                write!(f, "Clock-in cancelled: you are outside your branch area.")
            }
            Self::ClockOutDeclined => write!(f, "Clock-out cancelled."),
            Self::MissingLocationDeclined => {
                write!(f, "Clock-out cancelled: location could not be verified.")
            }
        }
    }
}

/// What a completed transition did
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionReport {
    /// State after the transition
    pub state: ClockState,
    /// The entry as written (clock-in/clock-out)
    pub entry: Option<TimeEntry>,
    /// The break as written (break start/end)
    pub break_session: Option<BreakSession>,
    /// Geofence check performed for a clock-in
    pub location: Option<WorkLocationCheck>,
    /// Clock-in confirmed outside the branch radius
    pub location_exception: bool,
    /// `false` when a clock-out went ahead without a position
    pub location_verified: bool,
    /// Post-write refresh summary (clock-in/clock-out only)
    pub refresh: Option<Reconciliation>,
}

impl TransitionReport {
    fn new(state: ClockState) -> Self {
        Self {
            state,
            entry: None,
            break_session: None,
            location: None,
            location_exception: false,
            location_verified: true,
            refresh: None,
        }
    }
}

/// Result of a clock-in or clock-out attempt that did not fail
#[derive(Debug, Clone, PartialEq)]
pub enum ClockOutcome {
    Completed(TransitionReport),
    /// Nothing was written
    Cancelled(CancelReason),
}

impl ClockOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }
}

#[derive(Debug, Default)]
struct ControllerState {
    loaded: bool,
    profile: Option<EmployeeProfile>,
    open_entry: Option<TimeEntry>,
    active_break: Option<BreakSession>,
    branch_location: Option<BranchLocation>,
}

impl ControllerState {
    fn clock_state(&self) -> ClockState {
        ClockState::derive(self.open_entry.is_some(), self.active_break.is_some())
    }
}

/// Releases the in-flight flag when a mutation ends, however it ends
struct MutationGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for MutationGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Builder for [`ClockController`]
pub struct ClockControllerBuilder {
    user_id: Uuid,
    location: LocationService,
    entries: Arc<dyn TimeEntryStore>,
    branches: Arc<dyn BranchLocationStore>,
    directory: Arc<dyn EmployeeDirectory>,
    confirmer: Arc<dyn ConfirmationPort>,
    breaks: Arc<dyn BreakStore>,
    clock: Arc<dyn Clock>,
    sleeper: Arc<dyn Sleeper>,
    refresh: RefreshPolicy,
}

impl ClockControllerBuilder {
    /// Use a break store; without one every break action is unavailable
    pub fn with_break_store(mut self, breaks: Arc<dyn BreakStore>) -> Self {
        self.breaks = breaks;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    pub fn with_refresh_policy(mut self, refresh: RefreshPolicy) -> Self {
        self.refresh = refresh;
        self
    }

    pub fn build(self) -> ClockController {
        ClockController {
            user_id: self.user_id,
            location: self.location,
            entries: self.entries,
            branches: self.branches,
            directory: self.directory,
            confirmer: self.confirmer,
            breaks: self.breaks,
            clock: self.clock,
            sleeper: self.sleeper,
            refresh: self.refresh,
            state: Mutex::new(ControllerState::default()),
            in_flight: AtomicBool::new(false),
        }
    }
}

/// Clock-in/out state machine for one employee
pub struct ClockController {
    user_id: Uuid,
    location: LocationService,
    entries: Arc<dyn TimeEntryStore>,
    branches: Arc<dyn BranchLocationStore>,
    directory: Arc<dyn EmployeeDirectory>,
    confirmer: Arc<dyn ConfirmationPort>,
    breaks: Arc<dyn BreakStore>,
    clock: Arc<dyn Clock>,
    sleeper: Arc<dyn Sleeper>,
    refresh: RefreshPolicy,
    state: Mutex<ControllerState>,
    in_flight: AtomicBool,
}

impl ClockController {
    /// Start building a controller from its required collaborators
    pub fn builder(
        user_id: Uuid,
        location: LocationService,
        entries: Arc<dyn TimeEntryStore>,
        branches: Arc<dyn BranchLocationStore>,
        directory: Arc<dyn EmployeeDirectory>,
        confirmer: Arc<dyn ConfirmationPort>,
    ) -> ClockControllerBuilder {
        ClockControllerBuilder {
            user_id,
            location,
            entries,
            branches,
            directory,
            confirmer,
            breaks: Arc::new(UnavailableBreakStore),
            clock: Arc::new(SystemClock),
            sleeper: Arc::new(TokioSleeper),
            refresh: RefreshPolicy::default(),
        }
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn location_service(&self) -> &LocationService {
        &self.location
    }

    /// Fetch the branch assignment and the open entry, and derive the state.
    ///
    /// # Errors
    /// Store failures while reading the profile or the open entry. A missing
    /// break table is not an error.
    #[instrument(skip(self), fields(user_id = %self.user_id))]
    pub async fn load(&self) -> Result<ClockState, ClockError> {
        let profile = self.directory.fetch_profile(self.user_id).await?;
        if profile.as_ref().and_then(|p| p.branch_id).is_none() {
            warn!("employee has no branch assignment");
        }

        let open_entry = self.entries.fetch_open_entry(self.user_id).await?;
        let active_break = match &open_entry {
            Some(entry) => self.probe_active_break(entry.id).await?,
            None => None,
        };

        let mut state = self.state.lock();
        if state.profile.as_ref().and_then(|p| p.branch_id)
            != profile.as_ref().and_then(|p| p.branch_id)
        {
            state.branch_location = None;
        }
        state.profile = profile;
        state.open_entry = open_entry;
        state.active_break = active_break;
        state.loaded = true;

        let clock_state = state.clock_state();
        info!(state = %clock_state, "clock state loaded");
        Ok(clock_state)
    }

    pub fn state(&self) -> ClockState {
        self.state.lock().clock_state()
    }

    pub fn open_entry(&self) -> Option<TimeEntry> {
        self.state.lock().open_entry.clone()
    }

    pub fn active_break(&self) -> Option<BreakSession> {
        self.state.lock().active_break.clone()
    }

    pub fn profile(&self) -> Option<EmployeeProfile> {
        self.state.lock().profile.clone()
    }

    pub fn branch_id(&self) -> Option<Uuid> {
        self.state.lock().profile.as_ref().and_then(|p| p.branch_id)
    }

    /// Time since clock-in, or `None` when clocked out
    pub fn working_time(&self) -> Option<WorkingTime> {
        let clock_in = self.state.lock().open_entry.as_ref().map(|e| e.clock_in_time)?;
        Some(WorkingTime::between(clock_in, self.clock.now()))
    }

    /// The assigned branch's geofence, fetched once per controller.
    ///
    /// # Errors
    /// `NoBranchAssigned` without an assignment, `NoWorkplaceConfigured`
    /// when the branch has no location.
    pub async fn branch_location(&self) -> Result<BranchLocation, ClockError> {
        let branch_id = {
            let state = self.state.lock();
            if let Some(cached) = &state.branch_location {
                return Ok(cached.clone());
            }
            state.profile.as_ref().and_then(|p| p.branch_id)
        };
        let branch_id = branch_id.ok_or(ClockError::NoBranchAssigned)?;

        let location = self
            .branches
            .fetch_branch_location(branch_id)
            .await?
            .ok_or(ClockError::NoWorkplaceConfigured(branch_id))?;

        debug!(%branch_id, radius = location.allowed_radius_meters, "branch location cached");
        self.state.lock().branch_location = Some(location.clone());
        Ok(location)
    }

    /// Clock in at the assigned branch.
    ///
    /// Outside the branch radius the employee is asked to confirm; a
    /// confirmed clock-in is recorded as a location exception.
    ///
    /// # Errors
    /// `AlreadyClockedIn`, `NoBranchAssigned`, `NoWorkplaceConfigured`,
    /// location failures (including a refused permission), or
    /// `MutationFailed` when the store rejects the insert. None of these
    /// change local state.
    #[instrument(skip(self, notes), fields(user_id = %self.user_id))]
    pub async fn clock_in(&self, notes: Option<String>) -> Result<ClockOutcome, ClockError> {
        let _guard = self.begin_mutation()?;
        self.ensure_loaded().await?;

        if self.state().is_clocked_in() {
            return Err(ClockError::AlreadyClockedIn);
        }

        let branch = self.branch_location().await?;

        let permission = self.location.check_permission_status().await;
        if permission != PermissionState::Granted {
            info!(%permission, "requesting location access before clock-in");
            self.location.request_location_access().await?;
        }

        let check = self
            .location
            .check_work_location(branch.latitude, branch.longitude, branch.allowed_radius_meters)
            .await?;

        let location_exception = !check.is_within_radius;
        if location_exception {
            let request = ConfirmationRequest::OutsideRadius {
                distance_meters: check.distance_meters,
                allowed_radius_meters: check.allowed_radius_meters,
                accuracy_meters: check.accuracy_meters,
            };
            if !self.confirmer.confirm(&request).await {
                info!(distance = check.distance_meters, "clock-in outside radius declined");
                return Ok(ClockOutcome::Cancelled(CancelReason::OutsideRadiusDeclined {
                    distance_meters: check.distance_meters,
                }));
            }
            warn!(
                branch_id = %branch.branch_id,
                distance = check.distance_meters,
                radius = branch.allowed_radius_meters,
                "location exception: clock-in outside branch radius confirmed by employee"
            );
        }

        let new_entry = NewTimeEntry {
            user_id: self.user_id,
            branch_id: branch.branch_id,
            clock_in_time: self.clock.now(),
            clock_in_location: check.coordinates.point(),
            clock_in_accuracy_meters: check.accuracy_meters,
            notes: notes.filter(|n| !n.trim().is_empty()),
            location_exception,
        };
        let entry = self.entries.insert_entry(new_entry).await.map_err(ClockError::mutation)?;
        info!(entry_id = %entry.id, "clocked in");

        {
            let mut state = self.state.lock();
            state.open_entry = Some(entry.clone());
            state.active_break = None;
        }
        let refresh = self.reconcile(Expectation::Open(entry.id)).await;

        let mut report = TransitionReport::new(self.state());
        report.entry = Some(entry);
        report.location = Some(check);
        report.location_exception = location_exception;
        report.refresh = Some(refresh);
        Ok(ClockOutcome::Completed(report))
    }

    /// Clock out of the open entry.
    ///
    /// The employee confirms first. If no position can be obtained they are
    /// asked whether to continue without one, in which case
    /// [`GeoPoint::ZERO`] is submitted.
    ///
    /// # Errors
    /// `NotClockedIn`, or `MutationFailed` when the store rejects the update.
    #[instrument(skip(self), fields(user_id = %self.user_id))]
    pub async fn clock_out(&self) -> Result<ClockOutcome, ClockError> {
        let _guard = self.begin_mutation()?;
        self.ensure_loaded().await?;

        let (entry, active_break) = {
            let state = self.state.lock();
            (state.open_entry.clone(), state.active_break.clone())
        };
        let entry = entry.ok_or(ClockError::NotClockedIn)?;

        let worked = WorkingTime::between(entry.clock_in_time, self.clock.now());
        if !self.confirmer.confirm(&ConfirmationRequest::ClockOut { worked }).await {
            return Ok(ClockOutcome::Cancelled(CancelReason::ClockOutDeclined));
        }

        let (point, accuracy, verified) = match self.location.get_current_position().await {
            Ok(coordinates) => (coordinates.point(), coordinates.accuracy_meters, true),
            Err(err) => {
                warn!(kind = %err.kind, "no position for clock-out");
                let request = ConfirmationRequest::ClockOutWithoutLocation { reason: err.message };
                if !self.confirmer.confirm(&request).await {
                    return Ok(ClockOutcome::Cancelled(CancelReason::MissingLocationDeclined));
                }
                (GeoPoint::ZERO, None, false)
            }
        };

        let now = self.clock.now();
        if let Some(session) = active_break {
            if let Err(err) = self.breaks.end_break(session.id, now).await {
                warn!(break_id = %session.id, error = %err, "could not close break before clock-out");
            }
        }

        let request = ClockOutRequest {
            clock_in_time: entry.clock_in_time,
            clock_out_time: now,
            clock_out_location: point,
            clock_out_accuracy_meters: accuracy,
        };
        let closed =
            self.entries.clock_out(entry.id, request).await.map_err(ClockError::mutation)?;
        info!(entry_id = %closed.id, total_hours = ?closed.total_hours, verified, "clocked out");

        {
            let mut state = self.state.lock();
            state.open_entry = None;
            state.active_break = None;
        }
        let refresh = self.reconcile(Expectation::Closed(entry.id)).await;

        let mut report = TransitionReport::new(self.state());
        report.entry = Some(closed);
        report.location_verified = verified;
        report.refresh = Some(refresh);
        Ok(ClockOutcome::Completed(report))
    }

    /// Start a break on the open entry.
    ///
    /// # Errors
    /// `NotClockedIn`, `AlreadyOnBreak`, `FeatureUnavailable` when the
    /// deployment has no break table, or `MutationFailed`. Local state is
    /// restored on failure.
    #[instrument(skip(self), fields(user_id = %self.user_id))]
    pub async fn start_break(&self) -> Result<TransitionReport, ClockError> {
        let _guard = self.begin_mutation()?;
        self.ensure_loaded().await?;
        let now = self.clock.now();

        let entry_id = {
            let mut state = self.state.lock();
            let entry_id = match (state.clock_state(), &state.open_entry) {
                (ClockState::ClockedIn, Some(entry)) => entry.id,
                (ClockState::OnBreak, _) => return Err(ClockError::AlreadyOnBreak),
                _ => return Err(ClockError::NotClockedIn),
            };
            state.active_break = Some(BreakSession {
                id: Uuid::new_v4(),
                time_entry_id: entry_id,
                started_at: now,
                ended_at: None,
            });
            entry_id
        };

        match self.breaks.start_break(entry_id, now).await {
            Ok(session) => {
                info!(break_id = %session.id, "break started");
                self.state.lock().active_break = Some(session.clone());
                let mut report = TransitionReport::new(self.state());
                report.break_session = Some(session);
                Ok(report)
            }
            Err(err) => {
                self.state.lock().active_break = None;
                let err = ClockError::mutation(err);
                warn!(error = %err, "break start failed, state restored");
                Err(err)
            }
        }
    }

    /// End the active break.
    ///
    /// # Errors
    /// `NotClockedIn`, `NotOnBreak`, `FeatureUnavailable` or
    /// `MutationFailed`. Local state is restored on failure.
    #[instrument(skip(self), fields(user_id = %self.user_id))]
    pub async fn end_break(&self) -> Result<TransitionReport, ClockError> {
        let _guard = self.begin_mutation()?;
        self.ensure_loaded().await?;
        let now = self.clock.now();

        let session = {
            let mut state = self.state.lock();
            if state.open_entry.is_none() {
                return Err(ClockError::NotClockedIn);
            }
            state.active_break.take().ok_or(ClockError::NotOnBreak)?
        };

        match self.breaks.end_break(session.id, now).await {
            Ok(ended) => {
                info!(break_id = %ended.id, "break ended");
                let mut report = TransitionReport::new(self.state());
                report.break_session = Some(ended);
                Ok(report)
            }
            Err(err) => {
                self.state.lock().active_break = Some(session);
                let err = ClockError::mutation(err);
                warn!(error = %err, "break end failed, state restored");
                Err(err)
            }
        }
    }

    fn begin_mutation(&self) -> Result<MutationGuard<'_>, ClockError> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| ClockError::MutationInFlight)?;
        Ok(MutationGuard { flag: &self.in_flight })
    }

    async fn ensure_loaded(&self) -> Result<(), ClockError> {
        if !self.state.lock().loaded {
            self.load().await?;
        }
        Ok(())
    }

    async fn probe_active_break(&self, entry_id: Uuid) -> Result<Option<BreakSession>, ClockError> {
        match self.breaks.active_break(entry_id).await {
            Ok(session) => Ok(session),
            Err(err) if err.is_feature_unavailable() => {
                debug!(error = %err, "break tracking unavailable");
                Ok(None)
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn reconcile(&self, expectation: Expectation) -> Reconciliation {
        let (reconciliation, open_entry) = refresh_open_entry(
            &self.entries,
            self.user_id,
            expectation,
            &self.refresh,
            self.sleeper.as_ref(),
        )
        .await;

        if reconciliation.reconciled {
            let mut state = self.state.lock();
            if state.open_entry.as_ref().map(|e| e.id) != open_entry.as_ref().map(|e| e.id) {
                state.active_break = None;
            }
            state.open_entry = open_entry;
        }
        reconciliation
    }
}

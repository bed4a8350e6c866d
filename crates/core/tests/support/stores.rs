//! In-memory implementations of the store ports
//!
//! `InMemoryTimeEntryStore` models the remote store's read replica: after
//! every write, the next `replica_lag` reads still return the data as it was
//! before the write.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use pharmaclock_core::{BranchLocationStore, BreakStore, EmployeeDirectory, TimeEntryStore};
use pharmaclock_domain::{
    total_hours_between, BranchLocation, BreakSession, ClockOutRequest, EmployeeProfile,
    NewTimeEntry, PharmaClockError, Result as DomainResult, TimeEntry,
};
use uuid::Uuid;

#[derive(Default)]
struct Tables {
    primary: Vec<TimeEntry>,
    replica: Vec<TimeEntry>,
    stale_reads_left: u32,
}

/// In-memory time entry table with a lagging read replica.
#[derive(Default)]
pub struct InMemoryTimeEntryStore {
    tables: Mutex<Tables>,
    replica_lag: AtomicU32,
    fetches: AtomicU32,
    inserts: Mutex<Vec<NewTimeEntry>>,
    clock_outs: Mutex<Vec<(Uuid, ClockOutRequest)>>,
    write_error: Mutex<Option<PharmaClockError>>,
}

impl InMemoryTimeEntryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an entry visible to both primary and replica.
    pub fn with_entry(self, entry: TimeEntry) -> Self {
        {
            let mut tables = self.tables.lock();
            tables.primary.push(entry.clone());
            tables.replica.push(entry);
        }
        self
    }

    /// Number of stale reads served after each write.
    pub fn with_replica_lag(self, reads: u32) -> Self {
        self.replica_lag.store(reads, Ordering::SeqCst);
        self
    }

    /// Make every subsequent write fail with `error`.
    pub fn fail_writes_with(&self, error: PharmaClockError) {
        *self.write_error.lock() = Some(error);
    }

    pub fn fetch_count(&self) -> u32 {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn reset_fetch_count(&self) {
        self.fetches.store(0, Ordering::SeqCst);
    }

    pub fn inserts(&self) -> Vec<NewTimeEntry> {
        self.inserts.lock().clone()
    }

    pub fn clock_outs(&self) -> Vec<(Uuid, ClockOutRequest)> {
        self.clock_outs.lock().clone()
    }

    pub fn primary(&self) -> Vec<TimeEntry> {
        self.tables.lock().primary.clone()
    }

    fn after_write(&self, tables: &mut Tables) {
        tables.stale_reads_left = self.replica_lag.load(Ordering::SeqCst);
        if tables.stale_reads_left == 0 {
            tables.replica = tables.primary.clone();
        }
    }

    fn check_write(&self) -> DomainResult<()> {
        match self.write_error.lock().clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl TimeEntryStore for InMemoryTimeEntryStore {
    async fn fetch_open_entry(&self, user_id: Uuid) -> DomainResult<Option<TimeEntry>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let mut tables = self.tables.lock();
        if tables.stale_reads_left > 0 {
            tables.stale_reads_left -= 1;
        } else {
            tables.replica = tables.primary.clone();
        }
        Ok(tables.replica.iter().find(|e| e.user_id == user_id && e.is_open()).cloned())
    }

    async fn insert_entry(&self, entry: NewTimeEntry) -> DomainResult<TimeEntry> {
        self.check_write()?;
        self.inserts.lock().push(entry.clone());

        let mut tables = self.tables.lock();
        if tables.primary.iter().any(|e| e.user_id == entry.user_id && e.is_open()) {
            return Err(PharmaClockError::Database(
                "duplicate key value violates unique constraint \"one_open_entry_per_user\""
                    .to_string(),
            ));
        }
        let stored = TimeEntry {
            id: Uuid::new_v4(),
            user_id: entry.user_id,
            branch_id: entry.branch_id,
            clock_in_time: entry.clock_in_time,
            clock_out_time: None,
            clock_in_location: entry.clock_in_location,
            clock_in_accuracy_meters: entry.clock_in_accuracy_meters,
            clock_out_location: None,
            total_hours: None,
            notes: entry.notes,
            location_exception: entry.location_exception,
        };
        tables.primary.push(stored.clone());
        self.after_write(&mut tables);
        Ok(stored)
    }

    async fn clock_out(&self, entry_id: Uuid, request: ClockOutRequest) -> DomainResult<TimeEntry> {
        self.check_write()?;
        self.clock_outs.lock().push((entry_id, request.clone()));

        let mut tables = self.tables.lock();
        let entry = tables
            .primary
            .iter_mut()
            .find(|e| e.id == entry_id)
            .ok_or_else(|| PharmaClockError::NotFound(format!("time entry {entry_id}")))?;
        entry.clock_out_time = Some(request.clock_out_time);
        entry.clock_out_location = Some(request.clock_out_location);
        entry.total_hours = Some(total_hours_between(request.clock_in_time, request.clock_out_time));
        let closed = entry.clone();
        self.after_write(&mut tables);
        Ok(closed)
    }
}

/// Fixed branch geofences, counting lookups.
#[derive(Default)]
pub struct StaticBranches {
    locations: HashMap<Uuid, BranchLocation>,
    fetches: AtomicU32,
}

impl StaticBranches {
    pub fn new(locations: impl IntoIterator<Item = BranchLocation>) -> Self {
        Self {
            locations: locations.into_iter().map(|l| (l.branch_id, l)).collect(),
            fetches: AtomicU32::new(0),
        }
    }

    pub fn fetch_count(&self) -> u32 {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BranchLocationStore for StaticBranches {
    async fn fetch_branch_location(&self, branch_id: Uuid) -> DomainResult<Option<BranchLocation>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self.locations.get(&branch_id).cloned())
    }
}

/// Directory holding at most one profile.
pub struct StaticDirectory {
    profile: Option<EmployeeProfile>,
}

impl StaticDirectory {
    pub fn new(profile: Option<EmployeeProfile>) -> Self {
        Self { profile }
    }
}

#[async_trait]
impl EmployeeDirectory for StaticDirectory {
    async fn fetch_profile(&self, user_id: Uuid) -> DomainResult<Option<EmployeeProfile>> {
        Ok(self.profile.clone().filter(|p| p.user_id == user_id))
    }
}

/// In-memory break table.
#[derive(Default)]
pub struct InMemoryBreakStore {
    sessions: Mutex<Vec<BreakSession>>,
    write_error: Mutex<Option<PharmaClockError>>,
}

impl InMemoryBreakStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_writes_with(&self, error: PharmaClockError) {
        *self.write_error.lock() = Some(error);
    }

    pub fn sessions(&self) -> Vec<BreakSession> {
        self.sessions.lock().clone()
    }
}

#[async_trait]
impl BreakStore for InMemoryBreakStore {
    async fn active_break(&self, time_entry_id: Uuid) -> DomainResult<Option<BreakSession>> {
        Ok(self
            .sessions
            .lock()
            .iter()
            .find(|s| s.time_entry_id == time_entry_id && s.is_active())
            .cloned())
    }

    async fn start_break(&self, time_entry_id: Uuid, at: DateTime<Utc>) -> DomainResult<BreakSession> {
        if let Some(err) = self.write_error.lock().clone() {
            return Err(err);
        }
        let session = BreakSession { id: Uuid::new_v4(), time_entry_id, started_at: at, ended_at: None };
        self.sessions.lock().push(session.clone());
        Ok(session)
    }

    async fn end_break(&self, break_id: Uuid, at: DateTime<Utc>) -> DomainResult<BreakSession> {
        if let Some(err) = self.write_error.lock().clone() {
            return Err(err);
        }
        let mut sessions = self.sessions.lock();
        let session = sessions
            .iter_mut()
            .find(|s| s.id == break_id)
            .ok_or_else(|| PharmaClockError::NotFound(format!("break {break_id}")))?;
        session.ended_at = Some(at);
        Ok(session.clone())
    }
}

//! `time_entries` table adapter

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pharmaclock_core::TimeEntryStore;
use pharmaclock_domain::{
    total_hours_between, ClockOutRequest, GeoPoint, NewTimeEntry, PharmaClockError, Result,
    TimeEntry,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::client::{eq, RestClient};

const TABLE: &str = "time_entries";
const IS_NULL: &str = "is.null";

/// Row shape of `time_entries`; coordinates are stored as flat columns
#[derive(Debug, Clone, Deserialize)]
struct TimeEntryRow {
    id: Uuid,
    user_id: Uuid,
    branch_id: Uuid,
    clock_in_time: DateTime<Utc>,
    #[serde(default)]
    clock_out_time: Option<DateTime<Utc>>,
    clock_in_latitude: f64,
    clock_in_longitude: f64,
    #[serde(default)]
    clock_in_accuracy: Option<f64>,
    #[serde(default)]
    clock_out_latitude: Option<f64>,
    #[serde(default)]
    clock_out_longitude: Option<f64>,
    #[serde(default)]
    total_hours: Option<f64>,
    #[serde(default)]
    notes: Option<String>,
    #[serde(default)]
    location_exception: bool,
}

impl From<TimeEntryRow> for TimeEntry {
    fn from(row: TimeEntryRow) -> Self {
        let clock_out_location = match (row.clock_out_latitude, row.clock_out_longitude) {
            (Some(latitude), Some(longitude)) => Some(GeoPoint::new(latitude, longitude)),
            _ => None,
        };
        Self {
            id: row.id,
            user_id: row.user_id,
            branch_id: row.branch_id,
            clock_in_time: row.clock_in_time,
            clock_out_time: row.clock_out_time,
            clock_in_location: GeoPoint::new(row.clock_in_latitude, row.clock_in_longitude),
            clock_in_accuracy_meters: row.clock_in_accuracy,
            clock_out_location,
            total_hours: row.total_hours,
            notes: row.notes,
            location_exception: row.location_exception,
        }
    }
}

#[derive(Debug, Serialize)]
struct InsertRow<'a> {
    user_id: Uuid,
    branch_id: Uuid,
    clock_in_time: DateTime<Utc>,
    clock_in_latitude: f64,
    clock_in_longitude: f64,
    clock_in_accuracy: Option<f64>,
    notes: Option<&'a str>,
    location_exception: bool,
}

impl<'a> From<&'a NewTimeEntry> for InsertRow<'a> {
    fn from(entry: &'a NewTimeEntry) -> Self {
        Self {
            user_id: entry.user_id,
            branch_id: entry.branch_id,
            clock_in_time: entry.clock_in_time,
            clock_in_latitude: entry.clock_in_location.latitude,
            clock_in_longitude: entry.clock_in_location.longitude,
            clock_in_accuracy: entry.clock_in_accuracy_meters,
            notes: entry.notes.as_deref(),
            location_exception: entry.location_exception,
        }
    }
}

#[derive(Debug, Serialize)]
struct ClockOutPatch {
    clock_out_time: DateTime<Utc>,
    clock_out_latitude: f64,
    clock_out_longitude: f64,
    total_hours: f64,
}

/// PostgREST-backed time entry store
#[derive(Clone)]
pub struct RestTimeEntryStore {
    client: RestClient,
}

impl RestTimeEntryStore {
    pub fn new(client: RestClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TimeEntryStore for RestTimeEntryStore {
    #[instrument(skip(self))]
    async fn fetch_open_entry(&self, user_id: Uuid) -> Result<Option<TimeEntry>> {
        let rows: Vec<TimeEntryRow> = self
            .client
            .select(
                TABLE,
                &[
                    ("select", "*".to_string()),
                    ("user_id", eq(user_id)),
                    ("clock_out_time", IS_NULL.to_string()),
                    ("order", "clock_in_time.desc".to_string()),
                    ("limit", "1".to_string()),
                ],
            )
            .await?;
        Ok(rows.into_iter().next().map(TimeEntry::from))
    }

    #[instrument(skip(self, entry), fields(user_id = %entry.user_id, branch_id = %entry.branch_id))]
    async fn insert_entry(&self, entry: NewTimeEntry) -> Result<TimeEntry> {
        let row: TimeEntryRow = self.client.insert(TABLE, &[InsertRow::from(&entry)]).await?;
        info!(entry_id = %row.id, location_exception = row.location_exception, "time entry opened");
        Ok(row.into())
    }

    #[instrument(skip(self, request))]
    async fn clock_out(&self, entry_id: Uuid, request: ClockOutRequest) -> Result<TimeEntry> {
        // Computed from the caller's copy of the entry; a replica read here
        // could miss a row the primary already holds.
        let total_hours = total_hours_between(request.clock_in_time, request.clock_out_time);
        debug!(total_hours, accuracy = ?request.clock_out_accuracy_meters, "closing time entry");

        let patch = ClockOutPatch {
            clock_out_time: request.clock_out_time,
            clock_out_latitude: request.clock_out_location.latitude,
            clock_out_longitude: request.clock_out_location.longitude,
            total_hours,
        };
        let rows: Vec<TimeEntryRow> = self
            .client
            .update(
                TABLE,
                &[("id", eq(entry_id)), ("clock_out_time", IS_NULL.to_string())],
                &patch,
            )
            .await?;

        let row = rows.into_iter().next().ok_or_else(|| {
            PharmaClockError::NotFound(format!("open time entry {entry_id} not found"))
        })?;
        info!(%entry_id, total_hours, "time entry closed");
        Ok(row.into())
    }
}

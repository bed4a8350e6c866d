//! `break_sessions` table adapter
//!
//! Older deployments have no `break_sessions` table; the client maps the
//! missing relation to `FeatureUnavailable`, which passes through unchanged.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pharmaclock_core::BreakStore;
use pharmaclock_domain::{BreakSession, PharmaClockError, Result};
use serde::Serialize;
use tracing::{info, instrument};
use uuid::Uuid;

use super::client::{eq, RestClient};

const TABLE: &str = "break_sessions";

#[derive(Debug, Serialize)]
struct StartBreakRow {
    time_entry_id: Uuid,
    started_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
struct EndBreakPatch {
    ended_at: DateTime<Utc>,
}

/// PostgREST-backed break sessions
#[derive(Clone)]
pub struct RestBreakStore {
    client: RestClient,
}

impl RestBreakStore {
    pub fn new(client: RestClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl BreakStore for RestBreakStore {
    #[instrument(skip(self))]
    async fn active_break(&self, time_entry_id: Uuid) -> Result<Option<BreakSession>> {
        let rows: Vec<BreakSession> = self
            .client
            .select(
                TABLE,
                &[
                    ("select", "*".to_string()),
                    ("time_entry_id", eq(time_entry_id)),
                    ("ended_at", "is.null".to_string()),
                    ("order", "started_at.desc".to_string()),
                    ("limit", "1".to_string()),
                ],
            )
            .await?;
        Ok(rows.into_iter().next())
    }

    #[instrument(skip(self))]
    async fn start_break(&self, time_entry_id: Uuid, at: DateTime<Utc>) -> Result<BreakSession> {
        let session: BreakSession =
            self.client.insert(TABLE, &[StartBreakRow { time_entry_id, started_at: at }]).await?;
        info!(break_id = %session.id, "break started");
        Ok(session)
    }

    #[instrument(skip(self))]
    async fn end_break(&self, break_id: Uuid, at: DateTime<Utc>) -> Result<BreakSession> {
        let rows: Vec<BreakSession> = self
            .client
            .update(
                TABLE,
                &[("id", eq(break_id)), ("ended_at", "is.null".to_string())],
                &EndBreakPatch { ended_at: at },
            )
            .await?;
        let session = rows
            .into_iter()
            .next()
            .ok_or_else(|| PharmaClockError::NotFound(format!("active break {break_id} not found")))?;
        info!(%break_id, "break ended");
        Ok(session)
    }
}

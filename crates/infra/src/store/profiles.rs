//! `profiles` table adapter

use async_trait::async_trait;
use pharmaclock_core::EmployeeDirectory;
use pharmaclock_domain::{EmployeeProfile, Result};
use serde::Deserialize;
use tracing::instrument;
use uuid::Uuid;

use super::client::{eq, RestClient};

const TABLE: &str = "profiles";

#[derive(Debug, Deserialize)]
struct ProfileRow {
    id: Uuid,
    #[serde(default)]
    full_name: Option<String>,
    #[serde(default)]
    branch_id: Option<Uuid>,
}

impl From<ProfileRow> for EmployeeProfile {
    fn from(row: ProfileRow) -> Self {
        Self { user_id: row.id, full_name: row.full_name.unwrap_or_default(), branch_id: row.branch_id }
    }
}

/// PostgREST-backed employee profile lookup
#[derive(Clone)]
pub struct RestEmployeeDirectory {
    client: RestClient,
}

impl RestEmployeeDirectory {
    pub fn new(client: RestClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl EmployeeDirectory for RestEmployeeDirectory {
    #[instrument(skip(self))]
    async fn fetch_profile(&self, user_id: Uuid) -> Result<Option<EmployeeProfile>> {
        let rows: Vec<ProfileRow> = self
            .client
            .select(
                TABLE,
                &[("select", "id,full_name,branch_id".to_string()), ("id", eq(user_id))],
            )
            .await?;
        Ok(rows.into_iter().next().map(EmployeeProfile::from))
    }
}

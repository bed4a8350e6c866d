//! `branch_locations` table adapter

use async_trait::async_trait;
use pharmaclock_core::BranchLocationStore;
use pharmaclock_domain::{BranchLocation, Result};
use serde::Deserialize;
use tracing::instrument;
use uuid::Uuid;

use super::client::{eq, RestClient};

const TABLE: &str = "branch_locations";

#[derive(Debug, Deserialize)]
struct BranchLocationRow {
    branch_id: Uuid,
    latitude: f64,
    longitude: f64,
    radius_meters: f64,
}

impl From<BranchLocationRow> for BranchLocation {
    fn from(row: BranchLocationRow) -> Self {
        Self {
            branch_id: row.branch_id,
            latitude: row.latitude,
            longitude: row.longitude,
            allowed_radius_meters: row.radius_meters,
        }
    }
}

/// PostgREST-backed branch geofence lookup
#[derive(Clone)]
pub struct RestBranchLocationStore {
    client: RestClient,
}

impl RestBranchLocationStore {
    pub fn new(client: RestClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl BranchLocationStore for RestBranchLocationStore {
    #[instrument(skip(self))]
    async fn fetch_branch_location(&self, branch_id: Uuid) -> Result<Option<BranchLocation>> {
        let rows: Vec<BranchLocationRow> = self
            .client
            .select(
                TABLE,
                &[
                    ("select", "branch_id,latitude,longitude,radius_meters".to_string()),
                    ("branch_id", eq(branch_id)),
                    ("limit", "1".to_string()),
                ],
            )
            .await?;
        Ok(rows.into_iter().next().map(BranchLocation::from))
    }
}

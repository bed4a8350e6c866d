#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use pharmaclock_domain::StoreConfig;
use pharmaclock_infra::RestClient;
use serde_json::{json, Value};
use uuid::Uuid;
use wiremock::MockServer;

pub const ANON_KEY: &str = "anon-test-key";

/// Store settings pointing at a mock server
pub fn store_config(server: &MockServer) -> StoreConfig {
    StoreConfig {
        url: server.uri(),
        api_key: ANON_KEY.to_string(),
        access_token: None,
        timeout_secs: 5,
    }
}

/// Start a mock PostgREST server and a client bound to it.
pub async fn rest_store() -> (MockServer, RestClient) {
    let server = MockServer::start().await;
    let client = RestClient::new(&store_config(&server)).expect("rest client should build");
    (server, client)
}

pub fn start_of_shift() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 4, 8, 0, 0).unwrap()
}

/// A `time_entries` row as PostgREST returns it
pub fn entry_row(
    id: Uuid,
    user_id: Uuid,
    branch_id: Uuid,
    clock_in: DateTime<Utc>,
    clock_out: Option<DateTime<Utc>>,
) -> Value {
    json!({
        "id": id,
        "user_id": user_id,
        "branch_id": branch_id,
        "clock_in_time": clock_in,
        "clock_out_time": clock_out,
        "clock_in_latitude": 14.5995,
        "clock_in_longitude": 120.9842,
        "clock_in_accuracy": 12.0,
        "clock_out_latitude": clock_out.map(|_| 14.5996),
        "clock_out_longitude": clock_out.map(|_| 120.9842),
        "total_hours": null,
        "notes": null,
        "location_exception": false
    })
}

/// Parse the JSON body of a recorded request
pub fn json_body(request: &wiremock::Request) -> Value {
    serde_json::from_slice(&request.body).expect("request body should be JSON")
}

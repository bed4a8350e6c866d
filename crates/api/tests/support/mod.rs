//! Shared fixtures for the app integration tests

#![allow(dead_code)]

pub mod fakes;

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use pharmaclock_domain::{
    Config, EmployeeConfig, LocationConfig, LoggingConfig, PermissionState, RefreshConfig,
    StoreConfig,
};
use pharmaclock_lib::{AppContext, TerminalConfirmer};
use serde_json::{json, Value};
use uuid::Uuid;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const BRANCH_LAT: f64 = 14.5995;
pub const BRANCH_LON: f64 = 120.9842;

pub fn start_of_shift() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 4, 8, 0, 0).unwrap()
}

/// Employee standing at `latitude` on the branch meridian, with permission
/// granted and a one-millisecond refresh step.
pub fn config_at(server: &MockServer, user_id: Uuid, latitude: f64) -> Config {
    config_for(server.uri(), user_id, latitude)
}

pub fn config_for(url: String, user_id: Uuid, latitude: f64) -> Config {
    Config {
        store: StoreConfig {
            url,
            api_key: "anon-test-key".to_string(),
            access_token: None,
            timeout_secs: 5,
        },
        employee: EmployeeConfig { user_id },
        location: LocationConfig {
            latitude: Some(latitude),
            longitude: Some(BRANCH_LON),
            accuracy_meters: Some(12.0),
            permission: PermissionState::Granted,
            ..LocationConfig::default()
        },
        refresh: RefreshConfig { max_attempts: 3, step_ms: 1 },
        logging: LoggingConfig::default(),
    }
}

/// Context wired exactly as the binary wires it, answering yes to prompts.
pub fn context(config: Config) -> AppContext {
    AppContext::new(config, Arc::new(TerminalConfirmer::new(true)))
        .expect("context should build")
}

/// Mount the profile and branch rows for an employee assigned to a branch
/// with a 50 m radius.
pub async fn mount_assignment(server: &MockServer, user_id: Uuid, branch_id: Uuid) {
    Mock::given(method("GET"))
        .and(path("/rest/v1/profiles"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": user_id, "full_name": "Maria Santos", "branch_id": branch_id
        }])))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/branch_locations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "branch_id": branch_id,
            "latitude": BRANCH_LAT,
            "longitude": BRANCH_LON,
            "radius_meters": 50
        }])))
        .mount(server)
        .await;
}

/// A `time_entries` row as the store returns it
pub fn entry_row(id: Uuid, user_id: Uuid, branch_id: Uuid, clock_in: DateTime<Utc>) -> Value {
    json!({
        "id": id,
        "user_id": user_id,
        "branch_id": branch_id,
        "clock_in_time": clock_in,
        "clock_out_time": null,
        "clock_in_latitude": BRANCH_LAT,
        "clock_in_longitude": BRANCH_LON,
        "clock_in_accuracy": 12.0,
        "clock_out_latitude": null,
        "clock_out_longitude": null,
        "total_hours": null,
        "notes": null,
        "location_exception": false
    })
}

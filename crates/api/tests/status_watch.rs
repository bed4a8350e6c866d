//! Live working-time display on paused tokio time

mod support;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::Duration as ChronoDuration;
use pharmaclock_common::testing::MockClock;
use pharmaclock_domain::{Config, GeoPoint, TimeEntry};
use pharmaclock_lib::commands::status;
use pharmaclock_lib::AppContext;
use uuid::Uuid;

use support::fakes::controller;
use support::{config_for, start_of_shift, BRANCH_LAT};

// The fakes never touch the network.
fn config(user_id: Uuid) -> Config {
    config_for("http://127.0.0.1:9".to_string(), user_id, BRANCH_LAT)
}

fn open_entry(user_id: Uuid) -> TimeEntry {
    TimeEntry {
        id: Uuid::new_v4(),
        user_id,
        branch_id: Uuid::new_v4(),
        clock_in_time: start_of_shift(),
        clock_out_time: None,
        clock_in_location: GeoPoint::new(BRANCH_LAT, 120.9842),
        clock_in_accuracy_meters: Some(8.0),
        clock_out_location: None,
        total_hours: None,
        notes: None,
        location_exception: false,
    }
}

fn collector() -> (Arc<Mutex<Vec<String>>>, impl FnMut(String) + Send + 'static) {
    let lines = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&lines);
    (lines, move |line| sink.lock().unwrap().push(line))
}

#[tokio::test(start_paused = true)]
async fn test_watch_emits_every_minute_until_shutdown() {
    let user_id = Uuid::new_v4();
    let clock = MockClock::at(start_of_shift() + ChronoDuration::minutes(150));
    let ctx = AppContext::from_parts(
        config(user_id),
        controller(user_id, Some(open_entry(user_id)), clock),
    );

    let (lines, emit) = collector();
    status::watch(&ctx, emit, tokio::time::sleep(Duration::from_secs(150))).await.unwrap();

    let lines = lines.lock().unwrap().clone();
    assert_eq!(lines.len(), 3, "{lines:?}");
    assert!(lines[0].starts_with("Maria Santos\nClocked in since"));
    assert!(lines[0].ends_with("(2h 30m worked)"));
    assert_eq!(&lines[1..], ["Worked: 2h 30m", "Worked: 2h 30m"]);
}

#[tokio::test(start_paused = true)]
async fn test_watch_returns_immediately_when_clocked_out() {
    let user_id = Uuid::new_v4();
    let ctx = AppContext::from_parts(
        config(user_id),
        controller(user_id, None, MockClock::at(start_of_shift())),
    );

    let (lines, emit) = collector();
    status::watch(&ctx, emit, std::future::pending::<()>()).await.unwrap();

    assert_eq!(lines.lock().unwrap().as_slice(), ["Maria Santos\nClocked out"]);
}

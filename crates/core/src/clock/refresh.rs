//! Post-mutation refresh of the authoritative open entry
//!
//! The store serves reads from a replica that may lag the primary by a few
//! seconds. After a write, the controller re-reads the open entry until the
//! replica reflects the write or the attempts run out.

use std::sync::Arc;
use std::time::Duration;

use pharmaclock_common::{retry_bounded, BackoffStrategy, RetryConfig, Sleeper};
use pharmaclock_domain::constants::{REFRESH_MAX_ATTEMPTS, REFRESH_STEP_MS};
use pharmaclock_domain::{PharmaClockError, RefreshConfig, TimeEntry};
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use super::ports::TimeEntryStore;

/// Linear refresh schedule: wait `step`, `2 x step`, ... before each read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshPolicy {
    config: RetryConfig,
}

impl RefreshPolicy {
    /// `max_attempts` is clamped to at least one read.
    pub fn new(max_attempts: u32, step: Duration) -> Self {
        Self {
            config: RetryConfig {
                max_attempts: max_attempts.max(1),
                backoff: BackoffStrategy::Linear { initial_delay: step, increment: step },
                delay_first_attempt: true,
            },
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.config.max_attempts
    }

    /// Delay before the given zero-based read
    pub fn delay_before(&self, attempt: u32) -> Duration {
        self.config.delay_before(attempt)
    }
}

impl Default for RefreshPolicy {
    fn default() -> Self {
        Self::new(REFRESH_MAX_ATTEMPTS, Duration::from_millis(REFRESH_STEP_MS))
    }
}

impl From<&RefreshConfig> for RefreshPolicy {
    fn from(config: &RefreshConfig) -> Self {
        Self::new(config.max_attempts, Duration::from_millis(config.step_ms))
    }
}

/// What the replica should show once it has caught up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Expectation {
    /// The entry just inserted is the open entry
    Open(Uuid),
    /// The entry just closed is no longer open
    Closed(Uuid),
}

impl Expectation {
    fn is_met_by(&self, open: Option<&TimeEntry>) -> bool {
        match (self, open) {
            (Self::Open(id), Some(entry)) => entry.id == *id,
            (Self::Open(_), None) => false,
            (Self::Closed(id), Some(entry)) => entry.id != *id,
            (Self::Closed(_), None) => true,
        }
    }
}

#[derive(Debug)]
enum RefreshError {
    Stale,
    Store(PharmaClockError),
}

/// Summary of one refresh run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reconciliation {
    /// Reads performed, never more than the policy's maximum
    pub attempts: u32,
    /// Whether the replica reflected the write before attempts ran out
    pub reconciled: bool,
}

/// Re-read the open entry until it matches `expectation`.
///
/// The returned entry is authoritative only when `reconciled` is set; on
/// exhaustion the caller keeps its optimistic state.
#[instrument(skip(store, policy, sleeper), fields(max_attempts = policy.max_attempts()))]
pub(crate) async fn refresh_open_entry(
    store: &Arc<dyn TimeEntryStore>,
    user_id: Uuid,
    expectation: Expectation,
    policy: &RefreshPolicy,
    sleeper: &dyn Sleeper,
) -> (Reconciliation, Option<TimeEntry>) {
    let outcome = retry_bounded(
        policy.max_attempts(),
        |attempt| policy.delay_before(attempt),
        sleeper,
        || {
            let store = Arc::clone(store);
            async move {
                let open = store.fetch_open_entry(user_id).await.map_err(RefreshError::Store)?;
                if expectation.is_met_by(open.as_ref()) {
                    Ok::<_, RefreshError>(open)
                } else {
                    Err(RefreshError::Stale)
                }
            }
        },
    )
    .await;

    let attempts = outcome.attempts;
    match outcome.result {
        Ok(open) => {
            debug!(attempts, "open entry reconciled");
            (Reconciliation { attempts, reconciled: true }, open)
        }
        Err(err) => {
            match err.into_last_error() {
                Some(RefreshError::Store(store_error)) => warn!(
                    attempts,
                    error = %store_error,
                    "open entry read failed, keeping local state"
                ),
                Some(RefreshError::Stale) | None => warn!(
                    attempts,
                    "replica still stale, keeping local state"
                ),
            }
            (Reconciliation { attempts, reconciled: false }, None)
        }
    }
}

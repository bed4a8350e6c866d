//! Clock state, breaks and working time

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Where a user stands, derived from the open entry and active break
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClockState {
    #[default]
    ClockedOut,
    ClockedIn,
    OnBreak,
}

impl ClockState {
    /// Derive the state from whether an entry is open and a break is running
    pub fn derive(has_open_entry: bool, has_active_break: bool) -> Self {
        match (has_open_entry, has_active_break) {
            (false, _) => Self::ClockedOut,
            (true, false) => Self::ClockedIn,
            (true, true) => Self::OnBreak,
        }
    }

    pub fn is_clocked_in(&self) -> bool {
        !matches!(self, Self::ClockedOut)
    }
}

impl fmt::Display for ClockState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ClockedOut => write!(f, "CLOCKED_OUT"),
            Self::ClockedIn => write!(f, "CLOCKED_IN"),
            Self::OnBreak => write!(f, "ON_BREAK"),
        }
    }
}

/// A break within an open time entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakSession {
    pub id: Uuid,
    pub time_entry_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
}

impl BreakSession {
    pub fn is_active(&self) -> bool {
        self.ended_at.is_none()
    }
}

/// Whole minutes worked since clock-in
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct WorkingTime {
    minutes: u64,
}

impl WorkingTime {
    pub fn from_minutes(minutes: u64) -> Self {
        Self { minutes }
    }

    /// Elapsed time between `clock_in` and `now`, clamped at zero.
    ///
    /// Partial minutes are dropped so the display only ever advances.
    pub fn between(clock_in: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        let minutes = (now - clock_in).num_minutes().max(0);
        Self { minutes: u64::try_from(minutes).unwrap_or_default() }
    }

    pub fn total_minutes(&self) -> u64 {
        self.minutes
    }

    pub fn hours(&self) -> u64 {
        self.minutes / 60
    }

    /// Minutes past the last full hour
    pub fn minutes(&self) -> u64 {
        self.minutes % 60
    }
}

impl fmt::Display for WorkingTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}h {:02}m", self.hours(), self.minutes())
    }
}

//! Status and live working-time display

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local, Utc};
use pharmaclock_common::time::spawn_ticker;
use pharmaclock_core::{ClockController, ClockError};
use pharmaclock_domain::constants::WORKING_TIME_TICK_SECS;
use pharmaclock_domain::{ClockState, WorkingTime};
use serde::Serialize;

use crate::context::AppContext;

/// Snapshot of the employee's clock
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusView {
    pub state: ClockState,
    pub employee: Option<String>,
    pub clock_in_time: Option<DateTime<Utc>>,
    pub worked: Option<WorkingTime>,
    pub break_started: Option<DateTime<Utc>>,
}

impl StatusView {
    pub fn capture(controller: &ClockController) -> Self {
        Self {
            state: controller.state(),
            employee: controller.profile().map(|p| p.full_name).filter(|n| !n.is_empty()),
            clock_in_time: controller.open_entry().map(|e| e.clock_in_time),
            worked: controller.working_time(),
            break_started: controller.active_break().map(|b| b.started_at),
        }
    }
}

impl fmt::Display for StatusView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = &self.employee {
            writeln!(f, "{name}")?;
        }
        match self.state {
            ClockState::ClockedOut => write!(f, "Clocked out"),
            ClockState::ClockedIn | ClockState::OnBreak => {
                write!(f, "Clocked in")?;
                if let Some(at) = self.clock_in_time {
                    write!(f, " since {}", local_time(at))?;
                }
                if let Some(worked) = self.worked {
                    write!(f, " ({worked} worked)")?;
                }
                if let Some(at) = self.break_started {
                    write!(f, "\nOn break since {}", local_time(at))?;
                }
                Ok(())
            }
        }
    }
}

fn local_time(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%H:%M").to_string()
}

pub async fn status(ctx: &AppContext) -> Result<StatusView, ClockError> {
    ctx.controller.load().await?;
    Ok(StatusView::capture(&ctx.controller))
}

/// Print the status once, then the working time every minute until
/// `shutdown` resolves.
pub async fn watch<F, S>(ctx: &AppContext, mut emit: F, shutdown: S) -> Result<(), ClockError>
where
    F: FnMut(String) + Send + 'static,
    S: Future<Output = ()>,
{
    let view = status(ctx).await?;
    emit(view.to_string());
    if view.state == ClockState::ClockedOut {
        return Ok(());
    }

    let controller = Arc::clone(&ctx.controller);
    let ticker = spawn_ticker(Duration::from_secs(WORKING_TIME_TICK_SECS), move |tick| {
        // tick 0 fires immediately and is already covered by the snapshot
        if tick == 0 {
            return;
        }
        if let Some(worked) = controller.working_time() {
            emit(format!("Worked: {worked}"));
        }
    });

    shutdown.await;
    ticker.shutdown().await;
    Ok(())
}

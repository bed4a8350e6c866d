//! Clock-in, clock-out and break commands

use chrono::{DateTime, Local, Utc};
use pharmaclock_core::{work_location_message, ClockError, ClockOutcome, TransitionReport};
use pharmaclock_domain::WorkingTime;

use crate::context::AppContext;

const UNCONFIRMED: &str =
    "The server has not confirmed this yet; run `pharmaclock status` in a moment.";

pub async fn clock_in(ctx: &AppContext, notes: Option<String>) -> Result<String, ClockError> {
    let outcome = ctx.controller.clock_in(notes).await?;
    Ok(match outcome {
        ClockOutcome::Cancelled(reason) => format!("Clock-in cancelled: {reason}."),
        ClockOutcome::Completed(report) => {
            let mut lines = Vec::new();
            let at = report.entry.as_ref().map(|e| e.clock_in_time);
            lines.push(format!("Clocked in{}.", at_time(at)));
            if let Some(check) = &report.location {
                lines.push(work_location_message(check));
            }
            if report.location_exception {
                lines.push("Recorded as a location exception.".to_string());
            }
            push_refresh_note(&report, &mut lines);
            lines.join("\n")
        }
    })
}

pub async fn clock_out(ctx: &AppContext) -> Result<String, ClockError> {
    let outcome = ctx.controller.clock_out().await?;
    Ok(match outcome {
        ClockOutcome::Cancelled(reason) => format!("Clock-out cancelled: {reason}."),
        ClockOutcome::Completed(report) => {
            let mut lines = Vec::new();
            let at = report.entry.as_ref().and_then(|e| e.clock_out_time);
            lines.push(format!("Clocked out{}.", at_time(at)));
            if let Some(hours) = report.entry.as_ref().and_then(|e| e.total_hours) {
                lines.push(format!("Total: {hours:.2} h"));
            }
            if !report.location_verified {
                lines.push("No location was recorded for this clock-out.".to_string());
            }
            push_refresh_note(&report, &mut lines);
            lines.join("\n")
        }
    })
}

pub async fn start_break(ctx: &AppContext) -> Result<String, ClockError> {
    let report = ctx.controller.start_break().await?;
    let at = report.break_session.as_ref().map(|b| b.started_at);
    Ok(format!("Break started{}.", at_time(at)))
}

pub async fn end_break(ctx: &AppContext) -> Result<String, ClockError> {
    let report = ctx.controller.end_break().await?;
    let length = report
        .break_session
        .as_ref()
        .and_then(|b| b.ended_at.map(|end| WorkingTime::between(b.started_at, end)));
    Ok(match length {
        Some(length) => format!("Break ended after {length}."),
        None => "Break ended.".to_string(),
    })
}

fn push_refresh_note(report: &TransitionReport, lines: &mut Vec<String>) {
    if report.refresh.is_some_and(|r| !r.reconciled) {
        lines.push(UNCONFIRMED.to_string());
    }
}

fn at_time(at: Option<DateTime<Utc>>) -> String {
    at.map(|t| format!(" at {}", t.with_timezone(&Local).format("%H:%M"))).unwrap_or_default()
}

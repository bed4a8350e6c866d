//! Command handlers - CLI to controller bridge
//!
//! Handlers return the text to print; errors stay typed so the binary can
//! show [`ClockError::user_message`] and pick an exit code.

pub mod clock;
pub mod location;
pub mod status;

use std::time::Instant;

use pharmaclock_core::ClockError;

use crate::cli::{BreakAction, Command};
use crate::context::AppContext;
use crate::utils::logging::{error_label, log_command_execution};

/// Run a one-shot command. `status --watch` is driven by
/// [`status::watch`] instead and reports its current snapshot here.
pub async fn execute(ctx: &AppContext, command: &Command) -> Result<String, ClockError> {
    let start = Instant::now();
    let (name, result) = match command {
        Command::Status { .. } => ("status::status", status::status(ctx).await.map(|v| v.to_string())),
        Command::In { notes } => ("clock::clock_in", clock::clock_in(ctx, notes.clone()).await),
        Command::Out => ("clock::clock_out", clock::clock_out(ctx).await),
        Command::Break { action: BreakAction::Start } => {
            ("clock::start_break", clock::start_break(ctx).await)
        }
        Command::Break { action: BreakAction::End } => {
            ("clock::end_break", clock::end_break(ctx).await)
        }
        Command::Locate => ("location::locate", location::locate(ctx).await),
    };

    log_command_execution(name, start.elapsed(), result.as_ref().err().map(error_label));
    result
}

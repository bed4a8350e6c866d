//! Recurring, cancellable ticks
//!
//! Drives periodic recomputation such as the live working-time display. The
//! returned [`TickerHandle`] owns the background task: cancelling it, or
//! simply dropping it when the owning view is torn down, stops the ticks.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Handle to a running ticker. Dropping it cancels the ticker.
#[derive(Debug)]
pub struct TickerHandle {
    token: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl TickerHandle {
    /// Cancel the ticker
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Check if the ticker has been cancelled
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Cancel the ticker and wait for its task to finish.
    pub async fn shutdown(mut self) {
        self.token.cancel();
        if let Some(task) = self.task.take() {
            if let Err(err) = task.await {
                debug!(error = %err, "ticker task ended abnormally");
            }
        }
    }
}

impl Drop for TickerHandle {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

/// Invoke `on_tick` immediately and then every `period` until the returned
/// handle is cancelled or dropped.
///
/// The callback receives the zero-based tick number. Missed ticks (for
/// example after the process was suspended) are skipped rather than
/// replayed in a burst.
pub fn spawn_ticker<F>(period: Duration, mut on_tick: F) -> TickerHandle
where
    F: FnMut(u64) + Send + 'static,
{
    let token = CancellationToken::new();
    let child = token.child_token();

    let task = tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut tick: u64 = 0;

        loop {
            tokio::select! {
                () = child.cancelled() => {
                    debug!(ticks = tick, "ticker cancelled");
                    break;
                }
                _ = interval.tick() => {
                    on_tick(tick);
                    tick += 1;
                }
            }
        }
    });

    TickerHandle { token, task: Some(task) }
}

//! Sleeper that records requested delays instead of waiting

use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::resilience::Sleeper;

/// Records every delay it is asked to sleep and returns immediately.
#[derive(Debug, Default)]
pub struct RecordingSleeper {
    delays: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delays requested so far, in call order
    pub fn recorded(&self) -> Vec<Duration> {
        self.delays.lock().clone()
    }

    /// Sum of all requested delays
    pub fn total(&self) -> Duration {
        self.delays.lock().iter().sum()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.delays.lock().push(duration);
    }
}

//! Terminal implementation of [`ConfirmationPort`]
//!
//! Prompts go to stderr so stdout carries only command output. Anything but
//! an explicit yes, including a closed stdin, counts as no.

use std::io::{BufRead, Write};

use async_trait::async_trait;
use pharmaclock_core::{ConfirmationPort, ConfirmationRequest};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalConfirmer {
    assume_yes: bool,
}

impl TerminalConfirmer {
    /// `assume_yes` answers every prompt without reading stdin (`--yes`).
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

#[async_trait]
impl ConfirmationPort for TerminalConfirmer {
    async fn confirm(&self, request: &ConfirmationRequest) -> bool {
        let prompt = request.to_string();
        if self.assume_yes {
            debug!(%prompt, "confirmation assumed");
            return true;
        }

        let answer = tokio::task::spawn_blocking(move || {
            let stderr = std::io::stderr();
            let mut stderr = stderr.lock();
            let _ = write!(stderr, "{prompt} [y/N] ");
            let _ = stderr.flush();

            let mut line = String::new();
            std::io::stdin().lock().read_line(&mut line).map(|_| line)
        })
        .await;

        match answer {
            Ok(Ok(line)) => parse_answer(&line),
            Ok(Err(err)) => {
                warn!(error = %err, "could not read confirmation");
                false
            }
            Err(err) => {
                warn!(error = %err, "confirmation prompt task failed");
                false
            }
        }
    }
}

/// `y`/`yes`, case-insensitive, surrounding whitespace ignored
pub fn parse_answer(line: &str) -> bool {
    matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

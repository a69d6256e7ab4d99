//! Terminal implementations of the confirmation and notification collaborators

use std::io::Write;

use async_trait::async_trait;
use docket_core::{ConfirmPrompt, Notifier};
use tokio::io::{AsyncBufReadExt, BufReader};

/// Asks on stderr and reads the answer from stdin
#[derive(Debug, Clone, Copy)]
pub struct ConsoleConfirm {
    assume_yes: bool,
}

impl ConsoleConfirm {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

/// Whether a typed answer counts as yes
pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

#[async_trait]
impl ConfirmPrompt for ConsoleConfirm {
    async fn confirm(&self, message: &str) -> bool {
        if self.assume_yes {
            tracing::debug!(prompt = message, "confirmed by --yes");
            return true;
        }

        eprint!("{} [y/N] ", message);
        let _ = std::io::stderr().flush();

        let mut line = String::new();
        let mut reader = BufReader::new(tokio::io::stdin());
        match reader.read_line(&mut line).await {
            Ok(_) => is_yes(&line),
            Err(error) => {
                tracing::warn!(%error, "could not read confirmation");
                false
            }
        }
    }
}

/// Writes notifications to stderr
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn show_success(&self, message: &str) {
        eprintln!("{}", message);
    }

    fn show_error(&self, message: &str) {
        eprintln!("error: {}", message);
    }

    fn show_loading(&self, message: &str) {
        tracing::debug!(text = message, "loading");
    }

    fn hide_popup(&self) {}
}

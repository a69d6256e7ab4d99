//! External collaborators consumed by the table and drawer
//!
//! The concrete transport behind these traits (HTTP, RPC, direct database
//! access, a local file) is irrelevant to the table/drawer logic.

use async_trait::async_trait;

use crate::{FormData, Record, RecordId, ServiceResult};

/// Create/read/update/delete operations for one record type
#[async_trait]
pub trait RecordService<R: Record>: Send + Sync {
    /// Load the full collection. All filtering happens client-side.
    async fn fetch_all(&self) -> ServiceResult<Vec<R>>;

    /// Create a record from the submitted payload
    async fn create(&self, payload: &FormData) -> ServiceResult<R>;

    /// Update the record with the given id
    async fn update(&self, id: &RecordId, payload: &FormData) -> ServiceResult<R>;

    /// Delete the record with the given id
    async fn delete(&self, id: &RecordId) -> ServiceResult<()>;
}

/// Yes/no prompt shown before destructive or submitting actions
#[async_trait]
pub trait ConfirmPrompt: Send + Sync {
    /// Returns true when the user accepted
    async fn confirm(&self, message: &str) -> bool;
}

/// User-visible notification sink
pub trait Notifier: Send + Sync {
    fn show_success(&self, message: &str);

    fn show_error(&self, message: &str);

    fn show_loading(&self, message: &str);

    fn hide_popup(&self);
}

/// Prompt that always answers the same way
///
/// Useful for non-interactive callers (e.g. `--yes` on the command line).
#[derive(Debug, Clone, Copy)]
pub struct FixedConfirm(pub bool);

#[async_trait]
impl ConfirmPrompt for FixedConfirm {
    async fn confirm(&self, message: &str) -> bool {
        tracing::debug!(prompt = message, answer = self.0, "auto-answering confirmation");
        self.0
    }
}

/// Notifier that only emits tracing events
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn show_success(&self, message: &str) {
        tracing::info!(text = message, "success");
    }

    fn show_error(&self, message: &str) {
        tracing::warn!(text = message, "error");
    }

    fn show_loading(&self, message: &str) {
        tracing::debug!(text = message, "loading");
    }

    fn hide_popup(&self) {
        tracing::trace!("popup hidden");
    }
}

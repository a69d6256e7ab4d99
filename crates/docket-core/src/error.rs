//! Error types for docket

use thiserror::Error;

use crate::RecordId;

/// Message shown when a service failure carries no text of its own
pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong. Please try again.";

/// Core error type for configuration, parsing and persistence
#[derive(Error, Debug)]
pub enum DocketError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for docket operations
pub type Result<T> = std::result::Result<T, DocketError>;

/// Failure reported by an external record service.
///
/// Every collaborator call returns a `Result`; the table and drawer only
/// inspect the discriminant and the user-facing message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// Business-rule rejection with the service-provided message
    #[error("{0}")]
    Rejected(String),

    /// The record no longer exists (e.g. deleted by another session)
    #[error("Record {0} was not found")]
    NotFound(RecordId),

    /// Network or storage failure
    #[error("{0}")]
    Transport(String),

    /// The submitted payload could not be turned into a record
    #[error("{0}")]
    InvalidPayload(String),

    /// The service gave no detail
    #[error("")]
    Unavailable,
}

impl ServiceError {
    /// Message to surface in a notification, falling back to a generic text
    pub fn user_message(&self) -> String {
        let message = self.to_string();
        if message.trim().is_empty() {
            GENERIC_FAILURE_MESSAGE.to_string()
        } else {
            message
        }
    }
}

impl From<DocketError> for ServiceError {
    fn from(err: DocketError) -> Self {
        match err {
            DocketError::InvalidValue(msg) | DocketError::UnknownField(msg) => {
                ServiceError::InvalidPayload(msg)
            }
            other => ServiceError::Transport(other.to_string()),
        }
    }
}

/// Result type alias for service calls
pub type ServiceResult<T> = std::result::Result<T, ServiceError>;

//! Docket Core - Foundation types and collaborator traits
//!
//! This crate provides the types every other docket crate builds on:
//!
//! - `Value` - A dynamically typed field value
//! - `Record` - Trait for table rows with a stable identity
//! - `FormData` - Field-keyed payload passed to create/update operations
//! - `RecordService`, `ConfirmPrompt`, `Notifier` - External collaborators
//! - `Actor`, `PermissionSet` - Explicit capability checks for row actions

mod error;
mod form;
mod permissions;
mod record;
mod service;
mod types;

pub use error::*;
pub use form::*;
pub use permissions::*;
pub use record::*;
pub use service::*;
pub use types::*;

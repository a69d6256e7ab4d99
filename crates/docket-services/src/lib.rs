//! Docket Services Layer
//!
//! Concrete record services and the view coordinator that sits between a
//! front end (the CLI, or any other surface) and the table/drawer engine.
//!
//! # Architecture
//!
//! ```text
//! Front end (docket-cli)
//!     ↓
//! Service Layer (docket-services) ← This crate
//!     ↓
//! Engine (docket-table, docket-forms)
//!     ↓
//! Foundation (docket-core)
//! ```
//!
//! # Services
//!
//! - [`MemoryStore`] - In-process store with server-side id allocation
//! - [`JsonFileStore`] - `MemoryStore` persisted to a JSON file
//! - [`RecordManager`] - Owns the collection and reconciles CRUD results

mod json_store;
mod memory_store;
mod record_manager;

pub use json_store::JsonFileStore;
pub use memory_store::MemoryStore;
pub use record_manager::{ManagerError, ManagerResult, RecordManager};

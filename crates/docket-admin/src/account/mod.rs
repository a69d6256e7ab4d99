//! Account management module
//!
//! Provides the user account record, role-to-permission mapping and the
//! validation applied before an account is created.

mod service;


pub use service::*;

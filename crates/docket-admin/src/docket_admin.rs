//! Docket Admin - Account administration
//!
//! This crate provides functionality for managing the people who use docket:
//! - User accounts and their table/form configuration
//! - Roles and the permission set each role grants
//! - Account validation before an account is stored

pub mod account;

pub use account::*;

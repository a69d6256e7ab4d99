//! Docket Forms - Field configuration and the CRUD drawer
//!
//! This crate provides:
//! - [`FieldConfig`] declarations for each editable input
//! - [`FormSchema`] defaults, record pre-population and validation
//! - [`Drawer`], the form → review → submit state machine shared by every
//!   record type

pub mod drawer;
mod field;
mod schema;

pub use drawer::*;
pub use field::*;
pub use schema::*;

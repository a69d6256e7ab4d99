//! CRUD drawer
//!
//! A reusable two-step form/review state machine, parameterized by a
//! [`FormSchema`](crate::FormSchema) and the record service it submits to.

mod machine;


pub use machine::*;

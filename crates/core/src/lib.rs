//! Domain layer for the bouquin marketplace: shared types, role constants,
//! catalog and rating validation, pagination math, and the error taxonomy.
//!
//! This crate performs no I/O; the `bouquin-db` and `bouquin-api` crates
//! build on it.

pub mod catalog;
pub mod error;
pub mod pagination;
pub mod rating;
pub mod roles;
pub mod types;

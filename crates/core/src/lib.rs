//! Souq domain core.
//!
//! Pure domain logic shared by the database and API layers: status enums
//! and their state machines, the public visibility gate, inbox merging,
//! the realtime change reducer, and analytics enrichment. Nothing in this
//! crate performs I/O.

pub mod analytics;
pub mod dealership;
pub mod error;
pub mod inbox;
pub mod listing;
pub mod pagination;
pub mod realtime;
pub mod roles;
mod status;
pub mod types;
pub mod validation;

//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - `Deserialize` + `Validate` request DTOs for inserts and patches

pub mod admin_log;
pub mod car;
pub mod catalog;
pub mod contact_message;
pub mod country;
pub mod dashboard;
pub mod dealership;
pub mod notification;
pub mod profile;

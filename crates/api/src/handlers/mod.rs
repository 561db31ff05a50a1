pub mod admin_log;
pub mod analytics;
pub mod car;
pub mod catalog;
pub mod contact;
pub mod dashboard;
pub mod dealership;
pub mod inbox;
pub mod profile;
pub mod public;

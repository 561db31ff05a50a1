//! Souq marketplace API server library.
//!
//! Exposes config, state, routing and WebSocket plumbing so the binary and
//! the integration tests build the same application.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod query;
pub mod realtime;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
pub mod ws;

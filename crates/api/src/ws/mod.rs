//! Authenticated WebSocket push channel.
//!
//! Clients connect to `/api/v1/ws?token=<jwt>` and receive realtime
//! dealership, listing and notification changes. See
//! [`crate::realtime`] for what is pushed to whom.

mod handler;
mod heartbeat;
pub mod manager;

pub use handler::ws_handler;
pub use heartbeat::start_heartbeat;
pub use manager::WsManager;

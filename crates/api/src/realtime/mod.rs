//! Realtime change propagation.
//!
//! The [`RealtimeRouter`] subscribes to the event bus, folds dealership and
//! listing changes through a [`LiveCache`](souq_core::realtime::LiveCache)
//! so stale or replayed events are dropped, and pushes what survives to
//! WebSocket clients.

pub mod router;

pub use router::{PushTarget, RealtimeRouter};

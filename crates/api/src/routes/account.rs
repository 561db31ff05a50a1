//! Routes for the signed-in user's own resources.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{analytics, contact, dashboard, inbox, profile};
use crate::state::AppState;

/// `/profile`, `/inbox`, `/messages` and `/dealer/dashboard`.
///
/// ```text
/// GET    /profile             -> get_me
/// PUT    /profile             -> update_me
/// GET    /inbox               -> list_inbox
/// POST   /inbox/threads/{id}/read -> mark_thread_read
/// POST   /messages            -> create_message
/// GET    /dealer/dashboard    -> dealer_dashboard
/// POST   /analytics/events    -> track_event
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/profile", get(profile::get_me).put(profile::update_me))
        .route("/inbox", get(inbox::list_inbox))
        .route("/inbox/threads/{id}/read", post(inbox::mark_thread_read))
        .route("/messages", post(contact::create_message))
        .route("/dealer/dashboard", get(dashboard::dealer_dashboard))
        .route("/analytics/events", post(analytics::track_event))
}

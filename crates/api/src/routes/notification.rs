//! Route definitions for `/notifications`.
//!
//! All endpoints require authentication.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::inbox;
use crate::state::AppState;

/// Routes mounted at `/notifications`.
///
/// ```text
/// GET    /                 -> list_notifications
/// POST   /read-all         -> mark_all_read
/// GET    /unread-count     -> unread_count
/// POST   /{id}/read        -> mark_read
/// DELETE /{id}             -> delete_notification
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(inbox::list_notifications))
        .route("/read-all", post(inbox::mark_all_read))
        .route("/unread-count", get(inbox::unread_count))
        .route("/{id}/read", post(inbox::mark_read))
        .route("/{id}", delete(inbox::delete_notification))
}

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::dealership;

/// Routes mounted at `/dealerships`.
///
/// ```text
/// POST   /          -> submit_registration
/// GET    /mine      -> get_my_registration
/// ```
pub fn router() -> Router<crate::state::AppState> {
    Router::new()
        .route("/", post(dealership::submit_registration))
        .route("/mine", get(dealership::get_my_registration))
}

pub mod account;
pub mod admin;
pub mod car;
pub mod dealership;
pub mod health;
pub mod notification;
pub mod public;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;
use crate::ws;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /ws                                  WebSocket upgrade (token in query)
///
/// /dealerships                         registration submit / own status
/// /cars                                dealer listings, images, sold
/// /notifications                       list, read, read-all, delete
/// /profile, /inbox, /messages          signed-in user resources
/// /dealer/dashboard                    dealer summary
/// /analytics/events                    event tracking
///
/// /public                              storefront, optionally country-scoped
/// /admin                               review, catalog, roles, audit log
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/ws", get(ws::ws_handler))
        .nest("/dealerships", dealership::router())
        .nest("/cars", car::router())
        .nest("/notifications", notification::router())
        .nest("/public", public::router())
        .nest("/admin", admin::router())
        .merge(account::router())
}

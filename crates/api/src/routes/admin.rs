//! Route definitions for `/admin`. Every handler requires the admin role.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{admin_log, car, catalog, contact, dealership, profile};
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// ```text
/// GET    /dealerships                  -> list_dealerships
/// GET    /dealerships/{id}             -> get_dealership
/// DELETE /dealerships/{id}             -> delete_dealership
/// POST   /dealerships/{id}/approve     -> approve_dealership
/// POST   /dealerships/{id}/reject      -> reject_dealership
/// POST   /dealerships/{id}/featured    -> toggle_dealership_featured
///
/// GET    /cars                         -> list_cars_admin
/// DELETE /cars/{id}                    -> delete_car_admin
/// POST   /cars/{id}/approve            -> approve_car
/// POST   /cars/{id}/reject             -> reject_car
/// POST   /cars/{id}/featured           -> toggle_car_featured
///
/// GET    /profiles                     -> list_profiles
/// PUT    /profiles/{id}/role           -> set_role
///
/// GET    /messages                     -> list_messages
/// GET    /messages/{id}                -> get_thread
/// POST   /messages/{id}/reply          -> reply
/// PUT    /messages/{id}/status         -> set_status
///
/// POST   /countries                    -> create_country
/// POST   /countries/{id}/cities        -> create_city
/// POST   /brands                       -> create_brand
/// POST   /brands/{id}/models           -> create_model
///
/// GET    /logs                         -> list_admin_logs
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        // Dealership review
        .route("/dealerships", get(dealership::list_dealerships))
        .route(
            "/dealerships/{id}",
            get(dealership::get_dealership).delete(dealership::delete_dealership),
        )
        .route("/dealerships/{id}/approve", post(dealership::approve_dealership))
        .route("/dealerships/{id}/reject", post(dealership::reject_dealership))
        .route(
            "/dealerships/{id}/featured",
            post(dealership::toggle_dealership_featured),
        )
        // Listing review
        .route("/cars", get(car::list_cars_admin))
        .route("/cars/{id}", axum::routing::delete(car::delete_car_admin))
        .route("/cars/{id}/approve", post(car::approve_car))
        .route("/cars/{id}/reject", post(car::reject_car))
        .route("/cars/{id}/featured", post(car::toggle_car_featured))
        // Profiles
        .route("/profiles", get(profile::list_profiles))
        .route("/profiles/{id}/role", put(profile::set_role))
        // Contact messages
        .route("/messages", get(contact::list_messages))
        .route("/messages/{id}", get(contact::get_thread))
        .route("/messages/{id}/reply", post(contact::reply))
        .route("/messages/{id}/status", put(contact::set_status))
        // Catalog
        .route("/countries", post(catalog::create_country))
        .route("/countries/{id}/cities", post(catalog::create_city))
        .route("/brands", post(catalog::create_brand))
        .route("/brands/{id}/models", post(catalog::create_model))
        // Audit trail
        .route("/logs", get(admin_log::list_admin_logs))
}

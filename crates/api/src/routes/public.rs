//! Route definitions for the unauthenticated storefront.

use axum::routing::get;
use axum::Router;

use crate::handlers::public;
use crate::state::AppState;

/// Routes mounted at `/public`.
///
/// Fixed segments (`cars`, `dealerships`, `countries`, `brands`) take
/// precedence over the `{country_code}` capture.
///
/// ```text
/// GET /cars                                  -> list_public_cars
/// GET /cars/{id}                             -> get_public_car
/// GET /dealerships                           -> list_public_dealerships
/// GET /dealerships/{id}                      -> get_showroom
/// GET /countries                             -> list_countries
/// GET /countries/{country_code}/cities       -> list_cities
/// GET /brands                                -> list_brands
/// GET /brands/{id}/models                    -> list_models
///
/// GET /{country_code}/cars                   -> list_country_cars
/// GET /{country_code}/cars/{id}              -> get_country_car
/// GET /{country_code}/dealerships            -> list_country_dealerships
/// GET /{country_code}/dealerships/{id}       -> get_country_showroom
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/cars", get(public::list_public_cars))
        .route("/cars/{id}", get(public::get_public_car))
        .route("/dealerships", get(public::list_public_dealerships))
        .route("/dealerships/{id}", get(public::get_showroom))
        .route("/countries", get(public::list_countries))
        .route("/countries/{country_code}/cities", get(public::list_cities))
        .route("/brands", get(public::list_brands))
        .route("/brands/{id}/models", get(public::list_models))
        .route("/{country_code}/cars", get(public::list_country_cars))
        .route("/{country_code}/cars/{id}", get(public::get_country_car))
        .route(
            "/{country_code}/dealerships",
            get(public::list_country_dealerships),
        )
        .route(
            "/{country_code}/dealerships/{id}",
            get(public::get_country_showroom),
        )
}

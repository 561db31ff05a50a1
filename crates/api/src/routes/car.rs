//! Route definitions for the `/cars` resource.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::car;
use crate::state::AppState;

/// Routes mounted at `/cars`.
///
/// ```text
/// POST   /                         -> create_car
/// GET    /mine                     -> list_my_cars
/// GET    /{id}                     -> get_car
/// PUT    /{id}                     -> update_car
/// DELETE /{id}                     -> delete_car
/// POST   /{id}/sold                -> mark_sold
/// POST   /{id}/images              -> add_image
/// DELETE /{id}/images/{image_id}   -> remove_image
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(car::create_car))
        .route("/mine", get(car::list_my_cars))
        .route(
            "/{id}",
            get(car::get_car).put(car::update_car).delete(car::delete_car),
        )
        .route("/{id}/sold", post(car::mark_sold))
        .route("/{id}/images", post(car::add_image))
        .route("/{id}/images/{image_id}", delete(car::remove_image))
}

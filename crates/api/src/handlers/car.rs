//! Listing CRUD, owner status changes, images and the admin review queue.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use souq_core::listing::CarStatus;
use souq_core::realtime::ChangeEvent;
use souq_core::types::DbId;
use souq_core::validation::validate_input;
use souq_db::models::car::{
    Car, CarAdminFilter, CarDetail, CarImage, CreateCar, CreateCarImage, StatusChange, UpdateCar,
};
use souq_db::repositories::car_repo::{Actor, CarChange};
use souq_db::repositories::{CarImageRepo, CarRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::{AuthUser, MaybeAuthUser};
use crate::middleware::rbac::{RequireAdmin, RequireAuth};
use crate::response::DataResponse;
use crate::state::AppState;

fn actor_for(user: &AuthUser) -> Actor {
    if user.is_admin() {
        Actor::Admin(user.user_id)
    } else {
        Actor::Owner(user.user_id)
    }
}

/// Load a listing the caller may manage: its owner or an admin.
async fn load_managed(state: &AppState, user: &AuthUser, id: DbId) -> AppResult<Car> {
    let car = CarRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Car", id))?;
    if car.user_id != user.user_id && !user.is_admin() {
        return Err(AppError::forbidden("You do not own this listing"));
    }
    Ok(car)
}

/// Publish the listing update and the notification it produced.
fn announce(state: &AppState, change: &CarChange, actor_id: DbId) {
    state.publish_car(
        ChangeEvent::Update {
            row: change.car.clone(),
        },
        change.car.user_id,
        actor_id,
    );
    if let Some(notification) = &change.notification {
        state.publish_notification(notification.clone());
    }
}

// ---------------------------------------------------------------------------
// Owner
// ---------------------------------------------------------------------------

/// POST /api/v1/cars
///
/// New listings start `Pending`.
pub async fn create_car(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(input): Json<CreateCar>,
) -> AppResult<(StatusCode, Json<DataResponse<CarDetail>>)> {
    validate_input(&input)?;

    let detail = CarRepo::create(&state.pool, user.user_id, &input).await?;

    tracing::info!(
        car_id = detail.car.id,
        user_id = user.user_id,
        dealership_id = ?detail.car.dealership_id,
        images = detail.images.len(),
        "Listing created"
    );
    state.publish_car(
        ChangeEvent::Insert {
            row: detail.car.clone(),
        },
        user.user_id,
        user.user_id,
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: detail })))
}

/// GET /api/v1/cars/mine
pub async fn list_my_cars(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Car>>>> {
    let cars = CarRepo::list_for_user(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse { data: cars }))
}

/// GET /api/v1/cars/{id}
///
/// Owners and admins see the listing in any status. Everyone else gets it
/// only through the public gate, and that fetch counts as a view.
pub async fn get_car(
    MaybeAuthUser(user): MaybeAuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<CarDetail>>> {
    let privileged = match &user {
        Some(user) => CarRepo::find_by_id(&state.pool, id)
            .await?
            .filter(|car| car.user_id == user.user_id || user.is_admin()),
        None => None,
    };

    let car = match privileged {
        Some(car) => car,
        None => CarRepo::record_public_view(&state.pool, id, None)
            .await?
            .ok_or_else(|| AppError::not_found("Car", id))?,
    };

    let images = CarImageRepo::list_for_car(&state.pool, id).await?;
    Ok(Json(DataResponse {
        data: CarDetail { car, images },
    }))
}

/// PUT /api/v1/cars/{id}
///
/// Owner edit. An approved or rejected listing goes back to `Pending`.
pub async fn update_car(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCar>,
) -> AppResult<Json<DataResponse<Car>>> {
    validate_input(&input)?;

    let change = CarRepo::update_by_owner(&state.pool, id, user.user_id, &input).await?;

    tracing::info!(
        car_id = id,
        user_id = user.user_id,
        status = %change.car.status,
        notified = change.notification.is_some(),
        "Listing updated"
    );
    announce(&state, &change, user.user_id);

    Ok(Json(DataResponse { data: change.car }))
}

/// DELETE /api/v1/cars/{id}
///
/// Owner or admin. Images are removed first in the same transaction.
pub async fn delete_car(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    remove_car(&state, &user, id).await
}

async fn remove_car(state: &AppState, user: &AuthUser, id: DbId) -> AppResult<StatusCode> {
    let deletion = CarRepo::delete(&state.pool, id, actor_for(user)).await?;

    tracing::info!(
        car_id = id,
        user_id = user.user_id,
        images_removed = deletion.images_removed,
        "Listing deleted"
    );
    state.publish_car(
        ChangeEvent::Delete {
            id,
            deleted_at: deletion.deleted_at,
        },
        deletion.owner_id,
        user.user_id,
    );

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/cars/{id}/sold
pub async fn mark_sold(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<StatusChange>,
) -> AppResult<Json<DataResponse<Car>>> {
    let change = CarRepo::set_status(
        &state.pool,
        id,
        CarStatus::Sold,
        input.expected_version,
        Actor::Owner(user.user_id),
    )
    .await?;

    tracing::info!(car_id = id, user_id = user.user_id, "Listing marked sold");
    announce(&state, &change, user.user_id);

    Ok(Json(DataResponse { data: change.car }))
}

/// POST /api/v1/cars/{id}/images
pub async fn add_image(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<CreateCarImage>,
) -> AppResult<(StatusCode, Json<DataResponse<CarImage>>)> {
    validate_input(&input)?;
    load_managed(&state, &user, id).await?;

    let image = CarImageRepo::add(&state.pool, id, &input).await?;
    tracing::info!(car_id = id, image_id = image.id, "Listing image added");

    Ok((StatusCode::CREATED, Json(DataResponse { data: image })))
}

/// DELETE /api/v1/cars/{id}/images/{image_id}
pub async fn remove_image(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path((id, image_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    load_managed(&state, &user, id).await?;

    if !CarImageRepo::remove(&state.pool, id, image_id).await? {
        return Err(AppError::not_found("CarImage", image_id));
    }
    tracing::info!(car_id = id, image_id, "Listing image removed");

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Admin
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/cars?status=&limit=&offset=
///
/// Review queue; pass `status=Pending` for outstanding listings.
pub async fn list_cars_admin(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(filter): Query<CarAdminFilter>,
) -> AppResult<Json<DataResponse<Vec<Car>>>> {
    let cars = CarRepo::list_admin(&state.pool, &filter).await?;
    Ok(Json(DataResponse { data: cars }))
}

/// POST /api/v1/admin/cars/{id}/approve
pub async fn approve_car(
    admin: RequireAdmin,
    state: State<AppState>,
    id: Path<DbId>,
    body: Json<StatusChange>,
) -> AppResult<Json<DataResponse<Car>>> {
    review_car(admin, state, id, body, CarStatus::Approved).await
}

/// POST /api/v1/admin/cars/{id}/reject
pub async fn reject_car(
    admin: RequireAdmin,
    state: State<AppState>,
    id: Path<DbId>,
    body: Json<StatusChange>,
) -> AppResult<Json<DataResponse<Car>>> {
    review_car(admin, state, id, body, CarStatus::Rejected).await
}

async fn review_car(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<StatusChange>,
    target: CarStatus,
) -> AppResult<Json<DataResponse<Car>>> {
    let change = CarRepo::set_status(
        &state.pool,
        id,
        target,
        input.expected_version,
        Actor::Admin(admin.user_id),
    )
    .await?;

    tracing::info!(car_id = id, admin_id = admin.user_id, status = %target, "Listing reviewed");
    announce(&state, &change, admin.user_id);

    Ok(Json(DataResponse { data: change.car }))
}

/// POST /api/v1/admin/cars/{id}/featured
pub async fn toggle_car_featured(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Car>>> {
    let car = CarRepo::toggle_featured(&state.pool, id, admin.user_id)
        .await?
        .ok_or_else(|| AppError::not_found("Car", id))?;

    tracing::info!(
        car_id = id,
        admin_id = admin.user_id,
        is_featured = car.is_featured,
        "Listing featured flag toggled"
    );
    state.publish_car(
        ChangeEvent::Update { row: car.clone() },
        car.user_id,
        admin.user_id,
    );

    Ok(Json(DataResponse { data: car }))
}

/// DELETE /api/v1/admin/cars/{id}
pub async fn delete_car_admin(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    remove_car(&state, &admin, id).await
}

//! Self-service profile and admin role management.

use axum::extract::{Path, Query, State};
use axum::Json;
use souq_core::types::DbId;
use souq_core::validation::validate_input;
use souq_db::models::profile::{Profile, UpdateProfile, UpdateRole};
use souq_db::repositories::ProfileRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAdmin, RequireAuth};
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/profile
pub async fn get_me(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Profile>>> {
    let profile = ProfileRepo::find_by_id(&state.pool, user.user_id)
        .await?
        .ok_or_else(|| AppError::not_found("Profile", user.user_id))?;
    Ok(Json(DataResponse { data: profile }))
}

/// PUT /api/v1/profile
///
/// Name, phone and location only; the role is not self-service.
pub async fn update_me(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(input): Json<UpdateProfile>,
) -> AppResult<Json<DataResponse<Profile>>> {
    validate_input(&input)?;
    let profile = ProfileRepo::update(&state.pool, user.user_id, &input)
        .await?
        .ok_or_else(|| AppError::not_found("Profile", user.user_id))?;
    tracing::info!(user_id = user.user_id, "Profile updated");
    Ok(Json(DataResponse { data: profile }))
}

/// GET /api/v1/admin/profiles?limit=&offset=
pub async fn list_profiles(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(page): Query<PaginationParams>,
) -> AppResult<Json<DataResponse<Vec<Profile>>>> {
    let (limit, offset) = page.window();
    let profiles = ProfileRepo::list(&state.pool, limit, offset).await?;
    Ok(Json(DataResponse { data: profiles }))
}

/// PUT /api/v1/admin/profiles/{id}/role
pub async fn set_role(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateRole>,
) -> AppResult<Json<DataResponse<Profile>>> {
    let profile = ProfileRepo::assign_role(&state.pool, id, input.role, admin.user_id)
        .await?
        .ok_or_else(|| AppError::not_found("Profile", id))?;
    tracing::info!(profile_id = id, admin_id = admin.user_id, role = %input.role, "Profile role changed");
    Ok(Json(DataResponse { data: profile }))
}

//! Dealership registration and the admin review workflow.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use souq_core::dealership::ReviewDecision;
use souq_core::realtime::ChangeEvent;
use souq_core::types::DbId;
use souq_core::validation::validate_input;
use souq_db::models::dealership::{
    Dealership, DealershipFilter, ReviewDealership, SubmitDealership,
};
use souq_db::repositories::dealership_repo::SubmissionKind;
use souq_db::repositories::DealershipRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAdmin, RequireAuth};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Owner
// ---------------------------------------------------------------------------

/// POST /api/v1/dealerships
///
/// Submit a registration, or resubmit the caller's rejected one in place.
/// 201 for a new row, 200 for a resubmission.
pub async fn submit_registration(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(input): Json<SubmitDealership>,
) -> AppResult<(StatusCode, Json<DataResponse<Dealership>>)> {
    validate_input(&input)?;

    let (dealership, kind) = DealershipRepo::submit(&state.pool, user.user_id, &input).await?;

    let (status, change) = match kind {
        SubmissionKind::Created => (
            StatusCode::CREATED,
            ChangeEvent::Insert {
                row: dealership.clone(),
            },
        ),
        SubmissionKind::Resubmitted => (
            StatusCode::OK,
            ChangeEvent::Update {
                row: dealership.clone(),
            },
        ),
    };

    tracing::info!(
        dealership_id = dealership.id,
        user_id = user.user_id,
        kind = ?kind,
        "Dealership registration submitted"
    );
    state.publish_dealership(change, dealership.user_id, user.user_id);

    Ok((status, Json(DataResponse { data: dealership })))
}

/// GET /api/v1/dealerships/mine
///
/// The caller's most recent registration, or `null`.
pub async fn get_my_registration(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Option<Dealership>>>> {
    let dealership = DealershipRepo::find_latest_for_user(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse { data: dealership }))
}

// ---------------------------------------------------------------------------
// Admin
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/dealerships?status=&limit=&offset=
pub async fn list_dealerships(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(filter): Query<DealershipFilter>,
) -> AppResult<Json<DataResponse<Vec<Dealership>>>> {
    let dealerships = DealershipRepo::list(&state.pool, &filter).await?;
    Ok(Json(DataResponse { data: dealerships }))
}

/// GET /api/v1/admin/dealerships/{id}
pub async fn get_dealership(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Dealership>>> {
    let dealership = DealershipRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Dealership", id))?;
    Ok(Json(DataResponse { data: dealership }))
}

/// POST /api/v1/admin/dealerships/{id}/approve
pub async fn approve_dealership(
    admin: RequireAdmin,
    state: State<AppState>,
    id: Path<DbId>,
    body: Json<ReviewDealership>,
) -> AppResult<Json<DataResponse<Dealership>>> {
    review(admin, state, id, body, ReviewDecision::Approve).await
}

/// POST /api/v1/admin/dealerships/{id}/reject
pub async fn reject_dealership(
    admin: RequireAdmin,
    state: State<AppState>,
    id: Path<DbId>,
    body: Json<ReviewDealership>,
) -> AppResult<Json<DataResponse<Dealership>>> {
    review(admin, state, id, body, ReviewDecision::Reject).await
}

async fn review(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<ReviewDealership>,
    decision: ReviewDecision,
) -> AppResult<Json<DataResponse<Dealership>>> {
    validate_input(&input)?;

    let outcome = DealershipRepo::review(
        &state.pool,
        id,
        admin.user_id,
        decision,
        input.notes.as_deref(),
        input.expected_version,
    )
    .await?;

    tracing::info!(
        dealership_id = id,
        admin_id = admin.user_id,
        status = %outcome.dealership.status,
        owner_promoted = outcome.owner_promoted,
        "Dealership reviewed"
    );

    let owner_id = outcome.dealership.user_id;
    state.publish_dealership(
        ChangeEvent::Update {
            row: outcome.dealership.clone(),
        },
        owner_id,
        admin.user_id,
    );
    state.publish_notification(outcome.notification);

    Ok(Json(DataResponse {
        data: outcome.dealership,
    }))
}

/// POST /api/v1/admin/dealerships/{id}/featured
///
/// Toggle the featured flag. Visibility is unaffected.
pub async fn toggle_dealership_featured(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Dealership>>> {
    let dealership = DealershipRepo::toggle_featured(&state.pool, id, admin.user_id)
        .await?
        .ok_or_else(|| AppError::not_found("Dealership", id))?;

    tracing::info!(
        dealership_id = id,
        admin_id = admin.user_id,
        is_featured = dealership.is_featured,
        "Dealership featured flag toggled"
    );
    state.publish_dealership(
        ChangeEvent::Update {
            row: dealership.clone(),
        },
        dealership.user_id,
        admin.user_id,
    );

    Ok(Json(DataResponse { data: dealership }))
}

/// DELETE /api/v1/admin/dealerships/{id}
///
/// Removes the dealership with its listings and their images.
pub async fn delete_dealership(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deletion = DealershipRepo::delete(&state.pool, id, admin.user_id)
        .await?
        .ok_or_else(|| AppError::not_found("Dealership", id))?;

    tracing::info!(dealership_id = id, admin_id = admin.user_id, "Dealership deleted");
    state.publish_dealership(
        ChangeEvent::Delete {
            id,
            deleted_at: deletion.deleted_at,
        },
        deletion.dealership.user_id,
        admin.user_id,
    );

    Ok(StatusCode::NO_CONTENT)
}

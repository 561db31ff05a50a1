//! Contact messages: users write in, admins reply one level deep.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use souq_core::types::DbId;
use souq_core::validation::validate_input;
use souq_db::models::contact_message::{
    ContactMessage, ContactMessageFilter, CreateContactMessage, ReplyToMessage, SetMessageStatus,
};
use souq_db::repositories::ContactMessageRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAdmin, RequireAuth};
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/messages
pub async fn create_message(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(input): Json<CreateContactMessage>,
) -> AppResult<(StatusCode, Json<DataResponse<ContactMessage>>)> {
    validate_input(&input)?;
    let message = ContactMessageRepo::create(&state.pool, user.user_id, &input).await?;
    tracing::info!(message_id = message.id, user_id = user.user_id, "Contact message created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: message })))
}

/// GET /api/v1/admin/messages?status=&limit=&offset=
///
/// Main messages only.
pub async fn list_messages(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(filter): Query<ContactMessageFilter>,
) -> AppResult<Json<DataResponse<Vec<ContactMessage>>>> {
    let messages = ContactMessageRepo::list_main(&state.pool, &filter).await?;
    Ok(Json(DataResponse { data: messages }))
}

#[derive(Debug, Serialize)]
pub struct MessageThread {
    pub message: ContactMessage,
    pub replies: Vec<ContactMessage>,
}

/// GET /api/v1/admin/messages/{id}
pub async fn get_thread(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<MessageThread>>> {
    let message = ContactMessageRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("ContactMessage", id))?;
    let replies = ContactMessageRepo::list_replies(&state.pool, id).await?;
    Ok(Json(DataResponse {
        data: MessageThread { message, replies },
    }))
}

/// POST /api/v1/admin/messages/{id}/reply
///
/// 400 when `id` is itself a reply.
pub async fn reply(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<ReplyToMessage>,
) -> AppResult<(StatusCode, Json<DataResponse<ContactMessage>>)> {
    validate_input(&input)?;

    let outcome = ContactMessageRepo::reply(&state.pool, id, admin.user_id, &input).await?;

    tracing::info!(
        parent_id = id,
        reply_id = outcome.reply.id,
        admin_id = admin.user_id,
        "Contact message answered"
    );
    state.publish_notification(outcome.notification);

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: outcome.reply,
        }),
    ))
}

/// PUT /api/v1/admin/messages/{id}/status
pub async fn set_status(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<SetMessageStatus>,
) -> AppResult<Json<DataResponse<ContactMessage>>> {
    let message = ContactMessageRepo::set_status(&state.pool, id, input.status)
        .await?
        .ok_or_else(|| AppError::not_found("ContactMessage", id))?;
    tracing::info!(message_id = id, admin_id = admin.user_id, status = %input.status, "Contact message status set");
    Ok(Json(DataResponse { data: message }))
}

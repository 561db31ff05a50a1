//! Unified inbox and notification read state.
//!
//! All endpoints act on the authenticated caller's own rows.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use souq_core::inbox::{build_inbox, unread_items, InboxItem};
use souq_core::pagination::{clamp_limit, clamp_offset, DEFAULT_LIMIT, MAX_LIMIT};
use souq_core::types::DbId;
use souq_db::models::contact_message::ContactMessage;
use souq_db::models::notification::Notification;
use souq_db::repositories::{ContactMessageRepo, NotificationRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

/// Notifications pulled into the merged feed.
const INBOX_NOTIFICATION_WINDOW: i64 = MAX_LIMIT;

#[derive(Debug, Serialize)]
pub struct Inbox {
    pub items: Vec<InboxItem<Notification, ContactMessage>>,
    /// Unread top-level items across both sources.
    pub unread: usize,
}

/// GET /api/v1/inbox
///
/// Notifications and the caller's contact threads in one feed, newest
/// first. Replies are nested under their main message.
pub async fn list_inbox(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Inbox>>> {
    let notifications = NotificationRepo::list_for_user(
        &state.pool,
        user.user_id,
        false,
        INBOX_NOTIFICATION_WINDOW,
        0,
    )
    .await?;
    let messages = ContactMessageRepo::list_for_inbox(&state.pool, user.user_id).await?;

    let items = build_inbox(notifications, messages);
    let unread = unread_items(&items);

    Ok(Json(DataResponse {
        data: Inbox { items, unread },
    }))
}

/// POST /api/v1/inbox/threads/{id}/read
///
/// Marks the replies in one of the caller's threads read. Idempotent.
pub async fn mark_thread_read(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let marked = ContactMessageRepo::mark_thread_read(&state.pool, id, user.user_id)
        .await?
        .ok_or_else(|| AppError::not_found("Contact message", id))?;
    tracing::info!(user_id = user.user_id, message_id = id, marked, "Thread marked read");
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct NotificationQuery {
    #[serde(default)]
    pub unread_only: bool,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// GET /api/v1/notifications?unread_only=&limit=&offset=
pub async fn list_notifications(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Query(params): Query<NotificationQuery>,
) -> AppResult<Json<DataResponse<Vec<Notification>>>> {
    let notifications = NotificationRepo::list_for_user(
        &state.pool,
        user.user_id,
        params.unread_only,
        clamp_limit(params.limit, DEFAULT_LIMIT, MAX_LIMIT),
        clamp_offset(params.offset),
    )
    .await?;
    Ok(Json(DataResponse {
        data: notifications,
    }))
}

/// POST /api/v1/notifications/{id}/read
///
/// Idempotent. 404 if the notification is not the caller's.
pub async fn mark_read(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !NotificationRepo::mark_read(&state.pool, id, user.user_id).await? {
        return Err(AppError::not_found("Notification", id));
    }
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Serialize)]
pub struct MarkedRead {
    pub marked_read: u64,
}

/// POST /api/v1/notifications/read-all
///
/// Notifications only. Contact threads are cleared per thread with
/// `mark_thread_read`.
pub async fn mark_all_read(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<MarkedRead>>> {
    let marked_read = NotificationRepo::mark_all_read(&state.pool, user.user_id).await?;
    tracing::info!(user_id = user.user_id, marked_read, "Notifications marked read");
    Ok(Json(DataResponse {
        data: MarkedRead { marked_read },
    }))
}

/// DELETE /api/v1/notifications/{id}
pub async fn delete_notification(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !NotificationRepo::delete(&state.pool, id, user.user_id).await? {
        return Err(AppError::not_found("Notification", id));
    }
    tracing::info!(user_id = user.user_id, notification_id = id, "Notification deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Serialize)]
pub struct UnreadCount {
    pub count: i64,
}

/// GET /api/v1/notifications/unread-count
pub async fn unread_count(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<UnreadCount>>> {
    let count = NotificationRepo::unread_count(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse {
        data: UnreadCount { count },
    }))
}

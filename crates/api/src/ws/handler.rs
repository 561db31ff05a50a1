use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use souq_core::error::CoreError;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::TokenParams;
use crate::state::AppState;
use crate::ws::manager::WsManager;

/// GET /api/v1/ws?token=<jwt>
///
/// Authenticates before upgrading: a missing or invalid token is a JSON 401
/// and no socket is opened.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Query(params): Query<TokenParams>,
) -> AppResult<impl IntoResponse> {
    let token = params.token.ok_or_else(|| {
        AppError::Core(CoreError::Unauthorized("Missing token query parameter".into()))
    })?;
    let user = AuthUser::from_token(&token, &state.config.jwt)?;

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state.ws_manager, user)))
}

/// Drive one connection: forward pushes from the manager channel to the
/// sink, drain inbound frames until the client leaves, then unregister.
async fn handle_socket(socket: WebSocket, ws_manager: Arc<WsManager>, user: AuthUser) {
    let conn_id = uuid::Uuid::new_v4().to_string();
    tracing::info!(conn_id = %conn_id, user_id = user.user_id, role = %user.role, "WebSocket connected");

    let mut rx = ws_manager.add(conn_id.clone(), user.user_id, user.role).await;

    let (mut sink, mut stream) = socket.split();

    let sender_conn_id = conn_id.clone();
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sink.send(msg).await.is_err() {
                tracing::debug!(conn_id = %sender_conn_id, "WebSocket sink closed");
                break;
            }
        }
    });

    // Push-only channel: inbound data frames are ignored.
    while let Some(result) = stream.next().await {
        match result {
            Ok(Message::Close(_)) => break,
            Ok(Message::Pong(_)) => {
                tracing::trace!(conn_id = %conn_id, "Pong received");
            }
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(conn_id = %conn_id, error = %e, "WebSocket receive error");
                break;
            }
        }
    }

    ws_manager.remove(&conn_id).await;
    send_task.abort();
    tracing::info!(conn_id = %conn_id, user_id = user.user_id, "WebSocket disconnected");
}

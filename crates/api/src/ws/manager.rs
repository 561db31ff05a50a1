use std::collections::HashMap;

use axum::body::Bytes;
use axum::extract::ws::Message;
use souq_core::roles::Role;
use souq_core::types::{DbId, Timestamp};
use tokio::sync::{mpsc, RwLock};

/// Channel sender half for pushing messages to a WebSocket connection.
pub type WsSender = mpsc::UnboundedSender<Message>;

/// One authenticated browser connection.
pub struct WsConnection {
    pub user_id: DbId,
    /// Role at connect time; decides whether admin pushes are delivered.
    pub role: Role,
    pub sender: WsSender,
    pub connected_at: Timestamp,
}

/// Registry of live WebSocket connections, keyed by connection id.
///
/// Thread-safe via interior `RwLock`; wrap in `Arc` to share.
pub struct WsManager {
    connections: RwLock<HashMap<String, WsConnection>>,
}

impl WsManager {
    pub fn new() -> Self {
        Self {
            connections: RwLock::new(HashMap::new()),
        }
    }

    /// Register a connection and return the receiver the socket task drains.
    pub async fn add(
        &self,
        conn_id: String,
        user_id: DbId,
        role: Role,
    ) -> mpsc::UnboundedReceiver<Message> {
        let (tx, rx) = mpsc::unbounded_channel();
        let conn = WsConnection {
            user_id,
            role,
            sender: tx,
            connected_at: chrono::Utc::now(),
        };
        self.connections.write().await.insert(conn_id, conn);
        rx
    }

    pub async fn remove(&self, conn_id: &str) {
        self.connections.write().await.remove(conn_id);
    }

    /// Send to every connection of `user_id`. Returns how many were reached.
    pub async fn send_to_user(&self, user_id: DbId, message: Message) -> usize {
        self.send_where(message, |conn| conn.user_id == user_id).await
    }

    /// Send to admins and to `user_id`. A connection matching both gets
    /// the message once.
    pub async fn send_to_user_and_admins(&self, user_id: DbId, message: Message) -> usize {
        self.send_where(message, |conn| {
            conn.role.is_admin() || conn.user_id == user_id
        })
        .await
    }

    /// Closed channels are skipped; their socket task removes them.
    async fn send_where(&self, message: Message, pred: impl Fn(&WsConnection) -> bool) -> usize {
        let conns = self.connections.read().await;
        let mut count = 0;
        for conn in conns.values().filter(|c| pred(c)) {
            if conn.sender.send(message.clone()).is_ok() {
                count += 1;
            }
        }
        count
    }

    pub async fn connection_count(&self) -> usize {
        self.connections.read().await.len()
    }

    /// Send a Close frame to every connection, then clear the map.
    pub async fn shutdown_all(&self) {
        let mut conns = self.connections.write().await;
        let count = conns.len();
        for conn in conns.values() {
            let _ = conn.sender.send(Message::Close(None));
        }
        conns.clear();
        tracing::info!(count, "Closed all WebSocket connections");
    }

    /// Ping every connection. Driven by the heartbeat task.
    pub async fn ping_all(&self) {
        let conns = self.connections.read().await;
        for conn in conns.values() {
            let _ = conn.sender.send(Message::Ping(Bytes::new()));
        }
    }
}

impl Default for WsManager {
    fn default() -> Self {
        Self::new()
    }
}

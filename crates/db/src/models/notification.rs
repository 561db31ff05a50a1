//! Notification entity model.

use serde::{Deserialize, Serialize};
use souq_core::inbox::InboxEntry;
use souq_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// Fallback notification type for messages not tied to a workflow.
pub const NOTIFICATION_SYSTEM: &str = "system";

/// A row from the `notifications` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Notification {
    pub id: DbId,
    pub user_id: DbId,
    pub title: String,
    pub message: String,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub notification_type: String,
    pub is_read: bool,
    pub read_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

impl InboxEntry for Notification {
    fn created_at(&self) -> Timestamp {
        self.created_at
    }

    fn is_read(&self) -> bool {
        self.is_read
    }
}

/// A notification to insert.
#[derive(Debug, Clone)]
pub struct CreateNotification {
    pub user_id: DbId,
    pub title: String,
    pub message: String,
    pub notification_type: String,
}

impl CreateNotification {
    pub fn new(
        user_id: DbId,
        notification_type: &str,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            user_id,
            title: title.into(),
            message: message.into(),
            notification_type: notification_type.to_string(),
        }
    }
}

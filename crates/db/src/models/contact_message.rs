//! Contact message model and DTOs.

use serde::{Deserialize, Serialize};
use souq_core::inbox::{InboxEntry, MessageStatus, ThreadedMessage};
use souq_core::types::{DbId, Timestamp};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `contact_messages` table.
///
/// `parent_message_id` is set on replies. Threads are one level deep.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ContactMessage {
    pub id: DbId,
    pub user_id: DbId,
    pub subject: Option<String>,
    pub message: String,
    pub status: String,
    pub parent_message_id: Option<DbId>,
    pub created_at: Timestamp,
}

impl InboxEntry for ContactMessage {
    fn created_at(&self) -> Timestamp {
        self.created_at
    }

    fn is_read(&self) -> bool {
        self.status == MessageStatus::Read.as_str()
    }
}

impl ThreadedMessage for ContactMessage {
    fn id(&self) -> DbId {
        self.id
    }

    fn parent_id(&self) -> Option<DbId> {
        self.parent_message_id
    }
}

/// A new main message from a user.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateContactMessage {
    #[validate(length(max = 200))]
    pub subject: Option<String>,
    #[validate(length(min = 1, max = 5000))]
    pub message: String,
}

/// An admin reply to a main message.
#[derive(Debug, Deserialize, Validate)]
pub struct ReplyToMessage {
    #[validate(length(min = 1, max = 5000))]
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct SetMessageStatus {
    pub status: MessageStatus,
}

#[derive(Debug, Default, Deserialize)]
pub struct ContactMessageFilter {
    pub status: Option<MessageStatus>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

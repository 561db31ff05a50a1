//! Repository for the `contact_messages` table.

use souq_core::error::CoreError;
use souq_core::inbox::{MessageStatus, NOTIFICATION_MESSAGE_REPLY};
use souq_core::pagination::{clamp_limit, clamp_offset, DEFAULT_LIMIT, MAX_LIMIT};
use souq_core::types::DbId;
use sqlx::PgPool;

use crate::error::RepoError;
use crate::models::admin_log::{NewAdminLog, ENTITY_CONTACT_MESSAGE};
use crate::models::contact_message::{
    ContactMessage, ContactMessageFilter, CreateContactMessage, ReplyToMessage,
};
use crate::models::notification::{CreateNotification, Notification};
use crate::repositories::{AdminLogRepo, NotificationRepo};

const COLUMNS: &str = "id, user_id, subject, message, status, parent_message_id, created_at";

/// Result of an admin reply.
#[derive(Debug)]
pub struct ReplyOutcome {
    pub reply: ContactMessage,
    pub notification: Notification,
}

pub struct ContactMessageRepo;

impl ContactMessageRepo {
    /// Create a main message authored by `user_id`.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateContactMessage,
    ) -> Result<ContactMessage, sqlx::Error> {
        let query = format!(
            "INSERT INTO contact_messages (user_id, subject, message, status) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ContactMessage>(&query)
            .bind(user_id)
            .bind(&input.subject)
            .bind(&input.message)
            .bind(MessageStatus::Unread.as_str())
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<ContactMessage>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM contact_messages WHERE id = $1");
        sqlx::query_as::<_, ContactMessage>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Admin view: main messages only, newest first.
    pub async fn list_main(
        pool: &PgPool,
        filter: &ContactMessageFilter,
    ) -> Result<Vec<ContactMessage>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM contact_messages \
             WHERE parent_message_id IS NULL \
               AND ($1::TEXT IS NULL OR status = $1) \
             ORDER BY created_at DESC, id DESC \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, ContactMessage>(&query)
            .bind(filter.status.map(MessageStatus::as_str))
            .bind(clamp_limit(filter.limit, DEFAULT_LIMIT, MAX_LIMIT))
            .bind(clamp_offset(filter.offset))
            .fetch_all(pool)
            .await
    }

    /// Replies to one main message, oldest first.
    pub async fn list_replies(
        pool: &PgPool,
        parent_id: DbId,
    ) -> Result<Vec<ContactMessage>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM contact_messages \
             WHERE parent_message_id = $1 \
             ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, ContactMessage>(&query)
            .bind(parent_id)
            .fetch_all(pool)
            .await
    }

    /// Every message in the user's inbox: their main messages plus all
    /// replies to those messages, whoever wrote them.
    pub async fn list_for_inbox(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<ContactMessage>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM contact_messages \
             WHERE (user_id = $1 AND parent_message_id IS NULL) \
                OR parent_message_id IN ( \
                    SELECT id FROM contact_messages \
                    WHERE user_id = $1 AND parent_message_id IS NULL) \
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, ContactMessage>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Attach an admin reply to a main message and notify its author.
    ///
    /// Replies to replies are refused. The parent is marked read, since an
    /// admin has now handled it.
    pub async fn reply(
        pool: &PgPool,
        parent_id: DbId,
        admin_id: DbId,
        input: &ReplyToMessage,
    ) -> Result<ReplyOutcome, RepoError> {
        let mut tx = pool.begin().await?;

        let lookup = format!("SELECT {COLUMNS} FROM contact_messages WHERE id = $1 FOR UPDATE");
        let parent = sqlx::query_as::<_, ContactMessage>(&lookup)
            .bind(parent_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "contact_message",
                id: parent_id,
            })?;

        if parent.parent_message_id.is_some() {
            return Err(CoreError::Validation(
                "Replies can only be attached to a main message".to_string(),
            )
            .into());
        }

        let insert = format!(
            "INSERT INTO contact_messages (user_id, subject, message, status, parent_message_id) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        let reply = sqlx::query_as::<_, ContactMessage>(&insert)
            .bind(admin_id)
            .bind(&parent.subject)
            .bind(&input.message)
            .bind(MessageStatus::Unread.as_str())
            .bind(parent.id)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query("UPDATE contact_messages SET status = $2 WHERE id = $1")
            .bind(parent.id)
            .bind(MessageStatus::Read.as_str())
            .execute(&mut *tx)
            .await?;

        let subject = parent.subject.as_deref().unwrap_or("your message");
        let notification = NotificationRepo::create(
            &mut *tx,
            &CreateNotification::new(
                parent.user_id,
                NOTIFICATION_MESSAGE_REPLY,
                "New reply",
                format!("An administrator replied to {subject}."),
            ),
        )
        .await?;

        AdminLogRepo::record(
            &mut *tx,
            &NewAdminLog {
                admin_id,
                action: "reply_message",
                entity_type: ENTITY_CONTACT_MESSAGE,
                entity_id: parent.id,
                details: serde_json::json!({ "reply_id": reply.id }),
            },
        )
        .await?;

        tx.commit().await?;
        Ok(ReplyOutcome {
            reply,
            notification,
        })
    }

    /// Mark every reply in one of the caller's threads read.
    ///
    /// Returns `None` when `parent_id` is not a main message authored by
    /// `user_id`, otherwise the number of replies that changed.
    pub async fn mark_thread_read(
        pool: &PgPool,
        parent_id: DbId,
        user_id: DbId,
    ) -> Result<Option<u64>, sqlx::Error> {
        let owned: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM contact_messages \
             WHERE id = $1 AND user_id = $2 AND parent_message_id IS NULL)",
        )
        .bind(parent_id)
        .bind(user_id)
        .fetch_one(pool)
        .await?;
        if !owned {
            return Ok(None);
        }

        let result = sqlx::query(
            "UPDATE contact_messages SET status = $2 \
             WHERE parent_message_id = $1 AND status <> $2",
        )
        .bind(parent_id)
        .bind(MessageStatus::Read.as_str())
        .execute(pool)
        .await?;
        Ok(Some(result.rows_affected()))
    }

    /// Admin sets a message's read state.
    pub async fn set_status(
        pool: &PgPool,
        id: DbId,
        status: MessageStatus,
    ) -> Result<Option<ContactMessage>, sqlx::Error> {
        let query =
            format!("UPDATE contact_messages SET status = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, ContactMessage>(&query)
            .bind(id)
            .bind(status.as_str())
            .fetch_optional(pool)
            .await
    }
}

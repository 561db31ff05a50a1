//! Unified inbox: system notifications and contact-message threads.
//!
//! The two sources keep separate storage and read-state models. This module
//! merges them into one reverse-chronological feed of [`InboxItem`]s so
//! callers never branch on origin.

use std::collections::HashMap;

use serde::Serialize;

use crate::status::define_text_enum;
use crate::types::{DbId, Timestamp};

/// Owner edited an approved listing and it went back to review.
pub const NOTIFICATION_STATUS_CHANGE: &str = "status_change";
/// Owner marked a listing as sold.
pub const NOTIFICATION_CAR_SOLD: &str = "car_sold";
/// Admin approved or rejected a listing.
pub const NOTIFICATION_CAR_REVIEWED: &str = "car_reviewed";
pub const NOTIFICATION_DEALERSHIP_APPROVED: &str = "dealership_approved";
pub const NOTIFICATION_DEALERSHIP_REJECTED: &str = "dealership_rejected";
/// Admin replied to a contact message.
pub const NOTIFICATION_MESSAGE_REPLY: &str = "message_reply";

define_text_enum! {
    /// Admin-managed read state of a contact message.
    MessageStatus ("message status") {
        Unread = "unread",
        Read = "read",
    }
}

/// Anything that can sit in the inbox feed.
pub trait InboxEntry {
    fn created_at(&self) -> Timestamp;
    fn is_read(&self) -> bool;
}

/// A contact message that may be a reply to another one.
pub trait ThreadedMessage: InboxEntry {
    fn id(&self) -> DbId;
    fn parent_id(&self) -> Option<DbId>;
}

/// One top-level inbox row.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InboxItem<N, M> {
    Notification {
        notification: N,
    },
    MessageThread {
        message: M,
        /// Replies oldest first.
        replies: Vec<M>,
    },
}

impl<N: InboxEntry, M: ThreadedMessage> InboxItem<N, M> {
    /// Timestamp the feed is ordered by.
    pub fn created_at(&self) -> Timestamp {
        match self {
            InboxItem::Notification { notification } => notification.created_at(),
            InboxItem::MessageThread { message, .. } => message.created_at(),
        }
    }

    /// A thread counts as read once every reply is. The main message's own
    /// status is admin triage state and the reader wrote it.
    pub fn is_read(&self) -> bool {
        match self {
            InboxItem::Notification { notification } => notification.is_read(),
            InboxItem::MessageThread { replies, .. } => replies.iter().all(InboxEntry::is_read),
        }
    }
}

/// Merge notifications and contact messages into a single feed.
///
/// Main messages (no parent) become threads; replies are nested under their
/// parent, oldest first. Replies whose parent is not among `messages` are
/// dropped: threading is one level deep and only main messages surface.
/// The result is ordered newest first.
pub fn build_inbox<N, M>(notifications: Vec<N>, messages: Vec<M>) -> Vec<InboxItem<N, M>>
where
    N: InboxEntry,
    M: ThreadedMessage,
{
    let (mains, replies): (Vec<M>, Vec<M>) =
        messages.into_iter().partition(|m| m.parent_id().is_none());

    let mut replies_by_parent: HashMap<DbId, Vec<M>> = HashMap::new();
    for reply in replies {
        if let Some(parent) = reply.parent_id() {
            replies_by_parent.entry(parent).or_default().push(reply);
        }
    }

    let mut items: Vec<InboxItem<N, M>> = notifications
        .into_iter()
        .map(|notification| InboxItem::Notification { notification })
        .collect();

    for message in mains {
        let mut replies = replies_by_parent.remove(&message.id()).unwrap_or_default();
        replies.sort_by_key(|r| r.created_at());
        items.push(InboxItem::MessageThread { message, replies });
    }

    items.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
    items
}

/// Count of unread top-level items.
pub fn unread_items<N: InboxEntry, M: ThreadedMessage>(items: &[InboxItem<N, M>]) -> usize {
    items.iter().filter(|item| !item.is_read()).count()
}

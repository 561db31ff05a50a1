//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is the publish/subscribe hub for [`PlatformEvent`]s. Handlers
//! publish after their transaction commits; the realtime router in the API
//! crate subscribes and pushes changes to WebSocket clients.

use chrono::{DateTime, Utc};
use serde::Serialize;
use souq_core::realtime::{ChangeEvent, Versioned};
use souq_core::types::DbId;
use souq_db::models::car::Car;
use souq_db::models::dealership::Dealership;
use souq_db::models::notification::Notification;
use tokio::sync::broadcast;

// ---------------------------------------------------------------------------
// PlatformEvent
// ---------------------------------------------------------------------------

/// What changed.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "entity", content = "change", rename_all = "snake_case")]
pub enum MarketEvent {
    Dealership(ChangeEvent<Dealership>),
    Car(ChangeEvent<Car>),
    Notification(Notification),
}

/// A domain event that occurred on the marketplace.
///
/// Constructed via [`PlatformEvent::dealership`], [`PlatformEvent::car`] or
/// [`PlatformEvent::notification`] and enriched with
/// [`with_actor`](PlatformEvent::with_actor).
#[derive(Debug, Clone, Serialize)]
pub struct PlatformEvent {
    pub kind: MarketEvent,

    /// Profile that owns the changed row, or the notified profile.
    pub owner_user_id: DbId,

    /// Profile whose request caused the change.
    pub actor_user_id: Option<DbId>,

    /// When the event was created (UTC).
    pub timestamp: DateTime<Utc>,
}

impl PlatformEvent {
    fn new(kind: MarketEvent, owner_user_id: DbId) -> Self {
        Self {
            kind,
            owner_user_id,
            actor_user_id: None,
            timestamp: Utc::now(),
        }
    }

    /// A dealership row changed. `owner_user_id` is the dealership's owner.
    pub fn dealership(change: ChangeEvent<Dealership>, owner_user_id: DbId) -> Self {
        Self::new(MarketEvent::Dealership(change), owner_user_id)
    }

    /// A listing changed. `owner_user_id` is the listing's owner.
    pub fn car(change: ChangeEvent<Car>, owner_user_id: DbId) -> Self {
        Self::new(MarketEvent::Car(change), owner_user_id)
    }

    /// A notification was created for `notification.user_id`.
    pub fn notification(notification: Notification) -> Self {
        let owner = notification.user_id;
        Self::new(MarketEvent::Notification(notification), owner)
    }

    /// Attach the acting user to the event.
    pub fn with_actor(mut self, user_id: DbId) -> Self {
        self.actor_user_id = Some(user_id);
        self
    }

    /// Dot-separated event name for logs, e.g. `"dealership.update"`.
    pub fn event_type(&self) -> String {
        fn op<T: Versioned>(change: &ChangeEvent<T>) -> &'static str {
            match change {
                ChangeEvent::Insert { .. } => "insert",
                ChangeEvent::Update { .. } => "update",
                ChangeEvent::Delete { .. } => "delete",
            }
        }
        match &self.kind {
            MarketEvent::Dealership(change) => format!("dealership.{}", op(change)),
            MarketEvent::Car(change) => format!("car.{}", op(change)),
            MarketEvent::Notification(_) => "notification.created".to_string(),
        }
    }

    /// Id of the row the event is about.
    pub fn entity_id(&self) -> DbId {
        match &self.kind {
            MarketEvent::Dealership(change) => change.row_id(),
            MarketEvent::Car(change) => change.row_id(),
            MarketEvent::Notification(n) => n.id,
        }
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus.
///
/// Wraps a [`broadcast::Sender`] so that any number of subscribers can
/// independently receive every published [`PlatformEvent`].
pub struct EventBus {
    sender: broadcast::Sender<PlatformEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full, the oldest un-consumed messages are dropped
    /// and slow receivers will observe a `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// With no subscribers the event is dropped.
    pub fn publish(&self, event: PlatformEvent) {
        tracing::debug!(
            event_type = %event.event_type(),
            entity_id = event.entity_id(),
            "Publishing platform event"
        );
        // A SendError only means there are zero receivers.
        let _ = self.sender.send(event);
    }

    /// Subscribe to all events published on this bus.
    pub fn subscribe(&self) -> broadcast::Receiver<PlatformEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

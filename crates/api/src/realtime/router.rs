//! Event-to-WebSocket routing.
//!
//! | Event                 | Pushed to                         |
//! |-----------------------|-----------------------------------|
//! | dealership change     | admins and the dealership owner   |
//! | listing change        | admins and the listing owner      |
//! | notification created  | the notified user                 |
//!
//! Dealership and listing changes pass through a per-table cache first.
//! A change older than what the cache holds is discarded and not pushed.

use std::sync::Arc;

use axum::extract::ws::Message;
use serde_json::json;
use souq_core::realtime::{ApplyOutcome, ChangeEvent, LiveCache};
use souq_core::types::DbId;
use souq_db::models::car::Car;
use souq_db::models::dealership::Dealership;
use souq_events::{MarketEvent, PlatformEvent};
use tokio::sync::broadcast;

use crate::ws::WsManager;

/// Who an accepted event goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushTarget {
    /// Admin connections plus the owner's connections.
    OwnerAndAdmins(DbId),
    /// Only this user's connections.
    User(DbId),
    /// Nothing: the event was stale.
    Dropped,
}

pub struct RealtimeRouter {
    ws_manager: Arc<WsManager>,
    dealerships: LiveCache<Dealership>,
    cars: LiveCache<Car>,
}

impl RealtimeRouter {
    pub fn new(ws_manager: Arc<WsManager>) -> Self {
        Self {
            ws_manager,
            dealerships: LiveCache::new(),
            cars: LiveCache::new(),
        }
    }

    /// Seed the dealership cache so the first pushed change is already
    /// compared against a known row.
    pub fn with_dealerships(mut self, rows: Vec<Dealership>) -> Self {
        self.dealerships = LiveCache::from_rows(rows);
        self
    }

    /// Current cached dealerships, newest write first.
    pub fn dealerships(&self) -> Vec<&Dealership> {
        self.dealerships.rows()
    }

    /// Consume the bus until it closes.
    pub async fn run(mut self, mut receiver: broadcast::Receiver<PlatformEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    self.route_event(event).await;
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Realtime router lagged");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, realtime router shutting down");
                    break;
                }
            }
        }
    }

    /// Fold one event and push it. Returns where it went.
    pub async fn route_event(&mut self, event: PlatformEvent) -> PushTarget {
        let event_type = event.event_type();
        let entity_id = event.entity_id();
        let target = self.target_for(&event);

        let delivered = match target {
            PushTarget::Dropped => {
                tracing::debug!(event_type = %event_type, entity_id, "Discarded stale change");
                return target;
            }
            PushTarget::OwnerAndAdmins(owner) => {
                self.ws_manager
                    .send_to_user_and_admins(owner, push_message(&event))
                    .await
            }
            PushTarget::User(user_id) => {
                self.ws_manager
                    .send_to_user(user_id, push_message(&event))
                    .await
            }
        };

        tracing::debug!(event_type = %event_type, entity_id, delivered, "Pushed change");
        target
    }

    fn target_for(&mut self, event: &PlatformEvent) -> PushTarget {
        let accepted = match &event.kind {
            MarketEvent::Dealership(change) => fold(&mut self.dealerships, change),
            MarketEvent::Car(change) => fold(&mut self.cars, change),
            MarketEvent::Notification(notification) => {
                return PushTarget::User(notification.user_id);
            }
        };

        if accepted {
            PushTarget::OwnerAndAdmins(event.owner_user_id)
        } else {
            PushTarget::Dropped
        }
    }
}

fn fold<T: souq_core::realtime::Versioned + Clone>(
    cache: &mut LiveCache<T>,
    change: &ChangeEvent<T>,
) -> bool {
    cache.apply(change.clone()) == ApplyOutcome::Applied
}

/// Wire format of one push: `{ "type", "event_type", "data", "timestamp" }`.
fn push_message(event: &PlatformEvent) -> Message {
    let kind = match event.kind {
        MarketEvent::Notification(_) => "notification",
        _ => "change",
    };
    let body = json!({
        "type": kind,
        "event_type": event.event_type(),
        "data": event.kind,
        "timestamp": event.timestamp,
    });
    Message::Text(body.to_string().into())
}

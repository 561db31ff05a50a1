use std::sync::Arc;

use souq_core::realtime::ChangeEvent;
use souq_core::types::DbId;
use souq_db::models::car::Car;
use souq_db::models::dealership::Dealership;
use souq_db::models::notification::Notification;
use souq_events::{AnalyticsForwarder, EventBus, PlatformEvent};

use crate::config::ServerConfig;
use crate::ws::WsManager;

/// Shared application state available to all handlers via `State<AppState>`.
///
/// Cheap to clone: everything is behind an `Arc` or already `Clone`.
#[derive(Clone)]
pub struct AppState {
    pub pool: souq_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Browser WebSocket connections.
    pub ws_manager: Arc<WsManager>,
    /// Handlers publish row changes here after their transaction commits.
    pub event_bus: Arc<EventBus>,
    pub analytics: AnalyticsForwarder,
}

impl AppState {
    /// Announce a dealership change. Call after the transaction commits.
    pub fn publish_dealership(
        &self,
        change: ChangeEvent<Dealership>,
        owner_id: DbId,
        actor_id: DbId,
    ) {
        self.event_bus
            .publish(PlatformEvent::dealership(change, owner_id).with_actor(actor_id));
    }

    /// Announce a listing change. Call after the transaction commits.
    pub fn publish_car(&self, change: ChangeEvent<Car>, owner_id: DbId, actor_id: DbId) {
        self.event_bus
            .publish(PlatformEvent::car(change, owner_id).with_actor(actor_id));
    }

    /// Push a freshly created notification to its recipient.
    pub fn publish_notification(&self, notification: Notification) {
        self.event_bus
            .publish(PlatformEvent::notification(notification));
    }
}

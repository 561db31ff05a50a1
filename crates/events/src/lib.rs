//! Event plumbing for the marketplace.
//!
//! - [`EventBus`]: in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`PlatformEvent`]: the change envelope pushed to realtime clients.
//! - [`analytics`]: best-effort forwarding of client analytics events.

pub mod analytics;
pub mod bus;

pub use analytics::{AnalyticsForwarder, AnalyticsSink, MeasurementConfig, MeasurementProtocolSink};
pub use bus::{EventBus, MarketEvent, PlatformEvent};

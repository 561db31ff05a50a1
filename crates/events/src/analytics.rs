//! Best-effort forwarding of enriched analytics events to a tag endpoint.
//!
//! Events are posted in the GA4 Measurement Protocol shape. There is no
//! retry and no buffering: a failed or unconfigured send drops the event
//! after logging it.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use souq_core::analytics::EnrichedEvent;

/// HTTP request timeout for a single send.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for analytics forwarding failures.
#[derive(Debug, thiserror::Error)]
pub enum AnalyticsError {
    /// The underlying HTTP request failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The tag endpoint returned a non-2xx status code.
    #[error("Analytics endpoint returned HTTP {0}")]
    HttpStatus(u16),
}

// ---------------------------------------------------------------------------
// Sink
// ---------------------------------------------------------------------------

/// Destination for enriched events.
#[async_trait]
pub trait AnalyticsSink: Send + Sync {
    async fn send(&self, event: &EnrichedEvent) -> Result<(), AnalyticsError>;
}

/// Connection settings for a Measurement Protocol endpoint.
#[derive(Debug, Clone)]
pub struct MeasurementConfig {
    pub endpoint: String,
    pub measurement_id: String,
    pub api_secret: String,
}

/// Posts events to a Measurement Protocol `collect` endpoint.
pub struct MeasurementProtocolSink {
    client: reqwest::Client,
    config: MeasurementConfig,
}

impl MeasurementProtocolSink {
    pub fn new(config: MeasurementConfig) -> Result<Self, AnalyticsError> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl AnalyticsSink for MeasurementProtocolSink {
    async fn send(&self, event: &EnrichedEvent) -> Result<(), AnalyticsError> {
        let response = self
            .client
            .post(&self.config.endpoint)
            .query(&[
                ("measurement_id", self.config.measurement_id.as_str()),
                ("api_secret", self.config.api_secret.as_str()),
            ])
            .json(&measurement_payload(event))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(AnalyticsError::HttpStatus(response.status().as_u16()));
        }
        Ok(())
    }
}

/// Request body for one event.
///
/// The session id doubles as the client id; the profile id, when known, is
/// sent as `user_id`.
pub fn measurement_payload(event: &EnrichedEvent) -> serde_json::Value {
    serde_json::json!({
        "client_id": event.context.session_id,
        "user_id": event.context.user_id.map(|id| id.to_string()),
        "timestamp_micros": event.occurred_at.timestamp_micros(),
        "events": [{
            "name": event.name,
            "params": event.params(),
        }],
    })
}

// ---------------------------------------------------------------------------
// Forwarder
// ---------------------------------------------------------------------------

/// Hands events to the configured sink without blocking the caller.
#[derive(Clone, Default)]
pub struct AnalyticsForwarder {
    sink: Option<Arc<dyn AnalyticsSink>>,
}

impl AnalyticsForwarder {
    pub fn new(sink: Arc<dyn AnalyticsSink>) -> Self {
        Self { sink: Some(sink) }
    }

    /// A forwarder that drops everything.
    pub fn disabled() -> Self {
        Self { sink: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.sink.is_some()
    }

    /// Send one event in the background.
    ///
    /// Returns the spawned task handle, or `None` when no sink is
    /// configured. Failures are logged and the event is dropped.
    pub fn forward(&self, event: EnrichedEvent) -> Option<tokio::task::JoinHandle<()>> {
        let Some(sink) = self.sink.clone() else {
            tracing::debug!(event = event.name, "Analytics tag not configured, dropping event");
            return None;
        };

        Some(tokio::spawn(async move {
            match sink.send(&event).await {
                Ok(()) => tracing::debug!(
                    event = event.name,
                    session_id = %event.context.session_id,
                    "Analytics event forwarded"
                ),
                Err(e) => tracing::warn!(
                    event = event.name,
                    error = %e,
                    "Analytics event dropped"
                ),
            }
        }))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

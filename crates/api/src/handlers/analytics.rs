//! Client analytics intake.
//!
//! Events are enriched from the request and handed to the forwarder in the
//! background. The response never waits on the tag endpoint.

use axum::extract::State;
use axum::http::header::{ACCEPT_LANGUAGE, USER_AGENT};
use axum::http::{HeaderMap, HeaderName, StatusCode};
use axum::Json;
use serde::{Deserialize, Serialize};
use souq_core::analytics::{enrich, AnalyticsEvent, EventContext};

use crate::error::AppResult;
use crate::middleware::auth::MaybeAuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body: the event fields plus optional session and language.
#[derive(Debug, Deserialize)]
pub struct TrackEvent {
    pub session_id: Option<String>,
    pub language: Option<String>,
    #[serde(flatten)]
    pub event: AnalyticsEvent,
}

#[derive(Debug, Serialize)]
pub struct Tracked {
    pub event: &'static str,
    /// Echoed back so a client without one can keep the generated id.
    pub session_id: String,
    pub is_conversion: bool,
    pub forwarded: bool,
}

/// POST /api/v1/analytics/events
///
/// Always 202 for a well-formed event.
pub async fn track_event(
    MaybeAuthUser(user): MaybeAuthUser,
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<TrackEvent>,
) -> AppResult<(StatusCode, Json<DataResponse<Tracked>>)> {
    let header = |name: HeaderName| headers.get(name).and_then(|v| v.to_str().ok());

    let context = EventContext::resolve(
        input.session_id.as_deref(),
        header(USER_AGENT),
        input.language.as_deref(),
        header(ACCEPT_LANGUAGE),
        user.map(|u| u.user_id),
    );
    let enriched = enrich(input.event, context, chrono::Utc::now());

    let tracked = Tracked {
        event: enriched.name,
        session_id: enriched.context.session_id.clone(),
        is_conversion: enriched.is_conversion,
        forwarded: state.analytics.is_enabled(),
    };
    state.analytics.forward(enriched);

    Ok((StatusCode::ACCEPTED, Json(DataResponse { data: tracked })))
}

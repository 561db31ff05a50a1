//! Analytics intake endpoint.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{body_json, post_json};
use serde_json::json;
use sqlx::PgPool;
use tower::ServiceExt;

// ---------------------------------------------------------------------------
// Test: contact_seller is accepted and flagged as a conversion
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn contact_seller_is_a_conversion(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = post_json(
        &app,
        "/api/v1/analytics/events",
        json!({
            "event": "contact_seller",
            "car_id": 7,
            "method": "whatsapp",
            "session_id": "sess-1",
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["event"], "contact_seller");
    assert_eq!(json["data"]["session_id"], "sess-1");
    assert_eq!(json["data"]["is_conversion"], true);
    // No tag configured in tests.
    assert_eq!(json["data"]["forwarded"], false);
}

// ---------------------------------------------------------------------------
// Test: a missing session id is generated
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn session_id_is_generated_when_absent(pool: PgPool) {
    let app = common::build_test_app(pool);

    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/analytics/events")
        .header("Content-Type", "application/json")
        .header("User-Agent", "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) Mobile")
        .header("Accept-Language", "ar-SA,ar;q=0.9")
        .body(Body::from(
            json!({ "event": "page_view", "path": "/cars" }).to_string(),
        ))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["is_conversion"], false);
    assert!(!json["data"]["session_id"].as_str().unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Test: unknown event kinds are rejected
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_event_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = post_json(
        &app,
        "/api/v1/analytics/events",
        json!({ "event": "purchase", "amount": 3 }),
    )
    .await;

    assert!(response.status().is_client_error());
}

//! Shared setup for the API integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use souq_api::auth::jwt::{issue_token, JwtConfig};
use souq_api::config::ServerConfig;
use souq_api::router::build_app_router;
use souq_api::state::AppState;
use souq_api::ws::WsManager;
use souq_core::roles::Role;
use souq_core::types::DbId;
use souq_db::models::catalog::{CreateBrand, CreateCarModel};
use souq_db::models::profile::CreateProfile;
use souq_db::repositories::{CatalogRepo, ProfileRepo};
use souq_events::{AnalyticsForwarder, EventBus};
use sqlx::PgPool;
use tower::ServiceExt;

pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 5,
        jwt: JwtConfig {
            secret: "test-secret-for-integration-tests".to_string(),
            access_token_expiry_mins: 15,
        },
        analytics: None,
    }
}

/// State with analytics disabled and nothing subscribed to the bus.
pub fn test_state(pool: PgPool) -> AppState {
    AppState {
        pool,
        config: Arc::new(test_config()),
        ws_manager: Arc::new(WsManager::new()),
        event_bus: Arc::new(EventBus::default()),
        analytics: AnalyticsForwarder::disabled(),
    }
}

/// The production router over [`test_state`].
pub fn build_test_app(pool: PgPool) -> Router {
    build_app_router(test_state(pool), &test_config())
}

/// A seeded profile and a bearer token for it.
pub struct TestUser {
    pub id: DbId,
    pub token: String,
}

pub async fn user(pool: &PgPool, email: &str, role: Role) -> TestUser {
    let profile = ProfileRepo::create(
        pool,
        &CreateProfile {
            email: email.to_string(),
            full_name: None,
            phone_number: None,
            role: Some(role),
            country_id: None,
            city_id: None,
        },
    )
    .await
    .unwrap();
    TestUser {
        id: profile.id,
        token: token_for(profile.id, role),
    }
}

pub fn token_for(user_id: DbId, role: Role) -> String {
    issue_token(user_id, role, &test_config().jwt).unwrap()
}

/// Seed one brand with one model, returning `(brand_id, model_id)`.
pub async fn catalog(pool: &PgPool) -> (DbId, DbId) {
    let brand = CatalogRepo::create_brand(
        pool,
        &CreateBrand {
            name: "Nissan".to_string(),
            name_ar: None,
            logo_url: None,
        },
    )
    .await
    .unwrap();
    let model = CatalogRepo::create_model(
        pool,
        brand.id,
        &CreateCarModel {
            name: "Patrol".to_string(),
            name_ar: None,
        },
    )
    .await
    .unwrap();
    (brand.id, model.id)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: &Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: &Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(
    app: &Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn post_auth(app: &Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), None).await
}

pub async fn put_json_auth(
    app: &Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn delete_auth(app: &Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(token), None).await
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

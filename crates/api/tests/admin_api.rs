//! Admin catalog, role management and the audit log.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, get_auth, post_auth, post_json_auth, put_json_auth, user};
use serde_json::json;
use souq_core::roles::Role;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Test: role changes are applied and logged
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn role_change_is_audited(pool: PgPool) {
    let member = user(&pool, "member@example.com", Role::NormalUser).await;
    let admin = user(&pool, "admin@example.com", Role::Admin).await;
    let app = common::build_test_app(pool);

    let response = put_json_auth(
        &app,
        &format!("/api/v1/admin/profiles/{}/role", member.id),
        &admin.token,
        json!({ "role": "dealer" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["role"], "dealer");

    let logs = body_json(
        get_auth(
            &app,
            &format!("/api/v1/admin/logs?entity_type=profile&entity_id={}", member.id),
            &admin.token,
        )
        .await,
    )
    .await;
    let entry = &logs["data"][0];
    assert_eq!(entry["action"], "change_role");
    assert_eq!(entry["admin_id"], admin.id);
    assert_eq!(entry["details"]["from"], "normal_user");
    assert_eq!(entry["details"]["to"], "dealer");

    let response = put_json_auth(
        &app,
        "/api/v1/admin/profiles/999999/role",
        &admin.token,
        json!({ "role": "dealer" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Test: brands and models feed the public catalog
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn catalog_is_admin_managed(pool: PgPool) {
    let member = user(&pool, "member@example.com", Role::NormalUser).await;
    let admin = user(&pool, "admin@example.com", Role::Admin).await;
    let app = common::build_test_app(pool);

    let response = post_json_auth(&app, "/api/v1/admin/brands", &member.token, json!({ "name": "Kia" })).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = post_json_auth(&app, "/api/v1/admin/brands", &admin.token, json!({ "name": "Kia" })).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let brand_id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let response = post_json_auth(
        &app,
        &format!("/api/v1/admin/brands/{brand_id}/models"),
        &admin.token,
        json!({ "name": "Sportage" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let brands = body_json(get(&app, "/api/v1/public/brands").await).await;
    assert_eq!(brands["data"][0]["name"], "Kia");
    let models = body_json(get(&app, &format!("/api/v1/public/brands/{brand_id}/models")).await).await;
    assert_eq!(models["data"][0]["name"], "Sportage");

    let response = post_json_auth(
        &app,
        "/api/v1/admin/brands/999999/models",
        &admin.token,
        json!({ "name": "Ghost" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "INVALID_REFERENCE");
}

// ---------------------------------------------------------------------------
// Test: featured toggles flip each call
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn featured_flag_toggles(pool: PgPool) {
    let owner = user(&pool, "owner@example.com", Role::NormalUser).await;
    let admin = user(&pool, "admin@example.com", Role::Admin).await;
    let app = common::build_test_app(pool);

    let created = body_json(
        post_json_auth(
            &app,
            "/api/v1/dealerships",
            &owner.token,
            json!({
                "business_name": "Oasis Motors",
                "business_type": "dealership",
                "dealership_type": "Private",
            }),
        )
        .await,
    )
    .await;
    let id = created["data"]["id"].as_i64().unwrap();
    let uri = format!("/api/v1/admin/dealerships/{id}/featured");

    let first = body_json(post_auth(&app, &uri, &admin.token).await).await;
    assert_eq!(first["data"]["is_featured"], true);
    let second = body_json(post_auth(&app, &uri, &admin.token).await).await;
    assert_eq!(second["data"]["is_featured"], false);
}

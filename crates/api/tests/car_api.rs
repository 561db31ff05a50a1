//! Listing lifecycle and the public gate over HTTP.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, catalog, delete_auth, get, get_auth, post_json_auth, put_json_auth, user, TestUser,
};
use serde_json::json;
use souq_core::roles::Role;
use sqlx::PgPool;

async fn create_car(
    app: &axum::Router,
    seller: &TestUser,
    brand_id: i64,
    model_id: i64,
) -> serde_json::Value {
    let response = post_json_auth(
        app,
        "/api/v1/cars",
        &seller.token,
        json!({
            "brand_id": brand_id,
            "model_id": model_id,
            "year": 2021,
            "mileage": 40000,
            "price": 120000,
            "body_type": "suv",
            "image_urls": ["https://cdn.example.com/a.jpg", "https://cdn.example.com/b.jpg"],
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

async fn approve(app: &axum::Router, admin: &TestUser, id: i64, version: i64) -> serde_json::Value {
    let response = post_json_auth(
        app,
        &format!("/api/v1/admin/cars/{id}/approve"),
        &admin.token,
        json!({ "expected_version": version }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["data"].clone()
}

fn id_and_version(car: &serde_json::Value) -> (i64, i64) {
    (car["id"].as_i64().unwrap(), car["version"].as_i64().unwrap())
}

// ---------------------------------------------------------------------------
// Test: pending listings stay off the storefront until approved
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn public_gate_hides_unapproved_listings(pool: PgPool) {
    let (brand_id, model_id) = catalog(&pool).await;
    let seller = user(&pool, "seller@example.com", Role::NormalUser).await;
    let admin = user(&pool, "admin@example.com", Role::Admin).await;
    let app = common::build_test_app(pool);

    let detail = create_car(&app, &seller, brand_id, model_id).await;
    assert_eq!(detail["car"]["status"], "Pending");
    assert_eq!(detail["images"].as_array().unwrap().len(), 2);
    let (id, version) = id_and_version(&detail["car"]);

    let list = body_json(get(&app, "/api/v1/public/cars").await).await;
    assert_eq!(list["total"], 0);
    let response = get(&app, &format!("/api/v1/public/cars/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // The owner still sees it.
    let own = get_auth(&app, &format!("/api/v1/cars/{id}"), &seller.token).await;
    assert_eq!(own.status(), StatusCode::OK);

    approve(&app, &admin, id, version).await;

    let list = body_json(get(&app, "/api/v1/public/cars").await).await;
    assert_eq!(list["total"], 1);
    assert_eq!(list["data"][0]["id"], id);

    let viewed = body_json(get(&app, &format!("/api/v1/public/cars/{id}")).await).await;
    assert_eq!(viewed["data"]["car"]["views"], 1);
}

// ---------------------------------------------------------------------------
// Test: editing an approved listing sends it back to review with a notice
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn editing_approved_listing_requires_reapproval(pool: PgPool) {
    let (brand_id, model_id) = catalog(&pool).await;
    let seller = user(&pool, "seller@example.com", Role::NormalUser).await;
    let admin = user(&pool, "admin@example.com", Role::Admin).await;
    let app = common::build_test_app(pool);

    let detail = create_car(&app, &seller, brand_id, model_id).await;
    let (id, version) = id_and_version(&detail["car"]);
    let approved = approve(&app, &admin, id, version).await;
    let (_, version) = id_and_version(&approved);

    let response = put_json_auth(
        &app,
        &format!("/api/v1/cars/{id}"),
        &seller.token,
        json!({ "price": 110000, "expected_version": version }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let edited = body_json(response).await;
    assert_eq!(edited["data"]["status"], "Pending");
    assert_eq!(edited["data"]["price"], 110000);

    let notes = body_json(
        get_auth(&app, "/api/v1/notifications?unread_only=true", &seller.token).await,
    )
    .await;
    assert_eq!(notes["data"][0]["type"], "status_change");

    let list = body_json(get(&app, "/api/v1/public/cars").await).await;
    assert_eq!(list["total"], 0);
}

// ---------------------------------------------------------------------------
// Test: only the owner may edit; stale versions conflict
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn edit_checks_owner_and_version(pool: PgPool) {
    let (brand_id, model_id) = catalog(&pool).await;
    let seller = user(&pool, "seller@example.com", Role::NormalUser).await;
    let intruder = user(&pool, "intruder@example.com", Role::NormalUser).await;
    let app = common::build_test_app(pool);

    let detail = create_car(&app, &seller, brand_id, model_id).await;
    let (id, version) = id_and_version(&detail["car"]);

    let response = put_json_auth(
        &app,
        &format!("/api/v1/cars/{id}"),
        &intruder.token,
        json!({ "price": 1, "expected_version": version }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = put_json_auth(
        &app,
        &format!("/api/v1/cars/{id}"),
        &seller.token,
        json!({ "price": 1, "expected_version": version + 1 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "STALE_VERSION");
}

// ---------------------------------------------------------------------------
// Test: sold is reachable from approved and is terminal
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn sold_listing_cannot_be_edited(pool: PgPool) {
    let (brand_id, model_id) = catalog(&pool).await;
    let seller = user(&pool, "seller@example.com", Role::NormalUser).await;
    let admin = user(&pool, "admin@example.com", Role::Admin).await;
    let app = common::build_test_app(pool);

    let detail = create_car(&app, &seller, brand_id, model_id).await;
    let (id, version) = id_and_version(&detail["car"]);

    // Pending cannot jump to Sold.
    let response = post_json_auth(
        &app,
        &format!("/api/v1/cars/{id}/sold"),
        &seller.token,
        json!({ "expected_version": version }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "INVALID_TRANSITION");

    let approved = approve(&app, &admin, id, version).await;
    let (_, version) = id_and_version(&approved);

    let response = post_json_auth(
        &app,
        &format!("/api/v1/cars/{id}/sold"),
        &seller.token,
        json!({ "expected_version": version }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let sold = body_json(response).await;
    assert_eq!(sold["data"]["status"], "Sold");
    let (_, version) = id_and_version(&sold["data"]);

    let response = put_json_auth(
        &app,
        &format!("/api/v1/cars/{id}"),
        &seller.token,
        json!({ "price": 5, "expected_version": version }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "CONFLICT");
}

// ---------------------------------------------------------------------------
// Test: deleting a listing removes it and its images
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_removes_listing_and_images(pool: PgPool) {
    let (brand_id, model_id) = catalog(&pool).await;
    let seller = user(&pool, "seller@example.com", Role::NormalUser).await;
    let app = common::build_test_app(pool.clone());

    let detail = create_car(&app, &seller, brand_id, model_id).await;
    let (id, _) = id_and_version(&detail["car"]);

    let response = delete_auth(&app, &format!("/api/v1/cars/{id}"), &seller.token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get_auth(&app, &format!("/api/v1/cars/{id}"), &seller.token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let images: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM car_images WHERE car_id = $1")
        .bind(id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(images, 0);
}

// ---------------------------------------------------------------------------
// Test: images can be added and removed by the owner
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn owner_manages_images(pool: PgPool) {
    let (brand_id, model_id) = catalog(&pool).await;
    let seller = user(&pool, "seller@example.com", Role::NormalUser).await;
    let app = common::build_test_app(pool);

    let detail = create_car(&app, &seller, brand_id, model_id).await;
    let (id, _) = id_and_version(&detail["car"]);

    let response = post_json_auth(
        &app,
        &format!("/api/v1/cars/{id}/images"),
        &seller.token,
        json!({ "url": "https://cdn.example.com/c.jpg" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let image_id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let response = delete_auth(
        &app,
        &format!("/api/v1/cars/{id}/images/{image_id}"),
        &seller.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let car = body_json(get_auth(&app, &format!("/api/v1/cars/{id}"), &seller.token).await).await;
    assert_eq!(car["data"]["images"].as_array().unwrap().len(), 2);
}

//! `AppError` to HTTP response mapping.
//!
//! No server needed: these call `IntoResponse` directly.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use http_body_util::BodyExt;
use souq_api::error::AppError;
use souq_core::error::CoreError;
use souq_db::RepoError;

async fn error_to_response(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

// ---------------------------------------------------------------------------
// Test: CoreError::NotFound maps to 404 with NOT_FOUND code
// ---------------------------------------------------------------------------

#[tokio::test]
async fn not_found_error_returns_404() {
    let (status, json) = error_to_response(AppError::not_found("Car", 42)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "Car with id 42 not found");
}

// ---------------------------------------------------------------------------
// Test: AppError::NotFound carries its own message
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unknown_country_returns_404() {
    let err = AppError::NotFound("Unknown country code 'zz'".into());
    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "Unknown country code 'zz'");
}

// ---------------------------------------------------------------------------
// Test: invalid status transition maps to 400 INVALID_TRANSITION
// ---------------------------------------------------------------------------

#[tokio::test]
async fn invalid_transition_returns_400() {
    let err = AppError::Core(CoreError::InvalidTransition {
        entity: "car",
        from: "Sold".into(),
        to: "Pending".into(),
    });
    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "INVALID_TRANSITION");
    assert_eq!(json["error"], "Invalid car status transition: Sold -> Pending");
}

// ---------------------------------------------------------------------------
// Test: stale version maps to 409 STALE_VERSION
// ---------------------------------------------------------------------------

#[tokio::test]
async fn stale_version_returns_409() {
    let err = AppError::from(RepoError::Domain(CoreError::StaleVersion {
        entity: "dealership",
        id: 7,
        expected: 3,
    }));
    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "STALE_VERSION");
}

// ---------------------------------------------------------------------------
// Test: CoreError::Conflict maps to 409 with CONFLICT code
// ---------------------------------------------------------------------------

#[tokio::test]
async fn conflict_error_returns_409() {
    let err = AppError::Core(CoreError::Conflict("registration already pending".into()));
    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "CONFLICT");
    assert_eq!(json["error"], "registration already pending");
}

// ---------------------------------------------------------------------------
// Test: validation, auth and permission errors keep their messages
// ---------------------------------------------------------------------------

#[tokio::test]
async fn client_errors_keep_their_messages() {
    let cases = [
        (
            CoreError::Validation("price must be positive".into()),
            StatusCode::BAD_REQUEST,
            "VALIDATION_ERROR",
        ),
        (
            CoreError::Unauthorized("Missing Authorization header".into()),
            StatusCode::UNAUTHORIZED,
            "UNAUTHORIZED",
        ),
        (
            CoreError::Forbidden("Admin role required".into()),
            StatusCode::FORBIDDEN,
            "FORBIDDEN",
        ),
    ];

    for (err, expected_status, expected_code) in cases {
        let (status, json) = error_to_response(AppError::Core(err)).await;
        assert_eq!(status, expected_status);
        assert_eq!(json["code"], expected_code);
    }
}

// ---------------------------------------------------------------------------
// Test: internal errors are sanitized
// ---------------------------------------------------------------------------

#[tokio::test]
async fn internal_errors_do_not_leak_details() {
    let err = AppError::Core(CoreError::Internal("secret stack trace".into()));
    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert_eq!(json["error"], "An internal error occurred");
    assert!(!json.to_string().contains("secret"));
}

// ---------------------------------------------------------------------------
// Test: RowNotFound maps to 404
// ---------------------------------------------------------------------------

#[tokio::test]
async fn row_not_found_returns_404() {
    let (status, json) = error_to_response(AppError::Database(sqlx::Error::RowNotFound)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
}

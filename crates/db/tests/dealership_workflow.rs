//! Integration tests for the dealership registration and review workflow.

mod common;

use assert_matches::assert_matches;
use souq_core::dealership::ReviewDecision;
use souq_core::error::CoreError;
use souq_core::inbox::{NOTIFICATION_DEALERSHIP_APPROVED, NOTIFICATION_DEALERSHIP_REJECTED};
use souq_core::roles::Role;
use souq_db::models::admin_log::AdminLogFilter;
use souq_db::models::dealership::DealershipFilter;
use souq_db::repositories::dealership_repo::SubmissionKind;
use souq_db::repositories::{AdminLogRepo, DealershipRepo, NotificationRepo, ProfileRepo};
use souq_db::RepoError;
use sqlx::PgPool;

use common::{profile, registration};

// ---------------------------------------------------------------------------
// Test: a first submission creates a pending row
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn first_submission_is_pending(pool: PgPool) {
    let user = profile(&pool, "seller@example.com", Role::NormalUser).await;

    let (row, kind) = DealershipRepo::submit(&pool, user.id, &registration("Gulf Autos"))
        .await
        .unwrap();

    assert_eq!(kind, SubmissionKind::Created);
    assert_eq!(row.status, "pending");
    assert_eq!(row.user_id, user.id);
    assert!(row.reviewer_id.is_none());
    assert_eq!(row.version, 1);
}

// ---------------------------------------------------------------------------
// Test: a second submission while pending is refused
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn submission_while_pending_conflicts(pool: PgPool) {
    let user = profile(&pool, "seller@example.com", Role::NormalUser).await;
    DealershipRepo::submit(&pool, user.id, &registration("Gulf Autos"))
        .await
        .unwrap();

    let err = DealershipRepo::submit(&pool, user.id, &registration("Gulf Autos 2"))
        .await
        .unwrap_err();

    assert_matches!(err, RepoError::Domain(CoreError::Conflict(_)));
}

// ---------------------------------------------------------------------------
// Test: approve sets reviewer fields, promotes owner, logs and notifies
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn approve_records_review_and_promotes_owner(pool: PgPool) {
    let admin = profile(&pool, "admin@example.com", Role::Admin).await;
    let user = profile(&pool, "seller@example.com", Role::NormalUser).await;
    let (pending, _) = DealershipRepo::submit(&pool, user.id, &registration("Gulf Autos"))
        .await
        .unwrap();

    let outcome = DealershipRepo::review(
        &pool,
        pending.id,
        admin.id,
        ReviewDecision::Approve,
        Some("ok"),
        pending.version,
    )
    .await
    .unwrap();

    let approved = outcome.dealership;
    assert_eq!(approved.id, pending.id);
    assert_eq!(approved.status, "approved");
    assert_eq!(approved.reviewer_id, Some(admin.id));
    assert_eq!(approved.review_notes.as_deref(), Some("ok"));
    assert!(approved.reviewed_at.is_some());
    assert_eq!(approved.version, pending.version + 1);
    assert!(outcome.owner_promoted);
    assert_eq!(outcome.notification.notification_type, NOTIFICATION_DEALERSHIP_APPROVED);

    let owner = ProfileRepo::find_by_id(&pool, user.id).await.unwrap().unwrap();
    assert_eq!(owner.role, "dealer");

    let live = DealershipRepo::find_approved_for_user(&pool, user.id)
        .await
        .unwrap();
    assert_eq!(live.map(|d| d.id), Some(pending.id));

    let logs = AdminLogRepo::list(
        &pool,
        &AdminLogFilter {
            entity_type: Some("dealership".to_string()),
            entity_id: Some(pending.id),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].action, "approve_dealership");
}

// ---------------------------------------------------------------------------
// Test: a stale version is refused and nothing changes
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn review_with_stale_version_is_refused(pool: PgPool) {
    let admin = profile(&pool, "admin@example.com", Role::Admin).await;
    let user = profile(&pool, "seller@example.com", Role::NormalUser).await;
    let (pending, _) = DealershipRepo::submit(&pool, user.id, &registration("Gulf Autos"))
        .await
        .unwrap();

    let err = DealershipRepo::review(
        &pool,
        pending.id,
        admin.id,
        ReviewDecision::Approve,
        None,
        pending.version + 7,
    )
    .await
    .unwrap_err();
    assert_matches!(err, RepoError::Domain(CoreError::StaleVersion { .. }));

    let unchanged = DealershipRepo::find_by_id(&pool, pending.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(unchanged.status, "pending");
    assert_eq!(NotificationRepo::unread_count(&pool, user.id).await.unwrap(), 0);
}

// ---------------------------------------------------------------------------
// Test: approved is terminal
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn approved_dealership_cannot_be_rejected(pool: PgPool) {
    let admin = profile(&pool, "admin@example.com", Role::Admin).await;
    let user = profile(&pool, "seller@example.com", Role::NormalUser).await;
    let approved = common::approved_dealership(&pool, user.id, admin.id).await;

    let err = DealershipRepo::review(
        &pool,
        approved.id,
        admin.id,
        ReviewDecision::Reject,
        None,
        approved.version,
    )
    .await
    .unwrap_err();

    assert_matches!(err, RepoError::Domain(CoreError::InvalidTransition { .. }));
}

// ---------------------------------------------------------------------------
// Test: resubmission after rejection reuses the row and clears the review
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn resubmission_reuses_rejected_row(pool: PgPool) {
    let admin = profile(&pool, "admin@example.com", Role::Admin).await;
    let user = profile(&pool, "seller@example.com", Role::NormalUser).await;
    let (pending, _) = DealershipRepo::submit(&pool, user.id, &registration("Gulf Autos"))
        .await
        .unwrap();

    let rejected = DealershipRepo::review(
        &pool,
        pending.id,
        admin.id,
        ReviewDecision::Reject,
        Some("missing trade licence"),
        pending.version,
    )
    .await
    .unwrap();
    assert_eq!(rejected.dealership.status, "rejected");
    assert!(!rejected.owner_promoted);
    assert_eq!(
        rejected.notification.notification_type,
        NOTIFICATION_DEALERSHIP_REJECTED
    );

    let owner = ProfileRepo::find_by_id(&pool, user.id).await.unwrap().unwrap();
    assert_eq!(owner.role, "normal_user");

    let (again, kind) = DealershipRepo::submit(&pool, user.id, &registration("Gulf Autos LLC"))
        .await
        .unwrap();

    assert_eq!(kind, SubmissionKind::Resubmitted);
    assert_eq!(again.id, pending.id);
    assert_eq!(again.status, "pending");
    assert_eq!(again.business_name, "Gulf Autos LLC");
    assert!(again.reviewer_id.is_none());
    assert!(again.review_notes.is_none());
    assert!(again.reviewed_at.is_none());

    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM dealerships WHERE user_id = $1")
        .bind(user.id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(total, 1);
}

// ---------------------------------------------------------------------------
// Test: admin list filters by status
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_filters_by_status(pool: PgPool) {
    let admin = profile(&pool, "admin@example.com", Role::Admin).await;
    let a = profile(&pool, "a@example.com", Role::NormalUser).await;
    let b = profile(&pool, "b@example.com", Role::NormalUser).await;
    common::approved_dealership(&pool, a.id, admin.id).await;
    DealershipRepo::submit(&pool, b.id, &registration("Waiting Motors"))
        .await
        .unwrap();

    let pending = DealershipRepo::list(
        &pool,
        &DealershipFilter {
            status: Some(souq_core::dealership::DealershipStatus::Pending),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].business_name, "Waiting Motors");

    let all = DealershipRepo::list(&pool, &DealershipFilter::default())
        .await
        .unwrap();
    assert_eq!(all.len(), 2);
}

// ---------------------------------------------------------------------------
// Test: featured toggle flips and flips back
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn toggle_featured_flips(pool: PgPool) {
    let admin = profile(&pool, "admin@example.com", Role::Admin).await;
    let user = profile(&pool, "seller@example.com", Role::NormalUser).await;
    let d = common::approved_dealership(&pool, user.id, admin.id).await;

    let on = DealershipRepo::toggle_featured(&pool, d.id, admin.id)
        .await
        .unwrap()
        .unwrap();
    assert!(on.is_featured);
    assert_eq!(on.status, "approved");

    let off = DealershipRepo::toggle_featured(&pool, d.id, admin.id)
        .await
        .unwrap()
        .unwrap();
    assert!(!off.is_featured);

    assert!(DealershipRepo::toggle_featured(&pool, 999_999, admin.id)
        .await
        .unwrap()
        .is_none());
}

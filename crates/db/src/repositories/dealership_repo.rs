//! Repository for the `dealerships` table and its review workflow.

use souq_core::dealership::{
    plan_submission, validate_transition, DealershipStatus, ReviewDecision, SubmissionPlan,
};
use souq_core::error::CoreError;
use souq_core::pagination::{clamp_limit, clamp_offset, DEFAULT_LIMIT, MAX_LIMIT};
use souq_core::types::{DbId, RowVersion, Timestamp};
use sqlx::PgPool;

use crate::error::RepoError;
use crate::models::admin_log::{NewAdminLog, ENTITY_DEALERSHIP};
use crate::models::dealership::{Dealership, DealershipFilter, SubmitDealership};
use crate::models::notification::{CreateNotification, Notification};
use crate::repositories::{AdminLogRepo, NotificationRepo, ProfileRepo};

/// Column list for `dealerships` queries.
const COLUMNS: &str = "id, user_id, business_name, business_name_ar, description, \
    description_ar, location, location_ar, business_type, dealership_type, status, logo_url, \
    country_id, is_featured, reviewer_id, review_notes, reviewed_at, version, \
    created_at, updated_at";

/// Whether a submission created a row or reused a rejected one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionKind {
    Created,
    Resubmitted,
}

/// Result of an approve / reject decision.
#[derive(Debug)]
pub struct ReviewOutcome {
    pub dealership: Dealership,
    pub notification: Notification,
    /// Set when approval promoted the owner from normal user to dealer.
    pub owner_promoted: bool,
}

/// Result of deleting a dealership.
#[derive(Debug, Clone)]
pub struct DealershipDeletion {
    pub dealership: Dealership,
    /// Database clock at the delete, comparable with `updated_at`.
    pub deleted_at: Timestamp,
}

/// Provides the registration and review workflow for dealerships.
pub struct DealershipRepo;

impl DealershipRepo {
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Dealership>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM dealerships WHERE id = $1");
        sqlx::query_as::<_, Dealership>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// The caller's most recent registration, whatever its status.
    pub async fn find_latest_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<Dealership>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM dealerships \
             WHERE user_id = $1 \
             ORDER BY created_at DESC, id DESC \
             LIMIT 1"
        );
        sqlx::query_as::<_, Dealership>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// The caller's dealership if, and only if, it is approved.
    pub async fn find_approved_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<Dealership>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM dealerships \
             WHERE user_id = $1 AND status = $2 \
             ORDER BY created_at DESC, id DESC \
             LIMIT 1"
        );
        sqlx::query_as::<_, Dealership>(&query)
            .bind(user_id)
            .bind(DealershipStatus::Approved.as_str())
            .fetch_optional(pool)
            .await
    }

    /// An approved dealership, optionally required to sit in a country.
    pub async fn find_public(
        pool: &PgPool,
        id: DbId,
        country_code: Option<&str>,
    ) -> Result<Option<Dealership>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM dealerships \
             WHERE id = $1 AND status = $2 \
               AND ($3::TEXT IS NULL \
                    OR country_id = (SELECT id FROM countries WHERE code = UPPER($3)))"
        );
        sqlx::query_as::<_, Dealership>(&query)
            .bind(id)
            .bind(DealershipStatus::Approved.as_str())
            .bind(country_code)
            .fetch_optional(pool)
            .await
    }

    /// Approved dealerships for the public directory, featured first.
    pub async fn list_public(
        pool: &PgPool,
        country_code: Option<&str>,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<Dealership>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM dealerships \
             WHERE status = $1 \
               AND ($2::TEXT IS NULL \
                    OR country_id = (SELECT id FROM countries WHERE code = UPPER($2))) \
             ORDER BY is_featured DESC, business_name ASC \
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, Dealership>(&query)
            .bind(DealershipStatus::Approved.as_str())
            .bind(country_code)
            .bind(clamp_limit(limit, DEFAULT_LIMIT, MAX_LIMIT))
            .bind(clamp_offset(offset))
            .fetch_all(pool)
            .await
    }

    /// Admin list, optionally filtered by status, newest first.
    pub async fn list(
        pool: &PgPool,
        filter: &DealershipFilter,
    ) -> Result<Vec<Dealership>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM dealerships \
             WHERE ($1::TEXT IS NULL OR status = $1) \
             ORDER BY created_at DESC, id DESC \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Dealership>(&query)
            .bind(filter.status.map(DealershipStatus::as_str))
            .bind(clamp_limit(filter.limit, DEFAULT_LIMIT, MAX_LIMIT))
            .bind(clamp_offset(filter.offset))
            .fetch_all(pool)
            .await
    }

    /// Submit a registration for `user_id`.
    ///
    /// Inserts a pending row, or resets the caller's rejected row to pending
    /// in place, clearing the previous review. The caller's latest row is
    /// locked for the duration so two concurrent submissions serialize; when
    /// there is no row yet the `uq_dealerships_user_id` constraint settles
    /// the race.
    pub async fn submit(
        pool: &PgPool,
        user_id: DbId,
        input: &SubmitDealership,
    ) -> Result<(Dealership, SubmissionKind), RepoError> {
        let mut tx = pool.begin().await?;

        let latest: Option<(DbId, String)> = sqlx::query_as(
            "SELECT id, status FROM dealerships \
             WHERE user_id = $1 \
             ORDER BY created_at DESC, id DESC \
             LIMIT 1 \
             FOR UPDATE",
        )
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;

        let latest = match latest {
            Some((id, status)) => Some((id, status.parse::<DealershipStatus>()?)),
            None => None,
        };

        let (dealership, kind) = match plan_submission(latest)? {
            SubmissionPlan::Insert => {
                let query = format!(
                    "INSERT INTO dealerships \
                        (user_id, business_name, business_name_ar, description, description_ar, \
                         location, location_ar, business_type, dealership_type, logo_url, \
                         country_id, status) \
                     VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) \
                     RETURNING {COLUMNS}"
                );
                let row = sqlx::query_as::<_, Dealership>(&query)
                    .bind(user_id)
                    .bind(&input.business_name)
                    .bind(&input.business_name_ar)
                    .bind(&input.description)
                    .bind(&input.description_ar)
                    .bind(&input.location)
                    .bind(&input.location_ar)
                    .bind(input.business_type.as_str())
                    .bind(input.dealership_type.as_str())
                    .bind(&input.logo_url)
                    .bind(input.country_id)
                    .bind(DealershipStatus::Pending.as_str())
                    .fetch_one(&mut *tx)
                    .await?;
                (row, SubmissionKind::Created)
            }
            SubmissionPlan::Resubmit { dealership_id } => {
                let query = format!(
                    "UPDATE dealerships SET \
                        business_name = $2, business_name_ar = $3, description = $4, \
                        description_ar = $5, location = $6, location_ar = $7, \
                        business_type = $8, dealership_type = $9, logo_url = $10, \
                        country_id = $11, status = $12, \
                        reviewer_id = NULL, review_notes = NULL, reviewed_at = NULL, \
                        version = version + 1 \
                     WHERE id = $1 \
                     RETURNING {COLUMNS}"
                );
                let row = sqlx::query_as::<_, Dealership>(&query)
                    .bind(dealership_id)
                    .bind(&input.business_name)
                    .bind(&input.business_name_ar)
                    .bind(&input.description)
                    .bind(&input.description_ar)
                    .bind(&input.location)
                    .bind(&input.location_ar)
                    .bind(input.business_type.as_str())
                    .bind(input.dealership_type.as_str())
                    .bind(&input.logo_url)
                    .bind(input.country_id)
                    .bind(DealershipStatus::Pending.as_str())
                    .fetch_one(&mut *tx)
                    .await?;
                (row, SubmissionKind::Resubmitted)
            }
        };

        tx.commit().await?;
        Ok((dealership, kind))
    }

    /// Record an admin decision on a pending registration.
    ///
    /// Fails with `StaleVersion` if the row moved past `expected_version`
    /// and with `InvalidTransition` if it is no longer pending. Approval
    /// promotes a normal-user owner to dealer. The status change, role
    /// change, owner notification and admin log commit together.
    pub async fn review(
        pool: &PgPool,
        id: DbId,
        reviewer_id: DbId,
        decision: ReviewDecision,
        notes: Option<&str>,
        expected_version: RowVersion,
    ) -> Result<ReviewOutcome, RepoError> {
        let mut tx = pool.begin().await?;

        let current: (DbId, String, RowVersion) = sqlx::query_as(
            "SELECT user_id, status, version FROM dealerships WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "dealership",
            id,
        })?;
        let (owner_id, status, version) = current;

        if version != expected_version {
            return Err(CoreError::StaleVersion {
                entity: "dealership",
                id,
                expected: expected_version,
            }
            .into());
        }

        let target = decision.target_status();
        validate_transition(status.parse::<DealershipStatus>()?, target)?;

        let query = format!(
            "UPDATE dealerships SET \
                status = $2, reviewer_id = $3, review_notes = $4, reviewed_at = NOW(), \
                version = version + 1 \
             WHERE id = $1 AND version = $5 \
             RETURNING {COLUMNS}"
        );
        let dealership = sqlx::query_as::<_, Dealership>(&query)
            .bind(id)
            .bind(target.as_str())
            .bind(reviewer_id)
            .bind(notes)
            .bind(expected_version)
            .fetch_one(&mut *tx)
            .await?;

        let owner_promoted = match decision {
            ReviewDecision::Approve => ProfileRepo::promote_to_dealer(&mut *tx, owner_id).await?,
            ReviewDecision::Reject => false,
        };

        let (title, message) = match decision {
            ReviewDecision::Approve => (
                "Dealership approved",
                format!("{} is now live on the marketplace.", dealership.business_name),
            ),
            ReviewDecision::Reject => (
                "Dealership registration rejected",
                match notes {
                    Some(reason) => format!(
                        "{} was not approved: {reason}",
                        dealership.business_name
                    ),
                    None => format!("{} was not approved.", dealership.business_name),
                },
            ),
        };
        let notification = NotificationRepo::create(
            &mut *tx,
            &CreateNotification::new(owner_id, decision.notification_type(), title, message),
        )
        .await?;

        AdminLogRepo::record(
            &mut *tx,
            &NewAdminLog {
                admin_id: reviewer_id,
                action: decision.action(),
                entity_type: ENTITY_DEALERSHIP,
                entity_id: id,
                details: serde_json::json!({
                    "notes": notes,
                    "owner_promoted": owner_promoted,
                }),
            },
        )
        .await?;

        tx.commit().await?;
        Ok(ReviewOutcome {
            dealership,
            notification,
            owner_promoted,
        })
    }

    /// Flip `is_featured` in place and log it.
    pub async fn toggle_featured(
        pool: &PgPool,
        id: DbId,
        admin_id: DbId,
    ) -> Result<Option<Dealership>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE dealerships SET is_featured = NOT is_featured \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let Some(dealership) = sqlx::query_as::<_, Dealership>(&query)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        AdminLogRepo::record(
            &mut *tx,
            &NewAdminLog {
                admin_id,
                action: "toggle_dealership_featured",
                entity_type: ENTITY_DEALERSHIP,
                entity_id: id,
                details: serde_json::json!({ "is_featured": dealership.is_featured }),
            },
        )
        .await?;

        tx.commit().await?;
        Ok(Some(dealership))
    }

    /// Delete a dealership together with its listings and their images.
    ///
    /// Returns the deleted row, or `None` if it did not exist.
    pub async fn delete(
        pool: &PgPool,
        id: DbId,
        admin_id: DbId,
    ) -> Result<Option<DealershipDeletion>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query(
            "DELETE FROM car_images WHERE car_id IN (SELECT id FROM cars WHERE dealership_id = $1)",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;
        let cars = sqlx::query("DELETE FROM cars WHERE dealership_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let query = format!("DELETE FROM dealerships WHERE id = $1 RETURNING {COLUMNS}");
        let Some(dealership) = sqlx::query_as::<_, Dealership>(&query)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };
        let deleted_at: Timestamp = sqlx::query_scalar("SELECT clock_timestamp()")
            .fetch_one(&mut *tx)
            .await?;

        AdminLogRepo::record(
            &mut *tx,
            &NewAdminLog {
                admin_id,
                action: "delete_dealership",
                entity_type: ENTITY_DEALERSHIP,
                entity_id: id,
                details: serde_json::json!({
                    "business_name": dealership.business_name,
                    "cars_removed": cars.rows_affected(),
                }),
            },
        )
        .await?;

        tx.commit().await?;
        Ok(Some(DealershipDeletion {
            dealership,
            deleted_at,
        }))
    }
}

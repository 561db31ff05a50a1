//! Repository for the `cars` table: owner and admin workflows plus the
//! gated public queries.

use souq_core::dealership::DealershipStatus;
use souq_core::error::CoreError;
use souq_core::inbox::{
    NOTIFICATION_CAR_REVIEWED, NOTIFICATION_CAR_SOLD, NOTIFICATION_STATUS_CHANGE,
};
use souq_core::listing::{plan_owner_edit, validate_transition, CarStatus};
use souq_core::pagination::{clamp_limit, clamp_offset, DEFAULT_LIMIT, MAX_LIMIT};
use souq_core::types::{DbId, RowVersion, Timestamp};
use sqlx::PgPool;

use crate::error::RepoError;
use crate::models::admin_log::{NewAdminLog, ENTITY_CAR};
use crate::models::car::{Car, CarAdminFilter, CarDetail, CreateCar, PublicCarFilter, UpdateCar};
use crate::models::notification::{CreateNotification, Notification};
use crate::repositories::{AdminLogRepo, CarImageRepo, CatalogRepo, NotificationRepo};
use crate::visibility::{
    bind_values, bind_values_scalar, build_public_filter, PublicScope, CAR_COLUMNS_C, PUBLIC_ORDER,
};

/// Column list for `cars` queries.
const COLUMNS: &str = "id, user_id, dealership_id, country_id, brand_id, model_id, year, \
    mileage, price, fuel_type, gearbox_type, body_type, condition, description, status, \
    is_featured, views, version, created_at, updated_at";

/// Who is changing a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Actor {
    Owner(DbId),
    Admin(DbId),
}

/// A listing after a workflow step, with the notification it produced.
#[derive(Debug)]
pub struct CarChange {
    pub car: Car,
    pub notification: Option<Notification>,
}

/// Result of deleting a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CarDeletion {
    pub car_id: DbId,
    pub owner_id: DbId,
    pub images_removed: u64,
    /// Database clock at the delete, comparable with `updated_at`.
    pub deleted_at: Timestamp,
}

/// Provides listing CRUD, status workflow and public queries.
pub struct CarRepo;

impl CarRepo {
    /// Create a `Pending` listing owned by `user_id`, with its images.
    ///
    /// A `dealership_id` must name the caller's own approved dealership, and
    /// the model must belong to the brand.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateCar,
    ) -> Result<CarDetail, RepoError> {
        let mut tx = pool.begin().await?;

        if let Some(dealership_id) = input.dealership_id {
            let row: Option<(DbId, String)> = sqlx::query_as(
                "SELECT user_id, status FROM dealerships WHERE id = $1 FOR SHARE",
            )
            .bind(dealership_id)
            .fetch_optional(&mut *tx)
            .await?;
            let (owner_id, status) = row.ok_or(CoreError::NotFound {
                entity: "dealership",
                id: dealership_id,
            })?;
            if owner_id != user_id {
                return Err(CoreError::Forbidden(
                    "Listings can only be attached to your own dealership".to_string(),
                )
                .into());
            }
            if !status.parse::<DealershipStatus>()?.is_live() {
                return Err(CoreError::Forbidden(
                    "Dealership must be approved before it can list cars".to_string(),
                )
                .into());
            }
        }

        if !CatalogRepo::model_belongs_to_brand(&mut *tx, input.model_id, input.brand_id).await? {
            return Err(
                CoreError::Validation("model_id does not belong to brand_id".to_string()).into(),
            );
        }

        let query = format!(
            "INSERT INTO cars \
                (user_id, dealership_id, country_id, brand_id, model_id, year, mileage, price, \
                 fuel_type, gearbox_type, body_type, condition, description, status) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14) \
             RETURNING {COLUMNS}"
        );
        let car = sqlx::query_as::<_, Car>(&query)
            .bind(user_id)
            .bind(input.dealership_id)
            .bind(input.country_id)
            .bind(input.brand_id)
            .bind(input.model_id)
            .bind(input.year)
            .bind(input.mileage)
            .bind(input.price)
            .bind(&input.fuel_type)
            .bind(&input.gearbox_type)
            .bind(&input.body_type)
            .bind(&input.condition)
            .bind(&input.description)
            .bind(CarStatus::Pending.as_str())
            .fetch_one(&mut *tx)
            .await?;

        let images = CarImageRepo::insert_many(&mut tx, car.id, &input.image_urls).await?;

        tx.commit().await?;
        Ok(CarDetail { car, images })
    }

    /// Fetch any listing regardless of status. Callers must apply the
    /// ownership / admin check themselves.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Car>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM cars WHERE id = $1");
        sqlx::query_as::<_, Car>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Fetch a publicly visible listing and count the view.
    ///
    /// Hidden listings return `None` and are not counted.
    pub async fn record_public_view(
        pool: &PgPool,
        id: DbId,
        country_code: Option<&str>,
    ) -> Result<Option<Car>, sqlx::Error> {
        let scope = PublicScope {
            country_code,
            car_id: Some(id),
            ..Default::default()
        };
        let (where_clause, binds, _) = build_public_filter(scope, &PublicCarFilter::default());
        let query = format!(
            "UPDATE cars c SET views = c.views + 1 {where_clause} RETURNING {CAR_COLUMNS_C}"
        );
        bind_values(sqlx::query_as::<_, Car>(&query), &binds)
            .fetch_optional(pool)
            .await
    }

    /// Publicly visible listings, featured first then newest.
    pub async fn list_public(
        pool: &PgPool,
        scope: PublicScope<'_>,
        filter: &PublicCarFilter,
    ) -> Result<Vec<Car>, sqlx::Error> {
        let (where_clause, binds, bind_idx) = build_public_filter(scope, filter);
        let query = format!(
            "SELECT {CAR_COLUMNS_C} FROM cars c {where_clause} {PUBLIC_ORDER} \
             LIMIT ${bind_idx} OFFSET ${}",
            bind_idx + 1
        );
        bind_values(sqlx::query_as::<_, Car>(&query), &binds)
            .bind(clamp_limit(filter.limit, DEFAULT_LIMIT, MAX_LIMIT))
            .bind(clamp_offset(filter.offset))
            .fetch_all(pool)
            .await
    }

    /// Total number of publicly visible listings matching the filter.
    pub async fn count_public(
        pool: &PgPool,
        scope: PublicScope<'_>,
        filter: &PublicCarFilter,
    ) -> Result<i64, sqlx::Error> {
        let (where_clause, binds, _) = build_public_filter(scope, filter);
        let query = format!("SELECT COUNT(*) FROM cars c {where_clause}");
        bind_values_scalar(sqlx::query_scalar::<_, i64>(&query), &binds)
            .fetch_one(pool)
            .await
    }

    /// All of a user's listings, any status, newest first.
    pub async fn list_for_user(pool: &PgPool, user_id: DbId) -> Result<Vec<Car>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM cars WHERE user_id = $1 ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Car>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// All listings of a dealership, any status, newest first.
    pub async fn list_for_dealership(
        pool: &PgPool,
        dealership_id: DbId,
    ) -> Result<Vec<Car>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM cars WHERE dealership_id = $1 \
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Car>(&query)
            .bind(dealership_id)
            .fetch_all(pool)
            .await
    }

    /// Admin review queue / listing browser.
    pub async fn list_admin(
        pool: &PgPool,
        filter: &CarAdminFilter,
    ) -> Result<Vec<Car>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM cars \
             WHERE ($1::TEXT IS NULL OR status = $1) \
             ORDER BY created_at DESC, id DESC \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Car>(&query)
            .bind(filter.status.map(CarStatus::as_str))
            .bind(clamp_limit(filter.limit, DEFAULT_LIMIT, MAX_LIMIT))
            .bind(clamp_offset(filter.offset))
            .fetch_all(pool)
            .await
    }

    /// Apply an owner edit.
    ///
    /// Editing an Approved listing sends it back to Pending and notifies
    /// the owner in the same transaction. Editing a Rejected listing
    /// resubmits it. Sold listings cannot be edited.
    pub async fn update_by_owner(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
        input: &UpdateCar,
    ) -> Result<CarChange, RepoError> {
        let mut tx = pool.begin().await?;
        let car = Self::lock(&mut tx, id).await?;

        if car.user_id != user_id {
            return Err(CoreError::Forbidden("You do not own this listing".to_string()).into());
        }
        check_version(&car, input.expected_version)?;
        let outcome = plan_owner_edit(car.status()?)?;

        let brand_id = input.brand_id.unwrap_or(car.brand_id);
        let model_id = input.model_id.unwrap_or(car.model_id);
        if (brand_id, model_id) != (car.brand_id, car.model_id)
            && !CatalogRepo::model_belongs_to_brand(&mut *tx, model_id, brand_id).await?
        {
            return Err(
                CoreError::Validation("model_id does not belong to brand_id".to_string()).into(),
            );
        }

        let query = format!(
            "UPDATE cars SET \
                brand_id = $2, model_id = $3, \
                year = COALESCE($4, year), mileage = COALESCE($5, mileage), \
                price = COALESCE($6, price), fuel_type = COALESCE($7, fuel_type), \
                gearbox_type = COALESCE($8, gearbox_type), body_type = COALESCE($9, body_type), \
                condition = COALESCE($10, condition), description = COALESCE($11, description), \
                status = $12, version = version + 1 \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Car>(&query)
            .bind(id)
            .bind(brand_id)
            .bind(model_id)
            .bind(input.year)
            .bind(input.mileage)
            .bind(input.price)
            .bind(&input.fuel_type)
            .bind(&input.gearbox_type)
            .bind(&input.body_type)
            .bind(&input.condition)
            .bind(&input.description)
            .bind(outcome.status.as_str())
            .fetch_one(&mut *tx)
            .await?;

        let notification = if outcome.notify_owner {
            Some(
                NotificationRepo::create(
                    &mut *tx,
                    &CreateNotification::new(
                        updated.user_id,
                        NOTIFICATION_STATUS_CHANGE,
                        "Listing sent back for review",
                        format!(
                            "Your edit to listing #{} needs admin approval before it is \
                             shown again.",
                            updated.id
                        ),
                    ),
                )
                .await?,
            )
        } else {
            None
        };

        tx.commit().await?;
        Ok(CarChange {
            car: updated,
            notification,
        })
    }

    /// Move a listing to `target` with a version check.
    ///
    /// Owners may only mark their own listings sold; admins approve or
    /// reject. The owner is notified either way and admin actions are
    /// logged.
    pub async fn set_status(
        pool: &PgPool,
        id: DbId,
        target: CarStatus,
        expected_version: RowVersion,
        actor: Actor,
    ) -> Result<CarChange, RepoError> {
        let mut tx = pool.begin().await?;
        let car = Self::lock(&mut tx, id).await?;

        match actor {
            Actor::Owner(user_id) => {
                if car.user_id != user_id {
                    return Err(
                        CoreError::Forbidden("You do not own this listing".to_string()).into(),
                    );
                }
                if target != CarStatus::Sold {
                    return Err(CoreError::Forbidden(
                        "Only administrators can review listings".to_string(),
                    )
                    .into());
                }
            }
            Actor::Admin(_) => {
                if !matches!(target, CarStatus::Approved | CarStatus::Rejected) {
                    return Err(CoreError::Validation(format!(
                        "Admins cannot move a listing to {target}"
                    ))
                    .into());
                }
            }
        }

        check_version(&car, expected_version)?;
        validate_transition(car.status()?, target)?;

        let query = format!(
            "UPDATE cars SET status = $2, version = version + 1 \
             WHERE id = $1 AND version = $3 \
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Car>(&query)
            .bind(id)
            .bind(target.as_str())
            .bind(expected_version)
            .fetch_one(&mut *tx)
            .await?;

        let (kind, title) = match target {
            CarStatus::Sold => (NOTIFICATION_CAR_SOLD, "Listing marked as sold"),
            CarStatus::Approved => (NOTIFICATION_CAR_REVIEWED, "Listing approved"),
            _ => (NOTIFICATION_CAR_REVIEWED, "Listing rejected"),
        };
        let notification = NotificationRepo::create(
            &mut *tx,
            &CreateNotification::new(
                updated.user_id,
                kind,
                title,
                format!("Listing #{} is now {target}.", updated.id),
            ),
        )
        .await?;

        if let Actor::Admin(admin_id) = actor {
            let action = match target {
                CarStatus::Approved => "approve_car",
                _ => "reject_car",
            };
            AdminLogRepo::record(
                &mut *tx,
                &NewAdminLog {
                    admin_id,
                    action,
                    entity_type: ENTITY_CAR,
                    entity_id: id,
                    details: serde_json::json!({ "from": car.status, "to": target.as_str() }),
                },
            )
            .await?;
        }

        tx.commit().await?;
        Ok(CarChange {
            car: updated,
            notification: Some(notification),
        })
    }

    /// Flip `is_featured` in place and log it.
    pub async fn toggle_featured(
        pool: &PgPool,
        id: DbId,
        admin_id: DbId,
    ) -> Result<Option<Car>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE cars SET is_featured = NOT is_featured WHERE id = $1 RETURNING {COLUMNS}"
        );
        let Some(car) = sqlx::query_as::<_, Car>(&query)
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
                action: "toggle_car_featured",
                entity_type: ENTITY_CAR,
                entity_id: id,
                details: serde_json::json!({ "is_featured": car.is_featured }),
            },
        )
        .await?;

        tx.commit().await?;
        Ok(Some(car))
    }

    /// Delete a listing, removing its images first in the same transaction.
    pub async fn delete(pool: &PgPool, id: DbId, actor: Actor) -> Result<CarDeletion, RepoError> {
        let mut tx = pool.begin().await?;
        let car = Self::lock(&mut tx, id).await?;

        if let Actor::Owner(user_id) = actor {
            if car.user_id != user_id {
                return Err(
                    CoreError::Forbidden("You do not own this listing".to_string()).into(),
                );
            }
        }

        let images_removed = CarImageRepo::delete_for_car(&mut tx, id).await?;
        let deleted_at: Timestamp =
            sqlx::query_scalar("DELETE FROM cars WHERE id = $1 RETURNING clock_timestamp()")
                .bind(id)
                .fetch_one(&mut *tx)
                .await?;

        if let Actor::Admin(admin_id) = actor {
            AdminLogRepo::record(
                &mut *tx,
                &NewAdminLog {
                    admin_id,
                    action: "delete_car",
                    entity_type: ENTITY_CAR,
                    entity_id: id,
                    details: serde_json::json!({ "images_removed": images_removed }),
                },
            )
            .await?;
        }

        tx.commit().await?;
        Ok(CarDeletion {
            car_id: id,
            owner_id: car.user_id,
            images_removed,
            deleted_at,
        })
    }

    /// Lock a listing row for the rest of the transaction.
    async fn lock(tx: &mut sqlx::PgConnection, id: DbId) -> Result<Car, RepoError> {
        let query = format!("SELECT {COLUMNS} FROM cars WHERE id = $1 FOR UPDATE");
        let car = sqlx::query_as::<_, Car>(&query)
            .bind(id)
            .fetch_optional(tx)
            .await?
            .ok_or(CoreError::NotFound { entity: "car", id })?;
        Ok(car)
    }
}

fn check_version(car: &Car, expected: RowVersion) -> Result<(), CoreError> {
    if car.version == expected {
        Ok(())
    } else {
        Err(CoreError::StaleVersion {
            entity: "car",
            id: car.id,
            expected,
        })
    }
}

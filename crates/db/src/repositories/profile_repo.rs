//! Repository for the `profiles` table.

use souq_core::roles::Role;
use souq_core::types::DbId;
use sqlx::PgPool;

use crate::models::admin_log::{NewAdminLog, ENTITY_PROFILE};
use crate::models::profile::{CreateProfile, Profile, UpdateProfile};
use crate::repositories::AdminLogRepo;

/// Column list for `profiles` queries.
const COLUMNS: &str =
    "id, email, full_name, phone_number, role, country_id, city_id, created_at, updated_at";

/// Provides lookups and self-service updates for profiles.
pub struct ProfileRepo;

impl ProfileRepo {
    /// Provision a profile row, returning it.
    pub async fn create(pool: &PgPool, input: &CreateProfile) -> Result<Profile, sqlx::Error> {
        let role = input.role.unwrap_or(Role::NormalUser);
        let query = format!(
            "INSERT INTO profiles (email, full_name, phone_number, role, country_id, city_id) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Profile>(&query)
            .bind(&input.email)
            .bind(&input.full_name)
            .bind(&input.phone_number)
            .bind(role.as_str())
            .bind(input.country_id)
            .bind(input.city_id)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Profile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM profiles WHERE id = $1");
        sqlx::query_as::<_, Profile>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List profiles, newest first.
    pub async fn list(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<Profile>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM profiles ORDER BY created_at DESC LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, Profile>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Patch the caller's own profile. `None` fields are left unchanged.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProfile,
    ) -> Result<Option<Profile>, sqlx::Error> {
        let query = format!(
            "UPDATE profiles SET \
                full_name = COALESCE($2, full_name), \
                phone_number = COALESCE($3, phone_number), \
                country_id = COALESCE($4, country_id), \
                city_id = COALESCE($5, city_id) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Profile>(&query)
            .bind(id)
            .bind(&input.full_name)
            .bind(&input.phone_number)
            .bind(input.country_id)
            .bind(input.city_id)
            .fetch_optional(pool)
            .await
    }

    /// Set a profile's role. Works on a pool or inside a transaction.
    pub async fn set_role<'e, E>(
        executor: E,
        id: DbId,
        role: Role,
    ) -> Result<Option<Profile>, sqlx::Error>
    where
        E: sqlx::PgExecutor<'e>,
    {
        let query = format!("UPDATE profiles SET role = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Profile>(&query)
            .bind(id)
            .bind(role.as_str())
            .fetch_optional(executor)
            .await
    }

    /// Promote a normal user to dealer. Admins keep their role.
    pub async fn promote_to_dealer<'e, E>(executor: E, id: DbId) -> Result<bool, sqlx::Error>
    where
        E: sqlx::PgExecutor<'e>,
    {
        let result = sqlx::query("UPDATE profiles SET role = $2 WHERE id = $1 AND role = $3")
            .bind(id)
            .bind(Role::Dealer.as_str())
            .bind(Role::NormalUser.as_str())
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Admin role change. The update and its admin log row commit together.
    pub async fn assign_role(
        pool: &PgPool,
        id: DbId,
        role: Role,
        admin_id: DbId,
    ) -> Result<Option<Profile>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let previous: Option<String> =
            sqlx::query_scalar("SELECT role FROM profiles WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some(previous) = previous else {
            return Ok(None);
        };

        let profile = Self::set_role(&mut *tx, id, role).await?;

        AdminLogRepo::record(
            &mut *tx,
            &NewAdminLog {
                admin_id,
                action: "change_role",
                entity_type: ENTITY_PROFILE,
                entity_id: id,
                details: serde_json::json!({ "from": previous, "to": role.as_str() }),
            },
        )
        .await?;

        tx.commit().await?;
        Ok(profile)
    }
}

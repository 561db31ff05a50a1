//! Repository for the `admin_logs` table.

use souq_core::pagination::{clamp_limit, clamp_offset, DEFAULT_LIMIT, MAX_LIMIT};
use souq_core::types::DbId;
use sqlx::PgPool;

use crate::models::admin_log::{AdminLog, AdminLogFilter, NewAdminLog};

const COLUMNS: &str = "id, admin_id, action, entity_type, entity_id, details, created_at";

/// Append-only audit trail of admin mutations.
pub struct AdminLogRepo;

impl AdminLogRepo {
    /// Record one admin action. Pass the open transaction so the log row
    /// commits or rolls back with the mutation it describes.
    pub async fn record<'e, E>(executor: E, entry: &NewAdminLog<'_>) -> Result<DbId, sqlx::Error>
    where
        E: sqlx::PgExecutor<'e>,
    {
        sqlx::query_scalar(
            "INSERT INTO admin_logs (admin_id, action, entity_type, entity_id, details) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING id",
        )
        .bind(entry.admin_id)
        .bind(entry.action)
        .bind(entry.entity_type)
        .bind(entry.entity_id)
        .bind(&entry.details)
        .fetch_one(executor)
        .await
    }

    /// List log rows newest first, optionally narrowed to one entity.
    pub async fn list(pool: &PgPool, filter: &AdminLogFilter) -> Result<Vec<AdminLog>, sqlx::Error> {
        let limit = clamp_limit(filter.limit, DEFAULT_LIMIT, MAX_LIMIT);
        let offset = clamp_offset(filter.offset);
        let query = format!(
            "SELECT {COLUMNS} FROM admin_logs \
             WHERE ($1::TEXT IS NULL OR entity_type = $1) \
               AND ($2::BIGINT IS NULL OR entity_id = $2) \
             ORDER BY created_at DESC, id DESC \
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, AdminLog>(&query)
            .bind(&filter.entity_type)
            .bind(filter.entity_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }
}

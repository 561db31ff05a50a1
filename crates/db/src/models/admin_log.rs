//! Admin audit trail.

use serde::{Deserialize, Serialize};
use souq_core::types::{DbId, Timestamp};
use sqlx::FromRow;

pub const ENTITY_DEALERSHIP: &str = "dealership";
pub const ENTITY_CAR: &str = "car";
pub const ENTITY_PROFILE: &str = "profile";
pub const ENTITY_CONTACT_MESSAGE: &str = "contact_message";

/// A row from the `admin_logs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AdminLog {
    pub id: DbId,
    pub admin_id: DbId,
    pub action: String,
    pub entity_type: String,
    pub entity_id: DbId,
    pub details: serde_json::Value,
    pub created_at: Timestamp,
}

/// One admin action to record.
#[derive(Debug, Clone)]
pub struct NewAdminLog<'a> {
    pub admin_id: DbId,
    pub action: &'a str,
    pub entity_type: &'a str,
    pub entity_id: DbId,
    pub details: serde_json::Value,
}

#[derive(Debug, Default, Deserialize)]
pub struct AdminLogFilter {
    pub entity_type: Option<String>,
    pub entity_id: Option<DbId>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

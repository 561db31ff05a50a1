//! Profile entity model and DTOs.

use serde::{Deserialize, Serialize};
use souq_core::error::CoreError;
use souq_core::roles::Role;
use souq_core::types::{DbId, Timestamp};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `profiles` table.
///
/// Accounts are created by the external auth provider; this row holds the
/// marketplace-side attributes.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Profile {
    pub id: DbId,
    pub email: String,
    pub full_name: Option<String>,
    pub phone_number: Option<String>,
    pub role: String,
    pub country_id: Option<DbId>,
    pub city_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Profile {
    pub fn role(&self) -> Result<Role, CoreError> {
        self.role.parse()
    }
}

/// DTO for provisioning a profile row.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateProfile {
    #[validate(email)]
    pub email: String,
    #[validate(length(max = 200))]
    pub full_name: Option<String>,
    #[validate(length(max = 32))]
    pub phone_number: Option<String>,
    pub role: Option<Role>,
    pub country_id: Option<DbId>,
    pub city_id: Option<DbId>,
}

/// Self-service profile patch. All fields are optional.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfile {
    #[validate(length(min = 1, max = 200))]
    pub full_name: Option<String>,
    #[validate(length(min = 3, max = 32))]
    pub phone_number: Option<String>,
    pub country_id: Option<DbId>,
    pub city_id: Option<DbId>,
}

/// Admin request to change a profile's role.
#[derive(Debug, Deserialize)]
pub struct UpdateRole {
    pub role: Role,
}

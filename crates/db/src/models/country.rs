//! Country and city lookup rows.

use serde::{Deserialize, Serialize};
use souq_core::types::{DbId, Timestamp};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `countries` table. `code` is ISO 3166 alpha-2, upper case.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Country {
    pub id: DbId,
    pub code: String,
    pub name: String,
    pub name_ar: Option<String>,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct City {
    pub id: DbId,
    pub country_id: DbId,
    pub name: String,
    pub name_ar: Option<String>,
    pub created_at: Timestamp,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCountry {
    #[validate(length(equal = 2))]
    pub code: String,
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(max = 100))]
    pub name_ar: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCity {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(max = 100))]
    pub name_ar: Option<String>,
}

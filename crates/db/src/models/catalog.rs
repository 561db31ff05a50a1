//! Brand and model catalog.

use serde::{Deserialize, Serialize};
use souq_core::types::{DbId, Timestamp};
use sqlx::FromRow;
use validator::Validate;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Brand {
    pub id: DbId,
    pub name: String,
    pub name_ar: Option<String>,
    pub logo_url: Option<String>,
    pub created_at: Timestamp,
}

/// A row from the `car_models` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CarModel {
    pub id: DbId,
    pub brand_id: DbId,
    pub name: String,
    pub name_ar: Option<String>,
    pub created_at: Timestamp,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateBrand {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(max = 100))]
    pub name_ar: Option<String>,
    #[validate(url)]
    pub logo_url: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCarModel {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(max = 100))]
    pub name_ar: Option<String>,
}

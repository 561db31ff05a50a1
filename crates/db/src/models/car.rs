//! Car listing and car image models and DTOs.

use serde::{Deserialize, Serialize};
use souq_core::error::CoreError;
use souq_core::listing::CarStatus;
use souq_core::realtime::Versioned;
use souq_core::types::{DbId, RowVersion, Timestamp};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `cars` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Car {
    pub id: DbId,
    pub user_id: DbId,
    pub dealership_id: Option<DbId>,
    pub country_id: Option<DbId>,
    pub brand_id: DbId,
    pub model_id: DbId,
    pub year: i32,
    pub mileage: i32,
    pub price: i64,
    pub fuel_type: Option<String>,
    pub gearbox_type: Option<String>,
    pub body_type: Option<String>,
    pub condition: Option<String>,
    pub description: Option<String>,
    pub status: String,
    pub is_featured: bool,
    pub views: i64,
    pub version: RowVersion,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Car {
    pub fn status(&self) -> Result<CarStatus, CoreError> {
        self.status.parse()
    }
}

impl Versioned for Car {
    fn id(&self) -> DbId {
        self.id
    }

    fn updated_at(&self) -> Timestamp {
        self.updated_at
    }
}

/// A row from the `car_images` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CarImage {
    pub id: DbId,
    pub car_id: DbId,
    pub url: String,
    pub is_primary: bool,
    pub created_at: Timestamp,
}

/// A listing with its images, as returned by single-car endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct CarDetail {
    #[serde(flatten)]
    pub car: Car,
    pub images: Vec<CarImage>,
}

/// DTO for creating a listing. New listings always start `Pending`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCar {
    /// Must be the caller's own approved dealership when set.
    pub dealership_id: Option<DbId>,
    pub country_id: Option<DbId>,
    pub brand_id: DbId,
    pub model_id: DbId,
    #[validate(range(min = 1900, max = 2100))]
    pub year: i32,
    #[validate(range(min = 0))]
    pub mileage: i32,
    #[validate(range(min = 1))]
    pub price: i64,
    #[validate(length(max = 50))]
    pub fuel_type: Option<String>,
    #[validate(length(max = 50))]
    pub gearbox_type: Option<String>,
    #[validate(length(max = 50))]
    pub body_type: Option<String>,
    #[validate(length(max = 50))]
    pub condition: Option<String>,
    #[validate(length(max = 5000))]
    pub description: Option<String>,
    /// Already-uploaded image URLs; the first becomes the primary image.
    #[serde(default)]
    #[validate(length(max = 20))]
    pub image_urls: Vec<String>,
}

/// Owner patch for a listing. All content fields are optional.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateCar {
    pub brand_id: Option<DbId>,
    pub model_id: Option<DbId>,
    #[validate(range(min = 1900, max = 2100))]
    pub year: Option<i32>,
    #[validate(range(min = 0))]
    pub mileage: Option<i32>,
    #[validate(range(min = 1))]
    pub price: Option<i64>,
    #[validate(length(max = 50))]
    pub fuel_type: Option<String>,
    #[validate(length(max = 50))]
    pub gearbox_type: Option<String>,
    #[validate(length(max = 50))]
    pub body_type: Option<String>,
    #[validate(length(max = 50))]
    pub condition: Option<String>,
    #[validate(length(max = 5000))]
    pub description: Option<String>,
    pub expected_version: RowVersion,
}

/// Body for status-only transitions (approve, reject, mark sold).
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct StatusChange {
    pub expected_version: RowVersion,
}

/// DTO for attaching an already-uploaded image.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCarImage {
    #[validate(url)]
    pub url: String,
    pub is_primary: Option<bool>,
}

/// Filters for public listing queries.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PublicCarFilter {
    pub brand_id: Option<DbId>,
    pub model_id: Option<DbId>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    pub min_year: Option<i32>,
    pub max_year: Option<i32>,
    pub body_type: Option<String>,
    pub fuel_type: Option<String>,
    pub featured: Option<bool>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Admin list filter.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CarAdminFilter {
    pub status: Option<CarStatus>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

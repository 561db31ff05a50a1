//! Dealership entity model and DTOs.

use serde::{Deserialize, Serialize};
use souq_core::dealership::{BusinessType, DealershipStatus, DealershipType};
use souq_core::error::CoreError;
use souq_core::realtime::Versioned;
use souq_core::types::{DbId, RowVersion, Timestamp};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `dealerships` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Dealership {
    pub id: DbId,
    pub user_id: DbId,
    pub business_name: String,
    pub business_name_ar: Option<String>,
    pub description: Option<String>,
    pub description_ar: Option<String>,
    pub location: Option<String>,
    pub location_ar: Option<String>,
    pub business_type: String,
    pub dealership_type: String,
    pub status: String,
    pub logo_url: Option<String>,
    pub country_id: Option<DbId>,
    pub is_featured: bool,
    pub reviewer_id: Option<DbId>,
    pub review_notes: Option<String>,
    pub reviewed_at: Option<Timestamp>,
    pub version: RowVersion,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Dealership {
    pub fn status(&self) -> Result<DealershipStatus, CoreError> {
        self.status.parse()
    }
}

impl Versioned for Dealership {
    fn id(&self) -> DbId {
        self.id
    }

    fn updated_at(&self) -> Timestamp {
        self.updated_at
    }
}

/// Registration form submitted by a prospective dealer.
///
/// Used for both first submissions and resubmissions after a rejection.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SubmitDealership {
    #[validate(length(min = 2, max = 200))]
    pub business_name: String,
    #[validate(length(max = 200))]
    pub business_name_ar: Option<String>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[validate(length(max = 2000))]
    pub description_ar: Option<String>,
    #[validate(length(max = 300))]
    pub location: Option<String>,
    #[validate(length(max = 300))]
    pub location_ar: Option<String>,
    pub business_type: BusinessType,
    pub dealership_type: DealershipType,
    #[validate(url)]
    pub logo_url: Option<String>,
    pub country_id: Option<DbId>,
}

/// Admin decision payload for approve / reject.
#[derive(Debug, Deserialize, Validate)]
pub struct ReviewDealership {
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
    /// The `version` the reviewer saw; a mismatch means someone else acted first.
    pub expected_version: RowVersion,
}

/// Admin list filter.
#[derive(Debug, Default, Deserialize)]
pub struct DealershipFilter {
    pub status: Option<DealershipStatus>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

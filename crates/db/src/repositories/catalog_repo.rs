//! Repository for the `brands` and `car_models` tables.

use souq_core::types::DbId;
use sqlx::PgPool;

use crate::models::catalog::{Brand, CarModel, CreateBrand, CreateCarModel};

const BRAND_COLUMNS: &str = "id, name, name_ar, logo_url, created_at";
const MODEL_COLUMNS: &str = "id, brand_id, name, name_ar, created_at";

pub struct CatalogRepo;

impl CatalogRepo {
    pub async fn list_brands(pool: &PgPool) -> Result<Vec<Brand>, sqlx::Error> {
        let query = format!("SELECT {BRAND_COLUMNS} FROM brands ORDER BY name");
        sqlx::query_as::<_, Brand>(&query).fetch_all(pool).await
    }

    pub async fn create_brand(pool: &PgPool, input: &CreateBrand) -> Result<Brand, sqlx::Error> {
        let query = format!(
            "INSERT INTO brands (name, name_ar, logo_url) VALUES ($1, $2, $3) \
             RETURNING {BRAND_COLUMNS}"
        );
        sqlx::query_as::<_, Brand>(&query)
            .bind(&input.name)
            .bind(&input.name_ar)
            .bind(&input.logo_url)
            .fetch_one(pool)
            .await
    }

    /// Models of one brand ordered by name.
    pub async fn list_models(pool: &PgPool, brand_id: DbId) -> Result<Vec<CarModel>, sqlx::Error> {
        let query =
            format!("SELECT {MODEL_COLUMNS} FROM car_models WHERE brand_id = $1 ORDER BY name");
        sqlx::query_as::<_, CarModel>(&query)
            .bind(brand_id)
            .fetch_all(pool)
            .await
    }

    pub async fn create_model(
        pool: &PgPool,
        brand_id: DbId,
        input: &CreateCarModel,
    ) -> Result<CarModel, sqlx::Error> {
        let query = format!(
            "INSERT INTO car_models (brand_id, name, name_ar) VALUES ($1, $2, $3) \
             RETURNING {MODEL_COLUMNS}"
        );
        sqlx::query_as::<_, CarModel>(&query)
            .bind(brand_id)
            .bind(&input.name)
            .bind(&input.name_ar)
            .fetch_one(pool)
            .await
    }

    /// Whether `model_id` exists and belongs to `brand_id`.
    pub async fn model_belongs_to_brand<'e, E>(
        executor: E,
        model_id: DbId,
        brand_id: DbId,
    ) -> Result<bool, sqlx::Error>
    where
        E: sqlx::PgExecutor<'e>,
    {
        let found: Option<i32> =
            sqlx::query_scalar("SELECT 1 FROM car_models WHERE id = $1 AND brand_id = $2")
                .bind(model_id)
                .bind(brand_id)
                .fetch_optional(executor)
                .await?;
        Ok(found.is_some())
    }
}

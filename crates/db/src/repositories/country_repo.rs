//! Repository for the `countries` and `cities` tables.

use souq_core::types::DbId;
use sqlx::PgPool;

use crate::models::country::{City, Country, CreateCity, CreateCountry};

const COUNTRY_COLUMNS: &str = "id, code, name, name_ar, created_at";
const CITY_COLUMNS: &str = "id, country_id, name, name_ar, created_at";

pub struct CountryRepo;

impl CountryRepo {
    /// All countries ordered by name.
    pub async fn list(pool: &PgPool) -> Result<Vec<Country>, sqlx::Error> {
        let query = format!("SELECT {COUNTRY_COLUMNS} FROM countries ORDER BY name");
        sqlx::query_as::<_, Country>(&query).fetch_all(pool).await
    }

    /// Look up a country by ISO code, case-insensitively.
    pub async fn find_by_code(pool: &PgPool, code: &str) -> Result<Option<Country>, sqlx::Error> {
        let query = format!("SELECT {COUNTRY_COLUMNS} FROM countries WHERE code = UPPER($1)");
        sqlx::query_as::<_, Country>(&query)
            .bind(code)
            .fetch_optional(pool)
            .await
    }

    pub async fn create(pool: &PgPool, input: &CreateCountry) -> Result<Country, sqlx::Error> {
        let query = format!(
            "INSERT INTO countries (code, name, name_ar) VALUES (UPPER($1), $2, $3) \
             RETURNING {COUNTRY_COLUMNS}"
        );
        sqlx::query_as::<_, Country>(&query)
            .bind(&input.code)
            .bind(&input.name)
            .bind(&input.name_ar)
            .fetch_one(pool)
            .await
    }

    pub async fn list_cities(pool: &PgPool, country_id: DbId) -> Result<Vec<City>, sqlx::Error> {
        let query =
            format!("SELECT {CITY_COLUMNS} FROM cities WHERE country_id = $1 ORDER BY name");
        sqlx::query_as::<_, City>(&query)
            .bind(country_id)
            .fetch_all(pool)
            .await
    }

    pub async fn create_city(
        pool: &PgPool,
        country_id: DbId,
        input: &CreateCity,
    ) -> Result<City, sqlx::Error> {
        let query = format!(
            "INSERT INTO cities (country_id, name, name_ar) VALUES ($1, $2, $3) \
             RETURNING {CITY_COLUMNS}"
        );
        sqlx::query_as::<_, City>(&query)
            .bind(country_id)
            .bind(&input.name)
            .bind(&input.name_ar)
            .fetch_one(pool)
            .await
    }
}

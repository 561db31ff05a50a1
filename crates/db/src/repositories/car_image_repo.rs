//! Repository for the `car_images` table.

use souq_core::types::DbId;
use sqlx::PgPool;

use crate::models::car::{CarImage, CreateCarImage};

const COLUMNS: &str = "id, car_id, url, is_primary, created_at";

pub struct CarImageRepo;

impl CarImageRepo {
    /// Images of one car, primary first.
    pub async fn list_for_car(pool: &PgPool, car_id: DbId) -> Result<Vec<CarImage>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM car_images WHERE car_id = $1 \
             ORDER BY is_primary DESC, id ASC"
        );
        sqlx::query_as::<_, CarImage>(&query)
            .bind(car_id)
            .fetch_all(pool)
            .await
    }

    /// Insert a batch of URLs for a new listing. The first one is primary.
    pub async fn insert_many(
        conn: &mut sqlx::PgConnection,
        car_id: DbId,
        urls: &[String],
    ) -> Result<Vec<CarImage>, sqlx::Error> {
        let query = format!(
            "INSERT INTO car_images (car_id, url, is_primary) VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        let mut images = Vec::with_capacity(urls.len());
        for (idx, url) in urls.iter().enumerate() {
            let image = sqlx::query_as::<_, CarImage>(&query)
                .bind(car_id)
                .bind(url)
                .bind(idx == 0)
                .fetch_one(&mut *conn)
                .await?;
            images.push(image);
        }
        Ok(images)
    }

    /// Attach one image. The first image of a car, or one flagged
    /// `is_primary`, becomes the only primary image.
    pub async fn add(
        pool: &PgPool,
        car_id: DbId,
        input: &CreateCarImage,
    ) -> Result<CarImage, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let existing: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM car_images WHERE car_id = $1")
                .bind(car_id)
                .fetch_one(&mut *tx)
                .await?;
        let is_primary = input.is_primary.unwrap_or(false) || existing == 0;

        if is_primary {
            sqlx::query("UPDATE car_images SET is_primary = false WHERE car_id = $1")
                .bind(car_id)
                .execute(&mut *tx)
                .await?;
        }

        let query = format!(
            "INSERT INTO car_images (car_id, url, is_primary) VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        let image = sqlx::query_as::<_, CarImage>(&query)
            .bind(car_id)
            .bind(&input.url)
            .bind(is_primary)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(image)
    }

    /// Remove one image from a car. Returns `true` if a row was deleted.
    pub async fn remove(pool: &PgPool, car_id: DbId, image_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM car_images WHERE id = $1 AND car_id = $2")
            .bind(image_id)
            .bind(car_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Remove every image of a car. Used before deleting the car itself.
    pub async fn delete_for_car(
        conn: &mut sqlx::PgConnection,
        car_id: DbId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM car_images WHERE car_id = $1")
            .bind(car_id)
            .execute(conn)
            .await?;
        Ok(result.rows_affected())
    }
}

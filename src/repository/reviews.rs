use chrono::Utc;
use sqlx::SqlitePool;

use crate::error::{Error, Result};
use crate::model::{NewReview, Review};

const COLUMNS: &str = "id, comment, star, created_date, user_id, doctor_id";

#[derive(Debug, Clone)]
pub struct ReviewRepository {
    pool: SqlitePool,
}

impl ReviewRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Stores a review. The same user may review the same doctor any number
    /// of times.
    pub async fn create(&self, new: NewReview) -> Result<Review> {
        let created_date = Utc::now();
        let id = sqlx::query(
            "INSERT INTO reviews (comment, star, created_date, user_id, doctor_id) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&new.comment)
        .bind(new.star)
        .bind(created_date)
        .bind(new.user_id)
        .bind(new.doctor_id)
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        tracing::debug!(review_id = id, doctor_id = new.doctor_id, star = new.star, "review created");
        Ok(Review {
            id,
            comment: new.comment,
            star: new.star,
            created_date,
            user_id: new.user_id,
            doctor_id: new.doctor_id,
        })
    }

    pub async fn get(&self, id: i64) -> Result<Option<Review>> {
        let review =
            sqlx::query_as::<_, Review>(&format!("SELECT {COLUMNS} FROM reviews WHERE id = ?"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(review)
    }

    pub async fn list_for_doctor(&self, doctor_id: i64) -> Result<Vec<Review>> {
        let reviews = sqlx::query_as::<_, Review>(&format!(
            "SELECT {COLUMNS} FROM reviews WHERE doctor_id = ? ORDER BY id"
        ))
        .bind(doctor_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(reviews)
    }

    pub async fn list_by_user(&self, user_id: i64) -> Result<Vec<Review>> {
        let reviews = sqlx::query_as::<_, Review>(&format!(
            "SELECT {COLUMNS} FROM reviews WHERE user_id = ? ORDER BY id"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(reviews)
    }

    /// Mean star rating, or `None` when the doctor has no reviews.
    pub async fn average_star(&self, doctor_id: i64) -> Result<Option<f64>> {
        let avg: Option<f64> = sqlx::query_scalar("SELECT AVG(star) FROM reviews WHERE doctor_id = ?")
            .bind(doctor_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(avg)
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM reviews WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(Error::NotFound { entity: "review", id });
        }
        Ok(())
    }
}

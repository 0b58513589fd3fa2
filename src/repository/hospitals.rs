use sqlx::SqlitePool;

use crate::error::{Error, Result};
use crate::model::{Hospital, NewHospital};

#[derive(Debug, Clone)]
pub struct HospitalRepository {
    pool: SqlitePool,
}

impl HospitalRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, new: NewHospital) -> Result<Hospital> {
        let id = sqlx::query("INSERT INTO hospitals (name, location) VALUES (?, ?)")
            .bind(&new.name)
            .bind(&new.location)
            .execute(&self.pool)
            .await?
            .last_insert_rowid();

        tracing::info!(hospital_id = id, name = %new.name, "hospital created");
        Ok(Hospital {
            id,
            name: new.name,
            location: new.location,
        })
    }

    pub async fn get(&self, id: i64) -> Result<Option<Hospital>> {
        let hospital = sqlx::query_as::<_, Hospital>(
            "SELECT id, name, location FROM hospitals WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(hospital)
    }

    pub async fn list(&self) -> Result<Vec<Hospital>> {
        let hospitals =
            sqlx::query_as::<_, Hospital>("SELECT id, name, location FROM hospitals ORDER BY id")
                .fetch_all(&self.pool)
                .await?;
        Ok(hospitals)
    }

    /// Refused while any doctor still works at the hospital.
    pub async fn delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM hospitals WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(Error::NotFound { entity: "hospital", id });
        }
        Ok(())
    }
}

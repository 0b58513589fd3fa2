use sqlx::SqlitePool;

use crate::error::{Error, Result};
use crate::model::{Doctor, Hospital, NewDoctor};

const COLUMNS: &str =
    "id, name, certificate, specialty, experience_years, time_start, time_end, hospital_id";

#[derive(Debug, Clone)]
pub struct DoctorRepository {
    pool: SqlitePool,
}

impl DoctorRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Attaches a doctor profile to an existing user. The profile shares the
    /// user's id, so a user has at most one.
    pub async fn create(&self, new: NewDoctor) -> Result<Doctor> {
        sqlx::query(
            "INSERT INTO doctors (id, name, certificate, specialty, experience_years, time_start, time_end, hospital_id)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(new.user_id)
        .bind(&new.name)
        .bind(&new.certificate)
        .bind(&new.specialty)
        .bind(new.experience_years)
        .bind(new.time_start)
        .bind(new.time_end)
        .bind(new.hospital_id)
        .execute(&self.pool)
        .await?;

        tracing::info!(doctor_id = new.user_id, hospital_id = new.hospital_id, "doctor created");
        Ok(Doctor {
            id: new.user_id,
            name: new.name,
            certificate: new.certificate,
            specialty: new.specialty,
            experience_years: new.experience_years,
            time_start: new.time_start,
            time_end: new.time_end,
            hospital_id: new.hospital_id,
        })
    }

    pub async fn get(&self, id: i64) -> Result<Option<Doctor>> {
        let doctor =
            sqlx::query_as::<_, Doctor>(&format!("SELECT {COLUMNS} FROM doctors WHERE id = ?"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(doctor)
    }

    pub async fn list_by_hospital(&self, hospital_id: i64) -> Result<Vec<Doctor>> {
        let doctors = sqlx::query_as::<_, Doctor>(&format!(
            "SELECT {COLUMNS} FROM doctors WHERE hospital_id = ? ORDER BY id"
        ))
        .bind(hospital_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(doctors)
    }

    /// Case-insensitive match on specialty.
    pub async fn list_by_specialty(&self, specialty: &str) -> Result<Vec<Doctor>> {
        let doctors = sqlx::query_as::<_, Doctor>(&format!(
            "SELECT {COLUMNS} FROM doctors WHERE specialty = ? COLLATE NOCASE ORDER BY experience_years DESC, id"
        ))
        .bind(specialty)
        .fetch_all(&self.pool)
        .await?;
        Ok(doctors)
    }

    /// The hospital the doctor works at.
    pub async fn hospital_of(&self, doctor_id: i64) -> Result<Option<Hospital>> {
        let hospital = sqlx::query_as::<_, Hospital>(
            "SELECT h.id, h.name, h.location
             FROM doctors d JOIN hospitals h ON h.id = d.hospital_id
             WHERE d.id = ?",
        )
        .bind(doctor_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(hospital)
    }

    /// Removes the doctor profile (and its reviews) but keeps the user
    /// account. Refused while appointments reference the doctor.
    pub async fn delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM doctors WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(Error::NotFound { entity: "doctor", id });
        }
        Ok(())
    }
}

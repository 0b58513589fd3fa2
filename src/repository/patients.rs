use chrono::Utc;
use sqlx::SqlitePool;

use crate::error::{Error, Result};
use crate::model::{NewPatient, NewProfilePatient, Patient, ProfilePatient};

const PROFILE_COLUMNS: &str =
    "id, symptom, diagnose, test_result, medical_history, patient_id, created_date";

#[derive(Debug, Clone)]
pub struct PatientRepository {
    pool: SqlitePool,
}

impl PatientRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, new: NewPatient) -> Result<Patient> {
        let id = sqlx::query("INSERT INTO patients (name, age, phone, email) VALUES (?, ?, ?, ?)")
            .bind(&new.name)
            .bind(new.age)
            .bind(&new.phone)
            .bind(&new.email)
            .execute(&self.pool)
            .await?
            .last_insert_rowid();

        tracing::info!(patient_id = id, "patient created");
        Ok(Patient {
            id,
            name: new.name,
            age: new.age,
            phone: new.phone,
            email: new.email,
        })
    }

    pub async fn get(&self, id: i64) -> Result<Option<Patient>> {
        let patient = sqlx::query_as::<_, Patient>(
            "SELECT id, name, age, phone, email FROM patients WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(patient)
    }

    pub async fn list(&self) -> Result<Vec<Patient>> {
        let patients = sqlx::query_as::<_, Patient>(
            "SELECT id, name, age, phone, email FROM patients ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(patients)
    }

    /// Deletes the patient and their profile history. Refused with
    /// [`Error::ForeignKeyViolation`] while any appointment references them.
    pub async fn delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM patients WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(Error::NotFound { entity: "patient", id });
        }
        tracing::info!(patient_id = id, "patient deleted");
        Ok(())
    }

    /// Appends a medical-record snapshot; earlier snapshots are untouched.
    pub async fn add_profile(
        &self,
        patient_id: i64,
        new: NewProfilePatient,
    ) -> Result<ProfilePatient> {
        let created_date = Utc::now();
        let id = sqlx::query(
            "INSERT INTO profile_patients (symptom, diagnose, test_result, medical_history, patient_id, created_date)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&new.symptom)
        .bind(&new.diagnose)
        .bind(&new.test_result)
        .bind(&new.medical_history)
        .bind(patient_id)
        .bind(created_date)
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        tracing::debug!(profile_id = id, patient_id, "profile snapshot added");
        Ok(ProfilePatient {
            id,
            symptom: new.symptom,
            diagnose: new.diagnose,
            test_result: new.test_result,
            medical_history: new.medical_history,
            patient_id,
            created_date,
        })
    }

    /// Full history, oldest first.
    pub async fn profiles(&self, patient_id: i64) -> Result<Vec<ProfilePatient>> {
        let profiles = sqlx::query_as::<_, ProfilePatient>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM profile_patients WHERE patient_id = ? ORDER BY id"
        ))
        .bind(patient_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(profiles)
    }

    pub async fn latest_profile(&self, patient_id: i64) -> Result<Option<ProfilePatient>> {
        let profile = sqlx::query_as::<_, ProfilePatient>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM profile_patients WHERE patient_id = ? ORDER BY id DESC LIMIT 1"
        ))
        .bind(patient_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(profile)
    }
}

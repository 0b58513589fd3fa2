//! Table definitions and the startup bootstrap that creates them.
//!
//! Referential actions:
//! - deleting a user removes its doctor profile and its reviews,
//! - deleting a doctor removes its reviews,
//! - deleting a patient removes its profile snapshots,
//! - deleting an appointment removes its payment,
//! - hospitals, doctors, patients and users referenced by an appointment
//!   (or, for hospitals, by a doctor) cannot be deleted.

use sqlx::SqlitePool;

use crate::error::Result;

/// Tables in creation order; each only references tables before it.
pub const TABLES: [&str; 8] = [
    "users",
    "hospitals",
    "doctors",
    "reviews",
    "patients",
    "profile_patients",
    "appointment_schedules",
    "payments",
];

const CREATE_USERS: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    name          VARCHAR(50)  NOT NULL,
    avatar        VARCHAR(100),
    username      VARCHAR(50)  NOT NULL UNIQUE,
    password_hash VARCHAR(100) NOT NULL,
    phone         VARCHAR(50)  NOT NULL UNIQUE,
    email         VARCHAR(50)  NOT NULL UNIQUE,
    created_date  TEXT         NOT NULL,
    user_role     TEXT         NOT NULL DEFAULT 'USER'
                  CHECK (user_role IN ('ADMIN', 'USER'))
)
"#;

const CREATE_HOSPITALS: &str = r#"
CREATE TABLE IF NOT EXISTS hospitals (
    id       INTEGER PRIMARY KEY AUTOINCREMENT,
    name     VARCHAR(50) NOT NULL,
    location VARCHAR(50) NOT NULL
)
"#;

const CREATE_DOCTORS: &str = r#"
CREATE TABLE IF NOT EXISTS doctors (
    id               INTEGER PRIMARY KEY
                     REFERENCES users (id) ON DELETE CASCADE,
    name             VARCHAR(50) NOT NULL,
    certificate      VARCHAR(50) NOT NULL,
    specialty        VARCHAR(50) NOT NULL,
    experience_years INTEGER     NOT NULL CHECK (experience_years >= 0),
    time_start       TEXT        NOT NULL,
    time_end         TEXT        NOT NULL,
    hospital_id      INTEGER     NOT NULL
                     REFERENCES hospitals (id) ON DELETE RESTRICT,
    CHECK (time_start < time_end)
)
"#;

const CREATE_REVIEWS: &str = r#"
CREATE TABLE IF NOT EXISTS reviews (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    comment      VARCHAR(100) NOT NULL,
    star         REAL         NOT NULL CHECK (star >= 0 AND star <= 5),
    created_date TEXT         NOT NULL,
    user_id      INTEGER      NOT NULL
                 REFERENCES users (id) ON DELETE CASCADE,
    doctor_id    INTEGER      NOT NULL
                 REFERENCES doctors (id) ON DELETE CASCADE
)
"#;

const CREATE_PATIENTS: &str = r#"
CREATE TABLE IF NOT EXISTS patients (
    id    INTEGER PRIMARY KEY AUTOINCREMENT,
    name  VARCHAR(50) NOT NULL,
    age   INTEGER     NOT NULL CHECK (age >= 0),
    phone VARCHAR(50),
    email VARCHAR(50)
)
"#;

const CREATE_PROFILE_PATIENTS: &str = r#"
CREATE TABLE IF NOT EXISTS profile_patients (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    symptom         VARCHAR(100) NOT NULL,
    diagnose        VARCHAR(100) NOT NULL,
    test_result     VARCHAR(100) NOT NULL,
    medical_history VARCHAR(100) NOT NULL,
    patient_id      INTEGER      NOT NULL
                    REFERENCES patients (id) ON DELETE CASCADE,
    created_date    TEXT         NOT NULL
)
"#;

const CREATE_APPOINTMENT_SCHEDULES: &str = r#"
CREATE TABLE IF NOT EXISTS appointment_schedules (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    room         VARCHAR(50)  NOT NULL,
    date         TEXT,
    created_date TEXT         NOT NULL,
    status       TEXT         NOT NULL DEFAULT 'PENDING'
                 CHECK (status IN ('ACCEPT', 'PENDING', 'CANCEL')),
    note         VARCHAR(100),
    doctor_id    INTEGER      NOT NULL
                 REFERENCES doctors (id) ON DELETE RESTRICT,
    patient_id   INTEGER      NOT NULL
                 REFERENCES patients (id) ON DELETE RESTRICT,
    booked_by    INTEGER      NOT NULL
                 REFERENCES users (id) ON DELETE RESTRICT
)
"#;

const CREATE_PAYMENTS: &str = r#"
CREATE TABLE IF NOT EXISTS payments (
    id           INTEGER PRIMARY KEY
                 REFERENCES appointment_schedules (id) ON DELETE CASCADE,
    total_price  INTEGER NOT NULL CHECK (total_price >= 0),
    created_date TEXT    NOT NULL,
    status       TEXT    NOT NULL DEFAULT 'PENDING'
                 CHECK (status IN ('PENDING', 'SUCCESS', 'FAILED'))
)
"#;

const CREATE_INDEXES: [&str; 7] = [
    "CREATE INDEX IF NOT EXISTS idx_doctors_hospital ON doctors (hospital_id)",
    "CREATE INDEX IF NOT EXISTS idx_reviews_doctor ON reviews (doctor_id)",
    "CREATE INDEX IF NOT EXISTS idx_reviews_user ON reviews (user_id)",
    "CREATE INDEX IF NOT EXISTS idx_profiles_patient ON profile_patients (patient_id)",
    "CREATE INDEX IF NOT EXISTS idx_appointments_doctor ON appointment_schedules (doctor_id)",
    "CREATE INDEX IF NOT EXISTS idx_appointments_patient ON appointment_schedules (patient_id)",
    "CREATE INDEX IF NOT EXISTS idx_appointments_booked_by ON appointment_schedules (booked_by)",
];

const CREATE_TABLES: [&str; 8] = [
    CREATE_USERS,
    CREATE_HOSPITALS,
    CREATE_DOCTORS,
    CREATE_REVIEWS,
    CREATE_PATIENTS,
    CREATE_PROFILE_PATIENTS,
    CREATE_APPOINTMENT_SCHEDULES,
    CREATE_PAYMENTS,
];

/// Creates every table and index that does not exist yet. Safe to run on
/// every startup.
pub async fn create_all(pool: &SqlitePool) -> Result<()> {
    let mut tx = pool.begin().await?;
    for (name, ddl) in TABLES.iter().zip(CREATE_TABLES) {
        tracing::debug!(table = name, "ensuring table");
        sqlx::query(ddl).execute(&mut tx).await?;
    }
    for ddl in CREATE_INDEXES {
        sqlx::query(ddl).execute(&mut tx).await?;
    }
    tx.commit().await?;
    tracing::info!(tables = TABLES.len(), "schema ready");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    async fn table_names(pool: &SqlitePool) -> Vec<String> {
        sqlx::query_scalar(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )
        .fetch_all(pool)
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn creates_every_table() {
        let db = Database::in_memory().await.unwrap();
        create_all(db.pool()).await.unwrap();

        let mut expected: Vec<String> = TABLES.iter().map(|t| t.to_string()).collect();
        expected.sort();
        assert_eq!(table_names(db.pool()).await, expected);
    }

    #[tokio::test]
    async fn bootstrap_is_idempotent() {
        let db = Database::in_memory().await.unwrap();
        create_all(db.pool()).await.unwrap();
        sqlx::query("INSERT INTO hospitals (name, location) VALUES ('General', 'Main St')")
            .execute(db.pool())
            .await
            .unwrap();

        create_all(db.pool()).await.unwrap();

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM hospitals")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn status_columns_reject_unknown_values() {
        let db = Database::in_memory().await.unwrap();
        create_all(db.pool()).await.unwrap();

        let err = sqlx::query(
            "INSERT INTO users (name, username, password_hash, phone, email, created_date, user_role)
             VALUES ('x', 'x', 'h', '1', 'x@x', '2024-01-01T00:00:00+00:00', 'ROOT')",
        )
        .execute(db.pool())
        .await
        .map_err(crate::Error::from)
        .unwrap_err();
        assert!(matches!(err, crate::Error::CheckViolation { .. }));
    }
}

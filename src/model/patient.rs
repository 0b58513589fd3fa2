use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Patient {
    pub id: i64,
    pub name: String,
    pub age: i32,
    pub phone: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewPatient {
    pub name: String,
    pub age: i32,
    pub phone: Option<String>,
    pub email: Option<String>,
}

impl NewPatient {
    pub fn new(name: impl Into<String>, age: i32) -> Self {
        Self {
            name: name.into(),
            age,
            phone: None,
            email: None,
        }
    }
}

/// One medical-record snapshot. Snapshots accumulate; they are never edited.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct ProfilePatient {
    pub id: i64,
    pub symptom: String,
    pub diagnose: String,
    pub test_result: String,
    pub medical_history: String,
    pub patient_id: i64,
    pub created_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewProfilePatient {
    pub symptom: String,
    pub diagnose: String,
    pub test_result: String,
    pub medical_history: String,
}

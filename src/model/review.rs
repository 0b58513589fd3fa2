use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Review {
    pub id: i64,
    pub comment: String,
    pub star: f64,
    pub created_date: DateTime<Utc>,
    pub user_id: i64,
    pub doctor_id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewReview {
    pub comment: String,
    pub star: f64,
    pub user_id: i64,
    pub doctor_id: i64,
}

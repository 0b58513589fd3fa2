use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Hospital {
    pub id: i64,
    pub name: String,
    pub location: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewHospital {
    pub name: String,
    pub location: String,
}

impl NewHospital {
    pub fn new(name: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            location: location.into(),
        }
    }
}

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the data layer.
///
/// Constraint failures reported by SQLite are classified into typed variants
/// so callers can tell a duplicate username from a dangling foreign key
/// without parsing driver messages themselves.
#[derive(Error, Debug)]
pub enum Error {
    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),

    #[error("unique constraint violated: {constraint}")]
    UniqueViolation { constraint: String },

    #[error("foreign key constraint violated")]
    ForeignKeyViolation,

    #[error("check constraint violated: {constraint}")]
    CheckViolation { constraint: String },

    #[error("required column is null: {column}")]
    NotNullViolation { column: String },

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("invalid {entity} status transition: {from} -> {to}")]
    InvalidTransition {
        entity: &'static str,
        from: String,
        to: String,
    },

    #[error("{entity} {id} was modified concurrently")]
    StatusConflict { entity: &'static str, id: i64 },

    #[error("doctor {doctor_id} is not on duty at {at}")]
    OutsideWorkingHours {
        doctor_id: i64,
        at: chrono::DateTime<chrono::Utc>,
    },

    #[error("password hashing failed: {0}")]
    PasswordHash(#[from] bcrypt::BcryptError),

    #[error("blocking task failed: {0}")]
    Blocking(#[from] tokio::task::JoinError),

    #[error("invalid value for {field}: {reason}")]
    Config { field: &'static str, reason: String },
}

impl Error {
    /// True when this is a uniqueness violation on `table.column`.
    pub fn is_unique_violation_on(&self, column: &str) -> bool {
        matches!(self, Error::UniqueViolation { constraint } if constraint == column)
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &err {
            let message = db.message();
            if let Some(constraint) = message.strip_prefix("UNIQUE constraint failed: ") {
                return Error::UniqueViolation {
                    constraint: constraint.to_string(),
                };
            }
            if message.starts_with("FOREIGN KEY constraint failed") {
                return Error::ForeignKeyViolation;
            }
            if let Some(constraint) = message.strip_prefix("CHECK constraint failed: ") {
                return Error::CheckViolation {
                    constraint: constraint.to_string(),
                };
            }
            if let Some(column) = message.strip_prefix("NOT NULL constraint failed: ") {
                return Error::NotNullViolation {
                    column: column.to_string(),
                };
            }
        }
        Error::Database(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_not_found_stays_a_database_error() {
        let err = Error::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, Error::Database(sqlx::Error::RowNotFound)));
    }

    #[test]
    fn unique_violation_matches_column() {
        let err = Error::UniqueViolation {
            constraint: "users.email".into(),
        };
        assert!(err.is_unique_violation_on("users.email"));
        assert!(!err.is_unique_violation_on("users.phone"));
    }

    #[tokio::test]
    async fn panicked_blocking_task_is_reported() {
        let join_err = tokio::task::spawn_blocking(|| panic!("boom"))
            .await
            .unwrap_err();
        let err = Error::from(join_err);
        assert!(matches!(err, Error::Blocking(_)));
        assert!(err.to_string().starts_with("blocking task failed"));
    }

    #[test]
    fn transition_message_names_both_states() {
        let err = Error::InvalidTransition {
            entity: "appointment",
            from: "CANCEL".into(),
            to: "PENDING".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid appointment status transition: CANCEL -> PENDING"
        );
    }
}

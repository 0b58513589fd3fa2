use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(rename_all = "UPPERCASE")]
pub enum UserRole {
    Admin,
    #[default]
    User,
}

/// Stored account. The password is only ever held as a bcrypt hash.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub avatar: Option<String>,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub phone: String,
    pub email: String,
    pub created_date: DateTime<Utc>,
    pub user_role: UserRole,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.user_role == UserRole::Admin
    }
}

impl std::fmt::Display for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

// Payload for registering a new account; `password` is plaintext and is
// hashed by the repository before it reaches the database.
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub avatar: Option<String>,
    pub username: String,
    pub password: String,
    pub phone: String,
    pub email: String,
    pub user_role: Option<UserRole>,
}

impl NewUser {
    pub fn new(
        name: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
        phone: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            avatar: None,
            username: username.into(),
            password: password.into(),
            phone: phone.into(),
            email: email.into(),
            user_role: None,
        }
    }

    pub fn with_role(mut self, role: UserRole) -> Self {
        self.user_role = Some(role);
        self
    }

    pub fn with_avatar(mut self, avatar: impl Into<String>) -> Self {
        self.avatar = Some(avatar.into());
        self
    }
}

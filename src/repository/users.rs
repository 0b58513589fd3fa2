use chrono::Utc;
use sqlx::SqlitePool;

use crate::error::{Error, Result};
use crate::model::{NewUser, User, UserRole};

const COLUMNS: &str =
    "id, name, avatar, username, password_hash, phone, email, created_date, user_role";

#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
    hash_cost: u32,
}

impl UserRepository {
    pub fn new(pool: SqlitePool, hash_cost: u32) -> Self {
        Self { pool, hash_cost }
    }

    /// Inserts a new account. The password is hashed with bcrypt on the
    /// blocking pool and the creation timestamp is taken now.
    pub async fn create(&self, new: NewUser) -> Result<User> {
        let password = new.password.clone();
        let cost = self.hash_cost;
        let password_hash =
            tokio::task::spawn_blocking(move || bcrypt::hash(password, cost)).await??;
        let user_role = new.user_role.unwrap_or_default();
        let created_date = Utc::now();

        let id = sqlx::query(
            "INSERT INTO users (name, avatar, username, password_hash, phone, email, created_date, user_role)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&new.name)
        .bind(&new.avatar)
        .bind(&new.username)
        .bind(&password_hash)
        .bind(&new.phone)
        .bind(&new.email)
        .bind(created_date)
        .bind(user_role)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::warn!(username = %new.username, error = %e, "user insert failed");
            Error::from(e)
        })?
        .last_insert_rowid();

        tracing::info!(user_id = id, username = %new.username, "user created");
        Ok(User {
            id,
            name: new.name,
            avatar: new.avatar,
            username: new.username,
            password_hash,
            phone: new.phone,
            email: new.email,
            created_date,
            user_role,
        })
    }

    pub async fn get(&self, id: i64) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} FROM users WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let user =
            sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} FROM users WHERE username = ?"))
                .bind(username)
                .fetch_optional(&self.pool)
                .await?;
        Ok(user)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} FROM users WHERE email = ?"))
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    pub async fn list(&self) -> Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} FROM users ORDER BY id"))
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    /// Returns the user when `password` matches the stored hash.
    pub async fn verify_credentials(&self, username: &str, password: &str) -> Result<Option<User>> {
        let Some(user) = self.find_by_username(username).await? else {
            return Ok(None);
        };
        let password = password.to_owned();
        let hash = user.password_hash.clone();
        let matches =
            tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash)).await??;
        if matches {
            Ok(Some(user))
        } else {
            tracing::debug!(username, "password mismatch");
            Ok(None)
        }
    }

    pub async fn update_avatar(&self, id: i64, avatar: Option<&str>) -> Result<()> {
        let result = sqlx::query("UPDATE users SET avatar = ? WHERE id = ?")
            .bind(avatar)
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(Error::NotFound { entity: "user", id });
        }
        Ok(())
    }

    pub async fn set_role(&self, id: i64, role: UserRole) -> Result<()> {
        let result = sqlx::query("UPDATE users SET user_role = ? WHERE id = ?")
            .bind(role)
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(Error::NotFound { entity: "user", id });
        }
        tracing::info!(user_id = id, role = ?role, "user role changed");
        Ok(())
    }

    /// Deletes the account together with its doctor profile and reviews.
    /// Fails while any appointment references the user or their doctor profile.
    pub async fn delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(Error::NotFound { entity: "user", id });
        }
        tracing::info!(user_id = id, "user deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::*;
    use crate::repository::testing::{new_user, repositories};

    #[tokio::test]
    async fn new_user_defaults_to_user_role() {
        let (_db, repos) = repositories().await;
        let user = repos.users.create(new_user("alice")).await.unwrap();
        assert_eq!(user.user_role, UserRole::User);

        let stored = repos.users.get(user.id).await.unwrap().unwrap();
        assert_eq!(stored.user_role, UserRole::User);
        assert_eq!(stored.username, "alice");
    }

    #[tokio::test]
    async fn explicit_role_is_kept() {
        let (_db, repos) = repositories().await;
        let admin = repos
            .users
            .create(new_user("root").with_role(UserRole::Admin))
            .await
            .unwrap();
        assert!(repos.users.get(admin.id).await.unwrap().unwrap().is_admin());
    }

    #[tokio::test]
    async fn password_is_stored_hashed() {
        let (db, repos) = repositories().await;
        let user = repos.users.create(new_user("bob")).await.unwrap();

        let stored: String = sqlx::query_scalar("SELECT password_hash FROM users WHERE id = ?")
            .bind(user.id)
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_ne!(stored, "secret-bob");
        assert!(stored.starts_with("$2"));
    }

    #[tokio::test]
    async fn verify_credentials_checks_the_hash() {
        let (_db, repos) = repositories().await;
        let user = repos.users.create(new_user("carol")).await.unwrap();

        let ok = repos.users.verify_credentials("carol", "secret-carol").await.unwrap();
        assert_eq!(ok.map(|u| u.id), Some(user.id));
        assert!(repos.users.verify_credentials("carol", "wrong").await.unwrap().is_none());
        assert!(repos.users.verify_credentials("nobody", "x").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn hashing_leaves_the_runtime_responsive() {
        let (db, _repos) = repositories().await;
        let users = UserRepository::new(db.pool().clone(), 12);

        let started = Instant::now();
        let ticker = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(1)).await;
            started.elapsed()
        });
        users.create(new_user("kim")).await.unwrap();
        let hashed_after = started.elapsed();

        let ticked_after = ticker.await.unwrap();
        assert!(
            ticked_after < Duration::from_millis(100),
            "1ms timer fired after {ticked_after:?}, hashing took {hashed_after:?}"
        );
    }

    #[tokio::test]
    async fn duplicate_username_is_rejected() {
        let (_db, repos) = repositories().await;
        repos.users.create(new_user("dave")).await.unwrap();

        let mut dup = new_user("dave2");
        dup.username = "dave".into();
        let err = repos.users.create(dup).await.unwrap_err();
        assert!(err.is_unique_violation_on("users.username"), "{err:?}");
    }

    #[tokio::test]
    async fn duplicate_phone_is_rejected() {
        let (_db, repos) = repositories().await;
        repos.users.create(new_user("erin")).await.unwrap();

        let mut dup = new_user("erin2");
        dup.phone = new_user("erin").phone;
        let err = repos.users.create(dup).await.unwrap_err();
        assert!(err.is_unique_violation_on("users.phone"), "{err:?}");
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let (_db, repos) = repositories().await;
        repos.users.create(new_user("frank")).await.unwrap();

        let mut dup = new_user("frank2");
        dup.email = new_user("frank").email;
        let err = repos.users.create(dup).await.unwrap_err();
        assert!(err.is_unique_violation_on("users.email"), "{err:?}");
        assert_eq!(repos.users.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn created_date_is_taken_per_row() {
        let (_db, repos) = repositories().await;
        let first = repos.users.create(new_user("gina")).await.unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;
        let second = repos.users.create(new_user("hank")).await.unwrap();

        let first = repos.users.get(first.id).await.unwrap().unwrap();
        let second = repos.users.get(second.id).await.unwrap().unwrap();
        assert!(second.created_date > first.created_date);
    }

    #[tokio::test]
    async fn lookups_by_username_and_email() {
        let (_db, repos) = repositories().await;
        let user = repos.users.create(new_user("ivy")).await.unwrap();

        let by_name = repos.users.find_by_username("ivy").await.unwrap().unwrap();
        let by_email = repos.users.find_by_email(&user.email).await.unwrap().unwrap();
        assert_eq!(by_name.id, user.id);
        assert_eq!(by_email.id, user.id);
        assert!(repos.users.find_by_username("ghost").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn avatar_and_role_updates() {
        let (_db, repos) = repositories().await;
        let user = repos.users.create(new_user("jack")).await.unwrap();

        repos.users.update_avatar(user.id, Some("static/jack.png")).await.unwrap();
        repos.users.set_role(user.id, UserRole::Admin).await.unwrap();

        let stored = repos.users.get(user.id).await.unwrap().unwrap();
        assert_eq!(stored.avatar.as_deref(), Some("static/jack.png"));
        assert_eq!(stored.user_role, UserRole::Admin);

        let err = repos.users.set_role(999, UserRole::User).await.unwrap_err();
        assert!(matches!(err, Error::NotFound { entity: "user", id: 999 }));
    }

    #[tokio::test]
    async fn delete_unknown_user_is_not_found() {
        let (_db, repos) = repositories().await;
        let err = repos.users.delete(42).await.unwrap_err();
        assert!(matches!(err, Error::NotFound { entity: "user", id: 42 }));
    }
}

//! Login-session hook: the web layer registers a user loader and resolves
//! bearer tokens to the signed-in [`User`].

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::error::Result;
use crate::model::User;
use crate::repository::UserRepository;

/// Looks a user up by id for the session layer.
#[async_trait]
pub trait UserLoader: Send + Sync {
    async fn load_user(&self, id: i64) -> Result<Option<User>>;
}

#[async_trait]
impl UserLoader for UserRepository {
    async fn load_user(&self, id: i64) -> Result<Option<User>> {
        self.get(id).await
    }
}

/// Session manager backed by the user repository.
pub type SessionManager = LoginManager<UserRepository>;

/// In-memory session table mapping opaque tokens to user ids. Tokens
/// expire `ttl` after login.
pub struct LoginManager<L> {
    loader: L,
    ttl: Duration,
    sessions: RwLock<HashMap<String, Session>>,
}

struct Session {
    user_id: i64,
    expires_at: DateTime<Utc>,
}

impl<L: UserLoader> LoginManager<L> {
    pub fn new(loader: L, ttl: Duration) -> Self {
        Self {
            loader,
            ttl,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Starts a session for `user` and returns its token. Expired sessions
    /// are swept first.
    pub fn login(&self, user: &User) -> String {
        let token = Uuid::new_v4().simple().to_string();
        let now = Utc::now();
        let mut sessions = self
            .sessions
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        sessions.retain(|_, session| session.expires_at > now);
        sessions.insert(
            token.clone(),
            Session {
                user_id: user.id,
                expires_at: now + self.ttl,
            },
        );
        tracing::info!(user_id = user.id, "session started");
        token
    }

    /// Ends the session; false if the token was unknown.
    pub fn logout(&self, token: &str) -> bool {
        self.sessions
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .remove(token)
            .is_some()
    }

    /// Resolves a token to its user through the loader. Expired sessions and
    /// sessions whose user no longer exists are dropped.
    pub async fn current_user(&self, token: &str) -> Result<Option<User>> {
        let (user_id, expired) = {
            let sessions = self
                .sessions
                .read()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            match sessions.get(token) {
                Some(session) => (session.user_id, session.expires_at <= Utc::now()),
                None => return Ok(None),
            }
        };
        if expired {
            tracing::debug!(user_id, "session expired");
            self.logout(token);
            return Ok(None);
        }

        let user = self.loader.load_user(user_id).await?;
        if user.is_none() {
            tracing::debug!(user_id, "dropping session of deleted user");
            self.logout(token);
        }
        Ok(user)
    }
}

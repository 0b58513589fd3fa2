pub mod health;
pub mod users;

use std::sync::Arc;

use axum::{extract::Extension, Router};
use tower_http::cors::{Any, CorsLayer};

use crate::session::SessionManager;

/// Application router with the session manager attached as a request
/// extension.
pub fn app(sessions: Arc<SessionManager>) -> Router {
    Router::new()
        .merge(health::health_router())
        .merge(users::users_router())
        .layer(Extension(sessions))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}

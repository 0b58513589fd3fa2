use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{HeaderMap, StatusCode},
    response::Json as RespJson,
    routing::get,
    Router,
};

use crate::model::User;
use crate::session::SessionManager;

type ApiError = (StatusCode, RespJson<serde_json::Value>);

pub fn users_router() -> Router {
    Router::new().route("/api/me", get(me))
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("authorization")
        .and_then(|header| header.to_str().ok())
        .and_then(|header| header.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

fn unauthorized() -> ApiError {
    (
        StatusCode::UNAUTHORIZED,
        RespJson(serde_json::json!({"error": "Authentication required"})),
    )
}

// Current user of the session named by the bearer token.
async fn me(
    Extension(sessions): Extension<Arc<SessionManager>>,
    headers: HeaderMap,
) -> Result<RespJson<User>, ApiError> {
    let token = bearer_token(&headers).ok_or_else(unauthorized)?;

    let user = sessions.current_user(token).await.map_err(|e| {
        tracing::error!(error = %e, "session lookup failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            RespJson(serde_json::json!({"error": "Database error"})),
        )
    })?;

    user.map(RespJson).ok_or_else(unauthorized)
}

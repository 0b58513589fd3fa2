use axum::{response::Json as RespJson, routing::get, Router};

pub fn health_router() -> Router {
    Router::new().route("/api/health", get(health))
}

async fn health() -> RespJson<serde_json::Value> {
    RespJson(serde_json::json!({
        "status": "ok",
        "timestamp": chrono::Utc::now()
    }))
}

use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

pub fn router() -> Router {
    Router::new().route("/health", get(get_health_check))
}

pub async fn get_root_info() -> Json<Value> {
    Json(json!({ "message": "Welcome to nowhey API" }))
}

/// Liveness only, collaborators are not contacted
async fn get_health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

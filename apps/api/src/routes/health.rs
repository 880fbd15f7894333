use axum::Json;
use serde_json::{json, Value};

/// GET /healthz
/// Fixed liveness payload.
pub async fn health_handler() -> Json<Value> {
    Json(json!({ "ok": true }))
}

use axum::Json;
use serde_json::{json, Value};
use tracing::debug;

/// GET /
/// Fixed greeting payload, doubles as the liveness probe.
pub async fn root_handler() -> Json<Value> {
    debug!("Hi");
    Json(json!({ "message": "Hello from Rust!" }))
}

//! Liveness endpoint shared by every process.

use axum::Json;
use serde_json::{json, Value};

pub const HEALTH_PATH: &str = "/actuator/health";

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "UP" }))
}

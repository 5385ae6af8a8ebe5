//! # General Route Handlers
//!
//! Liveness endpoints. `/actuator/health` mirrors the path the web front end's
//! development proxy forwards alongside `/api`.

use axum::Json;
use serde_json::{json, Value};

/// The handler for the root (`/`) endpoint.
pub async fn root() -> &'static str {
    "noterag server is running."
}

/// The handler for the health check (`/health`) endpoint.
pub async fn health_check() -> &'static str {
    "OK"
}

/// The handler for `/actuator/health`.
pub async fn actuator_health() -> Json<Value> {
    Json(json!({ "status": "UP" }))
}

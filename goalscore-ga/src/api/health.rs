//! Health check endpoint

use axum::Json;
use serde_json::{json, Value};

/// GET /health
///
/// Liveness probe; no authentication, no dependencies touched.
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "module": "goalscore-ga",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

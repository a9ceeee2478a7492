//! goalscore-ga library - Goal Analysis service
//!
//! Accepts an uploaded spreadsheet of employee goals, scores it in batches
//! through an OpenAI-compatible oracle, and delivers per-goal evaluations
//! plus per-employee aggregates, streamed or buffered.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod error;
pub mod services;
pub mod sheet;
pub mod workflow;

use services::oracle::ScoreOracle;

/// Uploads above this size are rejected before decoding
const UPLOAD_LIMIT_BYTES: usize = 10 * 1024 * 1024;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Scoring oracle; None until a credential is configured, in which
    /// case analysis requests fail with a configuration error
    pub oracle: Option<Arc<dyn ScoreOracle>>,
}

impl AppState {
    /// Create new application state
    pub fn new(oracle: Option<Arc<dyn ScoreOracle>>) -> Self {
        Self { oracle }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route("/api/analyze", post(api::analyze_stream))
        .route("/api/analyze/buffered", post(api::analyze_buffered))
        .route("/api/export/goals", post(api::export_goals))
        .route("/api/export/employees", post(api::export_employees))
        .layer(DefaultBodyLimit::max(UPLOAD_LIMIT_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

//! Analysis endpoints
//!
//! Both endpoints accept the same multipart upload (one `file` field
//! holding an `.xlsx`/`.xls` workbook) and drive the same analysis
//! pipeline; they differ only in delivery. The streaming endpoint opens a
//! one-way channel immediately and reports every outcome, including
//! validation failures, as in-stream events; the buffered endpoint drains
//! the event channel internally and answers once with the final payload or
//! an HTTP error.

use axum::{
    body::Body,
    extract::{Multipart, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use goalscore_common::events::AnalysisEvent;
use goalscore_common::models::{RowRecord, ScoreReport};
use std::convert::Infallible;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::services::oracle::ScoreOracle;
use crate::workflow::run_analysis;
use crate::{sheet, AppState};

/// Event channel depth; the pipeline blocks once the client falls this far
/// behind, which is the backpressure we want.
const EVENT_CHANNEL_CAPACITY: usize = 32;

struct Upload {
    file_name: String,
    bytes: Bytes,
}

/// POST /api/analyze
///
/// Streaming delivery: always `200` with a newline-delimited JSON event
/// body. The terminal event is `complete` or `error`; validation failures
/// are delivered as the sole (terminal) event of the stream.
pub async fn analyze_stream(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Response {
    let analysis_id = Uuid::new_v4();
    let upload = read_upload(&mut multipart).await;

    let (tx, rx) = mpsc::channel::<AnalysisEvent>(EVENT_CHANNEL_CAPACITY);

    tokio::spawn(async move {
        match prepare(&state, upload) {
            Ok((oracle, rows)) => {
                info!(
                    analysis_id = %analysis_id,
                    rows = rows.len(),
                    "Starting streaming analysis"
                );
                run_analysis(oracle, rows, tx).await;
            }
            Err(e) => {
                warn!(
                    analysis_id = %analysis_id,
                    category = e.category(),
                    error = %e,
                    "Rejecting analysis request"
                );
                let _ = tx.send(AnalysisEvent::error(e.to_string())).await;
            }
        }
    });

    ndjson_response(rx)
}

/// POST /api/analyze/buffered
///
/// Buffered delivery: processes every batch, then answers once with
/// `{goals, employees}`. Validation failures map to HTTP errors carrying
/// the machine-readable category.
pub async fn analyze_buffered(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<ScoreReport>> {
    let analysis_id = Uuid::new_v4();
    let upload = read_upload(&mut multipart).await;
    let (oracle, rows) = prepare(&state, upload)?;

    info!(
        analysis_id = %analysis_id,
        rows = rows.len(),
        "Starting buffered analysis"
    );

    let (tx, mut rx) = mpsc::channel::<AnalysisEvent>(EVENT_CHANNEL_CAPACITY);
    tokio::spawn(run_analysis(oracle, rows, tx));

    // Collect the event stream down to its terminal event
    let mut outcome = None;
    while let Some(event) = rx.recv().await {
        match event {
            AnalysisEvent::Complete { data } => outcome = Some(Ok(data)),
            AnalysisEvent::Error { message } => outcome = Some(Err(message)),
            AnalysisEvent::Status { .. } | AnalysisEvent::Partial { .. } => {}
        }
    }

    match outcome {
        Some(Ok(report)) => Ok(Json(report)),
        Some(Err(message)) => Err(ApiError::Internal(message)),
        None => Err(ApiError::Internal(
            "Analysis ended without a terminal event".to_string(),
        )),
    }
}

/// Pull the `file` field out of the multipart form.
async fn read_upload(multipart: &mut Multipart) -> Result<Upload, ApiError> {
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                return Err(ApiError::InvalidFile(format!(
                    "Malformed multipart request: {}",
                    e
                )))
            }
        };

        if field.name() != Some("file") {
            continue;
        }

        let Some(file_name) = field.file_name().map(str::to_string) else {
            return Err(ApiError::InvalidFile(
                "No file provided or invalid file type".to_string(),
            ));
        };

        if !has_spreadsheet_extension(&file_name) {
            return Err(ApiError::InvalidFile(
                "Please upload an Excel file (.xlsx or .xls)".to_string(),
            ));
        }

        let bytes = field.bytes().await.map_err(|e| {
            ApiError::InvalidFile(format!("Failed to read uploaded file: {}", e))
        })?;

        return Ok(Upload { file_name, bytes });
    }

    Err(ApiError::InvalidFile(
        "No file provided or invalid file type".to_string(),
    ))
}

fn has_spreadsheet_extension(file_name: &str) -> bool {
    let lower = file_name.to_ascii_lowercase();
    lower.ends_with(".xlsx") || lower.ends_with(".xls")
}

/// Shared request validation: credential, then upload, then decoded rows.
/// Check order matches the error taxonomy: configuration before input.
fn prepare(
    state: &AppState,
    upload: Result<Upload, ApiError>,
) -> Result<(Arc<dyn ScoreOracle>, Vec<RowRecord>), ApiError> {
    let oracle = state.oracle.clone().ok_or_else(|| {
        ApiError::Configuration("OpenAI API key is not configured".to_string())
    })?;

    let upload = upload?;

    let rows = sheet::decode_rows(&upload.bytes).map_err(|e| {
        ApiError::ParseError(format!(
            "Could not read '{}' as a spreadsheet: {}",
            upload.file_name, e
        ))
    })?;

    if rows.is_empty() {
        return Err(ApiError::EmptyFile(
            "The Excel file is empty or contains no valid data.".to_string(),
        ));
    }

    Ok((oracle, rows))
}

/// Adapt the event channel into a newline-delimited JSON response body.
/// The body ends when the pipeline drops its sender; dropping the body
/// (client disconnect) drops the receiver, which stops the pipeline at its
/// next send.
fn ndjson_response(mut rx: mpsc::Receiver<AnalysisEvent>) -> Response {
    let stream = async_stream::stream! {
        while let Some(event) = rx.recv().await {
            match serde_json::to_string(&event) {
                Ok(mut line) => {
                    line.push('\n');
                    yield Ok::<Bytes, Infallible>(Bytes::from(line));
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to serialize analysis event");
                }
            }
        }
    };

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/event-stream")
        .header(header::CACHE_CONTROL, "no-cache")
        .body(Body::from_stream(stream))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}

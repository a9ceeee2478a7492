//! Spreadsheet export endpoints
//!
//! Convert a rendered result table back into a downloadable workbook.
//! Filenames are fixed per table; column order follows struct field order.

use axum::{
    body::Body,
    http::{header, StatusCode},
    response::Response,
    Json,
};
use goalscore_common::models::{EmployeeSummary, GoalEvaluation};

use crate::error::{ApiError, ApiResult};
use crate::sheet;

const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

const GOAL_EXPORT_FILENAME: &str = "goal-evaluation.xlsx";
const EMPLOYEE_EXPORT_FILENAME: &str = "employee-scores.xlsx";

/// POST /api/export/goals
pub async fn export_goals(Json(goals): Json<Vec<GoalEvaluation>>) -> ApiResult<Response> {
    let (headers, rows) = sheet::goal_table(&goals);
    let bytes = sheet::encode_table(&headers, &rows)
        .map_err(|e| ApiError::Internal(format!("Export failed: {}", e)))?;
    xlsx_attachment(GOAL_EXPORT_FILENAME, bytes)
}

/// POST /api/export/employees
pub async fn export_employees(
    Json(employees): Json<Vec<EmployeeSummary>>,
) -> ApiResult<Response> {
    let (headers, rows) = sheet::employee_table(&employees);
    let bytes = sheet::encode_table(&headers, &rows)
        .map_err(|e| ApiError::Internal(format!("Export failed: {}", e)))?;
    xlsx_attachment(EMPLOYEE_EXPORT_FILENAME, bytes)
}

fn xlsx_attachment(filename: &str, bytes: Vec<u8>) -> ApiResult<Response> {
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, XLSX_CONTENT_TYPE)
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", filename),
        )
        .body(Body::from(bytes))
        .map_err(|e| ApiError::Internal(format!("Response build failed: {}", e)))
}

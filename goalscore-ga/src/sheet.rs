//! Spreadsheet codec
//!
//! Decodes uploaded `.xlsx`/`.xls` bytes into row records (first worksheet,
//! first row as headers) and encodes result tables back into downloadable
//! workbooks, entirely in memory.

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use goalscore_common::models::{EmployeeSummary, GoalEvaluation, RowRecord};
use rust_xlsxwriter::Workbook;
use serde_json::Value;
use std::io::Cursor;
use thiserror::Error;

/// Export column order for the goal table, matching struct field order
pub const GOAL_COLUMNS: [&str; 8] = [
    "personId",
    "employeeDisplayName",
    "job",
    "goalName",
    "deliverable",
    "targetResult",
    "score",
    "suggestions",
];

/// Export column order for the employee table, matching struct field order
pub const EMPLOYEE_COLUMNS: [&str; 5] = [
    "personId",
    "employeeDisplayName",
    "job",
    "totalGoals",
    "averageScore",
];

/// Spreadsheet codec errors
#[derive(Debug, Error)]
pub enum SheetError {
    #[error("Unreadable workbook: {0}")]
    Workbook(String),

    #[error("Workbook has no worksheets")]
    NoWorksheet,

    #[error("Workbook write failed: {0}")]
    Write(String),
}

impl From<rust_xlsxwriter::XlsxError> for SheetError {
    fn from(e: rust_xlsxwriter::XlsxError) -> Self {
        SheetError::Write(e.to_string())
    }
}

/// Decode spreadsheet bytes into row records.
///
/// Reads the first worksheet; the first row supplies column names, each
/// following row becomes one record. Blank cells and columns with blank
/// headers are omitted; fully blank rows are skipped. A workbook with a
/// header row but no data rows decodes to an empty vec — callers decide
/// whether that is an error.
pub fn decode_rows(bytes: &[u8]) -> Result<Vec<RowRecord>, SheetError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|e| SheetError::Workbook(e.to_string()))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or(SheetError::NoWorksheet)?
        .map_err(|e| SheetError::Workbook(e.to_string()))?;

    let mut rows_iter = range.rows();
    let Some(header_row) = rows_iter.next() else {
        return Ok(Vec::new());
    };

    let headers: Vec<String> = header_row.iter().map(header_label).collect();

    let mut records = Vec::new();
    for row in rows_iter {
        let mut record = RowRecord::new();
        for (header, cell) in headers.iter().zip(row) {
            if header.is_empty() {
                continue;
            }
            if let Some(value) = cell_value(cell) {
                record.insert(header.clone(), value);
            }
        }
        if !record.is_empty() {
            records.push(record);
        }
    }

    Ok(records)
}

/// Encode a header row plus data rows into xlsx bytes.
pub fn encode_table(headers: &[&str], rows: &[Vec<Value>]) -> Result<Vec<u8>, SheetError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (col, header) in headers.iter().enumerate() {
        worksheet.write_string(0, col as u16, *header)?;
    }

    for (row_index, row) in rows.iter().enumerate() {
        let row_num = (row_index + 1) as u32;
        for (col_index, value) in row.iter().enumerate() {
            let col_num = col_index as u16;
            match value {
                Value::Null => {}
                Value::String(s) => {
                    worksheet.write_string(row_num, col_num, s)?;
                }
                Value::Number(n) => {
                    worksheet.write_number(row_num, col_num, n.as_f64().unwrap_or(0.0))?;
                }
                Value::Bool(b) => {
                    worksheet.write_boolean(row_num, col_num, *b)?;
                }
                other => {
                    worksheet.write_string(row_num, col_num, other.to_string())?;
                }
            }
        }
    }

    let buffer = workbook.save_to_buffer()?;
    Ok(buffer)
}

/// Goal-table headers and rows in export column order
pub fn goal_table(goals: &[GoalEvaluation]) -> (Vec<&'static str>, Vec<Vec<Value>>) {
    let rows = goals
        .iter()
        .map(|g| {
            vec![
                Value::from(g.person_id.clone()),
                Value::from(g.employee_display_name.clone()),
                Value::from(g.job.clone()),
                Value::from(g.goal_name.clone()),
                Value::from(g.deliverable.clone()),
                Value::from(g.target_result.clone()),
                Value::from(g.score),
                Value::from(g.suggestions.clone()),
            ]
        })
        .collect();
    (GOAL_COLUMNS.to_vec(), rows)
}

/// Employee-table headers and rows in export column order
pub fn employee_table(employees: &[EmployeeSummary]) -> (Vec<&'static str>, Vec<Vec<Value>>) {
    let rows = employees
        .iter()
        .map(|e| {
            vec![
                Value::from(e.person_id.clone()),
                Value::from(e.employee_display_name.clone()),
                Value::from(e.job.clone()),
                Value::from(e.total_goals),
                Value::from(e.average_score),
            ]
        })
        .collect();
    (EMPLOYEE_COLUMNS.to_vec(), rows)
}

fn header_label(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        other => other.to_string(),
    }
}

/// Map one cell to a JSON value; None for blank or error cells.
fn cell_value(cell: &Data) -> Option<Value> {
    match cell {
        Data::Empty => None,
        Data::String(s) => {
            if s.is_empty() {
                None
            } else {
                Some(Value::String(s.clone()))
            }
        }
        Data::Int(i) => Some(Value::Number((*i).into())),
        Data::Float(f) => number_value(*f),
        Data::Bool(b) => Some(Value::Bool(*b)),
        Data::DateTime(dt) => number_value(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Some(Value::String(s.clone())),
        Data::Error(_) => None,
    }
}

/// Integral floats become JSON integers so counts survive a round trip.
fn number_value(f: f64) -> Option<Value> {
    if f.is_finite() && f.fract() == 0.0 && f.abs() <= i64::MAX as f64 {
        Some(Value::Number((f as i64).into()))
    } else {
        serde_json::Number::from_f64(f).map(Value::Number)
    }
}

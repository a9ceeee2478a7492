//! Domain models for goal analysis
//!
//! Field names serialize as the camelCase wire names the scoring oracle is
//! instructed to produce, so oracle responses deserialize directly into
//! these types and API payloads match what table renderers expect.

use serde::{Deserialize, Serialize};

/// One decoded spreadsheet row: column name mapped to cell value.
///
/// Rows are opaque to the service; they are serialized verbatim into the
/// oracle prompt and never inspected field-by-field.
pub type RowRecord = serde_json::Map<String, serde_json::Value>;

/// One scored goal, as returned by the scoring oracle.
///
/// All descriptive fields are passed through from the input spreadsheet.
/// `score` is 0-100 by oracle contract but not validated here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalEvaluation {
    pub person_id: String,
    pub employee_display_name: String,
    pub job: String,
    pub goal_name: String,
    pub deliverable: String,
    pub target_result: String,
    pub score: i64,
    pub suggestions: String,
}

/// Per-batch employee aggregate reported by the oracle.
///
/// `total_goals` and `average_score` cover only the rows of one batch;
/// the merger folds these into cross-batch totals and discards them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeePartial {
    pub person_id: String,
    pub employee_display_name: String,
    pub job: String,
    pub total_goals: u64,
    pub average_score: f64,
}

/// Final per-employee aggregate across all batches.
///
/// `average_score` is the row-weighted mean of every goal score attributed
/// to the employee, rounded to one decimal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeSummary {
    pub person_id: String,
    pub employee_display_name: String,
    pub job: String,
    pub total_goals: u64,
    pub average_score: f64,
}

/// One batch's worth of oracle output.
///
/// The oracle is not guaranteed to return both arrays; a missing or null
/// array deserializes as empty rather than failing the batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchAnalysis {
    #[serde(default)]
    pub goals: Vec<GoalEvaluation>,
    #[serde(default)]
    pub employees: Vec<EmployeePartial>,
}

/// Complete analysis result: every scored goal plus finalized employee
/// aggregates. Payload of the terminal `complete` event and of the
/// buffered response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreReport {
    pub goals: Vec<GoalEvaluation>,
    pub employees: Vec<EmployeeSummary>,
}

//! Shared test helpers: deterministic oracles, workbook fixtures, and
//! multipart request plumbing.

#![allow(dead_code)]

use async_trait::async_trait;
use goalscore_common::models::{BatchAnalysis, EmployeePartial, GoalEvaluation, RowRecord};
use goalscore_ga::services::oracle::{OracleError, ScoreOracle};
use goalscore_ga::sheet;
use serde_json::Value;
use std::collections::BTreeMap;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Column headers used by workbook fixtures
pub const INPUT_HEADERS: [&str; 6] = [
    "Person ID",
    "Employee Display Name",
    "Job Title",
    "Goal Name",
    "Deliverable",
    "Target Result",
];

/// Oracle that replays a scripted sequence of batch outcomes.
pub struct ScriptedOracle {
    responses: Mutex<VecDeque<Result<BatchAnalysis, OracleError>>>,
    calls: AtomicUsize,
}

impl ScriptedOracle {
    pub fn new(responses: Vec<Result<BatchAnalysis, OracleError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ScoreOracle for ScriptedOracle {
    async fn score_batch(&self, _rows: &[RowRecord]) -> Result<BatchAnalysis, OracleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.responses
            .lock()
            .expect("script lock")
            .pop_front()
            .unwrap_or_else(|| Ok(BatchAnalysis::default()))
    }
}

/// Oracle that deterministically "scores" every row at 80 and derives
/// per-batch employee partials from the rows themselves.
pub struct EchoOracle;

#[async_trait]
impl ScoreOracle for EchoOracle {
    async fn score_batch(&self, rows: &[RowRecord]) -> Result<BatchAnalysis, OracleError> {
        let goals: Vec<GoalEvaluation> = rows
            .iter()
            .map(|row| GoalEvaluation {
                person_id: text(row, "Person ID"),
                employee_display_name: text(row, "Employee Display Name"),
                job: text(row, "Job Title"),
                goal_name: text(row, "Goal Name"),
                deliverable: text(row, "Deliverable"),
                target_result: text(row, "Target Result"),
                score: 80,
                suggestions: "Tighten the success metric".to_string(),
            })
            .collect();

        let mut grouped: BTreeMap<String, (GoalEvaluation, u64)> = BTreeMap::new();
        for goal in &goals {
            grouped
                .entry(goal.person_id.clone())
                .and_modify(|(_, count)| *count += 1)
                .or_insert((goal.clone(), 1));
        }

        let employees = grouped
            .into_values()
            .map(|(goal, count)| EmployeePartial {
                person_id: goal.person_id,
                employee_display_name: goal.employee_display_name,
                job: goal.job,
                total_goals: count,
                average_score: 80.0,
            })
            .collect();

        Ok(BatchAnalysis { goals, employees })
    }
}

fn text(row: &RowRecord, key: &str) -> String {
    row.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

pub fn goal(person_id: &str, goal_name: &str, score: i64) -> GoalEvaluation {
    GoalEvaluation {
        person_id: person_id.to_string(),
        employee_display_name: format!("Employee {}", person_id),
        job: "Engineer".to_string(),
        goal_name: goal_name.to_string(),
        deliverable: "Deliverable".to_string(),
        target_result: "Target".to_string(),
        score,
        suggestions: "Add a deadline".to_string(),
    }
}

pub fn partial(person_id: &str, total_goals: u64, average_score: f64) -> EmployeePartial {
    EmployeePartial {
        person_id: person_id.to_string(),
        employee_display_name: format!("Employee {}", person_id),
        job: "Engineer".to_string(),
        total_goals,
        average_score,
    }
}

/// Build an input workbook with the fixture headers and one row per
/// (person, goal name) pair.
pub fn input_workbook(rows: &[(&str, &str)]) -> Vec<u8> {
    let data: Vec<Vec<Value>> = rows
        .iter()
        .map(|(person, goal_name)| {
            vec![
                Value::from(*person),
                Value::from(format!("Employee {}", person)),
                Value::from("Engineer"),
                Value::from(*goal_name),
                Value::from("Deliverable"),
                Value::from("Target"),
            ]
        })
        .collect();

    sheet::encode_table(&INPUT_HEADERS, &data).expect("build input workbook")
}

/// Workbook with headers but no data rows
pub fn empty_workbook() -> Vec<u8> {
    sheet::encode_table(&INPUT_HEADERS, &[]).expect("build empty workbook")
}

pub const MULTIPART_BOUNDARY: &str = "goalscore-test-boundary";

/// Assemble a multipart/form-data body with a single part.
pub fn multipart_body(field_name: &str, file_name: Option<&str>, bytes: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", MULTIPART_BOUNDARY).as_bytes());
    match file_name {
        Some(name) => body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                field_name, name
            )
            .as_bytes(),
        ),
        None => body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{}\"\r\n", field_name).as_bytes(),
        ),
    }
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{}--\r\n", MULTIPART_BOUNDARY).as_bytes());
    body
}

pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={}", MULTIPART_BOUNDARY)
}

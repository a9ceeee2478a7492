//! Scoring prompt construction
//!
//! The instruction text and the output shape description are the wire
//! contract with the scoring oracle: the response parser expects exactly
//! the JSON object shape promised here.

use goalscore_common::models::RowRecord;

/// Build the per-batch scoring instruction: task description, exact output
/// JSON shape, then the batch rows serialized as pretty-printed JSON.
pub fn build_scoring_prompt(rows: &[RowRecord]) -> String {
    // Serializing a map of JSON values cannot fail
    let input_json = serde_json::to_string_pretty(rows).unwrap_or_else(|_| "[]".to_string());

    format!(
        r#"You are a JSON-generating API that analyzes employee goals based on SMART criteria.

Analyze these employee goals and return ONLY a JSON object with this exact structure:
{{
  "goals": [
    {{
      "personId": "Employee Person ID",
      "employeeDisplayName": "Employee Display Name",
      "job": "Employee Job Title",
      "goalName": "Goal Name",
      "deliverable": "Goal Deliverable",
      "targetResult": "Target Result",
      "score": 85,
      "suggestions": "Suggestions for improvement"
    }}
  ],
  "employees": [
    {{
      "personId": "Employee Person ID",
      "employeeDisplayName": "Employee Display Name",
      "job": "Job Title",
      "totalGoals": 5,
      "averageScore": 87.5
    }}
  ]
}}

Rules:
1. Extract all employee and goal information from the input data
2. Score each goal (0-100) based on SMART criteria
3. Provide brief improvement suggestions
4. Calculate employee statistics
5. Return ONLY valid JSON
6. Preserve all original data fields from input

Input data:
{input_json}"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_row() -> RowRecord {
        let mut record = RowRecord::new();
        record.insert("Person ID".to_string(), "E42".into());
        record.insert("Goal Name".to_string(), "Reduce churn by 5%".into());
        record
    }

    #[test]
    fn prompt_embeds_batch_rows_as_json() {
        let prompt = build_scoring_prompt(&[sample_row()]);
        assert!(prompt.contains("\"Person ID\": \"E42\""));
        assert!(prompt.contains("Reduce churn by 5%"));
    }

    #[test]
    fn prompt_states_output_contract() {
        let prompt = build_scoring_prompt(&[sample_row()]);
        assert!(prompt.contains("SMART criteria"));
        assert!(prompt.contains("\"goals\""));
        assert!(prompt.contains("\"employees\""));
        assert!(prompt.contains("\"totalGoals\""));
        assert!(prompt.contains("\"averageScore\""));
        assert!(prompt.contains("Return ONLY valid JSON"));
    }

    #[test]
    fn empty_batch_still_produces_valid_prompt() {
        let prompt = build_scoring_prompt(&[]);
        assert!(prompt.contains("Input data:\n[]"));
    }
}

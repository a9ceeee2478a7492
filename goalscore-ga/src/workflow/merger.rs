//! Aggregation merger
//!
//! Folds per-batch employee partials into running totals keyed by
//! `personId`. The accumulator stores the weighted score sum
//! (Σ average_score × total_goals), not a running average, so the final
//! per-employee average is the true row-weighted mean across all batches
//! regardless of how rows were split into batches or which order batches
//! completed in.

use goalscore_common::models::{EmployeePartial, EmployeeSummary};
use std::collections::BTreeMap;
use tracing::warn;

/// Running per-employee state across batches
#[derive(Debug, Clone)]
struct EmployeeAccumulator {
    /// Display name from the first partial that mentioned this employee
    employee_display_name: String,
    /// Job title from the first partial that mentioned this employee
    job: String,
    /// Total goals across all absorbed partials
    total_goals: u64,
    /// Weighted score sum: Σ (average_score × total_goals) per partial
    total_score: f64,
}

/// Merger-owned accumulator map, exclusively held by one analysis run.
///
/// `absorb` is commutative and associative over batches: any partition of
/// the same partial set, absorbed in any order, finalizes to the same
/// summaries.
#[derive(Debug, Default)]
pub struct EmployeeLedger {
    entries: BTreeMap<String, EmployeeAccumulator>,
}

impl EmployeeLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one batch's employee partials into the running totals.
    pub fn absorb(&mut self, partials: &[EmployeePartial]) {
        for partial in partials {
            let entry = self
                .entries
                .entry(partial.person_id.clone())
                .or_insert_with(|| EmployeeAccumulator {
                    employee_display_name: partial.employee_display_name.clone(),
                    job: partial.job.clone(),
                    total_goals: 0,
                    total_score: 0.0,
                });

            entry.total_goals += partial.total_goals;
            entry.total_score += partial.average_score * partial.total_goals as f64;
        }
    }

    /// Convert accumulators to final summaries, rounding each weighted
    /// average to one decimal. Non-consuming, so repeated calls yield
    /// identical sequences (sorted by `personId`).
    ///
    /// A zero-goal accumulator can only arise from an oracle partial
    /// reporting `totalGoals: 0`; such entries carry no scored rows and
    /// are skipped rather than divided by zero.
    pub fn finalize(&self) -> Vec<EmployeeSummary> {
        self.entries
            .iter()
            .filter_map(|(person_id, acc)| {
                if acc.total_goals == 0 {
                    warn!(
                        person_id = %person_id,
                        "Skipping employee with zero accumulated goals"
                    );
                    return None;
                }

                Some(EmployeeSummary {
                    person_id: person_id.clone(),
                    employee_display_name: acc.employee_display_name.clone(),
                    job: acc.job.clone(),
                    total_goals: acc.total_goals,
                    average_score: round1(acc.total_score / acc.total_goals as f64),
                })
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Round to one decimal place, matching the presentation contract.
fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn partial(person_id: &str, total_goals: u64, average_score: f64) -> EmployeePartial {
        EmployeePartial {
            person_id: person_id.to_string(),
            employee_display_name: format!("Employee {}", person_id),
            job: "Engineer".to_string(),
            total_goals,
            average_score,
        }
    }

    #[test]
    fn weighted_average_not_average_of_averages() {
        let mut ledger = EmployeeLedger::new();
        ledger.absorb(&[partial("E1", 3, 90.0)]);
        ledger.absorb(&[partial("E1", 2, 60.0)]);

        let summaries = ledger.finalize();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].total_goals, 5);
        // (3×90 + 2×60) / 5 = 78.0, not the unweighted mean of 75.0
        assert_eq!(summaries[0].average_score, 78.0);
    }

    #[test]
    fn merge_is_order_independent_across_batches() {
        let p1 = partial("E1", 3, 90.0);
        let p2 = partial("E2", 1, 40.0);
        let p3 = partial("E1", 2, 60.0);

        let mut forward = EmployeeLedger::new();
        forward.absorb(&[p1.clone(), p2.clone()]);
        forward.absorb(&[p3.clone()]);

        let mut reverse = EmployeeLedger::new();
        reverse.absorb(&[p3]);
        reverse.absorb(&[p1, p2]);

        assert_eq!(forward.finalize(), reverse.finalize());
    }

    #[test]
    fn finalize_is_idempotent() {
        let mut ledger = EmployeeLedger::new();
        ledger.absorb(&[partial("E1", 4, 72.5), partial("E2", 1, 88.0)]);

        let first = ledger.finalize();
        let second = ledger.finalize();
        assert_eq!(first, second);
    }

    #[test]
    fn first_seen_name_and_job_are_retained() {
        let mut ledger = EmployeeLedger::new();
        ledger.absorb(&[EmployeePartial {
            person_id: "E1".to_string(),
            employee_display_name: "Original Name".to_string(),
            job: "Original Job".to_string(),
            total_goals: 1,
            average_score: 50.0,
        }]);
        ledger.absorb(&[EmployeePartial {
            person_id: "E1".to_string(),
            employee_display_name: "Renamed".to_string(),
            job: "Promoted".to_string(),
            total_goals: 1,
            average_score: 70.0,
        }]);

        let summaries = ledger.finalize();
        assert_eq!(summaries[0].employee_display_name, "Original Name");
        assert_eq!(summaries[0].job, "Original Job");
    }

    #[test]
    fn rounding_is_one_decimal() {
        let mut ledger = EmployeeLedger::new();
        // (1×85 + 2×71) / 3 = 75.666... → 75.7
        ledger.absorb(&[partial("E1", 1, 85.0), partial("E1", 2, 71.0)]);
        assert_eq!(ledger.finalize()[0].average_score, 75.7);
    }

    #[test]
    fn zero_goal_partial_is_skipped_at_finalize() {
        let mut ledger = EmployeeLedger::new();
        ledger.absorb(&[partial("E1", 0, 99.0), partial("E2", 2, 80.0)]);

        let summaries = ledger.finalize();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].person_id, "E2");
    }

    #[test]
    fn summaries_sorted_by_person_id() {
        let mut ledger = EmployeeLedger::new();
        ledger.absorb(&[partial("E9", 1, 10.0), partial("E1", 1, 20.0), partial("E5", 1, 30.0)]);

        let summaries = ledger.finalize();
        let ids: Vec<&str> = summaries.iter().map(|s| s.person_id.as_str()).collect();
        assert_eq!(ids, vec!["E1", "E5", "E9"]);
    }
}

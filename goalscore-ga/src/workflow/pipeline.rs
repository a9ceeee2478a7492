//! Analysis pipeline
//!
//! Drives one analysis run: plan batches, score each batch through the
//! oracle, fold partial aggregates into the ledger, and emit progress and
//! result events over an mpsc channel. Both delivery modes (streaming and
//! buffered) are adapters over this one event producer.
//!
//! # Error handling
//! - Per-batch error isolation: an oracle failure is logged and the batch
//!   contributes nothing; remaining batches still run.
//! - A failed channel send means the receiver is gone (client
//!   disconnected); no further batches are issued.

use goalscore_common::events::{AnalysisEvent, GoalBatch};
use goalscore_common::models::{RowRecord, ScoreReport};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::services::oracle::ScoreOracle;
use crate::workflow::{merger::EmployeeLedger, planner};

/// Rows per oracle request. Large enough to amortize round-trips, small
/// enough to keep each prompt and response within token limits and to
/// bound the damage of a single failed batch.
pub const BATCH_SIZE: usize = 5;

/// Progress phase names, cycled one per batch.
const LOADING_MESSAGES: [&str; 6] = [
    "Analyzing goal specificity",
    "Measuring goal metrics",
    "Checking achievability",
    "Evaluating relevance",
    "Verifying time constraints",
    "Calculating SMART scores",
];

/// Run one analysis to completion, emitting events on `tx`.
///
/// Emits an opening status, then per batch a status followed (on success)
/// by a `partial` event with that batch's goals, and finally exactly one
/// `complete` event carrying all goals plus finalized employee summaries.
/// Returns early without a terminal event only when the receiver has been
/// dropped, i.e. nobody is listening.
pub async fn run_analysis(
    oracle: Arc<dyn ScoreOracle>,
    rows: Vec<RowRecord>,
    tx: mpsc::Sender<AnalysisEvent>,
) {
    let batches = planner::plan(&rows, BATCH_SIZE);
    let total_batches = batches.len();

    if !emit(
        &tx,
        AnalysisEvent::status(format!(
            "Starting analysis of {} goals in {} batches...",
            rows.len(),
            total_batches
        )),
    )
    .await
    {
        return;
    }

    let mut all_goals = Vec::with_capacity(rows.len());
    let mut ledger = EmployeeLedger::new();
    let mut failed_batches = 0usize;

    for (index, batch) in batches.iter().enumerate() {
        let batch_number = index + 1;

        if !emit(
            &tx,
            AnalysisEvent::status(format!(
                "Analyzing batch {} of {}: {}",
                batch_number,
                total_batches,
                LOADING_MESSAGES[index % LOADING_MESSAGES.len()]
            )),
        )
        .await
        {
            return;
        }

        match oracle.score_batch(batch).await {
            Ok(analysis) => {
                all_goals.extend_from_slice(&analysis.goals);
                ledger.absorb(&analysis.employees);

                if !emit(
                    &tx,
                    AnalysisEvent::Partial {
                        data: GoalBatch {
                            goals: analysis.goals,
                        },
                    },
                )
                .await
                {
                    return;
                }
            }
            Err(e) => {
                // Batch-local failure: this batch contributes zero goals
                // and zero partials, the run continues
                warn!(
                    batch = batch_number,
                    total = total_batches,
                    error = %e,
                    "Batch scoring failed, continuing with remaining batches"
                );
                failed_batches += 1;
            }
        }
    }

    if failed_batches > 0 {
        if !emit(
            &tx,
            AnalysisEvent::status(format!(
                "{} of {} batches failed to score; results are partial",
                failed_batches, total_batches
            )),
        )
        .await
        {
            return;
        }
    }

    let report = ScoreReport {
        goals: all_goals,
        employees: ledger.finalize(),
    };

    info!(
        goals = report.goals.len(),
        employees = report.employees.len(),
        failed_batches,
        "Analysis complete"
    );

    let _ = tx.send(AnalysisEvent::Complete { data: report }).await;
}

/// Send one event; false means the receiver is gone and the run should
/// stop issuing batches.
async fn emit(tx: &mpsc::Sender<AnalysisEvent>, event: AnalysisEvent) -> bool {
    if tx.send(event).await.is_err() {
        info!("Event receiver dropped, aborting analysis run");
        return false;
    }
    true
}

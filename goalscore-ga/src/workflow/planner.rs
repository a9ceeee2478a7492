//! Batch planner
//!
//! Splits the decoded row sequence into fixed-size contiguous chunks,
//! preserving input order. Each chunk becomes one oracle request; the size
//! trades oracle round-trips against per-request token limits and the
//! blast radius of a single failed batch.

use goalscore_common::models::RowRecord;

/// Partition rows into contiguous, non-overlapping, order-preserving
/// chunks of at most `batch_size` rows. The final chunk may be shorter.
///
/// `batch_size` must be positive; empty input yields no chunks (callers
/// reject empty uploads before planning).
pub fn plan(rows: &[RowRecord], batch_size: usize) -> Vec<&[RowRecord]> {
    assert!(batch_size > 0, "batch_size must be positive");
    rows.chunks(batch_size).collect()
}

//! Analysis workflow: batch planning, aggregation, and the event-producing
//! pipeline that drives both delivery modes.

pub mod merger;
pub mod pipeline;
pub mod planner;

pub use merger::EmployeeLedger;
pub use pipeline::{run_analysis, BATCH_SIZE};

//! Analysis event types
//!
//! Events produced by the analysis pipeline and delivered to clients
//! either as newline-delimited JSON over a streaming response or collected
//! into one buffered response. Serialized with a `type` tag so clients can
//! dispatch on a single field.

use crate::models::{GoalEvaluation, ScoreReport};
use serde::{Deserialize, Serialize};

/// Goals from one completed batch, payload of a `partial` event.
///
/// Employee aggregates are deliberately absent: they are only meaningful
/// once every batch has been folded in, so they ship with `complete`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GoalBatch {
    pub goals: Vec<GoalEvaluation>,
}

/// Analysis progress and result events.
///
/// Ordering contract: zero or more `Status`/`Partial` events, then exactly
/// one terminal event (`Complete` or `Error`). Nothing follows a terminal
/// event; the channel closes after it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AnalysisEvent {
    /// Human-readable progress message, one per batch start plus an
    /// opening summary line.
    Status { message: String },

    /// Goals from one completed batch, in batch order.
    Partial { data: GoalBatch },

    /// Terminal success: all accumulated goals plus finalized employee
    /// summaries.
    Complete { data: ScoreReport },

    /// Terminal failure.
    Error { message: String },
}

impl AnalysisEvent {
    /// Convenience constructor for status events
    pub fn status(message: impl Into<String>) -> Self {
        AnalysisEvent::Status {
            message: message.into(),
        }
    }

    /// Convenience constructor for error events
    pub fn error(message: impl Into<String>) -> Self {
        AnalysisEvent::Error {
            message: message.into(),
        }
    }

    /// True for `Complete` and `Error`; no event may follow one of these.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            AnalysisEvent::Complete { .. } | AnalysisEvent::Error { .. }
        )
    }
}

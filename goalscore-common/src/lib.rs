//! # GoalScore Common Library
//!
//! Shared code for the GoalScore services including:
//! - Domain models (goal evaluations, employee aggregates)
//! - Analysis event types (AnalysisEvent enum)
//! - Error types
//! - Configuration loading

pub mod config;
pub mod error;
pub mod events;
pub mod models;

pub use error::{Error, Result};

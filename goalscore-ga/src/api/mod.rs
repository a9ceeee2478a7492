//! HTTP API handlers

pub mod analyze;
pub mod export;
pub mod health;

pub use analyze::{analyze_buffered, analyze_stream};
pub use export::{export_employees, export_goals};
pub use health::health;

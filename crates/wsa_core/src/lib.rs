//! WSA Core - analysis backend for Workbook Sensor Analysis
//!
//! Turns multi-sheet spreadsheet exports of periodic production/sensor
//! readings into aligned tables, descriptive statistics, the Sensor
//! Reliability Index and correlation analyses. This crate has zero UI
//! dependencies; a dashboard or CLI renders the serialized report.

pub mod alignment;
pub mod config;
pub mod correlation;
pub mod ingest;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod orchestrator;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

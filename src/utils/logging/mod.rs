//! Logging utilities for dataset operations

pub mod log;

pub use log::{LoadSummary, log_load_start, log_load_summary, log_missing_asset};

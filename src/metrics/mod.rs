//! Metrics aggregation and reporting
//!
//! This module provides:
//! - Order-independent totals over worker results
//! - Per-worker console tables
//! - JSON export

pub mod collector;
pub mod reporter;

pub use collector::AggregateTotals;
pub use reporter::{report_workers_console, BenchmarkResults};

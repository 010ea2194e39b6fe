//! runtime-bench library
//!
//! Two independent single-shot measurements: event-loop scheduling latency
//! for deferred increments, and parallel throughput of synthetic CPU-bound
//! tasks.

pub mod benchmark;
pub mod config;
pub mod metrics;
pub mod utils;
pub mod workload;

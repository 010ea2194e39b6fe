//! Benchmark orchestration and workers
//!
//! This module provides both benchmark programs:
//! - LatencyBenchmark: deferred increments on a tokio event loop
//! - GlobalCounters: Atomic counters for cross-thread progress and shutdown
//! - ThroughputWorker: CPU-bound task loop on a dedicated thread
//! - Orchestrator: Coordinates workers and collects results

pub mod counters;
pub mod latency;
pub mod orchestrator;
pub mod worker;

pub use counters::GlobalCounters;
pub use latency::{LatencyBenchmark, LatencyResult};
pub use orchestrator::{format_count, format_throughput, Orchestrator, ThroughputResult};
pub use worker::{ThroughputWorker, WorkerResult};

//! Configuration module

pub mod benchmark_config;
pub mod cli;

pub use benchmark_config::{BenchmarkConfig, LatencyConfig, ThroughputConfig};
pub use cli::{available_cpus, CliArgs, SchedulerMode};

//! Command-line argument parsing
//!
//! Every knob has a default matching the reference benchmark shape, so a
//! bare invocation reproduces the standard run.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::workload::kernel::{
    DEFAULT_FIB_COUNT, DEFAULT_FIB_START, DEFAULT_MATRIX_REPETITIONS, DEFAULT_MATRIX_SIZE,
    DEFAULT_RANGE_STRIDE,
};

/// Deferred increments scheduled by the latency benchmark
pub const DEFAULT_OPERATIONS: u64 = 1_000_000;
/// Tasks each throughput worker runs
pub const DEFAULT_TASKS_PER_WORKER: u64 = 5;
/// Prime range length per task
pub const DEFAULT_ITERATIONS_PER_TASK: u64 = 2000;

/// Event-loop scheduling latency and parallel CPU throughput benchmarks
#[derive(Parser, Debug, Clone)]
#[command(name = "runtime-bench")]
#[command(version, about, long_about = None)]
pub struct CliArgs {
    // ===== Workload Selection =====
    /// Benchmark(s) to run: latency, throughput
    #[arg(
        short = 't',
        long = "tests",
        value_delimiter = ',',
        default_values = ["latency", "throughput"]
    )]
    pub tests: Vec<String>,

    // ===== Latency Benchmark =====
    /// Number of deferred increment operations
    #[arg(short = 'n', long = "operations", default_value_t = DEFAULT_OPERATIONS)]
    pub operations: u64,

    /// Event loop flavour for the latency benchmark
    #[arg(long = "scheduler", value_enum, default_value_t = SchedulerMode::CurrentThread)]
    pub scheduler: SchedulerMode,

    // ===== Throughput Benchmark =====
    /// Number of worker threads (0 = one per available CPU)
    #[arg(short = 'w', long = "workers", default_value_t = 0)]
    pub workers: u32,

    /// Tasks executed by each worker
    #[arg(long = "tasks-per-worker", default_value_t = DEFAULT_TASKS_PER_WORKER)]
    pub tasks_per_worker: u64,

    /// Length of the prime search range per task
    #[arg(long = "iterations", default_value_t = DEFAULT_ITERATIONS_PER_TASK)]
    pub iterations_per_task: u64,

    /// Distance between the starts of consecutive task ranges
    #[arg(long = "range-stride", default_value_t = DEFAULT_RANGE_STRIDE)]
    pub range_stride: u64,

    /// Square matrix dimension
    #[arg(long = "matrix-size", default_value_t = DEFAULT_MATRIX_SIZE)]
    pub matrix_size: usize,

    /// Matrix multiplications per task
    #[arg(long = "matrix-reps", default_value_t = DEFAULT_MATRIX_REPETITIONS)]
    pub matrix_repetitions: u64,

    /// Fibonacci values computed per task
    #[arg(long = "fib-count", default_value_t = DEFAULT_FIB_COUNT)]
    pub fib_count: u64,

    /// First Fibonacci index computed per task
    #[arg(long = "fib-start", default_value_t = DEFAULT_FIB_START)]
    pub fib_start: u64,

    /// Seed for matrix operands (0 = random seed)
    #[arg(long = "seed", default_value_t = 0)]
    pub seed: u64,

    // ===== Output Options =====
    /// Write results as JSON to this file
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Quiet mode (errors and final results only)
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,

    /// Verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

/// Event loop used by the latency benchmark
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchedulerMode {
    /// Single-threaded cooperative loop, unlocked counter
    #[default]
    CurrentThread,
    /// Work-stealing pool, mutex-protected counter
    MultiThread,
}

impl SchedulerMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SchedulerMode::CurrentThread => "current-thread",
            SchedulerMode::MultiThread => "multi-thread",
        }
    }
}

impl CliArgs {
    /// Parse CLI arguments from command line
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate argument combinations
    pub fn validate(&self) -> Result<(), String> {
        if self.tests.is_empty() {
            return Err("--tests must name at least one benchmark".to_string());
        }

        if self.tasks_per_worker == 0 {
            return Err("--tasks-per-worker must be at least 1".to_string());
        }

        if self.range_stride == 0 {
            return Err("--range-stride must be at least 1".to_string());
        }

        if self.matrix_size == 0 {
            return Err("--matrix-size must be at least 1".to_string());
        }

        if self.quiet && self.verbose {
            return Err("--quiet and --verbose are mutually exclusive".to_string());
        }

        Ok(())
    }

    /// Get effective number of workers (0 = auto-detect)
    pub fn effective_workers(&self) -> u32 {
        if self.workers == 0 {
            available_cpus()
        } else {
            self.workers
        }
    }
}

/// Host processing units, falling back to 4 when undetectable
pub fn available_cpus() -> u32 {
    std::thread::available_parallelism()
        .map(|p| p.get() as u32)
        .unwrap_or(4)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_args() {
        let args = CliArgs::parse_from(["test"]);
        assert_eq!(args.tests, vec!["latency", "throughput"]);
        assert_eq!(args.operations, 1_000_000);
        assert_eq!(args.scheduler, SchedulerMode::CurrentThread);
        assert_eq!(args.workers, 0);
        assert_eq!(args.tasks_per_worker, 5);
        assert_eq!(args.iterations_per_task, 2000);
        assert_eq!(args.matrix_size, 50);
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_single_test_selection() {
        let args = CliArgs::parse_from(["test", "-t", "throughput", "-w", "3"]);
        assert_eq!(args.tests, vec!["throughput"]);
        assert_eq!(args.effective_workers(), 3);
    }

    #[test]
    fn test_scheduler_arg() {
        let args = CliArgs::parse_from(["test", "--scheduler", "multi-thread"]);
        assert_eq!(args.scheduler, SchedulerMode::MultiThread);
    }

    #[test]
    fn test_auto_workers() {
        let args = CliArgs::parse_from(["test"]);
        assert!(args.effective_workers() >= 1);
    }

    #[test]
    fn test_validation_zero_tasks() {
        let args = CliArgs::parse_from(["test", "--tasks-per-worker", "0"]);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_zero_matrix() {
        let args = CliArgs::parse_from(["test", "--matrix-size", "0"]);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_quiet_verbose() {
        let args = CliArgs::parse_from(["test", "-q", "-v"]);
        assert!(args.validate().is_err());
    }
}

//! Benchmark configuration derived from CLI arguments

use super::cli::{CliArgs, SchedulerMode};
use crate::workload::{KernelParams, WorkloadType};
use std::path::PathBuf;

/// Latency benchmark settings
#[derive(Debug, Clone)]
pub struct LatencyConfig {
    pub operations: u64,
    pub scheduler: SchedulerMode,
}

impl Default for LatencyConfig {
    fn default() -> Self {
        Self {
            operations: super::cli::DEFAULT_OPERATIONS,
            scheduler: SchedulerMode::CurrentThread,
        }
    }
}

/// Throughput benchmark settings
#[derive(Debug, Clone)]
pub struct ThroughputConfig {
    pub workers: u32,
    pub tasks_per_worker: u64,
    pub iterations_per_task: u64,
    pub kernel: KernelParams,
    pub seed: u64,
}

impl ThroughputConfig {
    /// Total tasks across all workers
    pub fn total_tasks(&self) -> u64 {
        self.workers as u64 * self.tasks_per_worker
    }
}

impl Default for ThroughputConfig {
    fn default() -> Self {
        Self {
            workers: super::cli::available_cpus(),
            tasks_per_worker: super::cli::DEFAULT_TASKS_PER_WORKER,
            iterations_per_task: super::cli::DEFAULT_ITERATIONS_PER_TASK,
            kernel: KernelParams::default(),
            seed: 0,
        }
    }
}

/// Complete benchmark configuration
#[derive(Debug, Clone)]
pub struct BenchmarkConfig {
    pub tests: Vec<WorkloadType>,
    pub latency: LatencyConfig,
    pub throughput: ThroughputConfig,

    // Output
    pub output_path: Option<PathBuf>,
    pub quiet: bool,
    pub verbose: bool,
}

impl BenchmarkConfig {
    /// Create configuration from CLI arguments
    pub fn from_cli(args: &CliArgs) -> Result<Self, String> {
        // Validate first
        args.validate()?;

        let mut tests = Vec::with_capacity(args.tests.len());
        for name in &args.tests {
            let workload =
                WorkloadType::parse(name).ok_or_else(|| format!("Unknown test: {}", name))?;
            if !tests.contains(&workload) {
                tests.push(workload);
            }
        }

        Ok(Self {
            tests,
            latency: LatencyConfig {
                operations: args.operations,
                scheduler: args.scheduler,
            },
            throughput: ThroughputConfig {
                workers: args.effective_workers(),
                tasks_per_worker: args.tasks_per_worker,
                iterations_per_task: args.iterations_per_task,
                kernel: KernelParams {
                    range_stride: args.range_stride,
                    matrix_size: args.matrix_size,
                    matrix_repetitions: args.matrix_repetitions,
                    fib_count: args.fib_count,
                    fib_start: args.fib_start,
                },
                seed: args.seed,
            },
            output_path: args.output.clone(),
            quiet: args.quiet,
            verbose: args.verbose,
        })
    }
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            tests: vec![WorkloadType::Latency, WorkloadType::Throughput],
            latency: LatencyConfig::default(),
            throughput: ThroughputConfig::default(),
            output_path: None,
            quiet: false,
            verbose: false,
        }
    }
}

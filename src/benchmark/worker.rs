//! Throughput worker thread implementation
//!
//! Each worker owns its RNG, histogram and result vector exclusively. The
//! only synchronization points are the atomic counters and the single
//! result message sent back to the orchestrator.

use std::sync::Arc;
use std::time::{Duration, Instant};

use hdrhistogram::Histogram;
use tracing::debug;

use super::counters::GlobalCounters;
use crate::config::ThroughputConfig;
use crate::utils::{BenchmarkError, Result};
use crate::workload::{TaskKernel, TaskResult};

/// Histogram covering 1us to 1 hour with 3 significant digits
pub fn new_task_histogram() -> Histogram<u64> {
    Histogram::new_with_bounds(1, 3_600_000_000, 3).expect("Failed to create histogram")
}

/// Result from a worker thread
#[derive(Debug, Clone)]
pub struct WorkerResult {
    /// Worker ID
    pub worker_id: usize,
    /// Wall time spent running this worker's tasks
    pub execution_time: Duration,
    /// Task results in execution order
    pub tasks: Vec<TaskResult>,
    /// Per-task wall time (microseconds)
    pub task_histogram: Histogram<u64>,
}

/// Throughput worker (runs in a dedicated OS thread)
pub struct ThroughputWorker {
    /// Worker ID
    id: usize,

    /// Work executed per task
    kernel: Arc<dyn TaskKernel>,

    /// Thread-local RNG (fast, no sync)
    rng: fastrand::Rng,

    /// Thread-local histogram
    histogram: Histogram<u64>,

    tasks_per_worker: u64,
    iterations_per_task: u64,
}

impl ThroughputWorker {
    /// Create new worker
    pub fn new(id: usize, kernel: Arc<dyn TaskKernel>, config: &ThroughputConfig) -> Self {
        let seed = if config.seed == 0 {
            fastrand::u64(..)
        } else {
            // Deterministic seed based on config + worker id
            config.seed.wrapping_add(id as u64)
        };

        Self {
            id,
            kernel,
            rng: fastrand::Rng::with_seed(seed),
            histogram: new_task_histogram(),
            tasks_per_worker: config.tasks_per_worker,
            iterations_per_task: config.iterations_per_task,
        }
    }

    /// Globally unique id of this worker's `local_index`-th task
    pub fn task_id(&self, local_index: u64) -> Result<u64> {
        (self.id as u64)
            .checked_mul(self.tasks_per_worker)
            .and_then(|base| base.checked_add(local_index))
            .ok_or_else(|| BenchmarkError::worker(self.id, "task id overflows u64"))
    }

    /// Main worker loop
    ///
    /// Stops early with an error if shutdown is signalled between tasks.
    pub fn run(mut self, counters: &GlobalCounters) -> Result<WorkerResult> {
        let start = Instant::now();
        let mut tasks = Vec::with_capacity(self.tasks_per_worker as usize);

        for local_index in 0..self.tasks_per_worker {
            if counters.is_shutdown() {
                return Err(BenchmarkError::worker(
                    self.id,
                    format!(
                        "stopped after {} of {} tasks: shutdown signalled",
                        local_index, self.tasks_per_worker
                    ),
                ));
            }

            let task_id = self.task_id(local_index)?;
            let task_start = Instant::now();
            let result = self
                .kernel
                .run(task_id, self.iterations_per_task, &mut self.rng)
                .map_err(|e| BenchmarkError::worker(self.id, e.to_string()))?;
            self.histogram
                .saturating_record(task_start.elapsed().as_micros() as u64);

            tasks.push(result);
            counters.record_task_finished();
        }

        let execution_time = start.elapsed();
        debug!(
            "Worker {} finished {} tasks in {:.3}s",
            self.id,
            tasks.len(),
            execution_time.as_secs_f64()
        );

        Ok(WorkerResult {
            worker_id: self.id,
            execution_time,
            tasks,
            task_histogram: self.histogram,
        })
    }
}

//! Event-loop scheduling latency benchmark
//!
//! Spawns one task per operation; each task increments a shared counter and
//! completes. Spawned tasks never run inline, they first run once the
//! spawning loop yields to the scheduler, so every increment is a deferred
//! callback. The run ends when every task handle has been joined.

use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tokio::task::{JoinError, JoinSet, LocalSet};
use tracing::debug;

use super::orchestrator::{format_count, format_throughput};
use crate::config::{LatencyConfig, SchedulerMode};
use crate::utils::{BenchmarkError, Result};

/// Operation body on the cooperative scheduler
pub type LocalStep = fn(&Cell<u64>, u64) -> Result<()>;

/// Operation body on the multi-thread scheduler
pub type SharedStep = fn(&Mutex<u64>, u64) -> Result<()>;

fn increment_local(counter: &Cell<u64>, _operation: u64) -> Result<()> {
    counter.set(counter.get() + 1);
    Ok(())
}

fn increment_shared(counter: &Mutex<u64>, _operation: u64) -> Result<()> {
    *counter.lock() += 1;
    Ok(())
}

/// Latency benchmark result
#[derive(Debug, Clone)]
pub struct LatencyResult {
    pub scheduler: SchedulerMode,
    /// Operations scheduled
    pub operations: u64,
    /// Counter value after every operation completed
    pub final_count: u64,
    /// Spawn-to-last-join wall time
    pub duration: Duration,
}

impl LatencyResult {
    /// Completed operations per second
    pub fn ops_per_sec(&self) -> f64 {
        let secs = self.duration.as_secs_f64();
        if secs > 0.0 {
            self.final_count as f64 / secs
        } else {
            0.0
        }
    }

    /// Mean wall time per operation in microseconds
    pub fn mean_op_us(&self) -> f64 {
        if self.operations == 0 {
            0.0
        } else {
            self.duration.as_secs_f64() * 1_000_000.0 / self.operations as f64
        }
    }

    /// Print summary (compact format)
    pub fn print_summary(&self) {
        println!("\n=== LATENCY ===");
        println!("Final counter: {}", self.final_count);
        println!(
            "Scheduler: {} | Operations: {} | Duration: {:.3}s",
            self.scheduler.as_str(),
            format_count(self.operations),
            self.duration.as_secs_f64()
        );
        println!(
            "Throughput: {} ops/s | Mean: {:.3} us/op",
            format_throughput(self.ops_per_sec()),
            self.mean_op_us()
        );
    }
}

/// Latency benchmark runner
pub struct LatencyBenchmark {
    config: LatencyConfig,
}

impl LatencyBenchmark {
    pub fn new(config: LatencyConfig) -> Self {
        Self { config }
    }

    /// Run with the configured scheduler
    pub fn run(&self) -> Result<LatencyResult> {
        match self.config.scheduler {
            SchedulerMode::CurrentThread => self.run_cooperative_with(increment_local),
            SchedulerMode::MultiThread => self.run_threaded_with(increment_shared),
        }
    }

    /// Single-threaded run: one `LocalSet`, unlocked counter
    pub fn run_cooperative_with(&self, step: LocalStep) -> Result<LatencyResult> {
        let runtime = tokio::runtime::Builder::new_current_thread().build()?;
        let local = LocalSet::new();

        let start = Instant::now();
        let final_count = local.block_on(&runtime, drive_local(self.config.operations, step))?;
        self.finish(final_count, start.elapsed())
    }

    /// Work-stealing run: counter behind a mutex
    pub fn run_threaded_with(&self, step: SharedStep) -> Result<LatencyResult> {
        let runtime = tokio::runtime::Builder::new_multi_thread().build()?;

        let start = Instant::now();
        let final_count = runtime.block_on(drive_shared(self.config.operations, step))?;
        self.finish(final_count, start.elapsed())
    }

    fn finish(&self, final_count: u64, duration: Duration) -> Result<LatencyResult> {
        if final_count != self.config.operations {
            return Err(BenchmarkError::Operation(format!(
                "counter ended at {} after {} increments",
                final_count, self.config.operations
            )));
        }

        debug!(
            "Latency run complete: {} operations in {:.3}s",
            final_count,
            duration.as_secs_f64()
        );

        Ok(LatencyResult {
            scheduler: self.config.scheduler,
            operations: self.config.operations,
            final_count,
            duration,
        })
    }
}

fn join_failure(e: JoinError) -> BenchmarkError {
    BenchmarkError::Operation(format!("operation task failed: {}", e))
}

/// Spawn all operations on the current `LocalSet` and join them
///
/// Returning early drops the `JoinSet`, which aborts whatever is still
/// pending.
async fn drive_local(operations: u64, step: LocalStep) -> Result<u64> {
    let counter = Rc::new(Cell::new(0u64));
    let mut set = JoinSet::new();

    for operation in 0..operations {
        let counter = Rc::clone(&counter);
        set.spawn_local(async move { step(&counter, operation) });
    }

    while let Some(joined) = set.join_next().await {
        joined.map_err(join_failure)??;
    }

    Ok(counter.get())
}

async fn drive_shared(operations: u64, step: SharedStep) -> Result<u64> {
    let counter = Arc::new(Mutex::new(0u64));
    let mut set = JoinSet::new();

    for operation in 0..operations {
        let counter = Arc::clone(&counter);
        set.spawn(async move { step(&counter, operation) });
    }

    while let Some(joined) = set.join_next().await {
        joined.map_err(join_failure)??;
    }

    let final_count = *counter.lock();
    Ok(final_count)
}

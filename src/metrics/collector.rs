//! Aggregation of per-task counts into run totals
//!
//! Summation is order independent, so worker results can be folded in
//! whatever order they arrive on the channel.

use serde::Serialize;

use crate::benchmark::worker::WorkerResult;
use crate::workload::TaskResult;

/// Totals across every task of every worker
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AggregateTotals {
    pub total_primes: u64,
    pub total_matrices: u64,
    pub total_fibs: u64,
}

impl AggregateTotals {
    /// Fold one task into the totals
    pub fn add_task(&mut self, task: &TaskResult) {
        self.total_primes += task.prime_count;
        self.total_matrices += task.matrix_count;
        self.total_fibs += task.fib_count;
    }

    /// Fold every task of one worker into the totals
    pub fn add_worker(&mut self, worker: &WorkerResult) {
        for task in &worker.tasks {
            self.add_task(task);
        }
    }

    /// Combine two partial totals
    pub fn merge(&mut self, other: &AggregateTotals) {
        self.total_primes += other.total_primes;
        self.total_matrices += other.total_matrices;
        self.total_fibs += other.total_fibs;
    }

    /// Totals over a set of worker results
    pub fn from_workers(workers: &[WorkerResult]) -> Self {
        let mut totals = Self::default();
        for worker in workers {
            totals.add_worker(worker);
        }
        totals
    }

    /// Operations counted towards the throughput rate
    pub fn total_ops(&self) -> u64 {
        self.total_primes + self.total_matrices + self.total_fibs
    }

    /// Operations per second over `seconds`
    pub fn rate(&self, seconds: f64) -> f64 {
        if seconds > 0.0 {
            self.total_ops() as f64 / seconds
        } else {
            0.0
        }
    }
}

//! Global atomic counters for thread synchronization
//!
//! These are the ONLY shared state between throughput workers besides the
//! result channel. Everything else is thread-local.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Global counters shared between all worker threads
///
/// Relaxed ordering is enough for progress reporting; the shutdown flag is
/// stored with SeqCst so workers observe it at their next task boundary.
pub struct GlobalCounters {
    /// Tasks completed across all workers
    pub tasks_finished: AtomicU64,

    /// Workers that have sent their result
    pub workers_finished: AtomicU64,

    /// Total errors encountered
    pub error_count: AtomicU64,

    /// Shutdown signal
    pub shutdown: AtomicBool,

    /// Tasks expected for the whole run
    total_tasks: u64,
}

impl GlobalCounters {
    /// Create counters for a run of `total_tasks` tasks
    pub fn with_tasks(total_tasks: u64) -> Self {
        Self {
            tasks_finished: AtomicU64::new(0),
            workers_finished: AtomicU64::new(0),
            error_count: AtomicU64::new(0),
            shutdown: AtomicBool::new(false),
            total_tasks,
        }
    }

    /// Record one completed task
    #[inline]
    pub fn record_task_finished(&self) {
        self.tasks_finished.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a worker handing back its result
    #[inline]
    pub fn record_worker_finished(&self) {
        self.workers_finished.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an error
    #[inline]
    pub fn record_error(&self) {
        self.error_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Signal shutdown to all workers
    pub fn signal_shutdown(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
    }

    /// Check if shutdown has been signaled
    #[inline]
    pub fn is_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::Relaxed)
    }

    /// Check if every expected task has finished
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.tasks_finished.load(Ordering::Relaxed) >= self.total_tasks
    }

    /// Get current progress as (finished, total)
    pub fn progress(&self) -> (u64, u64) {
        (self.tasks_finished.load(Ordering::Relaxed), self.total_tasks)
    }

    /// Get error count
    pub fn errors(&self) -> u64 {
        self.error_count.load(Ordering::Relaxed)
    }

    /// Get number of workers that reported
    pub fn workers_reported(&self) -> u64 {
        self.workers_finished.load(Ordering::Relaxed)
    }
}

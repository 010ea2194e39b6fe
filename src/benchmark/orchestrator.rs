//! Benchmark orchestrator
//!
//! Runs the selected benchmarks. For the throughput benchmark it spawns the
//! worker threads, collects their results, and manages teardown.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use hdrhistogram::Histogram;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};

use super::counters::GlobalCounters;
use super::latency::{LatencyBenchmark, LatencyResult};
use super::worker::{new_task_histogram, ThroughputWorker, WorkerResult};
use crate::config::BenchmarkConfig;
use crate::metrics::reporter::{report_workers_console, BenchmarkResults};
use crate::metrics::AggregateTotals;
use crate::utils::{BenchmarkError, Result};
use crate::workload::{SyntheticKernel, TaskKernel, WorkloadType};

/// Throughput benchmark result summary
#[derive(Debug, Clone)]
pub struct ThroughputResult {
    /// Workers spawned
    pub worker_count: usize,
    pub tasks_per_worker: u64,
    pub iterations_per_task: u64,
    /// Per-worker results, ordered by worker id
    pub workers: Vec<WorkerResult>,
    /// Summed counts over every task
    pub totals: AggregateTotals,
    /// Wall time of the whole parallel phase
    pub duration: Duration,
    /// Merged per-task wall time (microseconds)
    pub task_histogram: Histogram<u64>,
}

impl ThroughputResult {
    /// Derived rate: (primes + matrices + fibs) per second
    pub fn ops_per_sec(&self) -> f64 {
        self.totals.rate(self.duration.as_secs_f64())
    }

    /// Get percentile task time in milliseconds
    pub fn task_percentile_ms(&self, p: f64) -> f64 {
        self.task_histogram.value_at_percentile(p) as f64 / 1000.0
    }

    /// Print the results block
    pub fn print_summary(&self) {
        println!("\n=== BENCHMARK RESULTS ===");
        println!(
            "Total execution time: {:.3}s",
            self.duration.as_secs_f64()
        );
        println!("Total primes found: {}", self.totals.total_primes);
        println!("Total matrices computed: {}", self.totals.total_matrices);
        println!("Total fibonacci numbers: {}", self.totals.total_fibs);
        println!("Operations per second: {:.2}", self.ops_per_sec());
        println!(
            "Parallel efficiency: {} workers utilized",
            self.worker_count
        );
        if !self.task_histogram.is_empty() {
            println!(
                "Task time (ms): avg={:.2} p50={:.2} p99={:.2} max={:.2}",
                self.task_histogram.mean() / 1000.0,
                self.task_percentile_ms(50.0),
                self.task_percentile_ms(99.0),
                self.task_histogram.max() as f64 / 1000.0
            );
        }
    }
}

/// Benchmark orchestrator
pub struct Orchestrator {
    config: Arc<BenchmarkConfig>,
    kernel: Arc<dyn TaskKernel>,
}

impl Orchestrator {
    /// Create new orchestrator running the synthetic kernel
    pub fn new(config: BenchmarkConfig) -> Self {
        let kernel = Arc::new(SyntheticKernel::new(config.throughput.kernel));
        Self::with_kernel(config, kernel)
    }

    /// Create orchestrator with a custom task kernel
    pub fn with_kernel(config: BenchmarkConfig, kernel: Arc<dyn TaskKernel>) -> Self {
        Self {
            config: Arc::new(config),
            kernel,
        }
    }

    /// Report progress during the throughput benchmark
    fn report_progress(counters: &GlobalCounters) {
        let (_, total) = counters.progress();
        let pb = ProgressBar::new(total);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} tasks ({msg})",
                )
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );

        let start = Instant::now();
        let mut last_finished = 0u64;
        let mut last_time = start;

        while !counters.is_shutdown() {
            let (finished, _) = counters.progress();
            pb.set_position(finished);

            let now = Instant::now();
            let interval = now.duration_since(last_time).as_secs_f64();
            if interval >= 0.5 {
                let rate = (finished - last_finished) as f64 / interval;
                pb.set_message(format!("{:.1} tasks/s", rate));
                last_finished = finished;
                last_time = now;
            }

            if counters.is_complete() {
                break;
            }

            thread::sleep(Duration::from_millis(100));
        }

        pb.set_position(counters.progress().0);
        pb.finish_with_message("done");
    }

    /// Run the latency benchmark
    pub fn run_latency(&self) -> Result<LatencyResult> {
        let latency = &self.config.latency;
        info!(
            "Scheduling {} deferred increments ({} scheduler)",
            format_count(latency.operations),
            latency.scheduler.as_str()
        );
        LatencyBenchmark::new(latency.clone()).run()
    }

    /// Run the throughput benchmark
    ///
    /// The first worker failure wins: remaining workers are told to stop,
    /// every thread is joined, and that failure is returned.
    pub fn run_throughput(&self) -> Result<ThroughputResult> {
        let throughput = &self.config.throughput;
        let worker_count = throughput.workers as usize;
        if worker_count == 0 {
            return Err(BenchmarkError::Config(
                "Throughput benchmark needs at least one worker".to_string(),
            ));
        }

        let counters = Arc::new(GlobalCounters::with_tasks(throughput.total_tasks()));
        let (tx, rx) = crossbeam_channel::bounded::<Result<WorkerResult>>(worker_count);
        let mut handles: Vec<JoinHandle<()>> = Vec::with_capacity(worker_count);

        let start_time = Instant::now();

        for worker_id in 0..worker_count {
            let tx = tx.clone();
            let worker_counters = Arc::clone(&counters);
            let kernel = Arc::clone(&self.kernel);
            let config = throughput.clone();

            let spawned = thread::Builder::new()
                .name(format!("throughput-worker-{}", worker_id))
                .spawn(move || {
                    let worker = ThroughputWorker::new(worker_id, kernel, &config);
                    let outcome = panic::catch_unwind(AssertUnwindSafe(|| worker.run(&worker_counters)))
                        .unwrap_or_else(|payload| {
                            Err(BenchmarkError::worker(
                                worker_id,
                                format!("panicked: {}", panic_message(payload.as_ref())),
                            ))
                        });
                    worker_counters.record_worker_finished();
                    // The receiver outlives every worker; a failed send means
                    // the orchestrator is already unwinding.
                    let _ = tx.send(outcome);
                });

            match spawned {
                Ok(handle) => handles.push(handle),
                Err(e) => {
                    counters.signal_shutdown();
                    Self::teardown(handles);
                    return Err(BenchmarkError::Io(e));
                }
            }
        }
        drop(tx);

        let progress = if self.config.quiet {
            None
        } else {
            let counters = Arc::clone(&counters);
            Some(thread::spawn(move || Self::report_progress(&counters)))
        };

        let mut results: Vec<WorkerResult> = Vec::with_capacity(worker_count);
        let mut first_error: Option<BenchmarkError> = None;

        // Ends once every worker has dropped its sender
        for outcome in rx.iter() {
            match outcome {
                Ok(result) => results.push(result),
                Err(e) => {
                    counters.record_error();
                    if first_error.is_none() {
                        warn!(
                            "{}; stopping remaining workers ({} error(s) so far)",
                            e,
                            counters.errors()
                        );
                        counters.signal_shutdown();
                        first_error = Some(e);
                    } else {
                        debug!("Ignoring later failure: {}", e);
                    }
                }
            }
        }

        let duration = start_time.elapsed();

        // Signal shutdown to progress reporter
        counters.signal_shutdown();
        // Join before reporting so no worker outlives the run, even on failure
        Self::teardown(handles);
        if let Some(progress) = progress {
            let _ = progress.join();
        }
        debug!(
            "{} of {} workers reported, {} failed",
            counters.workers_reported(),
            worker_count,
            counters.errors()
        );

        if let Some(e) = first_error {
            return Err(e);
        }

        Ok(self.merge_results(results, duration))
    }

    /// Join every worker thread, whatever state the run is in
    fn teardown(handles: Vec<JoinHandle<()>>) {
        for handle in handles {
            let name = handle.thread().name().unwrap_or("worker").to_string();
            if handle.join().is_err() {
                warn!("{} panicked during teardown", name);
            }
        }
    }

    /// Merge results from worker threads
    fn merge_results(&self, mut results: Vec<WorkerResult>, duration: Duration) -> ThroughputResult {
        results.sort_by_key(|r| r.worker_id);

        let mut task_histogram = new_task_histogram();
        let mut totals = AggregateTotals::default();
        for result in &results {
            task_histogram.add(&result.task_histogram).ok();
            totals.add_worker(result);
        }

        ThroughputResult {
            worker_count: results.len(),
            tasks_per_worker: self.config.throughput.tasks_per_worker,
            iterations_per_task: self.config.throughput.iterations_per_task,
            workers: results,
            totals,
            duration,
            task_histogram,
        }
    }

    /// Run all configured tests
    pub fn run_all(&self) -> Result<BenchmarkResults> {
        let mut results = BenchmarkResults::new(&self.config_summary());

        for workload in &self.config.tests {
            if !self.config.quiet {
                println!("\nRunning test: {}", workload);
            }

            match workload {
                WorkloadType::Latency => {
                    let result = self.run_latency()?;
                    result.print_summary();
                    results.latency = Some(result);
                }
                WorkloadType::Throughput => {
                    let result = self.run_throughput()?;
                    if self.config.verbose {
                        report_workers_console(&result.workers);
                    }
                    result.print_summary();
                    results.throughput = Some(result);
                }
            }
        }

        Ok(results)
    }

    /// One-line description of the run configuration
    pub fn config_summary(&self) -> String {
        let latency = &self.config.latency;
        let throughput = &self.config.throughput;
        format!(
            "operations={}, scheduler={}, workers={}, tasks_per_worker={}, iterations_per_task={}, matrix_size={}",
            latency.operations,
            latency.scheduler.as_str(),
            throughput.workers,
            throughput.tasks_per_worker,
            throughput.iterations_per_task,
            throughput.kernel.matrix_size
        )
    }

    /// Export results to JSON file
    pub fn export_json(&self, results: &BenchmarkResults, path: &Path) -> Result<()> {
        results.write_json(path)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Format throughput without meaningless decimals
/// Examples: 1,234,567 ops/s, 987,654 ops/s
pub fn format_throughput(throughput: f64) -> String {
    format_count(throughput as u64)
}

/// Format large numbers with thousands separators
/// Examples: 1,234,567 or 987,654
pub fn format_count(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ThroughputConfig;
    use crate::workload::{prime, KernelParams, TaskResult};
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn throughput_config(workers: u32, tasks_per_worker: u64, iterations: u64) -> BenchmarkConfig {
        BenchmarkConfig {
            tests: vec![WorkloadType::Throughput],
            throughput: ThroughputConfig {
                workers,
                tasks_per_worker,
                iterations_per_task: iterations,
                kernel: KernelParams {
                    matrix_size: 8,
                    ..KernelParams::default()
                },
                seed: 5,
            },
            quiet: true,
            ..BenchmarkConfig::default()
        }
    }

    /// Fails every task of one worker, succeeds elsewhere
    struct FailingKernel {
        failing_task: u64,
    }

    impl TaskKernel for FailingKernel {
        fn run(&self, task_id: u64, _iterations: u64, _rng: &mut fastrand::Rng) -> Result<TaskResult> {
            if task_id == self.failing_task {
                return Err(BenchmarkError::Operation(format!("task {} exploded", task_id)));
            }
            Ok(TaskResult {
                task_id,
                prime_count: 1,
                matrix_count: 1,
                fib_count: 1,
                last_prime: Some(2),
            })
        }
    }

    struct PanickingKernel;

    impl TaskKernel for PanickingKernel {
        fn run(&self, _task_id: u64, _iterations: u64, _rng: &mut fastrand::Rng) -> Result<TaskResult> {
            panic!("kernel bug");
        }
    }

    #[test]
    fn test_task_ids_cover_range_exactly_once() {
        for workers in [1u32, 2, 3, 7] {
            let orchestrator = Orchestrator::new(throughput_config(workers, 4, 50));
            let result = orchestrator.run_throughput().unwrap();

            let ids: Vec<u64> = result
                .workers
                .iter()
                .flat_map(|w| w.tasks.iter().map(|t| t.task_id))
                .collect();
            let unique: HashSet<u64> = ids.iter().copied().collect();
            let expected: HashSet<u64> = (0..workers as u64 * 4).collect();

            assert_eq!(ids.len(), unique.len(), "duplicate task ids for W={}", workers);
            assert_eq!(unique, expected, "task ids for W={}", workers);
            assert_eq!(result.worker_count, workers as usize);
        }
    }

    #[test]
    fn test_tasks_kept_in_insertion_order() {
        let orchestrator = Orchestrator::new(throughput_config(2, 5, 10));
        let result = orchestrator.run_throughput().unwrap();

        for worker in &result.workers {
            let ids: Vec<u64> = worker.tasks.iter().map(|t| t.task_id).collect();
            let base = worker.worker_id as u64 * 5;
            assert_eq!(ids, (base..base + 5).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_end_to_end_prime_total() {
        let workers = 2u32;
        let orchestrator = Orchestrator::new(throughput_config(workers, 5, 2000));
        let result = orchestrator.run_throughput().unwrap();

        let expected: u64 = (0..workers as u64 * 5)
            .map(|task_id| prime::scan_range(task_id * 10_000..task_id * 10_000 + 2000).count)
            .sum();

        assert_eq!(result.totals.total_primes, expected);
        assert_eq!(result.totals.total_matrices, workers as u64 * 5 * 3);
        assert_eq!(result.totals.total_fibs, workers as u64 * 5 * 100);
        assert_eq!(result.task_histogram.len(), workers as u64 * 5);
        assert!(result.ops_per_sec() > 0.0);
    }

    #[test]
    fn test_first_failure_aborts_run() {
        let kernel = Arc::new(FailingKernel { failing_task: 6 });
        let orchestrator = Orchestrator::with_kernel(throughput_config(4, 3, 10), kernel);

        match orchestrator.run_throughput() {
            Err(BenchmarkError::Worker { worker_id, message }) => {
                // task 6 belongs to worker 2 (tasks 6..9)
                assert_eq!(worker_id, 2);
                assert!(message.contains("task 6 exploded"));
            }
            other => panic!("expected worker failure, got ok={}", other.is_ok()),
        }
    }

    /// Fails task 0; every other task sleeps while tracked as in flight
    struct SlowKernel {
        in_flight: Arc<AtomicUsize>,
    }

    impl TaskKernel for SlowKernel {
        fn run(&self, task_id: u64, _iterations: u64, _rng: &mut fastrand::Rng) -> Result<TaskResult> {
            if task_id == 0 {
                return Err(BenchmarkError::Operation("fail".to_string()));
            }
            self.in_flight.fetch_add(1, Ordering::SeqCst);
            thread::sleep(Duration::from_millis(200));
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            Ok(TaskResult {
                task_id,
                prime_count: 0,
                matrix_count: 0,
                fib_count: 0,
                last_prime: None,
            })
        }
    }

    #[test]
    fn test_failure_joins_every_worker_before_returning() {
        let in_flight = Arc::new(AtomicUsize::new(0));
        let kernel = Arc::new(SlowKernel {
            in_flight: Arc::clone(&in_flight),
        });
        let orchestrator = Orchestrator::with_kernel(throughput_config(4, 3, 10), kernel);

        let err = orchestrator.run_throughput().unwrap_err();
        assert!(matches!(err, BenchmarkError::Worker { worker_id: 0, .. }));
        assert_eq!(in_flight.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_worker_panic_is_reported() {
        let orchestrator =
            Orchestrator::with_kernel(throughput_config(2, 1, 10), Arc::new(PanickingKernel));

        let err = orchestrator.run_throughput().unwrap_err();
        assert!(err.to_string().contains("kernel bug"));
    }

    #[test]
    fn test_zero_workers_rejected() {
        let orchestrator = Orchestrator::new(throughput_config(0, 1, 10));
        assert!(matches!(
            orchestrator.run_throughput(),
            Err(BenchmarkError::Config(_))
        ));
    }

    #[test]
    fn test_run_all_collects_selected_tests() {
        let mut config = throughput_config(1, 1, 10);
        config.tests = vec![WorkloadType::Latency, WorkloadType::Throughput];
        config.latency.operations = 1000;

        let results = Orchestrator::new(config).run_all().unwrap();
        assert_eq!(results.latency.as_ref().map(|r| r.final_count), Some(1000));
        assert_eq!(results.throughput.as_ref().map(|r| r.worker_count), Some(1));
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(1), "1");
        assert_eq!(format_count(123), "123");
        assert_eq!(format_count(1234), "1,234");
        assert_eq!(format_count(123456), "123,456");
        assert_eq!(format_count(1000000), "1,000,000");
    }

    #[test]
    fn test_format_throughput() {
        assert_eq!(format_throughput(937821.7051), "937,821");
        assert_eq!(format_throughput(12.9), "12");
    }
}

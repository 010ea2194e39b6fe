//! Metrics reporter - console tables and JSON export

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::benchmark::latency::LatencyResult;
use crate::benchmark::orchestrator::ThroughputResult;
use crate::benchmark::worker::WorkerResult;
use crate::utils::Result;

/// Print per-worker summary to console
pub fn report_workers_console(workers: &[WorkerResult]) {
    if workers.is_empty() {
        return;
    }

    println!("\nPer-worker metrics:");
    println!(
        "{:>8} {:>8} {:>12} {:>10} {:>12} {:>12}",
        "Worker", "Tasks", "Primes", "Time (s)", "p50 (ms)", "Max (ms)"
    );
    println!("{}", "-".repeat(67));

    for worker in workers {
        let primes: u64 = worker.tasks.iter().map(|t| t.prime_count).sum();
        println!(
            "{:>8} {:>8} {:>12} {:>10.3} {:>12.2} {:>12.2}",
            worker.worker_id,
            worker.tasks.len(),
            primes,
            worker.execution_time.as_secs_f64(),
            worker.task_histogram.value_at_percentile(50.0) as f64 / 1000.0,
            worker.task_histogram.max() as f64 / 1000.0
        );
    }
}

/// Benchmark results collection for export
#[derive(Debug)]
pub struct BenchmarkResults {
    /// Configuration summary
    pub config_summary: String,
    pub latency: Option<LatencyResult>,
    pub throughput: Option<ThroughputResult>,
}

impl BenchmarkResults {
    /// Create new results collection
    pub fn new(config_summary: &str) -> Self {
        Self {
            config_summary: config_summary.to_string(),
            latency: None,
            throughput: None,
        }
    }

    /// Number of benchmarks that produced a result
    pub fn len(&self) -> usize {
        self.latency.is_some() as usize + self.throughput.is_some() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Export all results to JSON
    pub fn to_json(&self) -> serde_json::Value {
        let latency = self.latency.as_ref().map(|r| {
            serde_json::json!({
                "scheduler": r.scheduler.as_str(),
                "operations": r.operations,
                "final_count": r.final_count,
                "duration_secs": r.duration.as_secs_f64(),
                "ops_per_sec": r.ops_per_sec(),
                "mean_op_us": r.mean_op_us(),
            })
        });

        let throughput = self.throughput.as_ref().map(|r| {
            serde_json::json!({
                "workers": r.worker_count,
                "tasks_per_worker": r.tasks_per_worker,
                "iterations_per_task": r.iterations_per_task,
                "duration_secs": r.duration.as_secs_f64(),
                "ops_per_sec": r.ops_per_sec(),
                "totals": r.totals,
                "task_time": {
                    "mean_ms": r.task_histogram.mean() / 1000.0,
                    "p50_ms": r.task_percentile_ms(50.0),
                    "p99_ms": r.task_percentile_ms(99.0),
                    "max_ms": r.task_histogram.max() as f64 / 1000.0
                },
                "per_worker": r.workers.iter().map(|w| {
                    serde_json::json!({
                        "worker_id": w.worker_id,
                        "execution_secs": w.execution_time.as_secs_f64(),
                        "tasks": w.tasks,
                    })
                }).collect::<Vec<_>>()
            })
        });

        serde_json::json!({
            "config": self.config_summary,
            "latency": latency,
            "throughput": throughput,
        })
    }

    /// Write all results to JSON file
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, &self.to_json())?;
        writeln!(writer)?;
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::benchmark::worker::new_task_histogram;
    use crate::config::SchedulerMode;
    use crate::metrics::AggregateTotals;
    use crate::workload::TaskResult;
    use std::time::Duration;

    fn sample_results() -> BenchmarkResults {
        let task = TaskResult {
            task_id: 0,
            prime_count: 303,
            matrix_count: 3,
            fib_count: 100,
            last_prime: Some(1999),
        };
        let mut totals = AggregateTotals::default();
        totals.add_task(&task);

        let mut histogram = new_task_histogram();
        histogram.record(1500).unwrap();

        let worker = WorkerResult {
            worker_id: 0,
            execution_time: Duration::from_millis(2),
            tasks: vec![task],
            task_histogram: histogram.clone(),
        };

        let mut results = BenchmarkResults::new("test config");
        results.latency = Some(LatencyResult {
            scheduler: SchedulerMode::CurrentThread,
            operations: 10,
            final_count: 10,
            duration: Duration::from_millis(1),
        });
        results.throughput = Some(ThroughputResult {
            worker_count: 1,
            tasks_per_worker: 1,
            iterations_per_task: 2000,
            workers: vec![worker],
            totals,
            duration: Duration::from_secs(1),
            task_histogram: histogram,
        });
        results
    }

    #[test]
    fn test_empty_results() {
        let results = BenchmarkResults::new("cfg");
        assert!(results.is_empty());
        assert_eq!(results.to_json()["latency"], serde_json::Value::Null);
    }

    #[test]
    fn test_to_json_shape() {
        let results = sample_results();
        assert_eq!(results.len(), 2);

        let json = results.to_json();
        assert_eq!(json["config"], "test config");
        assert_eq!(json["latency"]["final_count"], 10);
        assert_eq!(json["latency"]["scheduler"], "current-thread");
        assert_eq!(json["throughput"]["totals"]["total_primes"], 303);
        assert_eq!(json["throughput"]["ops_per_sec"], 406.0);
        assert_eq!(
            json["throughput"]["per_worker"][0]["tasks"][0]["last_prime"],
            1999
        );
    }

    #[test]
    fn test_write_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.json");

        sample_results().write_json(&path).unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["throughput"]["workers"], 1);
    }
}

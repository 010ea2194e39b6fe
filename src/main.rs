//! runtime-bench - scheduling latency and parallel CPU throughput
//!
//! Runs the deferred-increment latency benchmark and/or the multi-worker
//! synthetic throughput benchmark, then prints a results block per test.

use anyhow::Result;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use runtime_bench::benchmark::Orchestrator;
use runtime_bench::config::{available_cpus, BenchmarkConfig, CliArgs};
use runtime_bench::workload::WorkloadType;

fn setup_logging(verbose: bool, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else if verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

fn print_banner(config: &BenchmarkConfig) {
    if config.quiet {
        return;
    }

    println!("runtime-bench v{}", env!("CARGO_PKG_VERSION"));
    println!("====================================");
    println!("Tests: {:?}", config.tests);
    if config.tests.contains(&WorkloadType::Latency) {
        println!(
            "Latency: {} operations, {} scheduler",
            config.latency.operations,
            config.latency.scheduler.as_str()
        );
    }
    if config.tests.contains(&WorkloadType::Throughput) {
        let throughput = &config.throughput;
        println!(
            "CPUs: {}, Workers: {}",
            available_cpus(),
            throughput.workers
        );
        println!(
            "Tasks per worker: {}, Iterations per task: {}",
            throughput.tasks_per_worker, throughput.iterations_per_task
        );
        println!(
            "Matrix: {}x{} x{}, Fibonacci: {} values from n={}",
            throughput.kernel.matrix_size,
            throughput.kernel.matrix_size,
            throughput.kernel.matrix_repetitions,
            throughput.kernel.fib_count,
            throughput.kernel.fib_start
        );
    }
    println!("====================================");
}

fn run() -> Result<()> {
    // Parse CLI arguments
    let args = CliArgs::parse_args();

    // Setup logging
    setup_logging(args.verbose, args.quiet);

    // Build configuration
    let config = BenchmarkConfig::from_cli(&args)
        .map_err(|e| anyhow::anyhow!("Configuration error: {}", e))?;

    print_banner(&config);

    let orchestrator = Orchestrator::new(config.clone());
    let results = orchestrator.run_all()?;
    if !config.quiet {
        println!("\nTests run: {}", results.len());
    }

    // Export to JSON if requested
    if let Some(ref output_path) = config.output_path {
        info!("Writing results to: {:?}", output_path);
        orchestrator.export_json(&results, output_path)?;
    }

    Ok(())
}

fn main() {
    if let Err(e) = run() {
        error!("Error: {:#}", e);
        std::process::exit(1);
    }
}

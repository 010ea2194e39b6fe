//! Synthetic CPU-bound task kernel
//!
//! One task = prime search over a fixed-length range, a few random matrix
//! multiplications and a batch of Fibonacci values. Only counts come back.

use serde::Serialize;

use super::{fibonacci, matrix, prime};
use crate::utils::{BenchmarkError, Result};

/// Distance between the start of consecutive task ranges
pub const DEFAULT_RANGE_STRIDE: u64 = 10_000;
/// Square matrix dimension
pub const DEFAULT_MATRIX_SIZE: usize = 50;
/// Matrix multiplications per task
pub const DEFAULT_MATRIX_REPETITIONS: u64 = 3;
/// Fibonacci values computed per task
pub const DEFAULT_FIB_COUNT: u64 = 100;
/// First Fibonacci index computed per task
pub const DEFAULT_FIB_START: u64 = 1000;

/// Integer form of a missing `last_prime`
pub const LAST_PRIME_SENTINEL: i64 = -1;

/// Per-task shape of the synthetic workload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KernelParams {
    pub range_stride: u64,
    pub matrix_size: usize,
    pub matrix_repetitions: u64,
    pub fib_count: u64,
    pub fib_start: u64,
}

impl Default for KernelParams {
    fn default() -> Self {
        Self {
            range_stride: DEFAULT_RANGE_STRIDE,
            matrix_size: DEFAULT_MATRIX_SIZE,
            matrix_repetitions: DEFAULT_MATRIX_REPETITIONS,
            fib_count: DEFAULT_FIB_COUNT,
            fib_start: DEFAULT_FIB_START,
        }
    }
}

impl KernelParams {
    /// Half-open prime range scanned by `task_id`
    pub fn prime_range(&self, task_id: u64, iterations: u64) -> Option<std::ops::Range<u64>> {
        let start = task_id.checked_mul(self.range_stride)?;
        let end = start.checked_add(iterations)?;
        Some(start..end)
    }
}

/// Outcome of one task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TaskResult {
    pub task_id: u64,
    pub prime_count: u64,
    pub matrix_count: u64,
    pub fib_count: u64,
    /// Largest prime in the task's range
    pub last_prime: Option<u64>,
}

impl TaskResult {
    /// `last_prime` with -1 standing in for "no prime found"
    pub fn last_prime_or_sentinel(&self) -> i64 {
        self.last_prime
            .map(|p| p as i64)
            .unwrap_or(LAST_PRIME_SENTINEL)
    }

    /// Operations this task contributes to the throughput rate
    pub fn total_ops(&self) -> u64 {
        self.prime_count + self.matrix_count + self.fib_count
    }
}

/// A unit of CPU work executed by throughput workers
///
/// Implementations must be pure apart from the RNG they are handed.
pub trait TaskKernel: Send + Sync {
    fn run(&self, task_id: u64, iterations: u64, rng: &mut fastrand::Rng) -> Result<TaskResult>;
}

/// Production kernel: primes + matrices + Fibonacci
#[derive(Debug, Clone, Copy, Default)]
pub struct SyntheticKernel {
    params: KernelParams,
}

impl SyntheticKernel {
    pub fn new(params: KernelParams) -> Self {
        Self { params }
    }
}

impl TaskKernel for SyntheticKernel {
    fn run(&self, task_id: u64, iterations: u64, rng: &mut fastrand::Rng) -> Result<TaskResult> {
        complex_calculation(&self.params, task_id, iterations, rng)
    }
}

/// Run all three stages for one task
pub fn complex_calculation(
    params: &KernelParams,
    task_id: u64,
    iterations: u64,
    rng: &mut fastrand::Rng,
) -> Result<TaskResult> {
    let range = params.prime_range(task_id, iterations).ok_or_else(|| {
        BenchmarkError::Operation(format!(
            "prime range for task {} overflows u64 (stride {}, iterations {})",
            task_id, params.range_stride, iterations
        ))
    })?;

    let primes = prime::scan_range(range);
    let matrix_count =
        matrix::burn_multiplications(params.matrix_size, params.matrix_repetitions, rng);
    let fib_count = fibonacci::stress(params.fib_start, params.fib_count);

    Ok(TaskResult {
        task_id,
        prime_count: primes.count,
        matrix_count,
        fib_count,
        last_prime: primes.largest,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_params() -> KernelParams {
        KernelParams {
            matrix_size: 4,
            ..KernelParams::default()
        }
    }

    #[test]
    fn test_default_params() {
        let params = KernelParams::default();
        assert_eq!(params.range_stride, 10_000);
        assert_eq!(params.matrix_size, 50);
        assert_eq!(params.matrix_repetitions, 3);
        assert_eq!(params.fib_count, 100);
        assert_eq!(params.fib_start, 1000);
    }

    #[test]
    fn test_task_zero() {
        let mut rng = fastrand::Rng::with_seed(1);
        let result = complex_calculation(&small_params(), 0, 100, &mut rng).unwrap();

        // 25 primes below 100, the largest being 97
        assert_eq!(result.task_id, 0);
        assert_eq!(result.prime_count, 25);
        assert_eq!(result.last_prime, Some(97));
        assert_eq!(result.matrix_count, 3);
        assert_eq!(result.fib_count, 100);
        assert_eq!(result.total_ops(), 128);
    }

    #[test]
    fn test_range_starts_at_stride() {
        let params = small_params();
        assert_eq!(params.prime_range(3, 2000), Some(30_000..32_000));
    }

    #[test]
    fn test_no_prime_sentinel() {
        let mut rng = fastrand::Rng::with_seed(1);
        // [10000, 10007) contains no prime
        let result = complex_calculation(&small_params(), 1, 7, &mut rng).unwrap();
        assert_eq!(result.prime_count, 0);
        assert_eq!(result.last_prime, None);
        assert_eq!(result.last_prime_or_sentinel(), -1);
    }

    #[test]
    fn test_overflowing_range_is_error() {
        let mut rng = fastrand::Rng::with_seed(1);
        let err = complex_calculation(&small_params(), u64::MAX, 10, &mut rng).unwrap_err();
        assert!(matches!(err, BenchmarkError::Operation(_)));
    }

    #[test]
    fn test_prime_count_independent_of_rng() {
        let kernel = SyntheticKernel::new(small_params());
        let mut a = fastrand::Rng::with_seed(1);
        let mut b = fastrand::Rng::with_seed(99);
        let ra = kernel.run(2, 500, &mut a).unwrap();
        let rb = kernel.run(2, 500, &mut b).unwrap();
        assert_eq!(ra, rb);
    }
}

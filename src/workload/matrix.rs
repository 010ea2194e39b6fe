//! Naive square matrix multiplication
//!
//! Operands are random and the product is thrown away; the step exists to
//! burn CPU time. Callers only report how many products were computed.

use std::hint::black_box;

/// Row-major square matrix
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    size: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// All-zero matrix
    pub fn zeros(size: usize) -> Self {
        Self {
            size,
            data: vec![0.0; size * size],
        }
    }

    /// Matrix filled with uniform values in [0, 1)
    pub fn random(size: usize, rng: &mut fastrand::Rng) -> Self {
        let data = (0..size * size).map(|_| rng.f64()).collect();
        Self { size, data }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.size + col]
    }

    /// Standard triple-loop product. Both operands must share a size.
    pub fn multiply(&self, other: &Matrix) -> Matrix {
        debug_assert_eq!(self.size, other.size);
        let n = self.size;
        let mut result = Matrix::zeros(n);
        for i in 0..n {
            for j in 0..n {
                let mut sum = 0.0;
                for k in 0..n {
                    sum += self.data[i * n + k] * other.data[k * n + j];
                }
                result.data[i * n + j] = sum;
            }
        }
        result
    }
}

/// Multiply two fresh random matrices and discard the product
pub fn random_multiply(size: usize, rng: &mut fastrand::Rng) {
    let a = Matrix::random(size, rng);
    let b = Matrix::random(size, rng);
    black_box(a.multiply(&b));
}

/// Run `repetitions` random multiplications, returning how many were done
pub fn burn_multiplications(size: usize, repetitions: u64, rng: &mut fastrand::Rng) -> u64 {
    for _ in 0..repetitions {
        random_multiply(size, rng);
    }
    repetitions
}

//! Error types for runtime-bench

use std::io;
use thiserror::Error;

/// Top-level benchmark error
///
/// Every variant is fatal: the first one raised aborts the run.
#[derive(Error, Debug)]
pub enum BenchmarkError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Operation failed: {0}")]
    Operation(String),

    #[error("Worker {worker_id} failed: {message}")]
    Worker { worker_id: usize, message: String },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl BenchmarkError {
    /// Build a worker failure
    pub fn worker(worker_id: usize, message: impl Into<String>) -> Self {
        Self::Worker {
            worker_id,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, BenchmarkError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worker_error_display() {
        let err = BenchmarkError::worker(3, "task range overflows");
        assert_eq!(err.to_string(), "Worker 3 failed: task range overflows");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::Other, "disk full");
        let err: BenchmarkError = io_err.into();
        assert!(matches!(err, BenchmarkError::Io(_)));
    }
}

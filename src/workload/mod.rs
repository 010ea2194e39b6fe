//! Workload definitions and CPU kernels

pub mod fibonacci;
pub mod kernel;
pub mod matrix;
pub mod prime;
pub mod workload_type;

pub use kernel::{complex_calculation, KernelParams, SyntheticKernel, TaskKernel, TaskResult};
pub use prime::{is_prime, scan_range, PrimeScan};
pub use workload_type::WorkloadType;

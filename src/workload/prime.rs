//! Prime search by trial division

use std::ops::Range;

/// Summary of a prime scan over one range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PrimeScan {
    /// Number of primes found
    pub count: u64,
    /// Largest prime found, if any
    pub largest: Option<u64>,
}

/// Trial-division primality test
///
/// Divides by odd candidates up to the square root; even numbers other
/// than 2 are rejected up front.
#[inline]
pub fn is_prime(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    if n == 2 {
        return true;
    }
    if n % 2 == 0 {
        return false;
    }

    let mut divisor = 3u64;
    // divisor <= n / divisor is divisor^2 <= n without overflow
    while divisor <= n / divisor {
        if n % divisor == 0 {
            return false;
        }
        divisor += 2;
    }
    true
}

/// Scan a half-open range and count its primes
pub fn scan_range(range: Range<u64>) -> PrimeScan {
    let mut scan = PrimeScan::default();
    for candidate in range {
        if is_prime(candidate) {
            scan.count += 1;
            scan.largest = Some(candidate);
        }
    }
    scan
}

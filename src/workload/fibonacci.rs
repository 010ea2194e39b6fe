//! Iterative Fibonacci
//!
//! Values are `u128` with wrapping addition. F(186) is the largest value
//! that fits; beyond it the result is F(n) mod 2^128. The benchmark only
//! counts how many values it computed, so the wrap is harmless there.

/// Largest index whose Fibonacci number fits in a `u128`
pub const MAX_EXACT_INDEX: u64 = 186;

/// F(n) modulo 2^128
pub fn fibonacci(n: u64) -> u128 {
    if n <= 1 {
        return n as u128;
    }
    let (mut a, mut b) = (0u128, 1u128);
    for _ in 2..=n {
        let next = a.wrapping_add(b);
        a = b;
        b = next;
    }
    b
}

/// F(n), or `None` when it does not fit in a `u128`
pub fn checked_fibonacci(n: u64) -> Option<u128> {
    if n <= 1 {
        return Some(n as u128);
    }
    let (mut a, mut b) = (0u128, 1u128);
    for _ in 2..=n {
        let next = a.checked_add(b)?;
        a = b;
        b = next;
    }
    Some(b)
}

/// Compute `count` values starting at index `start`, returning how many
/// were computed
pub fn stress(start: u64, count: u64) -> u64 {
    let mut computed = 0u64;
    for n in start..start.saturating_add(count) {
        std::hint::black_box(fibonacci(n));
        computed += 1;
    }
    computed
}

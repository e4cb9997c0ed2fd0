//! Floating point and integer-root helpers for sizing the sieve.

/// Calculates `floor(sqrt(x))`.
pub(crate) const fn floor_sqrt(x: u64) -> u64 {
    if x < 2 {
        return x;
    }

    // Initialize the binary search bounds.
    // `floor(sqrt(u64::MAX)) == u32::MAX`, which keeps `mid * mid` within `u64`.
    let mut low: u64 = 1;
    let mut high: u64 = if x / 2 < u32::MAX as u64 { x / 2 } else { u32::MAX as u64 };

    while low <= high {
        let mid = low + (high - low) / 2;
        let mid_squared = mid * mid;

        if mid_squared == x {
            return mid;
        } else if mid_squared < x {
            low = mid + 1;
        } else {
            high = mid - 1;
        }
    }

    // `high` is now the largest value whose square does not exceed `x`.
    high
}

/// Calculates the natural logarithm of `x`.
///
/// Integers above `2^53` are rounded to the nearest `f64` first,
/// which is well within the slack of the bounds computed from the result.
pub(crate) fn ln(x: u64) -> f64 {
    if x <= 1 {
        return 0.0;
    }
    libm::log(x as f64)
}

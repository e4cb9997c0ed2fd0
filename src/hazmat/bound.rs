//! An analytic upper bound on the value of the n-th prime.

use tracing::trace;

use super::float::ln;
use super::sieve::MAX_LIMIT;
use crate::Error;

/// The smallest limit ever returned by [`estimate_upper_bound`].
///
/// `n ln(n) ln(ln(n))` is undefined for `n = 1`, non-positive for `n = 2`,
/// and falls short of the n-th prime for every `n` in `3..=26`.
/// 101 is the 26th prime; starting with `n = 27` the formula alone exceeds it.
pub const MIN_UPPER_BOUND: u64 = 101;

/// Returns an inclusive limit `L` such that the `n`-th prime is guaranteed to be `<= L`.
///
/// Computes `floor(n ln(n) ln(ln(n)))`, a bound of the Rosser's theorem family[^Rosser1939],
/// floored at [`MIN_UPPER_BOUND`] for the small `n` where the nested logarithm is degenerate.
/// The result is monotonically non-decreasing in `n`.
///
/// Returns [`Error::InvalidRange`] if `n` is zero,
/// and [`Error::LimitTooLarge`] if the bound does not fit into [`MAX_LIMIT`].
///
/// [^Rosser1939]: J. B. Rosser, "The n-th prime is greater than n log n",
///       Proc. London Math. Soc. 45 21-44 (1939),
///       DOI: [10.1112/plms/s2-45.1.21](https://doi.org/10.1112/plms/s2-45.1.21)
pub fn estimate_upper_bound(n: u64) -> Result<u64, Error> {
    if n == 0 {
        return Err(Error::InvalidRange { value: 0 });
    }

    if n < 3 {
        return Ok(MIN_UPPER_BOUND);
    }

    let ln_n = ln(n);
    // Saturates for the counts whose bound exceeds `u64`, which are rejected below anyway.
    let bound = libm::floor(n as f64 * ln_n * libm::log(ln_n)) as u64;

    if bound > MAX_LIMIT {
        return Err(Error::LimitTooLarge {
            limit: bound,
            max_limit: MAX_LIMIT,
        });
    }

    let bound = bound.max(MIN_UPPER_BOUND);
    trace!("Estimated an upper bound of {bound} for prime #{n}");
    Ok(bound)
}

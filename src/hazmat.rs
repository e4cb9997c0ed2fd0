//! Components of the prime generation pipeline.
//! Use these when you need direct control over the sieved limit and the number of produced primes;
//! [`generate_primes`](crate::generate_primes) covers the common cases.

mod bound;
mod float;
pub(crate) mod sieve;

pub use bound::{MIN_UPPER_BOUND, estimate_upper_bound};
pub use sieve::{MAX_LIMIT, Sieve, sieve};

use core::{fmt, str::FromStr};

use tracing::debug;

use crate::{
    Error,
    hazmat::{Sieve, estimate_upper_bound},
};

/// How the value passed to [`generate_primes`] is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    /// The value is an inclusive limit: produce every prime `<=` the value (`"lt"`).
    #[default]
    LessThan,
    /// The value is a count: produce exactly that many primes, starting from 2 (`"first"`).
    First,
}

impl Mode {
    /// The identifier of the mode, as accepted by [`Mode::from_str`].
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::LessThan => "lt",
            Mode::First => "first",
        }
    }
}

impl FromStr for Mode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lt" => Ok(Mode::LessThan),
            "first" => Ok(Mode::First),
            _ => Err(Error::InvalidMode),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returns the primes selected by `value` and `mode`, in ascending order.
///
/// - [`Mode::LessThan`]: all the primes up to and including `value`.
/// - [`Mode::First`]: the first `value` primes. The sieved limit is derived
///   with [`estimate_upper_bound`], and the output is truncated to `value` primes.
///
/// Returns [`Error::InvalidRange`] if `mode` is [`Mode::First`] and `value` is zero,
/// [`Error::LimitTooLarge`] if the sieved limit cannot be addressed,
/// and [`Error::OutOfMemory`] if its marker array cannot be allocated.
pub fn generate_primes(value: u64, mode: Mode) -> Result<Sieve, Error> {
    let (limit, max_count) = sieve_parameters(value, mode)?;
    debug!("Generating primes with mode {mode}: limit={limit}, max_count={max_count:?}");
    Sieve::new(limit, max_count)
}

/// Converts a value and a mode into the limit to sieve and the maximum number of primes to produce.
pub(crate) fn sieve_parameters(value: u64, mode: Mode) -> Result<(u64, Option<u64>), Error> {
    match mode {
        Mode::LessThan => Ok((value, None)),
        Mode::First => Ok((estimate_upper_bound(value)?, Some(value))),
    }
}

/// Returns all the primes up to and including `limit`, in ascending order.
///
/// See [`generate_primes`] for details.
pub fn primes_up_to(limit: u64) -> Result<Sieve, Error> {
    generate_primes(limit, Mode::LessThan)
}

/// Returns the first `count` primes, in ascending order.
///
/// See [`generate_primes`] for details.
pub fn first_primes(count: u64) -> Result<Sieve, Error> {
    generate_primes(count, Mode::First)
}

/// Parses a limit or a count from text.
///
/// Returns [`Error::InvalidInputType`] if `input` is not an integer,
/// and [`Error::InvalidRange`] if it is negative or does not fit into `u64`.
/// Integers beyond the range of `i128` are reported as `i128::MIN` or `i128::MAX`.
pub fn parse_count(input: &str) -> Result<u64, Error> {
    let input = input.trim();
    if let Ok(value) = input.parse::<u64>() {
        return Ok(value);
    }
    if let Ok(value) = input.parse::<i128>() {
        return Err(Error::InvalidRange { value });
    }

    let (negative, digits) = match input.strip_prefix('-') {
        Some(digits) => (true, digits),
        None => (false, input.strip_prefix('+').unwrap_or(input)),
    };
    if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
        let value = if negative { i128::MIN } else { i128::MAX };
        return Err(Error::InvalidRange { value });
    }
    Err(Error::InvalidInputType)
}

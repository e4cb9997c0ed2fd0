//! Statistics on the last decimal digits of primes.
//!
//! Apart from 2 and 5, every prime ends in 1, 3, 7 or 9. The digits are evenly distributed,
//! but the pairs formed by the last digits of consecutive primes are not: a prime ending in `d`
//! is followed by another prime ending in `d` noticeably less often than by any other digit[^LO2016].
//!
//! [^LO2016]: R. J. Lemke Oliver, K. Soundararajan,
//!       "Unexpected biases in the distribution of consecutive primes",
//!       PNAS 113 (31) E4446-E4454 (2016),
//!       DOI: [10.1073/pnas.1605366113](https://doi.org/10.1073/pnas.1605366113)

use tracing::debug;

/// The last digits a prime can end with.
pub const ENDING_DIGITS: [u8; 6] = [2, 5, 1, 3, 7, 9];

/// The last digits of the primes above 5, which make up the digit pairs.
pub const PAIR_DIGITS: [u8; 4] = [1, 3, 7, 9];

// Maps a last digit to its index in `PAIR_DIGITS`.
fn pair_index(digit: u8) -> Option<usize> {
    PAIR_DIGITS.iter().position(|&d| d == digit)
}

/// Last-digit statistics of a sequence of primes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EndingDigits {
    total: u64,
    digits: [u64; 10],
    pairs: [[u64; 4]; 4],
    pair_total: u64,
}

impl EndingDigits {
    /// Collects the statistics of `primes`, which are expected in ascending order.
    ///
    /// The digit pairs are formed by consecutive primes, skipping 2 and 5.
    pub fn from_primes(primes: impl IntoIterator<Item = u64>) -> Self {
        let mut stats = Self::default();
        let mut previous: Option<usize> = None;

        for prime in primes {
            let digit = (prime % 10) as u8;
            stats.total += 1;
            stats.digits[digit as usize] += 1;

            let Some(index) = pair_index(digit) else {
                continue;
            };
            if let Some(previous) = previous {
                stats.pairs[previous][index] += 1;
                stats.pair_total += 1;
            }
            previous = Some(index);
        }

        debug!(
            "Collected ending digits of {} primes, {} pairs: {:?}",
            stats.total, stats.pair_total, stats.digits
        );
        stats
    }

    /// The number of primes the statistics were collected from.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// The number of primes ending in each digit, indexed by digit.
    pub fn digit_counts(&self) -> &[u64; 10] {
        &self.digits
    }

    /// The fraction of the primes ending in `digit`.
    ///
    /// Returns 0 if there are no primes, or `digit` is not a decimal digit.
    pub fn digit_fraction(&self, digit: u8) -> f64 {
        match self.digits.get(digit as usize) {
            Some(&count) if self.total > 0 => count as f64 / self.total as f64,
            _ => 0.,
        }
    }

    /// The number of consecutive prime pairs, skipping 2 and 5.
    pub fn pair_total(&self) -> u64 {
        self.pair_total
    }

    /// The number of consecutive primes where the first ends in `first` and the second in `second`.
    ///
    /// Returns 0 for digits outside of [`PAIR_DIGITS`].
    pub fn pair_count(&self, first: u8, second: u8) -> u64 {
        match (pair_index(first), pair_index(second)) {
            (Some(i), Some(j)) => self.pairs[i][j],
            _ => 0,
        }
    }

    /// The fraction of the consecutive prime pairs where the first ends in `first` and the second in `second`.
    ///
    /// Returns 0 for digits outside of [`PAIR_DIGITS`], or if there are no pairs.
    pub fn pair_fraction(&self, first: u8, second: u8) -> f64 {
        if self.pair_total == 0 {
            return 0.;
        }
        self.pair_count(first, second) as f64 / self.pair_total as f64
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::{ENDING_DIGITS, EndingDigits, PAIR_DIGITS};
    use crate::first_primes;

    #[test]
    fn small_sequence() {
        // 2 3 5 7 11 13 17 19 23 29
        let stats = EndingDigits::from_primes(first_primes(10).unwrap());
        assert_eq!(stats.total(), 10);
        assert_eq!(stats.digit_counts(), &[0, 1, 1, 3, 0, 1, 0, 2, 0, 2]);
        assert_approx_eq!(f64, stats.digit_fraction(3), 0.3);
        assert_eq!(stats.digit_fraction(4), 0.);
        assert_eq!(stats.digit_fraction(11), 0.);

        // 3 7 1 3 7 9 3 9
        assert_eq!(stats.pair_total(), 7);
        assert_eq!(stats.pair_count(3, 7), 2);
        assert_eq!(stats.pair_count(7, 1), 1);
        assert_eq!(stats.pair_count(1, 3), 1);
        assert_eq!(stats.pair_count(7, 9), 1);
        assert_eq!(stats.pair_count(9, 3), 1);
        assert_eq!(stats.pair_count(3, 9), 1);
        assert_eq!(stats.pair_count(1, 1), 0);
        assert_eq!(stats.pair_count(2, 3), 0);
        assert_approx_eq!(f64, stats.pair_fraction(3, 7), 2. / 7.);
    }

    #[test]
    fn empty() {
        let stats = EndingDigits::from_primes([]);
        assert_eq!(stats.total(), 0);
        assert_eq!(stats.digit_fraction(1), 0.);
        assert_eq!(stats.pair_fraction(1, 3), 0.);
    }

    #[test]
    fn fractions_add_up() {
        let stats = EndingDigits::from_primes(first_primes(10_000).unwrap());
        let digits: f64 = ENDING_DIGITS.iter().map(|&d| stats.digit_fraction(d)).sum();
        assert_approx_eq!(f64, digits, 1., epsilon = 1e-12);

        let pairs: f64 = PAIR_DIGITS
            .iter()
            .flat_map(|&a| PAIR_DIGITS.iter().map(move |&b| (a, b)))
            .map(|(a, b)| stats.pair_fraction(a, b))
            .sum();
        assert_approx_eq!(f64, pairs, 1., epsilon = 1e-12);
        assert_eq!(stats.pair_total(), 10_000 - 3);
    }

    #[test]
    fn repeated_digit_pairs_are_rarer() {
        let stats = EndingDigits::from_primes(first_primes(100_000).unwrap());
        for d in PAIR_DIGITS {
            let same = stats.pair_count(d, d);
            for other in PAIR_DIGITS.into_iter().filter(|&o| o != d) {
                assert!(same < stats.pair_count(d, other), "{d}{d} vs {d}{other}");
            }
        }
    }
}

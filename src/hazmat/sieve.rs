//! A bit-packed Sieve of Eratosthenes producing primes in ascending order.

use core::iter::FusedIterator;
use std::time::{Duration, Instant};

use bitvec::{order::Lsb0, slice::BitSlice, vec::BitVec};
use tracing::debug;

use super::float::floor_sqrt;
use crate::Error;

/// The marker array: one bit per integer in `[0, limit]`, set while the integer is believed to be prime.
pub(crate) type Markers = BitVec<usize, Lsb0>;

/// The largest limit that can be sieved.
///
/// The marker array holds `limit + 1` bits, which must stay addressable by a `BitSlice`.
pub const MAX_LIMIT: u64 = (usize::MAX >> 3) as u64 - 1;

/// Checks `limit` and converts it into the length of the marker array.
pub(crate) fn markers_len(limit: u64) -> Result<usize, Error> {
    if limit > MAX_LIMIT {
        return Err(Error::LimitTooLarge {
            limit,
            max_limit: MAX_LIMIT,
        });
    }
    usize::try_from(limit + 1).map_err(|_| Error::LimitTooLarge {
        limit,
        max_limit: MAX_LIMIT,
    })
}

/// Allocates a marker array of length `len` with every entry but `0` and `1` marked as prime.
///
/// Returns [`Error::OutOfMemory`] if the backing storage cannot be reserved.
pub(crate) fn allocate_markers(len: usize) -> Result<Markers, Error> {
    let words = len.div_ceil(usize::BITS as usize);
    let mut storage = Vec::new();
    storage.try_reserve_exact(words).map_err(|_| Error::OutOfMemory {
        limit: len as u64 - 1,
    })?;
    storage.resize(words, usize::MAX);

    let mut markers = Markers::from_vec(storage);
    markers.truncate(len);
    for index in 0..len.min(2) {
        markers.set(index, false);
    }
    Ok(markers)
}

/// The last candidate whose multiples have to be crossed out for a marker array of length `len`.
pub(crate) fn pass_limit(len: usize) -> usize {
    // `len` is `limit + 1`.
    (floor_sqrt(len as u64) as usize + 1).min(len - 1)
}

/// Crosses out every multiple of every prime up to [`pass_limit`], starting from its square.
///
/// Smaller multiples of a prime `p` have a prime factor below `p`, and are already crossed out.
pub(crate) fn mark_composites(markers: &mut BitSlice<usize, Lsb0>) {
    let len = markers.len();
    for candidate in 2..=pass_limit(len) {
        if !markers[candidate] {
            continue;
        }
        for multiple in (candidate * candidate..len).step_by(candidate) {
            markers.set(multiple, false);
        }
    }
}

/// An iterator over the primes up to and including a given limit, in ascending order,
/// optionally truncated to a maximum number of values.
///
/// Allocation of the marker array and the marking phase happen in [`Sieve::new`];
/// the primes are then produced lazily by scanning the marker array.
/// The iterator cannot be restarted: the marker array is dropped together with it.
#[derive(Debug)]
pub struct Sieve {
    markers: Markers,
    // The next index of the marker array to scan.
    position: usize,
    max_count: Option<u64>,
    emitted: u64,
    started: Instant,
    marking_elapsed: Duration,
    // Set once the sequence is exhausted.
    elapsed: Option<Duration>,
}

impl Sieve {
    /// Sieves the integers in `[0, limit]` and returns an iterator over the primes among them.
    ///
    /// If `max_count` is `Some(n)`, at most `n` primes are produced;
    /// if there are fewer primes up to `limit`, all of them are produced.
    ///
    /// Returns [`Error::LimitTooLarge`] if `limit` is larger than [`MAX_LIMIT`],
    /// and [`Error::OutOfMemory`] if the marker array cannot be allocated.
    /// No partially built sieve is observable in either case.
    pub fn new(limit: u64, max_count: Option<u64>) -> Result<Self, Error> {
        let len = markers_len(limit)?;

        let started = Instant::now();
        let mut markers = allocate_markers(len)?;
        mark_composites(&mut markers);
        let marking_elapsed = started.elapsed();
        debug!("Marked composites up to {limit} in {marking_elapsed:?}");

        Ok(Self::from_markers(markers, max_count, started, marking_elapsed))
    }

    /// Wraps an already marked array into a producing iterator.
    pub(crate) fn from_markers(
        markers: Markers,
        max_count: Option<u64>,
        started: Instant,
        marking_elapsed: Duration,
    ) -> Self {
        Self {
            markers,
            position: 0,
            max_count,
            emitted: 0,
            started,
            marking_elapsed,
            elapsed: None,
        }
    }

    /// The inclusive upper limit of the sieved range.
    pub fn limit(&self) -> u64 {
        self.markers.len() as u64 - 1
    }

    /// The maximum number of primes this iterator produces, if any.
    pub fn max_count(&self) -> Option<u64> {
        self.max_count
    }

    /// The number of primes produced so far.
    pub fn emitted(&self) -> u64 {
        self.emitted
    }

    /// Returns `true` once the sequence is exhausted.
    pub fn is_done(&self) -> bool {
        self.elapsed.is_some()
    }

    /// The wall-clock time spent allocating and marking the marker array.
    pub fn marking_elapsed(&self) -> Duration {
        self.marking_elapsed
    }

    /// The wall-clock time from the allocation of the marker array
    /// to the end of the production scan.
    ///
    /// Returns `None` until the sequence is exhausted.
    pub fn elapsed(&self) -> Option<Duration> {
        self.elapsed
    }

    /// Same as [`Sieve::elapsed`], in seconds.
    pub fn elapsed_secs(&self) -> Option<f64> {
        self.elapsed.map(|elapsed| elapsed.as_secs_f64())
    }

    fn remaining(&self) -> Option<u64> {
        self.max_count.map(|max_count| max_count.saturating_sub(self.emitted))
    }

    fn finish(&mut self) {
        if self.elapsed.is_none() {
            let elapsed = self.started.elapsed();
            debug!(
                "Produced {} primes up to {} in {elapsed:?}",
                self.emitted,
                self.limit()
            );
            self.elapsed = Some(elapsed);
        }
    }

    fn next(&mut self) -> Option<u64> {
        if self.is_done() {
            return None;
        }

        if self.remaining() == Some(0) {
            self.finish();
            return None;
        }

        match self.markers[self.position..].first_one() {
            Some(offset) => {
                let index = self.position + offset;
                self.position = index + 1;
                self.emitted += 1;
                if self.remaining() == Some(0) {
                    self.finish();
                }
                Some(index as u64)
            }
            None => {
                self.position = self.markers.len();
                self.finish();
                None
            }
        }
    }
}

impl Iterator for Sieve {
    type Item = u64;

    fn next(&mut self) -> Option<Self::Item> {
        Self::next(self)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.is_done() {
            return (0, Some(0));
        }
        let unscanned = self.markers.len() - self.position;
        let upper = match self.remaining() {
            Some(remaining) => usize::try_from(remaining).map_or(unscanned, |remaining| remaining.min(unscanned)),
            None => unscanned,
        };
        (0, Some(upper))
    }
}

impl FusedIterator for Sieve {}

/// Sieves the integers in `[0, limit]` and returns an iterator over the primes among them,
/// producing at most `max_count` values if it is given.
///
/// See [`Sieve::new`] for details.
pub fn sieve(limit: u64, max_count: Option<u64>) -> Result<Sieve, Error> {
    Sieve::new(limit, max_count)
}

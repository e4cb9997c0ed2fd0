//! Prime-generating functions that can parallelize the marking phase across multiple cores.

use std::time::Instant;

use bitvec::{order::Lsb0, slice::BitSlice};
use rayon::{iter::IndexedParallelIterator, iter::ParallelIterator, slice::ParallelSliceMut};
use tracing::debug;

use crate::{
    error::Error,
    hazmat::{
        self, Sieve,
        sieve::{allocate_markers, markers_len, pass_limit},
    },
    presets::{Mode, sieve_parameters},
};

/// The number of chunks every thread gets on average, to even out the uneven cost of the chunks.
const CHUNKS_PER_THREAD: usize = 4;

/// Sieves the integers in `[0, limit]` using a thread pool with `threadcount` threads,
/// and returns an iterator over the primes among them, producing at most `max_count` values if it is given.
///
/// The output is identical to that of [`hazmat::sieve`]. Only the marking phase runs in parallel:
/// the primes are produced, in ascending order, after every thread is done.
///
/// If `threadcount` is zero, the number of threads is picked by `rayon`.
///
/// Panics if the platform is unable to spawn threads.
pub fn sieve(limit: u64, max_count: Option<u64>, threadcount: usize) -> Result<Sieve, Error> {
    let len = markers_len(limit)?;

    let threadpool = rayon::ThreadPoolBuilder::new()
        .num_threads(threadcount)
        .build()
        .expect("If the platform can spawn threads, then this call will work.");

    let started = Instant::now();
    let mut markers = allocate_markers(len)?;

    // Every composite up to `limit` has a prime factor among these.
    let base_primes = hazmat::sieve(pass_limit(len) as u64, None)?
        .map(|prime| prime as usize)
        .collect::<Vec<_>>();

    let words = markers.as_raw_mut_slice();
    let chunk_words = words
        .len()
        .div_ceil(threadpool.current_num_threads() * CHUNKS_PER_THREAD)
        .max(1);
    debug!(
        "Marking {len} entries with {} base primes on {} threads, {chunk_words} words per chunk",
        base_primes.len(),
        threadpool.current_num_threads()
    );

    threadpool.install(|| {
        words
            .par_chunks_mut(chunk_words)
            .enumerate()
            .for_each(|(chunk_index, chunk)| {
                let start = chunk_index * chunk_words * usize::BITS as usize;
                mark_chunk(BitSlice::<usize, Lsb0>::from_slice_mut(chunk), start, len, &base_primes);
            })
    });

    let marking_elapsed = started.elapsed();
    debug!("Marked composites up to {limit} in {marking_elapsed:?}");

    Ok(Sieve::from_markers(markers, max_count, started, marking_elapsed))
}

/// Crosses out the multiples of `base_primes` in a chunk of the marker array
/// holding the entries from `start` on. Entries at `len` and above are padding.
fn mark_chunk(chunk: &mut BitSlice<usize, Lsb0>, start: usize, len: usize, base_primes: &[usize]) {
    let end = (start + chunk.len()).min(len);
    for &prime in base_primes {
        let square = prime * prime;
        if square >= end {
            // `base_primes` is ascending, so no other prime has multiples to cross out here.
            break;
        }
        let first = if square >= start {
            square
        } else {
            start.div_ceil(prime) * prime
        };
        for multiple in (first..end).step_by(prime) {
            chunk.set(multiple - start, false);
        }
    }
}

/// Returns the primes selected by `value` and `mode` using a thread pool with `threadcount` threads.
///
/// See [`generate_primes`](crate::generate_primes) for the meaning of `value` and `mode`,
/// and [`sieve`] for the handling of `threadcount`.
///
/// Panics if the platform is unable to spawn threads.
pub fn generate_primes(value: u64, mode: Mode, threadcount: usize) -> Result<Sieve, Error> {
    let (limit, max_count) = sieve_parameters(value, mode)?;
    sieve(limit, max_count, threadcount)
}

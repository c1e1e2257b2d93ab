//! Stream producers and an exact oracle for tests.

use rand::Rng;
use std::collections::HashMap;
use std::hash::Hash;
use std::ops::Range;

/// `len` keys drawn uniformly from `range`.
pub(crate) fn uniform_stream<R: Rng>(
    rng: &mut R,
    len: usize,
    range: Range<i64>,
) -> impl Iterator<Item = i64> + '_ {
    (0..len).map(move |_| rng.gen_range(range.clone()))
}

/// `len` keys from `range.start + Binomial(range.end - range.start, 0.5)`.
pub(crate) fn binomial_stream<R: Rng>(
    rng: &mut R,
    len: usize,
    range: Range<i64>,
) -> impl Iterator<Item = i64> + '_ {
    let trials = (range.end - range.start) as u32;
    (0..len).map(move |_| {
        let mut successes = 0;
        let mut left = trials;
        while left > 0 {
            let take = left.min(64);
            let mask = if take == 64 { u64::MAX } else { (1 << take) - 1 };
            successes += (rng.gen::<u64>() & mask).count_ones();
            left -= take;
        }
        range.start + successes as i64
    })
}

pub(crate) fn exact_frequencies<T, I>(stream: I) -> HashMap<T, u64>
where
    T: Eq + Hash,
    I: IntoIterator<Item = T>,
{
    let mut counts = HashMap::new();
    for item in stream {
        *counts.entry(item).or_insert(0) += 1;
    }
    counts
}

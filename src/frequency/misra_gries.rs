use crate::error::{Error, Result};
use crate::frequency::{is_heavy, Frequency};
use std::collections::HashMap;
use std::fmt::{Debug, Formatter};
use std::hash::Hash;

/// Misra-Gries heavy-hitter summary with at most `k - 1` tracked keys.
///
/// After `m` updates every estimate lies in `[f - m / k, f]`, where `f` is
/// the key's true frequency.
#[derive(Clone)]
pub struct MisraGries<T> {
    counters: HashMap<T, u64>,
    k: usize,
}

impl<T> MisraGries<T> {
    pub fn new(k: usize) -> Result<Self> {
        if k <= 1 {
            return Err(Error::InvalidConfiguration("k must be > 1"));
        }
        log::debug!("MisraGries created: k={}", k);
        Ok(Self {
            counters: HashMap::with_capacity(k - 1),
            k,
        })
    }

    /// Smallest `k` with an undercount of at most `epsilon * m`.
    pub fn with_error(epsilon: f64) -> Result<Self> {
        if !(0. < epsilon && epsilon <= 1.) {
            return Err(Error::InvalidConfiguration(
                "epsilon must be in the range (0, 1]",
            ));
        }
        let k = (1. / epsilon).ceil().max(2.) as usize;
        Self::new(k)
    }

    pub fn capacity(&self) -> usize {
        self.k
    }

    /// Number of tracked keys, never more than `k - 1`.
    pub fn len(&self) -> usize {
        self.counters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counters.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&T, u64)> + '_ {
        self.counters.iter().map(|(key, &count)| (key, count))
    }

    pub fn clear(&mut self) {
        self.counters.clear();
        log::debug!("MisraGries cleared");
    }
}

impl<T> MisraGries<T>
where
    T: Eq + Hash + Clone,
{
    /// Counts `item`. When the table is full and `item` is untracked, every
    /// counter is decremented instead and `item` is dropped, even if the
    /// pass frees a slot.
    pub fn update(&mut self, item: &T) {
        if let Some(count) = self.counters.get_mut(item) {
            *count += 1;
        } else if self.counters.len() < self.k - 1 {
            self.counters.insert(item.clone(), 1);
        } else {
            let before = self.counters.len();
            self.counters.retain(|_, count| {
                *count -= 1;
                *count > 0
            });
            log::trace!(
                "MisraGries eviction pass: tracked {} -> {}",
                before,
                self.counters.len()
            );
        }
    }

    pub fn estimate_frequency(&self, item: &T) -> u64 {
        self.counters.get(item).copied().unwrap_or(0)
    }

    /// Tracked keys whose counter is at least `phi * total`, most frequent
    /// first.
    pub fn heavy_hitters(&self, phi: f64, total: u64) -> Result<Vec<(&T, u64)>> {
        // Validate even when nothing is tracked.
        is_heavy(0u64, phi, total)?;
        let mut heavy = Vec::new();
        for (key, count) in self.iter() {
            if is_heavy(count, phi, total)? {
                heavy.push((key, count));
            }
        }
        heavy.sort_unstable_by(|a, b| b.1.cmp(&a.1));
        Ok(heavy)
    }
}

impl<T> Frequency<T> for MisraGries<T>
where
    T: Eq + Hash + Clone,
{
    type Count = u64;

    fn add(&mut self, item: &T) {
        self.update(item);
    }

    fn estimate_frequency(&self, item: &T) -> u64 {
        MisraGries::estimate_frequency(self, item)
    }
}

impl<T> Extend<T> for MisraGries<T>
where
    T: Eq + Hash + Clone,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        iter.into_iter().for_each(|item| self.update(&item));
    }
}

impl<T> Debug for MisraGries<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "MisraGries {{ k: {}, tracked: {} }}",
            self.k,
            self.counters.len()
        )
    }
}

use crate::error::{Error, Result};
use crate::frequency::{checked_width, counter_matrix, Frequency};
use crate::hash::HashFamily;
use num_traits::{SaturatingAdd, ToPrimitive, Unsigned};
use rand::Rng;
use std::f64::consts::E;
use std::fmt::{Debug, Formatter};

/// Count-Min sketch over `i64` keys.
///
/// Estimates never undercount. With probability at least `1 - (1/2)^depth`
/// the overcount stays within `e / width` of the stream length.
#[derive(Clone)]
pub struct CountMinSketch<C = u32> {
    counters: Vec<C>,
    hashes: HashFamily,
}

impl<C> CountMinSketch<C>
where
    C: Clone + Unsigned,
{
    pub fn new(depth: usize, width: usize) -> Result<Self> {
        Self::with_rng(depth, width, &mut rand::thread_rng())
    }

    pub fn with_rng<R: Rng + ?Sized>(depth: usize, width: usize, rng: &mut R) -> Result<Self> {
        let hashes = HashFamily::with_rng(depth, width, rng)?;
        let counters = counter_matrix(depth, width, C::zero())?;
        log::debug!("CountMinSketch created: depth={}, width={}", depth, width);
        Ok(Self {
            counters,
            hashes,
        })
    }

    pub fn with_error_bounds(epsilon: f64, delta: f64) -> Result<Self> {
        if !(0. < epsilon && epsilon <= 1.) {
            return Err(Error::InvalidConfiguration(
                "epsilon must be in the range (0, 1]",
            ));
        }
        if !(0. < delta && delta < 1.) {
            return Err(Error::InvalidConfiguration(
                "delta must be in the range (0, 1)",
            ));
        }
        let width = checked_width((E / epsilon).ceil())?;
        let depth = (1. / delta).ln().ceil().max(1.) as usize;
        Self::new(depth, width)
    }

    pub fn width(&self) -> usize {
        self.hashes.width()
    }

    pub fn depth(&self) -> usize {
        self.hashes.depth()
    }

    /// # Panics
    ///
    /// Panics if `row >= depth`.
    pub fn row(&self, row: usize) -> &[C] {
        let width = self.width();
        &self.counters[row * width..(row + 1) * width]
    }

    /// Zeroes every counter; the hash functions are kept.
    pub fn clear(&mut self) {
        self.counters.fill(C::zero());
        log::debug!("CountMinSketch cleared");
    }
}

impl<C> CountMinSketch<C>
where
    C: Copy + Ord + Unsigned + SaturatingAdd,
{
    pub fn add(&mut self, value: i64) {
        let width = self.width();
        for (i, hash) in self.hashes.indices(value).enumerate() {
            let idx = width * i + hash;
            self.counters[idx] = self.counters[idx].saturating_add(&C::one());
        }
    }

    /// Minimum over the rows of the counters `value` hashes to.
    pub fn estimate_frequency(&self, value: i64) -> C {
        let width = self.width();
        self.hashes
            .indices(value)
            .enumerate()
            .map(|(i, hash)| self.counters[width * i + hash])
            .min()
            .unwrap_or_else(C::zero)
    }
}

impl<C> Frequency<i64> for CountMinSketch<C>
where
    C: Copy + Ord + Unsigned + SaturatingAdd + ToPrimitive,
{
    type Count = C;

    fn add(&mut self, item: &i64) {
        CountMinSketch::add(self, *item);
    }

    fn estimate_frequency(&self, item: &i64) -> C {
        CountMinSketch::estimate_frequency(self, *item)
    }
}

impl<C> Extend<i64> for CountMinSketch<C>
where
    C: Copy + Ord + Unsigned + SaturatingAdd,
{
    fn extend<I: IntoIterator<Item = i64>>(&mut self, iter: I) {
        iter.into_iter().for_each(|value| self.add(value));
    }
}

impl<C> Debug for CountMinSketch<C> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "CountMinSketch {{ width: {}, depth: {} }}",
            self.hashes.width(),
            self.hashes.depth()
        )
    }
}

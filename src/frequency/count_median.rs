use crate::error::{Error, Result};
use crate::frequency::{checked_width, counter_matrix, Frequency};
use crate::hash::{HashFamily, SignFamily};
use num_traits::{SaturatingAdd, SaturatingSub, Signed, ToPrimitive};
use rand::Rng;
use std::fmt::{Debug, Formatter};

/// Count-Median (AMS-style) sketch over `i64` keys.
///
/// Every update adds a per-row `±1` sign to its cell so that colliding keys
/// cancel in expectation. A row's estimate is its cell times the key's sign;
/// the sketch answers with the median of the row estimates, which may fall
/// on either side of the true count.
#[derive(Clone)]
pub struct CountMedianSketch<C = i64> {
    counters: Vec<C>,
    hashes: HashFamily,
    signs: SignFamily,
}

impl<C> CountMedianSketch<C>
where
    C: Clone + Signed,
{
    pub fn new(depth: usize, width: usize) -> Result<Self> {
        Self::with_rng(depth, width, &mut rand::thread_rng())
    }

    pub fn with_rng<R: Rng + ?Sized>(depth: usize, width: usize, rng: &mut R) -> Result<Self> {
        let hashes = HashFamily::with_rng(depth, width, rng)?;
        let signs = SignFamily::with_rng(depth, rng)?;
        let counters = counter_matrix(depth, width, C::zero())?;
        log::debug!(
            "CountMedianSketch created: depth={}, width={}",
            depth,
            width
        );
        Ok(Self {
            counters,
            hashes,
            signs,
        })
    }

    /// Width `3 / epsilon^2`, depth `ln(1 / delta)`.
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
        let width = checked_width((3. / (epsilon * epsilon)).ceil())?;
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

    pub fn clear(&mut self) {
        self.counters.fill(C::zero());
        log::debug!("CountMedianSketch cleared");
    }
}

impl<C> CountMedianSketch<C>
where
    C: Copy + Ord + Signed + SaturatingAdd + SaturatingSub + ToPrimitive,
{
    pub fn add(&mut self, value: i64) {
        let width = self.width();
        let cells = self.hashes.indices(value).zip(self.signs.signs(value));
        for (i, (hash, sign)) in cells.enumerate() {
            let idx = width * i + hash;
            self.counters[idx] = if sign > 0 {
                self.counters[idx].saturating_add(&C::one())
            } else {
                self.counters[idx].saturating_sub(&C::one())
            };
        }
    }

    /// Median of the sign-corrected row estimates. With an even depth this
    /// is the mean of the two middle estimates.
    pub fn estimate_frequency(&self, value: i64) -> f64 {
        let width = self.width();
        let mut estimates: Vec<C> = self
            .hashes
            .indices(value)
            .zip(self.signs.signs(value))
            .enumerate()
            .map(|(i, (hash, sign))| {
                let counter = self.counters[width * i + hash];
                if sign > 0 {
                    counter
                } else {
                    C::zero().saturating_sub(&counter)
                }
            })
            .collect();
        median(&mut estimates)
    }
}

fn median<C: Copy + Ord + ToPrimitive>(values: &mut [C]) -> f64 {
    values.sort_unstable();
    let mid = values.len() / 2;
    let to_f64 = |c: C| c.to_f64().unwrap_or(0.);
    if values.len() % 2 == 1 {
        to_f64(values[mid])
    } else {
        (to_f64(values[mid - 1]) + to_f64(values[mid])) / 2.
    }
}

impl<C> Frequency<i64> for CountMedianSketch<C>
where
    C: Copy + Ord + Signed + SaturatingAdd + SaturatingSub + ToPrimitive,
{
    type Count = f64;

    fn add(&mut self, item: &i64) {
        CountMedianSketch::add(self, *item);
    }

    fn estimate_frequency(&self, item: &i64) -> f64 {
        CountMedianSketch::estimate_frequency(self, *item)
    }
}

impl<C> Extend<i64> for CountMedianSketch<C>
where
    C: Copy + Ord + Signed + SaturatingAdd + SaturatingSub + ToPrimitive,
{
    fn extend<I: IntoIterator<Item = i64>>(&mut self, iter: I) {
        iter.into_iter().for_each(|value| self.add(value));
    }
}

impl<C> Debug for CountMedianSketch<C> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "CountMedianSketch {{ width: {}, depth: {} }}",
            self.hashes.width(),
            self.hashes.depth()
        )
    }
}

pub mod count_median;
pub mod count_min;
pub mod misra_gries;

use crate::error::{Error, Result};
use num_traits::ToPrimitive;

/// Approximate per-key counting over a stream.
pub trait Frequency<T> {
    type Count: ToPrimitive;

    fn add(&mut self, item: &T);
    fn estimate_frequency(&self, item: &T) -> Self::Count;

    /// Whether `item`'s estimate is at least `phi * total`. `total` is the
    /// stream length seen by the caller; estimators don't track it.
    fn is_heavy_hitter(&self, item: &T, phi: f64, total: u64) -> Result<bool> {
        is_heavy(self.estimate_frequency(item), phi, total)
    }
}

/// Zeroed `depth * width` counter matrix, or `InvalidConfiguration` when it
/// cannot be addressed or allocated.
pub(crate) fn counter_matrix<C: Clone>(depth: usize, width: usize, zero: C) -> Result<Vec<C>> {
    let size = width
        .checked_mul(depth)
        .ok_or(Error::InvalidConfiguration("width * depth overflow"))?;
    match size.checked_mul(std::mem::size_of::<C>()) {
        Some(bytes) if bytes <= isize::MAX as usize => {}
        _ => {
            return Err(Error::InvalidConfiguration(
                "counter matrix exceeds addressable memory",
            ))
        }
    }
    let mut counters = Vec::new();
    counters
        .try_reserve_exact(size)
        .map_err(|_| Error::InvalidConfiguration("counter matrix allocation failed"))?;
    counters.resize(size, zero);
    Ok(counters)
}

/// Width from an error-bound formula, rejected before the cast to `usize`
/// can saturate.
pub(crate) fn checked_width(width: f64) -> Result<usize> {
    if !(width.is_finite() && width >= 1. && width <= isize::MAX as f64) {
        return Err(Error::InvalidConfiguration("width out of range"));
    }
    Ok(width as usize)
}

/// `estimate / total >= phi`, for `phi` in `(0, 1]` and `total > 0`.
pub fn is_heavy<C: ToPrimitive>(estimate: C, phi: f64, total: u64) -> Result<bool> {
    if total == 0 {
        return Err(Error::InvalidQuery("total must be > 0"));
    }
    if !(0. < phi && phi <= 1.) {
        return Err(Error::InvalidQuery("phi must be in the range (0, 1]"));
    }
    let estimate = estimate
        .to_f64()
        .ok_or(Error::InvalidQuery("estimate is not representable as f64"))?;
    Ok(estimate / total as f64 >= phi)
}

//! Bounded-memory frequency estimation over integer streams.
//!
//! Three estimators share the [`Frequency`](frequency::Frequency) trait:
//!
//! - [`CountMinSketch`]: `d x w` counters and a pairwise-independent hash
//!   family; estimates never undercount.
//! - [`CountMedianSketch`]: signed counters corrected by a `±1` hash family
//!   and aggregated by median; error is two-sided.
//! - [`MisraGries`]: at most `k - 1` tracked keys; estimates never
//!   overcount and undercount by at most `m / k`.
//!
//! ```
//! use freqsketch::{CountMinSketch, MisraGries};
//!
//! let mut cms: CountMinSketch = CountMinSketch::new(5, 256).unwrap();
//! let mut mg = MisraGries::new(10).unwrap();
//! for value in [1, 2, 1, 3, 1] {
//!     cms.add(value);
//!     mg.update(&value);
//! }
//! assert!(cms.estimate_frequency(1) >= 3);
//! assert_eq!(mg.estimate_frequency(&1), 3);
//! ```
//!
//! Writers need `&mut`; share behind a lock if several threads ingest.

pub mod error;
pub mod frequency;
pub mod hash;

#[cfg(test)]
mod testing;

pub use error::{Error, Result};
pub use frequency::count_median::CountMedianSketch;
pub use frequency::count_min::CountMinSketch;
pub use frequency::misra_gries::MisraGries;
pub use frequency::{is_heavy, Frequency};

use crate::error::{Error, Result};
use rand::Rng;
use std::fmt::{Debug, Formatter};

/// Mersenne prime `2^31 - 1`, the modulus of every linear hash in this crate.
pub const MERSENNE_PRIME: u64 = (1 << 31) - 1;

/// Maps a key into `[0, p)`. Keeping both operands below `2^31` bounds
/// `a * value + b` below `2^63`, so the evaluation never overflows `u64`.
#[inline]
fn reduce(value: i64) -> u64 {
    value.rem_euclid(MERSENNE_PRIME as i64) as u64
}

/// `value -> (a * value + b) mod p` with `a, b` drawn from `[1, p - 1]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LinearHash {
    a: u64,
    b: u64,
}

impl LinearHash {
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            a: rng.gen_range(1..MERSENNE_PRIME),
            b: rng.gen_range(1..MERSENNE_PRIME),
        }
    }

    #[inline]
    pub fn eval(&self, value: i64) -> u64 {
        (self.a * reduce(value) + self.b) % MERSENNE_PRIME
    }
}

fn random_hashes<R: Rng + ?Sized>(depth: usize, rng: &mut R) -> Box<[LinearHash]> {
    (0..depth).map(|_| LinearHash::random(rng)).collect()
}

/// `depth` independent pairwise-independent hashes onto `[0, width)`.
#[derive(Clone)]
pub struct HashFamily {
    hashes: Box<[LinearHash]>,
    width: usize,
}

impl HashFamily {
    pub fn new(depth: usize, width: usize) -> Result<Self> {
        Self::with_rng(depth, width, &mut rand::thread_rng())
    }

    pub fn with_rng<R: Rng + ?Sized>(depth: usize, width: usize, rng: &mut R) -> Result<Self> {
        if depth == 0 {
            return Err(Error::InvalidConfiguration("depth must be > 0"));
        }
        if width == 0 {
            return Err(Error::InvalidConfiguration("width must be > 0"));
        }
        Ok(Self {
            hashes: random_hashes(depth, rng),
            width,
        })
    }

    pub fn depth(&self) -> usize {
        self.hashes.len()
    }

    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    fn bucket(&self, hash: &LinearHash, value: i64) -> usize {
        (hash.eval(value) % self.width as u64) as usize
    }

    /// # Panics
    ///
    /// Panics if `row >= depth`.
    #[inline]
    pub fn hash(&self, value: i64, row: usize) -> usize {
        self.bucket(&self.hashes[row], value)
    }

    /// Bucket of `value` in every row, in row order.
    pub fn indices(&self, value: i64) -> impl Iterator<Item = usize> + '_ {
        self.hashes.iter().map(move |h| self.bucket(h, value))
    }
}

impl Debug for HashFamily {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "HashFamily {{ depth: {}, width: {} }}",
            self.depth(),
            self.width
        )
    }
}

/// `depth` independent `{-1, +1}` hashes, drawn separately from any
/// [`HashFamily`].
#[derive(Clone)]
pub struct SignFamily {
    hashes: Box<[LinearHash]>,
}

impl SignFamily {
    pub fn new(depth: usize) -> Result<Self> {
        Self::with_rng(depth, &mut rand::thread_rng())
    }

    pub fn with_rng<R: Rng + ?Sized>(depth: usize, rng: &mut R) -> Result<Self> {
        if depth == 0 {
            return Err(Error::InvalidConfiguration("depth must be > 0"));
        }
        Ok(Self {
            hashes: random_hashes(depth, rng),
        })
    }

    pub fn depth(&self) -> usize {
        self.hashes.len()
    }

    /// # Panics
    ///
    /// Panics if `row >= depth`.
    #[inline]
    pub fn sign(&self, value: i64, row: usize) -> i8 {
        parity_sign(&self.hashes[row], value)
    }

    pub fn signs(&self, value: i64) -> impl Iterator<Item = i8> + '_ {
        self.hashes.iter().map(move |h| parity_sign(h, value))
    }
}

/// Even residues map to `-1`, odd residues to `+1`.
#[inline]
fn parity_sign(hash: &LinearHash, value: i64) -> i8 {
    if hash.eval(value) % 2 == 0 {
        -1
    } else {
        1
    }
}

impl Debug for SignFamily {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "SignFamily {{ depth: {} }}", self.depth())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_rejects_empty_dimensions() {
        assert!(matches!(
            HashFamily::new(0, 10),
            Err(Error::InvalidConfiguration(_))
        ));
        assert!(matches!(
            HashFamily::new(3, 0),
            Err(Error::InvalidConfiguration(_))
        ));
        assert!(matches!(
            SignFamily::new(0),
            Err(Error::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_coefficients_in_field() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..10_000 {
            let h = LinearHash::random(&mut rng);
            assert!((1..MERSENNE_PRIME).contains(&h.a));
            assert!((1..MERSENNE_PRIME).contains(&h.b));
        }
    }

    #[test]
    fn test_eval_matches_wide_arithmetic() {
        let h = LinearHash {
            a: MERSENNE_PRIME - 1,
            b: MERSENNE_PRIME - 1,
        };
        for value in [
            0,
            1,
            -1,
            MERSENNE_PRIME as i64 - 1,
            MERSENNE_PRIME as i64,
            i64::MAX,
            i64::MIN,
        ] {
            let wide = (h.a as i128 * value as i128 + h.b as i128)
                .rem_euclid(MERSENNE_PRIME as i128) as u64;
            assert_eq!(h.eval(value), wide, "value {value}");
        }
    }

    #[test]
    fn test_hash_in_range() {
        let mut rng = StdRng::seed_from_u64(11);
        let family = HashFamily::with_rng(8, 37, &mut rng).unwrap();
        for value in -1000..1000 {
            for row in 0..family.depth() {
                assert!(family.hash(value, row) < 37);
            }
        }
    }

    #[test]
    fn test_indices_match_hash() {
        let mut rng = StdRng::seed_from_u64(3);
        let family = HashFamily::with_rng(5, 1024, &mut rng).unwrap();
        for value in [0, 42, -42, i64::MAX] {
            let expected: Vec<_> = (0..5).map(|row| family.hash(value, row)).collect();
            assert_eq!(family.indices(value).collect::<Vec<_>>(), expected);
        }
    }

    #[test]
    fn test_hash_is_deterministic() {
        let mut rng = StdRng::seed_from_u64(5);
        let family = HashFamily::with_rng(4, 100, &mut rng).unwrap();
        let cloned = family.clone();
        for value in 0..100 {
            assert_eq!(
                family.indices(value).collect::<Vec<_>>(),
                cloned.indices(value).collect::<Vec<_>>()
            );
        }
    }

    #[test]
    #[should_panic]
    fn test_hash_row_out_of_range() {
        let family = HashFamily::with_rng(2, 8, &mut StdRng::seed_from_u64(1)).unwrap();
        family.hash(0, 2);
    }

    #[test]
    fn test_sign_matches_residue_parity() {
        let mut rng = StdRng::seed_from_u64(17);
        let hashes = random_hashes(3, &mut rng);
        let family = SignFamily {
            hashes: hashes.clone(),
        };
        for value in -50..50 {
            for (row, h) in hashes.iter().enumerate() {
                let expected = if h.eval(value) % 2 == 0 { -1 } else { 1 };
                assert_eq!(family.sign(value, row), expected);
            }
        }
    }

    #[test]
    fn test_signs_are_balanced() {
        let mut rng = StdRng::seed_from_u64(13);
        let family = SignFamily::with_rng(4, &mut rng).unwrap();
        for row in 0..4 {
            let positive = (0..10_000)
                .filter(|&value| family.sign(value, row) == 1)
                .count();
            assert!((4_000..6_000).contains(&positive), "row {row}: {positive}");
        }
        let expected: Vec<_> = (0..4).map(|row| family.sign(99, row)).collect();
        assert_eq!(family.signs(99).collect::<Vec<_>>(), expected);
    }
}

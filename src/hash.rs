//! Spherical Locality-Sensitive Hashing (SLSH): hashes a point by projecting
//! onto a randomly rotated cross-polytope (orthoplex) and returning the
//! vertex most aligned with the projection.
//!
//! Terasawa, K., Tanaka, Y., 2007. "Spherical LSH for Approximate
//! Nearest-Neighbor Search on Unit Hypersphere." Springer. pp. 27-38.
use crate::error::{Error, Result};
use crate::feature::FeatureVector;
use crate::utils::bits_for;
use crate::vector::{random_rotations, RotationMatrix};
use std::marker::PhantomData;

pub type HashWord = u64;
const HASH_WORD_BITS: u32 = 64;

/// Implement this to plug a different hash family into [`crate::lsh::LSH`].
pub trait Hasher<F: FeatureVector> {
    /// Number of hash tables (`L`) this hasher produces a compound hash for.
    fn l(&self) -> usize;
    /// Fill `g` with an `l()`-length hash tuple for `p`.
    fn hash(&self, p: &F, g: &mut Vec<HashWord>);
}

/// Spherical LSH hash family. For an orthoplex, the basis vectors are
/// permutations of `(1, 0, ..., 0)` and `-(1, 0, ..., 0)`; rotating by `R`
/// simply picks up row `i` of `R` (up to sign), so no matrix multiplication
/// is needed beyond the dot products already required by `dot`.
pub struct SLSH<F> {
    /// `k * l` independent rotation matrices, flattened row-major by table.
    rotations: Vec<RotationMatrix>,
    /// `ceil(log2(2d))`: bit-width of one elementary hash.
    hbits: u32,
    d: usize,
    k: usize,
    l: usize,
    clipped: bool,
    _marker: PhantomData<F>,
}

impl<F: FeatureVector> SLSH<F> {
    /// Construct a hasher for `d`-dimensional points using `k` elementary
    /// hashes per table and `l` tables. `k` is silently clamped to
    /// `floor(64 / hbits)` if it would otherwise overflow a single
    /// [`HashWord`]; check [`SLSH::was_clipped`] to observe this.
    pub fn new(d: usize, k: usize, l: usize, seed: u64) -> Result<Self> {
        if d == 0 {
            return Err(Error::InvalidDimension);
        }
        if k == 0 || l == 0 {
            return Err(Error::InvalidParameter);
        }

        let hbits = bits_for(2 * d).max(1);
        let k_max = (HASH_WORD_BITS / hbits) as usize;
        let (k, clipped) = if k > k_max {
            eprintln!("k is too big, chopping down ({} -> {})", k, k_max);
            (k_max, true)
        } else {
            (k, false)
        };

        let rotations = random_rotations(d, k * l, seed);

        Ok(SLSH {
            rotations,
            hbits,
            d,
            k,
            l,
            clipped,
            _marker: PhantomData,
        })
    }

    pub fn was_clipped(&self) -> bool {
        self.clipped
    }

    pub fn d(&self) -> usize {
        self.d
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn hbits(&self) -> u32 {
        self.hbits
    }

    /// Index of the rotated orthoplex vertex most aligned with `p`, encoded
    /// as `i` when the aligning dot product is non-negative and `i + d`
    /// otherwise. (The original source instead returns `2*i`, which is not
    /// injective over `(axis, sign)`; this crate uses the injective
    /// encoding spec'd for a fresh implementation.)
    fn argmaxi(&self, p: &F, rotation: &RotationMatrix) -> HashWord {
        let mut maxi = 0usize;
        let mut max_abs = -1.0f32;
        let mut positive = true;

        for i in 0..self.d {
            let dot = p.dot(rotation.row(i).as_slice());
            let abs = dot.abs();
            if abs > max_abs {
                max_abs = abs;
                maxi = i;
                positive = dot >= 0.0;
            }
        }
        if positive {
            maxi as HashWord
        } else {
            (maxi + self.d) as HashWord
        }
    }
}

impl<F: FeatureVector> Hasher<F> for SLSH<F> {
    fn l(&self) -> usize {
        self.l
    }

    /// Fills `g` with `l` compound hashes, each packing `k` elementary
    /// `hbits`-wide hashes. `O(l * k * d)`, dominated by `dot`.
    fn hash(&self, p: &F, g: &mut Vec<HashWord>) {
        g.clear();
        g.reserve(self.l);

        let mut ri = 0;
        for _ in 0..self.l {
            let mut gi: HashWord = 0;
            for j in 0..self.k {
                let h = self.argmaxi(p, &self.rotations[ri]);
                gi |= h << (self.hbits as u64 * j as u64);
                ri += 1;
            }
            g.push(gi);
        }
    }
}

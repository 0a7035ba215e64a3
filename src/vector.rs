//! Dense real vectors and the random rotation builder used by [`crate::hash::SLSH`].
use crate::utils::create_rng;
use ndarray::Array1;
use ndarray_rand::rand_distr::StandardNormal;
use ndarray_rand::RandomExt;
use rand::rngs::SmallRng;

/// A finite sequence of single-precision reals. Owned by whichever
/// [`RotationMatrix`] holds it.
#[derive(Debug, Clone)]
pub struct DenseVector {
    data: Array1<f32>,
}

impl DenseVector {
    /// Replace contents with `d` independent Gaussian samples.
    pub fn fill_gaussian(d: usize, rng: &mut SmallRng) -> Self {
        DenseVector {
            data: Array1::random_using(d, StandardNormal, rng),
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[f32] {
        self.data
            .as_slice()
            .expect("DenseVector is always contiguous")
    }

    pub fn norm(&self) -> f32 {
        self.data.dot(&self.data).sqrt()
    }

    pub fn dot(&self, other: &DenseVector) -> f32 {
        self.data.dot(&other.data)
    }

    pub fn scale(&mut self, s: f32) {
        self.data *= s;
    }

    pub fn sub(&mut self, other: &DenseVector) {
        self.data -= &other.data;
    }
}

/// An ordered set of `d` unit vectors forming an orthonormal basis of ℝ^d.
/// For SLSH, rotated vertex `i` of the orthoplex is exactly row `i`.
#[derive(Debug, Clone)]
pub struct RotationMatrix {
    rows: Vec<DenseVector>,
}

impl RotationMatrix {
    pub fn row(&self, i: usize) -> &DenseVector {
        &self.rows[i]
    }

    pub fn d(&self) -> usize {
        self.rows.len()
    }
}

/// Build a rotation drawn (with probability 1) from the Haar measure on
/// O(d), via classical Gram-Schmidt on `d` random Gaussian starting vectors.
///
/// The original C++ source scales the projection by `dot/‖v‖` instead of the
/// conventional `dot/‖v‖²`; we use the conventional formula here (see
/// DESIGN.md) since the final per-row normalization does not compensate for
/// the missing division and the conventional form is what a fresh
/// implementation should ship.
///
/// A zero-norm vector encountered mid-procedure indicates a numerically
/// degenerate draw; the whole construction is restarted from scratch.
pub fn random_rotation(d: usize, rng: &mut SmallRng) -> RotationMatrix {
    loop {
        if let Some(rows) = try_build_rotation(d, rng) {
            return RotationMatrix { rows };
        }
    }
}

fn try_build_rotation(d: usize, rng: &mut SmallRng) -> Option<Vec<DenseVector>> {
    let mut rows: Vec<DenseVector> = (0..d).map(|_| DenseVector::fill_gaussian(d, rng)).collect();

    for i in 0..d {
        for j in 0..i {
            let vnorm = rows[j].norm();
            if vnorm == 0.0 {
                return None;
            }
            let t = rows[j].dot(&rows[i]) / (vnorm * vnorm);
            let mut proj = rows[j].clone();
            proj.scale(t);
            rows[i].sub(&proj);
        }
        let n = rows[i].norm();
        if n == 0.0 {
            return None;
        }
        rows[i].scale(1.0 / n);
    }
    Some(rows)
}

/// Builds `n` independent rotation matrices, each seeded from the same RNG
/// stream (used to construct the `k * l` rotations an [`crate::hash::SLSH`]
/// hasher needs).
pub fn random_rotations(d: usize, n: usize, seed: u64) -> Vec<RotationMatrix> {
    let mut rng = create_rng(seed);
    (0..n).map(|_| random_rotation(d, &mut rng)).collect()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_dense_vector_ops() {
        let mut a = DenseVector::fill_gaussian(4, &mut create_rng(1));
        let b = a.clone();
        assert!((a.dot(&b) - a.norm().powi(2)).abs() < 1e-4);
        a.scale(2.0);
        assert!((a.norm() - 2.0 * b.norm()).abs() < 1e-4);
        a.sub(&b);
        assert!((a.norm() - b.norm()).abs() < 1e-4);
    }

    #[test]
    fn test_random_rotation_is_orthonormal() {
        let mut rng = create_rng(42);
        let r = random_rotation(8, &mut rng);
        for i in 0..8 {
            assert!((r.row(i).norm() - 1.0).abs() < 1e-3);
            for j in 0..i {
                assert!(r.row(i).dot(r.row(j)).abs() < 1e-2);
            }
        }
    }

    #[test]
    fn test_random_rotation_d1() {
        let mut rng = create_rng(1);
        let r = random_rotation(1, &mut rng);
        assert_eq!(r.d(), 1);
        assert!((r.row(0).norm() - 1.0).abs() < 1e-6);
    }
}

//! The capability set any point type must expose to be usable with
//! [`crate::lsh::LSH`] and [`crate::hash::SLSH`].

/// A point in the feature space. Implementors are only required to supply
/// the operations the index and hasher actually call; everything else about
/// the point's representation is opaque to this crate.
///
/// Reference identity (not `F`'s own equality, if any) is what the index
/// uses as a cache key (see [`crate::table::PointKey`]).
pub trait FeatureVector {
    /// Inner product with a dense vector of equal dimension. Called
    /// `Θ(d·k·L)` times per insert and per query; implementations should
    /// keep this allocation-free.
    fn dot(&self, v: &[f32]) -> f32;

    /// Symmetric similarity with another point of the same type, larger
    /// meaning more similar. SLSH's soundness assumes this is consistent
    /// with cosine similarity on the unit hypersphere.
    fn similarity(&self, other: &Self) -> f32;

    /// Copy-multiplicity: how many original points this instance stands in
    /// for. Candidates with `n_copies() <= 0` are dropped by the collector.
    fn n_copies(&self) -> i32 {
        1
    }
}

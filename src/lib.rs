//! Approximate nearest-neighbor search via Spherical Locality-Sensitive
//! Hashing (SLSH): an amplified AND/OR hash construction (`k` elementary
//! hashes per table, `L` independent tables) over a hash family that
//! projects each point onto a randomly rotated cross-polytope and keys on
//! the most-aligned rotated vertex.
extern crate ndarray;

pub mod error;
pub mod feature;
pub mod hash;
pub mod lsh;
pub mod prelude;
pub mod query;
pub mod stats;
pub mod table;
pub mod utils;
pub mod vector;

pub use crate::error::{Error, Result};
pub use crate::feature::FeatureVector;
pub use crate::hash::{HashWord, Hasher, SLSH};
pub use crate::lsh::LSH;

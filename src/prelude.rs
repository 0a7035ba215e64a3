//! Re-export of the public api of slsh-rs.
pub use crate::{
    error::{Error, Result},
    feature::FeatureVector,
    hash::{HashWord, Hasher, SLSH},
    lsh::LSH,
    query::QueryContext,
    stats::{estimate_l, occupancy_stats, OccupancyStats},
    vector::{random_rotation, random_rotations, DenseVector, RotationMatrix},
};

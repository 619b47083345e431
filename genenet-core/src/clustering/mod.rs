//! Traditional clustering baseline over per-node feature vectors.
//!
//! Seeded k-means partitions the vectors, the silhouette coefficient scores
//! each partition, and [`select_cluster_count`] picks the best candidate
//! count. Feature vectors are dense `f64` rows of a common dimension.

mod kmeans;
mod selection;
mod silhouette;

pub use self::{
    kmeans::{KMeansFit, kmeans},
    selection::{CandidateScore, ClusterCountSelection, select_cluster_count},
    silhouette::silhouette_score,
};

use crate::error::ClusteringError;

/// Checks that `points` is non-empty and uniformly dimensioned, returning the
/// dimension.
fn validate_points(points: &[Vec<f64>]) -> Result<usize, ClusteringError> {
    let first = points.first().ok_or(ClusteringError::NoPoints)?;
    let expected = first.len();
    if expected == 0 {
        return Err(ClusteringError::DimensionMismatch {
            index: 0,
            expected: 1,
            actual: 0,
        });
    }
    match points
        .iter()
        .enumerate()
        .find(|(_, point)| point.len() != expected)
    {
        Some((index, point)) => Err(ClusteringError::DimensionMismatch {
            index,
            expected,
            actual: point.len(),
        }),
        None => Ok(expected),
    }
}

#[expect(clippy::float_arithmetic, reason = "Euclidean distance")]
fn squared_distance(left: &[f64], right: &[f64]) -> f64 {
    left.iter()
        .zip(right)
        .map(|(a, b)| {
            let delta = a - b;
            delta * delta
        })
        .sum()
}

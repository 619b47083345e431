//! Seeded Lloyd's k-means with greedy k-means++ initialisation.

use rand::{Rng, SeedableRng, rngs::SmallRng};
use tracing::{debug, instrument};

use super::{squared_distance, validate_points};
use crate::error::ClusteringError;

const MAX_ITERATIONS: usize = 300;
const RELATIVE_TOLERANCE: f64 = 1e-4;

/// Result of a k-means run.
#[derive(Debug, Clone, PartialEq)]
pub struct KMeansFit {
    labels: Vec<usize>,
    centroids: Vec<Vec<f64>>,
    iterations: usize,
    inertia: f64,
}

impl KMeansFit {
    /// Cluster label of every point, in input order.
    #[must_use]
    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    /// Final centroids, indexed by label.
    #[must_use]
    pub fn centroids(&self) -> &[Vec<f64>] {
        &self.centroids
    }

    /// Number of Lloyd iterations performed.
    #[must_use]
    pub const fn iterations(&self) -> usize {
        self.iterations
    }

    /// Sum of squared distances from each point to its centroid.
    #[must_use]
    pub const fn inertia(&self) -> f64 {
        self.inertia
    }
}

/// Partitions `points` into `clusters` groups.
///
/// The same `seed` always produces the same labelling. Identical points may
/// leave some labels unused.
///
/// # Errors
/// Returns [`ClusteringError::NoPoints`] or
/// [`ClusteringError::DimensionMismatch`] for unusable input and
/// [`ClusteringError::InvalidClusterCount`] when `clusters` is zero or exceeds
/// the number of points.
///
/// # Examples
/// ```
/// use genenet_core::kmeans;
///
/// let points = vec![vec![0.0], vec![0.1], vec![10.0], vec![10.1]];
/// let fit = kmeans(&points, 2, 42)?;
/// let labels = fit.labels();
/// assert_eq!(labels[0], labels[1]);
/// assert_eq!(labels[2], labels[3]);
/// assert_ne!(labels[0], labels[2]);
/// # Ok::<(), genenet_core::ClusteringError>(())
/// ```
#[instrument(
    name = "clustering.kmeans",
    err,
    skip(points),
    fields(point_count = points.len()),
)]
pub fn kmeans(points: &[Vec<f64>], clusters: usize, seed: u64) -> Result<KMeansFit, ClusteringError> {
    validate_points(points)?;
    if clusters == 0 || clusters > points.len() {
        return Err(ClusteringError::InvalidClusterCount {
            clusters,
            points: points.len(),
        });
    }

    let mut rng = SmallRng::seed_from_u64(seed);
    let mut centroids = seed_centroids(points, clusters, &mut rng);
    let tolerance = convergence_tolerance(points);
    let mut labels = assign(points, &centroids);
    let mut iterations = 0;

    while iterations < MAX_ITERATIONS {
        iterations += 1;
        let updated = update_centroids(points, &labels, &centroids);
        let shift: f64 = centroids
            .iter()
            .zip(&updated)
            .map(|(old, new)| squared_distance(old, new))
            .sum();
        centroids = updated;
        labels = assign(points, &centroids);
        if shift <= tolerance {
            break;
        }
    }

    let inertia = inertia(points, &labels, &centroids);
    debug!(iterations, inertia, "k-means converged");
    Ok(KMeansFit {
        labels,
        centroids,
        iterations,
        inertia,
    })
}

#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss,
    reason = "trial count is a small positive integer"
)]
fn local_trials(clusters: usize) -> usize {
    2 + (clusters as f64).ln().floor() as usize
}

/// Greedy k-means++: each new centre is the best of several weighted draws.
#[expect(clippy::float_arithmetic, reason = "potential accumulation")]
fn seed_centroids(points: &[Vec<f64>], clusters: usize, rng: &mut SmallRng) -> Vec<Vec<f64>> {
    let first = rng.gen_range(0..points.len());
    let mut centroids = vec![points[first].clone()];
    let mut closest: Vec<f64> = points
        .iter()
        .map(|point| squared_distance(point, &points[first]))
        .collect();
    let trials = local_trials(clusters);

    while centroids.len() < clusters {
        let mut best: Option<(f64, usize, Vec<f64>)> = None;
        for _ in 0..trials {
            let candidate = weighted_index(&closest, rng);
            let distances: Vec<f64> = points
                .iter()
                .zip(&closest)
                .map(|(point, &current)| current.min(squared_distance(point, &points[candidate])))
                .collect();
            let potential: f64 = distances.iter().sum();
            if best.as_ref().is_none_or(|(lowest, _, _)| potential < *lowest) {
                best = Some((potential, candidate, distances));
            }
        }
        let Some((_, chosen, distances)) = best else {
            break;
        };
        centroids.push(points[chosen].clone());
        closest = distances;
    }
    centroids
}

/// Draws an index with probability proportional to `weights`, uniformly when
/// every weight is zero.
#[expect(clippy::float_arithmetic, reason = "cumulative sampling")]
fn weighted_index(weights: &[f64], rng: &mut SmallRng) -> usize {
    let total: f64 = weights.iter().sum();
    if total <= 0.0 {
        return rng.gen_range(0..weights.len());
    }
    let mut remaining = rng.r#gen::<f64>() * total;
    let mut last_positive = 0;
    for (index, &weight) in weights.iter().enumerate() {
        if weight <= 0.0 {
            continue;
        }
        if remaining < weight {
            return index;
        }
        remaining -= weight;
        last_positive = index;
    }
    last_positive
}

#[expect(
    clippy::cast_precision_loss,
    clippy::float_arithmetic,
    reason = "per-feature variance"
)]
fn convergence_tolerance(points: &[Vec<f64>]) -> f64 {
    let count = points.len() as f64;
    let dimension = points.first().map_or(0, Vec::len);
    if dimension == 0 {
        return 0.0;
    }
    let total_variance: f64 = (0..dimension)
        .map(|feature| {
            let mean = points.iter().map(|p| p[feature]).sum::<f64>() / count;
            points
                .iter()
                .map(|p| {
                    let delta = p[feature] - mean;
                    delta * delta
                })
                .sum::<f64>()
                / count
        })
        .sum();
    RELATIVE_TOLERANCE * total_variance / dimension as f64
}

/// Labels each point with its nearest centroid; ties go to the lower label.
fn assign(points: &[Vec<f64>], centroids: &[Vec<f64>]) -> Vec<usize> {
    points
        .iter()
        .map(|point| nearest(point, centroids).0)
        .collect()
}

fn nearest(point: &[f64], centroids: &[Vec<f64>]) -> (usize, f64) {
    centroids
        .iter()
        .enumerate()
        .map(|(label, centroid)| (label, squared_distance(point, centroid)))
        .fold((0, f64::INFINITY), |best, candidate| {
            if candidate.1 < best.1 { candidate } else { best }
        })
}

/// Recomputes centroids as label means; empty clusters take the point that
/// lies farthest from its current centroid.
#[expect(
    clippy::cast_precision_loss,
    clippy::float_arithmetic,
    reason = "centroid means"
)]
fn update_centroids(
    points: &[Vec<f64>],
    labels: &[usize],
    previous: &[Vec<f64>],
) -> Vec<Vec<f64>> {
    let dimension = previous.first().map_or(0, Vec::len);
    let mut sums = vec![vec![0.0_f64; dimension]; previous.len()];
    let mut counts = vec![0_usize; previous.len()];
    for (point, &label) in points.iter().zip(labels) {
        counts[label] += 1;
        for (sum, value) in sums[label].iter_mut().zip(point) {
            *sum += value;
        }
    }

    let mut reseeded = Vec::new();
    for (label, sum) in sums.iter_mut().enumerate() {
        if counts[label] > 0 {
            let count = counts[label] as f64;
            sum.iter_mut().for_each(|value| *value /= count);
            continue;
        }
        let farthest = points
            .iter()
            .zip(labels)
            .enumerate()
            .filter(|(index, _)| !reseeded.contains(index))
            .map(|(index, (point, &own))| (index, squared_distance(point, &previous[own])))
            .fold(None, |best: Option<(usize, f64)>, candidate| match best {
                Some(current) if current.1 >= candidate.1 => Some(current),
                _ => Some(candidate),
            });
        if let Some((index, _)) = farthest {
            reseeded.push(index);
            sum.clone_from(&points[index]);
        }
    }
    sums
}

fn inertia(points: &[Vec<f64>], labels: &[usize], centroids: &[Vec<f64>]) -> f64 {
    points
        .iter()
        .zip(labels)
        .map(|(point, &label)| squared_distance(point, &centroids[label]))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    fn blobs() -> Vec<Vec<f64>> {
        vec![
            vec![0.0, 0.0],
            vec![0.2, 0.1],
            vec![0.1, 0.3],
            vec![5.0, 5.0],
            vec![5.2, 4.9],
            vec![4.8, 5.1],
            vec![10.0, 0.0],
            vec![10.1, 0.2],
        ]
    }

    #[rstest]
    fn separates_well_spaced_blobs() {
        let fit = kmeans(&blobs(), 3, 42).expect("valid input");
        let labels = fit.labels();
        assert_eq!(labels[0], labels[1]);
        assert_eq!(labels[1], labels[2]);
        assert_eq!(labels[3], labels[4]);
        assert_eq!(labels[4], labels[5]);
        assert_eq!(labels[6], labels[7]);
        assert_ne!(labels[0], labels[3]);
        assert_ne!(labels[3], labels[6]);
        assert_ne!(labels[0], labels[6]);
        assert_eq!(fit.centroids().len(), 3);
        assert!(fit.iterations() >= 1);
    }

    #[rstest]
    fn same_seed_is_reproducible() {
        let first = kmeans(&blobs(), 4, 7).expect("valid input");
        let second = kmeans(&blobs(), 4, 7).expect("valid input");
        assert_eq!(first, second);
    }

    #[rstest]
    #[case::zero(0)]
    #[case::too_many(9)]
    fn rejects_invalid_cluster_counts(#[case] clusters: usize) {
        let err = kmeans(&blobs(), clusters, 42).expect_err("invalid cluster count");
        assert_eq!(
            err,
            ClusteringError::InvalidClusterCount {
                clusters,
                points: 8
            }
        );
    }

    #[rstest]
    fn one_cluster_per_point_has_zero_inertia() {
        let points = vec![vec![1.0], vec![2.0], vec![4.0]];
        let fit = kmeans(&points, 3, 42).expect("valid input");
        assert!(fit.inertia().abs() < 1e-12);
        let mut labels = fit.labels().to_vec();
        labels.sort_unstable();
        assert_eq!(labels, vec![0, 1, 2]);
    }

    #[rstest]
    fn identical_points_converge_immediately() {
        let points = vec![vec![1.0, 1.0]; 4];
        let fit = kmeans(&points, 2, 42).expect("valid input");
        assert!(fit.inertia().abs() < 1e-12);
        assert_eq!(fit.iterations(), 1);
    }

    #[rstest]
    #[case(1, 2)]
    #[case(2, 2)]
    #[case(3, 3)]
    #[case(10, 4)]
    fn trial_count_grows_logarithmically(#[case] clusters: usize, #[case] expected: usize) {
        assert_eq!(local_trials(clusters), expected);
    }

    #[rstest]
    fn zero_weights_sample_uniformly_in_range() {
        let mut rng = SmallRng::seed_from_u64(1);
        for _ in 0..32 {
            assert!(weighted_index(&[0.0, 0.0, 0.0], &mut rng) < 3);
        }
    }

    #[rstest]
    fn single_positive_weight_is_always_drawn() {
        let mut rng = SmallRng::seed_from_u64(1);
        for _ in 0..32 {
            assert_eq!(weighted_index(&[0.0, 2.5, 0.0], &mut rng), 1);
        }
    }
}

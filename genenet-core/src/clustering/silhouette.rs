//! Mean silhouette coefficient of a labelling.

use std::collections::BTreeMap;

use super::{squared_distance, validate_points};
use crate::error::ClusteringError;

/// Returns the mean silhouette coefficient of `labels` over `points`.
///
/// Each sample scores `(b - a) / max(a, b)` where `a` is its mean distance to
/// the rest of its own cluster and `b` the smallest mean distance to another
/// cluster. Members of singleton clusters score zero. Scores lie in
/// `[-1, 1]`; higher means better separated clusters.
///
/// # Errors
/// Returns [`ClusteringError::LabelLengthMismatch`] when the slices differ in
/// length and [`ClusteringError::DegenerateLabels`] unless the number of
/// distinct labels lies in `2..=points.len() - 1`.
///
/// # Examples
/// ```
/// use genenet_core::silhouette_score;
///
/// let points = vec![vec![0.0], vec![1.0], vec![10.0], vec![11.0]];
/// let score = silhouette_score(&points, &[0, 0, 1, 1])?;
/// assert!(score > 0.85);
/// assert!(silhouette_score(&points, &[0, 0, 0, 0]).is_err());
/// # Ok::<(), genenet_core::ClusteringError>(())
/// ```
#[expect(
    clippy::cast_precision_loss,
    clippy::float_arithmetic,
    reason = "silhouette is defined over mean distances"
)]
pub fn silhouette_score(points: &[Vec<f64>], labels: &[usize]) -> Result<f64, ClusteringError> {
    validate_points(points)?;
    if points.len() != labels.len() {
        return Err(ClusteringError::LabelLengthMismatch {
            points: points.len(),
            labels: labels.len(),
        });
    }

    let mut sizes = BTreeMap::<usize, usize>::new();
    for &label in labels {
        *sizes.entry(label).or_insert(0) += 1;
    }
    let max = points.len() - 1;
    if sizes.len() < 2 || sizes.len() > max {
        return Err(ClusteringError::DegenerateLabels {
            distinct: sizes.len(),
            max,
        });
    }

    let mut total = 0.0_f64;
    for (index, (point, &label)) in points.iter().zip(labels).enumerate() {
        let own_size = sizes.get(&label).copied().unwrap_or(0);
        if own_size < 2 {
            continue;
        }
        let mut sums = BTreeMap::<usize, f64>::new();
        for (other_index, (other, &other_label)) in points.iter().zip(labels).enumerate() {
            if other_index == index {
                continue;
            }
            *sums.entry(other_label).or_insert(0.0) += squared_distance(point, other).sqrt();
        }
        let intra = sums.get(&label).copied().unwrap_or(0.0) / (own_size - 1) as f64;
        let nearest = sums
            .iter()
            .filter(|&(&other_label, _)| other_label != label)
            .filter_map(|(other_label, sum)| {
                sizes.get(other_label).map(|&size| sum / size as f64)
            })
            .fold(f64::INFINITY, f64::min);
        let spread = intra.max(nearest);
        if spread > 0.0 {
            total += (nearest - intra) / spread;
        }
    }
    Ok(total / points.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    fn matches_hand_computed_value() {
        // Cluster {0, 2} and {5}: the singleton contributes zero.
        let points = vec![vec![0.0], vec![2.0], vec![5.0]];
        let score = silhouette_score(&points, &[0, 0, 1]).expect("scorable labelling");
        // s0 = (5 - 2) / 5, s1 = (3 - 2) / 3
        let expected = (0.6 + 1.0 / 3.0) / 3.0;
        assert!((score - expected).abs() < 1e-12);
    }

    #[rstest]
    fn label_values_need_not_be_contiguous() {
        let points = vec![vec![0.0], vec![1.0], vec![10.0], vec![11.0]];
        let contiguous = silhouette_score(&points, &[0, 0, 1, 1]).expect("scorable");
        let sparse = silhouette_score(&points, &[7, 7, 3, 3]).expect("scorable");
        assert!((contiguous - sparse).abs() < 1e-12);
    }

    #[rstest]
    fn identical_points_score_zero() {
        let points = vec![vec![1.0, 1.0]; 4];
        let score = silhouette_score(&points, &[0, 0, 1, 1]).expect("scorable");
        assert_eq!(score, 0.0);
    }

    #[rstest]
    #[case::single_label(vec![0, 0, 0], 1)]
    #[case::all_singletons(vec![0, 1, 2], 3)]
    fn rejects_degenerate_labellings(#[case] labels: Vec<usize>, #[case] distinct: usize) {
        let points = vec![vec![0.0], vec![1.0], vec![2.0]];
        assert_eq!(
            silhouette_score(&points, &labels),
            Err(ClusteringError::DegenerateLabels { distinct, max: 2 })
        );
    }

    #[rstest]
    fn rejects_length_mismatch() {
        let points = vec![vec![0.0], vec![1.0]];
        assert_eq!(
            silhouette_score(&points, &[0]),
            Err(ClusteringError::LabelLengthMismatch {
                points: 2,
                labels: 1
            })
        );
    }
}

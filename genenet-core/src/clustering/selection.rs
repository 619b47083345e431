//! Choosing a cluster count by silhouette score.

use serde::Serialize;
use tracing::{debug, instrument};

use super::{kmeans::kmeans, silhouette::silhouette_score, validate_points};
use crate::error::ClusteringError;

/// Silhouette score of one candidate cluster count.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CandidateScore {
    /// Number of clusters requested from k-means.
    pub clusters: usize,
    /// Mean silhouette coefficient of the resulting labelling.
    pub score: f64,
}

/// Outcome of [`select_cluster_count`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterCountSelection {
    /// Selected number of clusters.
    pub clusters: usize,
    /// Silhouette score of the selected count.
    pub score: f64,
    /// Every candidate that could be scored, in increasing `k`.
    pub candidates: Vec<CandidateScore>,
}

impl ClusterCountSelection {
    const fn degenerate(clusters: usize) -> Self {
        Self {
            clusters,
            score: 0.0,
            candidates: Vec::new(),
        }
    }
}

/// Runs seeded k-means for `k = 2..=min(max_clusters, n - 1)` and keeps the
/// best silhouette score, breaking ties towards the lower `k`.
///
/// Fewer than two points select a single cluster with score zero without
/// running k-means. When no candidate can be scored (the range is empty or
/// every labelling collapses to one distinct label) two clusters with score
/// zero are reported.
///
/// # Errors
/// Returns [`ClusteringError::DimensionMismatch`] for ragged input; any
/// other clustering error raised for a candidate is propagated.
///
/// # Examples
/// ```
/// use genenet_core::select_cluster_count;
///
/// let points = vec![
///     vec![0.0, 0.0], vec![0.1, 0.0], vec![0.0, 0.1],
///     vec![9.0, 9.0], vec![9.1, 9.0], vec![9.0, 9.1],
/// ];
/// let selection = select_cluster_count(&points, 5, 42)?;
/// assert_eq!(selection.clusters, 2);
/// assert!(selection.score > 0.9);
///
/// let lonely = select_cluster_count(&[vec![1.0, 0.0]], 5, 42)?;
/// assert_eq!((lonely.clusters, lonely.score), (1, 0.0));
/// # Ok::<(), genenet_core::ClusteringError>(())
/// ```
#[instrument(
    name = "clustering.select_cluster_count",
    err,
    skip(points),
    fields(point_count = points.len()),
)]
pub fn select_cluster_count(
    points: &[Vec<f64>],
    max_clusters: usize,
    seed: u64,
) -> Result<ClusterCountSelection, ClusteringError> {
    if points.len() < 2 {
        return Ok(ClusterCountSelection::degenerate(1));
    }
    validate_points(points)?;

    let upper = max_clusters.min(points.len() - 1);
    let mut candidates = Vec::new();
    for clusters in 2..=upper {
        let fit = kmeans(points, clusters, seed)?;
        match silhouette_score(points, fit.labels()) {
            Ok(score) => {
                debug!(clusters, score, "candidate scored");
                candidates.push(CandidateScore { clusters, score });
            }
            Err(ClusteringError::DegenerateLabels { distinct, .. }) => {
                debug!(clusters, distinct, "candidate not scorable");
            }
            Err(other) => return Err(other),
        }
    }

    let best = candidates.iter().copied().fold(None, |best, candidate| match best {
        Some(CandidateScore { score, .. }) if score >= candidate.score => best,
        _ => Some(candidate),
    });
    Ok(match best {
        Some(CandidateScore { clusters, score }) => ClusterCountSelection {
            clusters,
            score,
            candidates,
        },
        None => ClusterCountSelection {
            candidates,
            ..ClusterCountSelection::degenerate(2)
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    #[case::empty(Vec::new())]
    #[case::single(vec![vec![3.0, 0.5]])]
    fn fewer_than_two_points_is_single_cluster(#[case] points: Vec<Vec<f64>>) {
        let selection = select_cluster_count(&points, 10, 42).expect("degenerate input");
        assert_eq!(selection, ClusterCountSelection::degenerate(1));
    }

    #[rstest]
    fn identical_points_fall_back_to_two_clusters() {
        let points = vec![vec![2.0, 1.0]; 5];
        let selection = select_cluster_count(&points, 10, 42).expect("valid input");
        assert_eq!(selection.clusters, 2);
        assert_eq!(selection.score, 0.0);
    }

    #[rstest]
    fn two_points_have_no_candidates() {
        let points = vec![vec![0.0], vec![1.0]];
        let selection = select_cluster_count(&points, 10, 42).expect("valid input");
        assert_eq!(selection.clusters, 2);
        assert!(selection.candidates.is_empty());
    }

    #[rstest]
    fn candidate_range_respects_ceiling() {
        let points: Vec<Vec<f64>> = (0..12).map(|i| vec![f64::from(i)]).collect();
        let selection = select_cluster_count(&points, 4, 42).expect("valid input");
        let ks: Vec<usize> = selection.candidates.iter().map(|c| c.clusters).collect();
        assert_eq!(ks, vec![2, 3, 4]);
        assert!(selection.candidates.iter().any(|c| c.clusters == selection.clusters));
    }

    #[rstest]
    fn picks_three_well_separated_groups() {
        let points = vec![
            vec![0.0],
            vec![0.1],
            vec![5.0],
            vec![5.1],
            vec![10.0],
            vec![10.1],
        ];
        let selection = select_cluster_count(&points, 5, 42).expect("valid input");
        assert_eq!(selection.clusters, 3);
    }
}

//! Traditional-only comparison used when GNN results are unavailable.

use std::time::Instant;

use serde::Serialize;
use tracing::{info, instrument};

use crate::{
    Result,
    clustering::select_cluster_count,
    graph::Graph,
    matrix::CorrelationMatrix,
};

/// Summary of the traditional clustering baseline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraditionalSummary {
    /// Wall-clock seconds spent building the network and clustering it.
    pub processing_time: f64,
    /// Cluster count with the best silhouette score.
    pub optimal_clusters: usize,
    /// Silhouette score of the selected clustering.
    pub silhouette_score: f64,
    /// Edges in the thresholded network.
    pub network_edges: usize,
    /// Nodes with at least one edge.
    pub connected_nodes: usize,
}

/// Structural properties of the thresholded network.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetworkProperties {
    /// Genes in the source matrix.
    pub total_genes: usize,
    /// Threshold the network was built at.
    pub threshold: f32,
    /// Edge density of the network.
    pub density: f64,
    /// Connected components, isolated nodes included.
    pub components: usize,
}

/// Result of [`basic_comparison`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BasicComparison {
    /// Clustering baseline summary.
    pub traditional: TraditionalSummary,
    /// Network the baseline was computed on.
    pub network_properties: NetworkProperties,
}

/// Clusters the non-isolated nodes of the thresholded network by their
/// `(degree, clustering coefficient)` features.
///
/// # Errors
/// Returns [`crate::AnalysisError::Clustering`] when the clustering baseline
/// fails on otherwise valid input.
///
/// # Examples
/// ```
/// use genenet_core::{CorrelationMatrix, basic_comparison};
///
/// let matrix = CorrelationMatrix::try_new(
///     "TEC",
///     vec!["a".into(), "b".into(), "c".into()],
///     vec![1.0, 0.9, 0.0, 0.9, 1.0, 0.0, 0.0, 0.0, 1.0],
/// )?;
/// let result = basic_comparison(&matrix, 0.75, 10, 42)?;
/// assert_eq!(result.traditional.network_edges, 1);
/// assert_eq!(result.traditional.connected_nodes, 2);
/// assert_eq!(result.network_properties.components, 2);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[instrument(
    name = "core.basic_comparison",
    err,
    skip(tec),
    fields(genes = tec.size()),
)]
pub fn basic_comparison(
    tec: &CorrelationMatrix,
    threshold: f32,
    max_clusters: usize,
    seed: u64,
) -> Result<BasicComparison> {
    let started = Instant::now();
    let graph = Graph::at_threshold(tec, threshold);
    let features = node_features(&graph);
    let selection = select_cluster_count(&features, max_clusters, seed)?;
    let processing_time = started.elapsed().as_secs_f64();

    info!(
        processing_time,
        clusters = selection.clusters,
        score = selection.score,
        "basic comparison completed"
    );
    Ok(BasicComparison {
        traditional: TraditionalSummary {
            processing_time,
            optimal_clusters: selection.clusters,
            silhouette_score: selection.score,
            network_edges: graph.edge_count(),
            connected_nodes: graph.connected_nodes(),
        },
        network_properties: NetworkProperties {
            total_genes: tec.size(),
            threshold,
            density: graph.density(),
            components: graph.connected_components(),
        },
    })
}

#[expect(clippy::cast_precision_loss, reason = "degrees become features")]
fn node_features(graph: &Graph) -> Vec<Vec<f64>> {
    (0..graph.node_count())
        .filter(|&node| graph.degree(node) > 0)
        .map(|node| vec![graph.degree(node) as f64, graph.clustering(node)])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    fn features_skip_isolated_nodes() {
        let matrix = CorrelationMatrix::try_new(
            "m",
            vec!["a".into(), "b".into(), "c".into(), "d".into()],
            vec![
                1.0, 0.9, 0.9, 0.0, //
                0.9, 1.0, 0.9, 0.0, //
                0.9, 0.9, 1.0, 0.0, //
                0.0, 0.0, 0.0, 1.0,
            ],
        )
        .expect("valid matrix");
        let features = node_features(&Graph::at_threshold(&matrix, 0.5));
        assert_eq!(features, vec![vec![2.0, 1.0]; 3]);
    }

    #[rstest]
    fn empty_network_is_degenerate() {
        let matrix = CorrelationMatrix::try_new(
            "m",
            vec!["a".into(), "b".into()],
            vec![1.0, 0.1, 0.1, 1.0],
        )
        .expect("valid matrix");
        let result = basic_comparison(&matrix, 0.75, 10, 42).expect("degenerate input");
        assert_eq!(result.traditional.optimal_clusters, 1);
        assert_eq!(result.traditional.silhouette_score, 0.0);
        assert_eq!(result.traditional.network_edges, 0);
        assert_eq!(result.network_properties.total_genes, 2);
        assert_eq!(result.network_properties.density, 0.0);
    }
}

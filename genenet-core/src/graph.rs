//! Undirected graphs built from adjacency matrices and their metrics.

use std::cmp::Ordering;

use serde::Serialize;

use crate::{adjacency::AdjacencyMatrix, matrix::CorrelationMatrix, union_find::UnionFind};

/// Undirected simple graph over gene indices.
///
/// Edges are the pairs `{i, j}` with `i < j` and `A[i][j] = 1`, so only the
/// upper triangle of the adjacency matrix is consulted.
///
/// # Examples
/// ```
/// use genenet_core::{CorrelationMatrix, Graph};
///
/// let matrix = CorrelationMatrix::try_new(
///     "TEC",
///     vec!["a".into(), "b".into(), "c".into()],
///     vec![1.0, 0.9, 0.1, 0.9, 1.0, 0.1, 0.1, 0.1, 1.0],
/// )?;
/// let graph = Graph::at_threshold(&matrix, 0.75);
/// assert_eq!(graph.edge_count(), 1);
/// assert_eq!(graph.connected_components(), 2);
/// assert_eq!(graph.isolated_nodes(), 1);
/// # Ok::<(), genenet_core::MatrixError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Graph {
    neighbours: Vec<Vec<usize>>,
    edge_count: usize,
}

/// Headline metrics of one network, as reported side by side for TEC and RNA.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GraphSummary {
    /// Total number of nodes, isolated ones included.
    pub nodes: usize,
    /// Number of undirected edges.
    pub edges: usize,
    /// Number of connected components, isolated nodes included.
    pub connected_components: usize,
    /// Unweighted mean of the per-node clustering coefficients.
    pub avg_clustering: f64,
    /// Edges divided by the number of possible edges.
    pub density: f64,
}

impl Graph {
    /// Wraps `adjacency` as an undirected graph.
    #[must_use]
    pub fn from_adjacency(adjacency: &AdjacencyMatrix) -> Self {
        let mut neighbours = vec![Vec::new(); adjacency.size()];
        let mut edge_count = 0_usize;
        for row in 0..adjacency.size() {
            for &column in adjacency.row(row).iter().filter(|&&column| column > row) {
                neighbours[row].push(column);
                neighbours[column].push(row);
                edge_count += 1;
            }
        }
        Self {
            neighbours,
            edge_count,
        }
    }

    /// Thresholds `matrix` and wraps the result.
    #[must_use]
    pub fn at_threshold(matrix: &CorrelationMatrix, threshold: f32) -> Self {
        Self::from_adjacency(&AdjacencyMatrix::from_threshold(matrix, threshold))
    }

    /// Returns the number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.neighbours.len()
    }

    /// Returns the number of undirected edges.
    #[must_use]
    pub const fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Returns the degree of `node`, or zero when out of range.
    #[must_use]
    pub fn degree(&self, node: usize) -> usize {
        self.neighbours.get(node).map_or(0, Vec::len)
    }

    /// Returns the degree of every node in index order.
    #[must_use]
    pub fn degrees(&self) -> Vec<usize> {
        self.neighbours.iter().map(Vec::len).collect()
    }

    /// Returns the sorted neighbours of `node`.
    #[must_use]
    pub fn neighbours(&self, node: usize) -> &[usize] {
        self.neighbours.get(node).map(Vec::as_slice).unwrap_or_default()
    }

    /// Counts nodes with at least one edge.
    #[must_use]
    pub fn connected_nodes(&self) -> usize {
        self.neighbours.iter().filter(|list| !list.is_empty()).count()
    }

    /// Counts nodes without edges.
    #[must_use]
    pub fn isolated_nodes(&self) -> usize {
        self.node_count() - self.connected_nodes()
    }

    /// Counts connected components; every isolated node is its own component.
    #[must_use]
    pub fn connected_components(&self) -> usize {
        let mut union_find = UnionFind::new(self.node_count());
        for (node, list) in self.neighbours.iter().enumerate() {
            for &other in list.iter().filter(|&&other| other > node) {
                union_find.union(node, other);
            }
        }
        union_find.components()
    }

    /// Fraction of the neighbour pairs of `node` that are themselves adjacent.
    ///
    /// Nodes with fewer than two neighbours have coefficient zero.
    #[must_use]
    #[expect(
        clippy::cast_precision_loss,
        clippy::float_arithmetic,
        reason = "clustering coefficients are ratios of pair counts"
    )]
    pub fn clustering(&self, node: usize) -> f64 {
        let own = self.neighbours(node);
        let degree = own.len();
        if degree < 2 {
            return 0.0;
        }
        let linked_pairs_twice: usize = own
            .iter()
            .map(|&neighbour| sorted_intersection_len(self.neighbours(neighbour), own))
            .sum();
        linked_pairs_twice as f64 / (degree * (degree - 1)) as f64
    }

    /// Mean clustering coefficient over all nodes (zero for an empty graph).
    #[must_use]
    #[expect(
        clippy::cast_precision_loss,
        clippy::float_arithmetic,
        reason = "averaging coefficients"
    )]
    pub fn average_clustering(&self) -> f64 {
        if self.node_count() == 0 {
            return 0.0;
        }
        let total: f64 = (0..self.node_count()).map(|node| self.clustering(node)).sum();
        total / self.node_count() as f64
    }

    /// Edges over the `n(n-1)/2` possible edges; zero when `n < 2`.
    #[must_use]
    #[expect(
        clippy::cast_precision_loss,
        clippy::float_arithmetic,
        reason = "density is a ratio"
    )]
    pub fn density(&self) -> f64 {
        let nodes = self.node_count();
        if nodes < 2 {
            return 0.0;
        }
        (2 * self.edge_count) as f64 / (nodes * (nodes - 1)) as f64
    }

    /// Collects the headline metrics.
    #[must_use]
    pub fn summary(&self) -> GraphSummary {
        GraphSummary {
            nodes: self.node_count(),
            edges: self.edge_count(),
            connected_components: self.connected_components(),
            avg_clustering: self.average_clustering(),
            density: self.density(),
        }
    }
}

fn sorted_intersection_len(left: &[usize], right: &[usize]) -> usize {
    let (mut left_index, mut right_index, mut count) = (0, 0, 0);
    while let (Some(a), Some(b)) = (left.get(left_index), right.get(right_index)) {
        match a.cmp(b) {
            Ordering::Less => left_index += 1,
            Ordering::Greater => right_index += 1,
            Ordering::Equal => {
                count += 1;
                left_index += 1;
                right_index += 1;
            }
        }
    }
    count
}

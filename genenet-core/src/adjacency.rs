//! Thresholding correlation matrices into binary adjacency matrices.
//!
//! The binary matrix is stored row by row as sorted column lists, so a
//! sparse network over many thousands of genes stays cheap to build for
//! every threshold of a sweep.

use crate::matrix::CorrelationMatrix;

/// Binary adjacency matrix derived from a [`CorrelationMatrix`].
///
/// `A[i][j] = 1` iff `|M[i][j]| > threshold` and `i != j`.
///
/// # Examples
/// ```
/// use genenet_core::{AdjacencyMatrix, CorrelationMatrix};
///
/// let matrix = CorrelationMatrix::try_new(
///     "TEC",
///     vec!["a".into(), "b".into()],
///     vec![1.0, -0.8, -0.8, 1.0],
/// )?;
/// let adjacency = AdjacencyMatrix::from_threshold(&matrix, 0.75);
/// assert_eq!(adjacency.get(0, 1), 1);
/// assert_eq!(adjacency.get(0, 0), 0);
/// # Ok::<(), genenet_core::MatrixError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdjacencyMatrix {
    rows: Vec<Vec<usize>>,
}

impl AdjacencyMatrix {
    /// Applies the absolute-value threshold to `matrix`, zeroing the diagonal.
    ///
    /// Thresholds outside the data's range are valid: a threshold above every
    /// magnitude yields an empty matrix and a negative one connects every
    /// distinct pair. `NaN` entries never produce an edge.
    #[must_use]
    pub fn from_threshold(matrix: &CorrelationMatrix, threshold: f32) -> Self {
        let rows = matrix
            .rows()
            .enumerate()
            .map(|(row, values)| {
                values
                    .iter()
                    .enumerate()
                    .filter(|&(column, value)| column != row && value.abs() > threshold)
                    .map(|(column, _)| column)
                    .collect()
            })
            .collect();
        Self { rows }
    }

    /// Returns the number of rows (equal to the number of columns).
    #[must_use]
    pub fn size(&self) -> usize {
        self.rows.len()
    }

    /// Returns the entry at `(row, column)`; out-of-bounds entries read as 0.
    #[must_use]
    pub fn get(&self, row: usize, column: usize) -> u8 {
        self.rows
            .get(row)
            .map_or(0, |columns| u8::from(columns.binary_search(&column).is_ok()))
    }

    /// Returns the sorted columns set in `row`.
    #[must_use]
    pub fn row(&self, row: usize) -> &[usize] {
        self.rows.get(row).map(Vec::as_slice).unwrap_or_default()
    }

    /// Returns whether `A[i][j] == A[j][i]` for every pair.
    #[must_use]
    pub fn is_symmetric(&self) -> bool {
        self.rows.iter().enumerate().all(|(row, columns)| {
            columns.iter().all(|&column| self.get(column, row) == 1)
        })
    }

    /// Counts the ones above the diagonal.
    #[must_use]
    pub fn upper_triangle_sum(&self) -> usize {
        self.rows
            .iter()
            .enumerate()
            .map(|(row, columns)| columns.iter().filter(|&&column| column > row).count())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    fn matrix(values: Vec<f32>) -> CorrelationMatrix {
        let size = (1..).find(|n| n * n >= values.len()).unwrap_or(0);
        let genes = (0..size).map(|index| format!("g{index}")).collect();
        CorrelationMatrix::try_new("m", genes, values).expect("valid matrix")
    }

    #[rstest]
    fn diagonal_is_always_zero() {
        let adjacency = AdjacencyMatrix::from_threshold(&matrix(vec![5.0, 0.0, 0.0, -5.0]), 0.5);
        assert_eq!(adjacency.get(0, 0), 0);
        assert_eq!(adjacency.get(1, 1), 0);
        assert_eq!(adjacency.upper_triangle_sum(), 0);
    }

    #[rstest]
    #[case::above_range(2.0, 0)]
    #[case::negative(-1.0, 3)]
    #[case::strict_comparison(0.5, 1)]
    fn threshold_extremes(#[case] threshold: f32, #[case] expected_edges: usize) {
        let values = vec![1.0, 0.5, 0.9, 0.5, 1.0, 0.0, 0.9, 0.0, 1.0];
        let adjacency = AdjacencyMatrix::from_threshold(&matrix(values), threshold);
        assert_eq!(adjacency.upper_triangle_sum(), expected_edges);
        assert!(adjacency.is_symmetric());
    }

    #[rstest]
    fn nan_never_connects() {
        let adjacency =
            AdjacencyMatrix::from_threshold(&matrix(vec![1.0, f32::NAN, f32::NAN, 1.0]), -1.0);
        assert_eq!(adjacency.upper_triangle_sum(), 0);
    }

    #[rstest]
    fn asymmetric_source_gives_asymmetric_adjacency() {
        let adjacency = AdjacencyMatrix::from_threshold(&matrix(vec![1.0, 0.9, 0.1, 1.0]), 0.75);
        assert_eq!(adjacency.get(0, 1), 1);
        assert_eq!(adjacency.get(1, 0), 0);
        assert!(!adjacency.is_symmetric());
    }
}

//! Gene-indexed square correlation matrices.

use crate::error::MatrixError;

/// Square, gene-indexed matrix of correlation values in row-major order.
///
/// # Examples
/// ```
/// use genenet_core::CorrelationMatrix;
///
/// let matrix = CorrelationMatrix::try_new(
///     "TEC",
///     vec!["a".into(), "b".into()],
///     vec![1.0, 0.4, 0.4, 1.0],
/// )?;
/// assert_eq!(matrix.size(), 2);
/// assert_eq!(matrix.get(0, 1), Some(0.4));
/// assert_eq!(matrix.get(2, 0), None);
/// # Ok::<(), genenet_core::MatrixError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    name: String,
    genes: Vec<String>,
    values: Vec<f32>,
}

impl CorrelationMatrix {
    /// Builds a matrix from gene labels and a row-major value buffer.
    ///
    /// # Errors
    /// Returns [`MatrixError::Empty`] when no genes are supplied,
    /// [`MatrixError::CapacityOverflow`] when `genes²` overflows, and
    /// [`MatrixError::NotSquare`] when `values` is not `genes²` long.
    pub fn try_new(
        name: impl Into<String>,
        genes: Vec<String>,
        values: Vec<f32>,
    ) -> Result<Self, MatrixError> {
        if genes.is_empty() {
            return Err(MatrixError::Empty);
        }
        let expected = genes
            .len()
            .checked_mul(genes.len())
            .ok_or(MatrixError::CapacityOverflow { genes: genes.len() })?;
        if values.len() != expected {
            return Err(MatrixError::NotSquare {
                genes: genes.len(),
                expected,
                actual: values.len(),
            });
        }
        Ok(Self {
            name: name.into(),
            genes,
            values,
        })
    }

    /// Returns the table name the matrix was loaded from.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the number of genes (rows and columns).
    #[must_use]
    pub fn size(&self) -> usize {
        self.genes.len()
    }

    /// Returns the gene labels in row order.
    #[must_use]
    pub fn genes(&self) -> &[String] {
        &self.genes
    }

    /// Returns the value at `(row, column)` or `None` when out of bounds.
    #[must_use]
    pub fn get(&self, row: usize, column: usize) -> Option<f32> {
        if row >= self.size() || column >= self.size() {
            return None;
        }
        self.values.get(row * self.size() + column).copied()
    }

    /// Returns one row of the matrix.
    #[must_use]
    pub fn row(&self, row: usize) -> Option<&[f32]> {
        let size = self.size();
        let start = row.checked_mul(size)?;
        self.values.get(start..start.checked_add(size)?)
    }

    /// Iterates over rows in gene order.
    pub fn rows(&self) -> impl Iterator<Item = &[f32]> {
        self.values.chunks_exact(self.size())
    }

    /// Returns whether both matrices list the same genes in the same order.
    #[must_use]
    pub fn same_genes(&self, other: &Self) -> bool {
        self.genes == other.genes
    }

    /// Returns whether `M[i][j] == M[j][i]` for every pair.
    #[must_use]
    pub fn is_symmetric(&self) -> bool {
        (0..self.size()).all(|row| {
            (row + 1..self.size()).all(|column| {
                self.get(row, column).map(f32::to_bits) == self.get(column, row).map(f32::to_bits)
            })
        })
    }
}

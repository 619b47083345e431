//! Threshold sweeps over paired TEC and RNA networks.

use serde::Serialize;
use tracing::{debug, instrument};

use crate::{
    Result,
    error::AnalysisError,
    graph::Graph,
    matrix::CorrelationMatrix,
};

/// Non-empty, finite, strictly ordered list of thresholds.
///
/// Both ascending and descending lists are accepted; the order is preserved
/// and defines the order of sweep records.
///
/// # Examples
/// ```
/// use genenet_core::Thresholds;
///
/// let thresholds = Thresholds::try_new("sweep", vec![0.9, 0.8, 0.7])?;
/// assert_eq!(thresholds.as_slice(), &[0.9, 0.8, 0.7]);
/// assert_eq!(thresholds.position(0.8), Some(1));
/// assert!(Thresholds::try_new("sweep", vec![0.9, 0.9]).is_err());
/// # Ok::<(), genenet_core::AnalysisError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Thresholds(Vec<f32>);

impl Thresholds {
    /// Validates `values` as a threshold list named `list` in diagnostics.
    ///
    /// # Errors
    /// Returns [`AnalysisError::EmptyThresholds`],
    /// [`AnalysisError::NonFiniteThreshold`] or
    /// [`AnalysisError::UnorderedThresholds`] when the list is unusable.
    pub fn try_new(list: &'static str, values: Vec<f32>) -> Result<Self> {
        if values.is_empty() {
            return Err(AnalysisError::EmptyThresholds { list });
        }
        if let Some((index, &value)) = values.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(AnalysisError::NonFiniteThreshold { list, index, value });
        }
        let descending = matches!(values.as_slice(), [first, second, ..] if first > second);
        let breaks_order = values.windows(2).position(|pair| match pair {
            [a, b] if descending => a <= b,
            [a, b] => a >= b,
            _ => false,
        });
        if let Some(index) = breaks_order {
            return Err(AnalysisError::UnorderedThresholds {
                list,
                index: index + 1,
            });
        }
        Ok(Self(values))
    }

    /// Returns the thresholds in configured order.
    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    /// Returns the number of thresholds.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; kept for API symmetry with [`Self::len`].
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the position of `threshold`, compared bit for bit.
    #[must_use]
    pub fn position(&self, threshold: f32) -> Option<usize> {
        self.0
            .iter()
            .position(|value| value.to_bits() == threshold.to_bits())
    }
}

/// Counts recorded for one network at one threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NetworkCounts {
    /// Number of edges.
    pub edges: usize,
    /// Nodes with degree above zero.
    pub connected_nodes: usize,
    /// Nodes with degree zero.
    pub isolated_nodes: usize,
    /// Connected components, isolated nodes included.
    pub components: usize,
}

impl NetworkCounts {
    /// Measures `graph`.
    #[must_use]
    pub fn of(graph: &Graph) -> Self {
        Self {
            edges: graph.edge_count(),
            connected_nodes: graph.connected_nodes(),
            isolated_nodes: graph.isolated_nodes(),
            components: graph.connected_components(),
        }
    }
}

/// One sweep step: the threshold and both networks' counts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SweepRecord {
    /// Threshold applied to both matrices.
    pub threshold: f32,
    /// Counts for the TEC network.
    pub tec: NetworkCounts,
    /// Counts for the RNA network.
    pub rna: NetworkCounts,
}

/// Ordered sweep records, one per configured threshold.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThresholdSweep {
    records: Vec<SweepRecord>,
}

impl ThresholdSweep {
    /// Returns the records in threshold order.
    #[must_use]
    pub fn records(&self) -> &[SweepRecord] {
        &self.records
    }

    /// Projects one series out of the records, e.g. TEC edge counts.
    pub fn series<T>(&self, project: impl Fn(&SweepRecord) -> T) -> Vec<T> {
        self.records.iter().map(project).collect()
    }

    /// Returns the thresholds in record order.
    #[must_use]
    pub fn thresholds(&self) -> Vec<f32> {
        self.series(|record| record.threshold)
    }
}

/// Builds both networks at every threshold and records their counts.
///
/// # Errors
/// Returns [`AnalysisError::ShapeMismatch`] when the matrices differ in size.
///
/// # Examples
/// ```
/// use genenet_core::{CorrelationMatrix, Thresholds, threshold_sweep};
///
/// let genes = vec!["a".to_owned(), "b".to_owned()];
/// let tec = CorrelationMatrix::try_new("TEC", genes.clone(), vec![1.0, 0.8, 0.8, 1.0])?;
/// let rna = CorrelationMatrix::try_new("RNA", genes, vec![1.0, 0.6, 0.6, 1.0])?;
/// let thresholds = Thresholds::try_new("sweep", vec![0.9, 0.7, 0.5])?;
/// let sweep = threshold_sweep(&tec, &rna, &thresholds)?;
/// assert_eq!(sweep.series(|r| r.tec.edges), vec![0, 1, 1]);
/// assert_eq!(sweep.series(|r| r.rna.edges), vec![0, 0, 1]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[instrument(
    name = "core.threshold_sweep",
    err,
    skip(tec, rna, thresholds),
    fields(genes = tec.size(), steps = thresholds.len()),
)]
pub fn threshold_sweep(
    tec: &CorrelationMatrix,
    rna: &CorrelationMatrix,
    thresholds: &Thresholds,
) -> Result<ThresholdSweep> {
    ensure_same_shape(tec, rna)?;
    let records = thresholds
        .as_slice()
        .iter()
        .map(|&threshold| {
            let record = SweepRecord {
                threshold,
                tec: NetworkCounts::of(&Graph::at_threshold(tec, threshold)),
                rna: NetworkCounts::of(&Graph::at_threshold(rna, threshold)),
            };
            debug!(
                threshold,
                tec_edges = record.tec.edges,
                rna_edges = record.rna.edges,
                "sweep step measured"
            );
            record
        })
        .collect();
    Ok(ThresholdSweep { records })
}

pub(crate) fn ensure_same_shape(left: &CorrelationMatrix, right: &CorrelationMatrix) -> Result<()> {
    if left.size() == right.size() {
        return Ok(());
    }
    Err(AnalysisError::ShapeMismatch {
        left_name: left.name().to_owned(),
        left: left.size(),
        right_name: right.name().to_owned(),
        right: right.size(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    #[case::ascending(vec![0.1, 0.2, 0.3])]
    #[case::descending(vec![0.9, 0.85, 0.8])]
    #[case::single(vec![0.75])]
    fn accepts_strict_orders(#[case] values: Vec<f32>) {
        let thresholds = Thresholds::try_new("t", values.clone()).expect("ordered list");
        assert_eq!(thresholds.as_slice(), values.as_slice());
    }

    #[rstest]
    #[case::empty(vec![], "ANALYSIS_EMPTY_THRESHOLDS")]
    #[case::nan(vec![0.9, f32::NAN], "ANALYSIS_NON_FINITE_THRESHOLD")]
    #[case::repeat(vec![0.9, 0.8, 0.8], "ANALYSIS_UNORDERED_THRESHOLDS")]
    #[case::zigzag(vec![0.1, 0.3, 0.2], "ANALYSIS_UNORDERED_THRESHOLDS")]
    fn rejects_invalid_lists(#[case] values: Vec<f32>, #[case] code: &str) {
        let err = Thresholds::try_new("t", values).expect_err("list must be rejected");
        assert_eq!(err.code().as_str(), code);
    }

    #[rstest]
    fn reports_first_break_position() {
        let err = Thresholds::try_new("t", vec![0.9, 0.8, 0.85]).expect_err("zigzag");
        assert!(matches!(
            err,
            AnalysisError::UnorderedThresholds { list: "t", index: 2 }
        ));
    }

    #[rstest]
    fn sweep_rejects_mismatched_shapes() {
        let tec = CorrelationMatrix::try_new("TEC", vec!["a".into()], vec![1.0]).expect("valid");
        let rna = CorrelationMatrix::try_new(
            "RNA",
            vec!["a".into(), "b".into()],
            vec![1.0, 0.0, 0.0, 1.0],
        )
        .expect("valid");
        let thresholds = Thresholds::try_new("t", vec![0.5]).expect("valid");
        let err = threshold_sweep(&tec, &rna, &thresholds).expect_err("shapes differ");
        assert!(matches!(err, AnalysisError::ShapeMismatch { left: 1, right: 2, .. }));
    }
}

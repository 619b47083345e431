//! The analysis stages run by the report pipeline.
//!
//! Each stage returns an explicit [`Result`]; the pipeline turns failures
//! into `null` entries. Figures and tables are written through the
//! [`ReportWriter`], whose failures are logged without discarding the
//! computed result.

use genenet_core::{
    AnalysisConfig, AnalysisError, CorrelationMatrix, Graph, GraphSummary, PowerLawFit,
    PowerLawOutcome, ThresholdSweep, basic_comparison, fit_power_law, threshold_sweep,
};
use genenet_providers_parquet::{CorrelationStore, CorrelationStoreError};
use serde::Serialize;
use thiserror::Error;
use tracing::{info, instrument};

use super::{
    ReportPaths,
    comparison::{FullComparison, GnnComparison},
    external::{ExternalDocument, ExternalResults},
    writer::ReportWriter,
};
use crate::render::{
    ComparisonFigure, DegreeDistributionFigure, FinalSummaryFigure, PowerLawFigure,
    RenderError, RnaComparisonFigure, SupplementalFigure, TissueNetworkFigure,
};

/// Errors that void a single stage's result.
#[derive(Debug, Error)]
pub enum StageError {
    /// The correlation store could not be loaded for this run.
    #[error("correlation store unavailable: {reason}")]
    StoreUnavailable {
        /// Rendered load failure.
        reason: String,
    },
    /// The store loaded but lacked a required table.
    #[error(transparent)]
    Store(#[from] CorrelationStoreError),
    /// A core analysis rejected its input.
    #[error(transparent)]
    Analysis(#[from] AnalysisError),
    /// The stage's only product, a figure, could not be rendered.
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Shared inputs handed to every store-backed stage.
#[derive(Debug, Clone, Copy)]
pub(crate) struct StageInputs<'a> {
    store: Result<&'a CorrelationStore, &'a CorrelationStoreError>,
    config: &'a AnalysisConfig,
}

impl<'a> StageInputs<'a> {
    pub(crate) const fn new(
        store: Result<&'a CorrelationStore, &'a CorrelationStoreError>,
        config: &'a AnalysisConfig,
    ) -> Self {
        Self { store, config }
    }

    fn store(&self) -> Result<&'a CorrelationStore, StageError> {
        self.store.map_err(|err| StageError::StoreUnavailable {
            reason: err.to_string(),
        })
    }

    fn tec(&self) -> Result<&'a CorrelationMatrix, StageError> {
        Ok(self.store()?.tec()?)
    }

    fn matrices(&self) -> Result<(&'a CorrelationMatrix, &'a CorrelationMatrix), StageError> {
        let store = self.store()?;
        Ok((store.tec()?, store.rna()?))
    }
}

/// Edge and connected-node counts of both networks across the tissue sweep.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TissueNetwork {
    /// Thresholds in configured order.
    pub threshold: Vec<f32>,
    /// TEC edge count per threshold.
    pub tec_edges: Vec<usize>,
    /// RNA edge count per threshold.
    pub rna_edges: Vec<usize>,
    /// TEC nodes with at least one edge per threshold.
    pub tec_nodes: Vec<usize>,
    /// RNA nodes with at least one edge per threshold.
    pub rna_nodes: Vec<usize>,
}

impl From<&ThresholdSweep> for TissueNetwork {
    fn from(sweep: &ThresholdSweep) -> Self {
        Self {
            threshold: sweep.thresholds(),
            tec_edges: sweep.series(|record| record.tec.edges),
            rna_edges: sweep.series(|record| record.rna.edges),
            tec_nodes: sweep.series(|record| record.tec.connected_nodes),
            rna_nodes: sweep.series(|record| record.rna.connected_nodes),
        }
    }
}

/// Side-by-side structure of both networks at the network threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RnaComparison {
    /// TEC network properties.
    pub tec: GraphSummary,
    /// RNA network properties.
    pub rna: GraphSummary,
}

/// Finer-grained sweep plus the RNA degree breakdown at the network threshold.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SupplementalAnalysis {
    /// Thresholds in configured order.
    pub thresholds: Vec<f32>,
    /// TEC component count per threshold.
    pub tec_connected_components: Vec<usize>,
    /// RNA component count per threshold.
    pub rna_connected_components: Vec<usize>,
    /// TEC nodes with at least one edge per threshold.
    pub tec_connected_nodes: Vec<usize>,
    /// RNA nodes with at least one edge per threshold.
    pub rna_connected_nodes: Vec<usize>,
    /// TEC nodes without edges per threshold.
    pub tec_isolated_nodes: Vec<usize>,
    /// RNA nodes without edges per threshold.
    pub rna_isolated_nodes: Vec<usize>,
    /// TEC edge count per threshold.
    pub tec_edges: Vec<usize>,
    /// RNA edge count per threshold.
    pub rna_edges: Vec<usize>,
    /// Threshold at which the degree breakdown was taken.
    pub network_threshold: f32,
    /// Largest RNA degree at the network threshold.
    pub max_degree_rna: usize,
    /// Whether both tables list the same genes in the same order.
    pub genes_match: bool,
    /// Number of genes in the TEC table.
    pub total_genes: usize,
    /// RNA degree of every gene at the network threshold.
    #[serde(skip)]
    pub rna_degrees: Vec<usize>,
}

impl SupplementalAnalysis {
    /// Returns how many RNA genes have each degree in `0..=max_degree_rna`.
    #[must_use]
    pub fn rna_degree_counts(&self) -> Vec<usize> {
        let mut counts = vec![0; self.max_degree_rna + 1];
        for &degree in &self.rna_degrees {
            if let Some(count) = counts.get_mut(degree) {
                *count += 1;
            }
        }
        counts
    }
}

#[instrument(name = "report.tissue_network", err, skip_all)]
pub(crate) fn tissue_network(
    inputs: &StageInputs<'_>,
    writer: &mut ReportWriter,
) -> Result<TissueNetwork, StageError> {
    let (tec, rna) = inputs.matrices()?;
    info!(tec_genes = tec.size(), rna_genes = rna.size(), "correlation tables loaded");
    let sweep = threshold_sweep(tec, rna, inputs.config.sweep_thresholds())?;
    let result = TissueNetwork::from(&sweep);
    writer.figure_or_warn(&TissueNetworkFigure(&result));
    info!(steps = result.threshold.len(), "tissue network analysis completed");
    Ok(result)
}

#[instrument(
    name = "report.rna_comparison",
    err,
    skip_all,
    fields(threshold = inputs.config.network_threshold()),
)]
pub(crate) fn rna_comparison(
    inputs: &StageInputs<'_>,
    writer: &mut ReportWriter,
) -> Result<RnaComparison, StageError> {
    let (tec, rna) = inputs.matrices()?;
    let threshold = inputs.config.network_threshold();
    let result = RnaComparison {
        tec: Graph::at_threshold(tec, threshold).summary(),
        rna: Graph::at_threshold(rna, threshold).summary(),
    };
    writer.figure_or_warn(&RnaComparisonFigure(&result));
    info!(
        tec_edges = result.tec.edges,
        rna_edges = result.rna.edges,
        "RNA comparison completed"
    );
    Ok(result)
}

/// Fits the TEC degree distribution; `Ok(None)` when too few degrees exist.
#[instrument(
    name = "report.powerlaw_analysis",
    err,
    skip_all,
    fields(threshold = inputs.config.network_threshold()),
)]
pub(crate) fn powerlaw_analysis(
    inputs: &StageInputs<'_>,
    writer: &mut ReportWriter,
) -> Result<Option<PowerLawFit>, StageError> {
    let graph = Graph::at_threshold(inputs.tec()?, inputs.config.network_threshold());
    match fit_power_law(&graph.degrees()) {
        PowerLawOutcome::Fitted(fit) => {
            writer.figure_or_warn(&PowerLawFigure(&fit));
            info!(alpha = fit.alpha, r_squared = fit.r_squared, "power law fitted");
            Ok(Some(fit))
        }
        PowerLawOutcome::InsufficientData { distinct_degrees } => {
            info!(distinct_degrees, "insufficient data for a power law fit");
            Ok(None)
        }
    }
}

#[instrument(name = "report.supplemental_analysis", err, skip_all)]
pub(crate) fn supplemental_analysis(
    inputs: &StageInputs<'_>,
    writer: &mut ReportWriter,
) -> Result<SupplementalAnalysis, StageError> {
    let (tec, rna) = inputs.matrices()?;
    let genes_match = tec.same_genes(rna);
    info!(genes_match, "gene lists compared");

    let sweep = threshold_sweep(tec, rna, inputs.config.supplemental_thresholds())?;
    let network_threshold = inputs.config.network_threshold();
    let rna_degrees = Graph::at_threshold(rna, network_threshold).degrees();
    let result = SupplementalAnalysis {
        thresholds: sweep.thresholds(),
        tec_connected_components: sweep.series(|record| record.tec.components),
        rna_connected_components: sweep.series(|record| record.rna.components),
        tec_connected_nodes: sweep.series(|record| record.tec.connected_nodes),
        rna_connected_nodes: sweep.series(|record| record.rna.connected_nodes),
        tec_isolated_nodes: sweep.series(|record| record.tec.isolated_nodes),
        rna_isolated_nodes: sweep.series(|record| record.rna.isolated_nodes),
        tec_edges: sweep.series(|record| record.tec.edges),
        rna_edges: sweep.series(|record| record.rna.edges),
        network_threshold,
        max_degree_rna: rna_degrees.iter().copied().max().unwrap_or(0),
        genes_match,
        total_genes: tec.size(),
        rna_degrees,
    };

    let marker = inputs
        .config
        .supplemental_thresholds()
        .position(network_threshold);
    writer.figure_or_warn(&SupplementalFigure {
        analysis: &result,
        network_threshold_index: marker,
    });
    writer.figure_or_warn(&DegreeDistributionFigure(&result));
    info!(
        steps = result.thresholds.len(),
        max_degree_rna = result.max_degree_rna,
        "supplemental analysis completed"
    );
    Ok(result)
}

/// Compares against external pipeline results, falling back to the basic
/// traditional-only comparison when they are incomplete.
#[instrument(name = "report.gnn_comparison", err, skip_all)]
pub(crate) fn gnn_comparison(
    inputs: &StageInputs<'_>,
    paths: &ReportPaths,
    writer: &mut ReportWriter,
) -> Result<GnnComparison, StageError> {
    let external = ExternalResults::load(&paths.gnn_results, &paths.comparison_results);
    match external.metrics() {
        Ok((gnn, traditional)) => {
            let full = FullComparison::new(&external, gnn, traditional);
            writer.figure_or_warn(&ComparisonFigure { gnn, traditional });
            writer.comparison_table_or_warn(&full.comparison_summary);
            info!(
                gnn_time = gnn.time_seconds,
                traditional_time = traditional.time_seconds,
                "GNN vs traditional comparison completed"
            );
            Ok(GnnComparison::Full(full))
        }
        Err(reason) => {
            info!(%reason, "external results incomplete; running basic comparison");
            let config = inputs.config;
            let basic = basic_comparison(
                inputs.tec()?,
                config.network_threshold(),
                config.max_clusters(),
                config.seed(),
            )?;
            Ok(GnnComparison::Basic(basic))
        }
    }
}

/// Draws the cross-cutting summary from the comparison document on disk and
/// this run's tissue sweep and power-law fit.
#[instrument(name = "report.final_summary", err, skip_all)]
pub(crate) fn final_summary(
    paths: &ReportPaths,
    tissue: Option<&TissueNetwork>,
    powerlaw: Option<&PowerLawFit>,
    writer: &mut ReportWriter,
) -> Result<(), StageError> {
    let comparison = ExternalDocument::load(&paths.comparison_results)
        .and_then(|document| ExternalResults::from_comparison(&document).metrics().ok());
    writer.figure(&FinalSummaryFigure {
        comparison,
        tissue,
        powerlaw,
    })?;
    info!(
        comparison = comparison.is_some(),
        tissue = tissue.is_some(),
        powerlaw = powerlaw.is_some(),
        "final summary created"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    fn supplemental(rna_degrees: Vec<usize>) -> SupplementalAnalysis {
        SupplementalAnalysis {
            thresholds: vec![0.9],
            tec_connected_components: vec![1],
            rna_connected_components: vec![1],
            tec_connected_nodes: vec![0],
            rna_connected_nodes: vec![0],
            tec_isolated_nodes: vec![1],
            rna_isolated_nodes: vec![1],
            tec_edges: vec![0],
            rna_edges: vec![0],
            network_threshold: 0.75,
            max_degree_rna: rna_degrees.iter().copied().max().unwrap_or(0),
            genes_match: true,
            total_genes: rna_degrees.len(),
            rna_degrees,
        }
    }

    #[rstest]
    #[case(vec![], vec![0])]
    #[case(vec![0, 0, 0], vec![3])]
    #[case(vec![2, 1, 1, 0, 2, 2], vec![1, 2, 3])]
    fn degree_counts_cover_every_degree(#[case] degrees: Vec<usize>, #[case] expected: Vec<usize>) {
        assert_eq!(supplemental(degrees).rna_degree_counts(), expected);
    }

    #[rstest]
    fn degrees_are_not_serialised() {
        let value = serde_json::to_value(supplemental(vec![1, 1])).expect("serialise");
        assert!(value.get("rna_degrees").is_none());
        assert_eq!(value["max_degree_rna"], 1);
    }

    #[rstest]
    fn missing_store_reports_reason() {
        let error = CorrelationStoreError::TableNotFound {
            table: "TEC".to_owned(),
        };
        let config = AnalysisConfig::builder().build().expect("defaults are valid");
        let inputs = StageInputs::new(Err(&error), &config);
        let err = inputs.tec().expect_err("store is unavailable");
        match err {
            StageError::StoreUnavailable { reason } => assert!(reason.contains("TEC")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}

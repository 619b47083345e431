//! Report pipeline: runs every analysis stage in order and writes the
//! figures, the comparison table and the aggregated results document.
//!
//! The correlation store is loaded once up front. A stage that fails is
//! logged and recorded as `null`; only failing to create the output
//! directory or to write the aggregated document aborts the run.

mod comparison;
mod digest;
mod external;
mod stages;
mod writer;

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use genenet_core::{AnalysisConfig, PowerLawFit};
use genenet_providers_parquet::CorrelationStore;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, instrument, warn};

pub use self::{
    comparison::{ComparisonRow, ComparisonSummary, FullComparison, GnnComparison},
    digest::render_digest,
    external::{
        ExternalDocument, ExternalResultError, ExternalResults, GNN_SECTION, IncompleteResults,
        MetricSection, MetricsError, Pipeline, PipelineMetrics, TRADITIONAL_SECTION,
    },
    stages::{RnaComparison, StageError, SupplementalAnalysis, TissueNetwork},
    writer::{COMPARISON_TABLE_FILE, OutputError, RESULTS_FILE},
};
use self::{stages::StageInputs, writer::ReportWriter};
use crate::render::FigureFormat;

/// Default location of the correlation store.
pub const DEFAULT_STORE_PATH: &str = "./data/gene_network_data.parquet";
/// Default output directory.
pub const DEFAULT_OUTPUT_DIR: &str = "analysis_results";
/// Default location of the GNN-only results document.
pub const DEFAULT_GNN_RESULTS_PATH: &str = "gnn_only_results.json";
/// Default location of the GNN-vs-traditional comparison document.
pub const DEFAULT_COMPARISON_RESULTS_PATH: &str = "gnn_vs_traditional_comparison.json";

/// Input and output locations of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPaths {
    /// Parquet correlation store.
    pub store: PathBuf,
    /// Directory receiving every artefact.
    pub output_dir: PathBuf,
    /// Optional GNN-only results document.
    pub gnn_results: PathBuf,
    /// Optional GNN-vs-traditional comparison document.
    pub comparison_results: PathBuf,
}

impl Default for ReportPaths {
    fn default() -> Self {
        Self {
            store: PathBuf::from(DEFAULT_STORE_PATH),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            gnn_results: PathBuf::from(DEFAULT_GNN_RESULTS_PATH),
            comparison_results: PathBuf::from(DEFAULT_COMPARISON_RESULTS_PATH),
        }
    }
}

/// Everything a run needs.
#[derive(Debug, Clone)]
pub struct ReportRequest {
    /// Input and output locations.
    pub paths: ReportPaths,
    /// Validated analysis parameters.
    pub config: AnalysisConfig,
    /// Output format of the figures.
    pub figure_format: FigureFormat,
}

/// Status of the final summary figure.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub enum FinalSummaryStatus {
    /// The figure was written.
    #[serde(rename = "Created successfully")]
    Created,
    /// The figure could not be written.
    #[serde(rename = "Failed")]
    Failed,
}

/// Aggregated per-stage results; every key is always present.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComprehensiveResults {
    /// Tissue sweep, `null` when the stage failed.
    pub tissue_network: Option<TissueNetwork>,
    /// Network comparison at the network threshold.
    pub rna_comparison: Option<RnaComparison>,
    /// Power-law fit, `null` on failure or insufficient data.
    pub powerlaw_analysis: Option<PowerLawFit>,
    /// Supplemental sweep and degree breakdown.
    pub supplemental_analysis: Option<SupplementalAnalysis>,
    /// Full or basic GNN-vs-traditional comparison.
    pub gnn_comparison: Option<GnnComparison>,
    /// Whether the final summary figure was written.
    pub final_summary: FinalSummaryStatus,
}

/// Results of a completed run and the artefacts it wrote.
#[derive(Debug, Clone)]
pub struct ReportOutcome {
    /// Aggregated results, as written to [`RESULTS_FILE`].
    pub results: ComprehensiveResults,
    /// Directory holding the artefacts.
    pub output_dir: PathBuf,
    /// Paths of every artefact written, in creation order.
    pub artefacts: Vec<PathBuf>,
}

/// Errors that abort a run.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The output directory could not be created.
    #[error("failed to create output directory `{path}`: {source}")]
    OutputDir {
        /// Requested directory.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// The aggregated results document could not be written.
    #[error(transparent)]
    Output(#[from] OutputError),
}

/// Runs every stage and writes the report.
///
/// # Errors
/// Returns [`ReportError`] when the output directory cannot be created or
/// the aggregated results cannot be written. Stage failures are not errors.
///
/// # Examples
/// ```no_run
/// use genenet_cli::{
///     render::FigureFormat,
///     report::{ReportPaths, ReportRequest, run_report},
/// };
/// use genenet_core::AnalysisConfig;
///
/// let request = ReportRequest {
///     paths: ReportPaths::default(),
///     config: AnalysisConfig::builder().build()?,
///     figure_format: FigureFormat::default(),
/// };
/// let outcome = run_report(&request)?;
/// println!("{} artefacts written", outcome.artefacts.len());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[instrument(
    name = "report.run",
    err,
    skip(request),
    fields(
        store = %request.paths.store.display(),
        output_dir = %request.paths.output_dir.display(),
        format = %request.figure_format,
    ),
)]
pub fn run_report(request: &ReportRequest) -> Result<ReportOutcome, ReportError> {
    let ReportRequest {
        paths,
        config,
        figure_format,
    } = request;
    create_output_dir(&paths.output_dir)?;
    let mut writer = ReportWriter::new(&paths.output_dir, *figure_format);

    let store = CorrelationStore::try_from_parquet_path(&paths.store);
    if let Err(err) = &store {
        warn!(
            path = %paths.store.display(),
            error = %err,
            "correlation store unavailable; store-backed stages will be skipped"
        );
    }
    let inputs = StageInputs::new(store.as_ref(), config);

    let tissue_network = settle("tissue_network", stages::tissue_network(&inputs, &mut writer));
    let rna_comparison = settle("rna_comparison", stages::rna_comparison(&inputs, &mut writer));
    let powerlaw_analysis = settle(
        "powerlaw_analysis",
        stages::powerlaw_analysis(&inputs, &mut writer),
    )
    .flatten();
    let supplemental_analysis = settle(
        "supplemental_analysis",
        stages::supplemental_analysis(&inputs, &mut writer),
    );
    let gnn_comparison = settle(
        "gnn_comparison",
        stages::gnn_comparison(&inputs, paths, &mut writer),
    );
    let final_summary = match stages::final_summary(
        paths,
        tissue_network.as_ref(),
        powerlaw_analysis.as_ref(),
        &mut writer,
    ) {
        Ok(()) => FinalSummaryStatus::Created,
        Err(err) => {
            warn!(stage = "final_summary", error = %err, "stage failed");
            FinalSummaryStatus::Failed
        }
    };

    let results = ComprehensiveResults {
        tissue_network,
        rna_comparison,
        powerlaw_analysis,
        supplemental_analysis,
        gnn_comparison,
        final_summary,
    };
    writer.results(&results)?;
    let artefacts = writer.into_artefacts();
    info!(artefacts = artefacts.len(), "report written");
    Ok(ReportOutcome {
        results,
        output_dir: paths.output_dir.clone(),
        artefacts,
    })
}

fn create_output_dir(path: &Path) -> Result<(), ReportError> {
    fs::create_dir_all(path).map_err(|source| ReportError::OutputDir {
        path: path.to_path_buf(),
        source,
    })
}

fn settle<T>(stage: &'static str, result: Result<T, StageError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(stage, error = %err, "stage failed; recording null");
            None
        }
    }
}

//! Command implementations and argument parsing for the genenet CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use genenet_core::{
    AnalysisConfig, AnalysisError, DEFAULT_MAX_CLUSTERS, DEFAULT_NETWORK_THRESHOLD, DEFAULT_SEED,
};
use thiserror::Error;
use tracing::{Span, field, info, instrument};

use crate::{
    render::FigureFormat,
    report::{
        DEFAULT_COMPARISON_RESULTS_PATH, DEFAULT_GNN_RESULTS_PATH, DEFAULT_OUTPUT_DIR,
        DEFAULT_STORE_PATH, ReportError, ReportOutcome, ReportPaths, ReportRequest, run_report,
    },
};

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(
    name = "genenet",
    about = "Generate TEC/RNA gene-correlation network reports."
)]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Run every analysis stage and write the report.
    Run(RunCommand),
}

/// Options accepted by the `run` command.
#[derive(Debug, Args, Clone)]
pub struct RunCommand {
    /// Parquet correlation store holding the `TEC` and `RNA` tables.
    #[arg(long, default_value = DEFAULT_STORE_PATH)]
    pub store: PathBuf,

    /// Directory receiving figures, tables and the results document.
    #[arg(long = "output-dir", default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// Optional GNN-only results document.
    #[arg(long = "gnn-results", default_value = DEFAULT_GNN_RESULTS_PATH)]
    pub gnn_results: PathBuf,

    /// Optional GNN-vs-traditional comparison document.
    #[arg(long = "comparison-results", default_value = DEFAULT_COMPARISON_RESULTS_PATH)]
    pub comparison_results: PathBuf,

    /// Threshold used for single-network analyses.
    #[arg(long = "network-threshold", default_value_t = DEFAULT_NETWORK_THRESHOLD)]
    pub network_threshold: f32,

    /// Comma-separated tissue sweep thresholds.
    #[arg(long = "sweep-thresholds", value_delimiter = ',')]
    pub sweep_thresholds: Option<Vec<f32>>,

    /// Comma-separated supplemental sweep thresholds.
    #[arg(long = "supplemental-thresholds", value_delimiter = ',')]
    pub supplemental_thresholds: Option<Vec<f32>>,

    /// Seed for the k-means baseline.
    #[arg(long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Largest cluster count tried by the baseline.
    #[arg(long = "max-clusters", default_value_t = DEFAULT_MAX_CLUSTERS)]
    pub max_clusters: usize,

    /// Output format of the figures; PNG unless built without `png`.
    #[arg(long = "figure-format", value_enum, default_value_t = FigureFormat::default())]
    pub figure_format: FigureFormat,
}

impl RunCommand {
    /// Validates the analysis parameters.
    ///
    /// # Errors
    /// Returns [`AnalysisError`] when a threshold list or scalar is invalid.
    pub fn config(&self) -> Result<AnalysisConfig, AnalysisError> {
        let mut builder = AnalysisConfig::builder()
            .with_network_threshold(self.network_threshold)
            .with_seed(self.seed)
            .with_max_clusters(self.max_clusters);
        if let Some(thresholds) = &self.sweep_thresholds {
            builder = builder.with_sweep_thresholds(thresholds.clone());
        }
        if let Some(thresholds) = &self.supplemental_thresholds {
            builder = builder.with_supplemental_thresholds(thresholds.clone());
        }
        builder.build()
    }

    fn paths(&self) -> ReportPaths {
        ReportPaths {
            store: self.store.clone(),
            output_dir: self.output_dir.clone(),
            gnn_results: self.gnn_results.clone(),
            comparison_results: self.comparison_results.clone(),
        }
    }
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// The analysis parameters were rejected.
    #[error(transparent)]
    Config(#[from] AnalysisError),
    /// The report could not be written.
    #[error(transparent)]
    Report(#[from] ReportError),
}

/// Executes the CLI command represented by `cli`.
///
/// # Errors
/// Returns [`CliError`] when the parameters are invalid or the report
/// cannot be written.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use clap::Parser;
/// # use genenet_cli::cli::{Cli, Command, run_cli};
/// # use tempfile::TempDir;
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let dir = TempDir::new()?;
/// let mut cli = Cli::try_parse_from(["genenet", "run"])?;
/// let Command::Run(run) = &mut cli.command;
/// run.store = dir.path().join("missing.parquet");
/// run.output_dir = dir.path().join("out");
/// run.gnn_results = dir.path().join("gnn.json");
/// run.comparison_results = dir.path().join("comparison.json");
/// let output = run.output_dir.clone();
/// let outcome = run_cli(cli)?;
/// assert!(outcome.results.tissue_network.is_none());
/// assert!(output.join("comprehensive_experiments_results.json").exists());
/// # Ok(())
/// # }
/// ```
#[instrument(
    name = "cli.run",
    err,
    skip(cli),
    fields(command = field::Empty),
)]
pub fn run_cli(cli: Cli) -> Result<ReportOutcome, CliError> {
    match cli.command {
        Command::Run(run) => {
            Span::current().record("command", field::display("run"));
            run_command(&run)
        }
    }
}

#[instrument(
    name = "cli.execute",
    err,
    skip(command),
    fields(network_threshold = command.network_threshold, format = %command.figure_format),
)]
pub(super) fn run_command(command: &RunCommand) -> Result<ReportOutcome, CliError> {
    let request = ReportRequest {
        paths: command.paths(),
        config: command.config()?,
        figure_format: command.figure_format,
    };
    let outcome = run_report(&request)?;
    info!(
        output_dir = %outcome.output_dir.display(),
        artefacts = outcome.artefacts.len(),
        "command completed"
    );
    Ok(outcome)
}

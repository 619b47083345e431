//! Writes report artefacts into the output directory.

use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use thiserror::Error;
use tracing::{debug, warn};

use super::{ComprehensiveResults, comparison::ComparisonSummary};
use crate::render::{Figure, FigureFormat, RenderError, render_figure};

/// File name of the aggregated results document.
pub const RESULTS_FILE: &str = "comprehensive_experiments_results.json";
/// File name of the GNN-vs-traditional comparison table.
pub const COMPARISON_TABLE_FILE: &str = "gnn_traditional_comparison_table.csv";

/// Errors raised while writing tabular or JSON artefacts.
#[derive(Debug, Error)]
pub enum OutputError {
    /// Creating or flushing an output file failed.
    #[error("failed to write `{path}`: {source}")]
    Io {
        /// Path of the artefact.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// Serialising the aggregated results failed.
    #[error("failed to serialise `{path}`: {source}")]
    Json {
        /// Path of the artefact.
        path: PathBuf,
        /// Underlying serialisation error.
        #[source]
        source: serde_json::Error,
    },
    /// Writing the comparison table failed.
    #[error("failed to write table `{path}`: {source}")]
    Csv {
        /// Path of the artefact.
        path: PathBuf,
        /// Underlying CSV error.
        #[source]
        source: csv::Error,
    },
}

/// Output directory plus the artefacts written into it so far.
#[derive(Debug)]
pub(crate) struct ReportWriter {
    output_dir: PathBuf,
    format: FigureFormat,
    artefacts: Vec<PathBuf>,
}

impl ReportWriter {
    pub(crate) fn new(output_dir: &Path, format: FigureFormat) -> Self {
        Self {
            output_dir: output_dir.to_path_buf(),
            format,
            artefacts: Vec::new(),
        }
    }

    /// Renders `figure`, recording its path on success.
    pub(crate) fn figure<F: Figure>(&mut self, figure: &F) -> Result<(), RenderError> {
        let path = render_figure(figure, &self.output_dir, self.format)?;
        debug!(path = %path.display(), "figure written");
        self.artefacts.push(path);
        Ok(())
    }

    /// Renders `figure`, logging failures instead of returning them.
    pub(crate) fn figure_or_warn<F: Figure>(&mut self, figure: &F) {
        if let Err(err) = self.figure(figure) {
            warn!(figure = F::STEM, error = %err, "figure rendering failed");
        }
    }

    /// Writes the comparison table as CSV with a header row.
    pub(crate) fn comparison_table(&mut self, summary: &ComparisonSummary) -> Result<(), OutputError> {
        let path = self.output_dir.join(COMPARISON_TABLE_FILE);
        let csv_error = |source| OutputError::Csv {
            path: path.clone(),
            source,
        };
        let mut table = csv::Writer::from_path(&path).map_err(csv_error)?;
        for row in &summary.rows {
            table.serialize(row).map_err(csv_error)?;
        }
        table.flush().map_err(|source| OutputError::Io {
            path: path.clone(),
            source,
        })?;
        self.artefacts.push(path);
        Ok(())
    }

    /// Writes the comparison table, logging failures instead of returning them.
    pub(crate) fn comparison_table_or_warn(&mut self, summary: &ComparisonSummary) {
        if let Err(err) = self.comparison_table(summary) {
            warn!(error = %err, "comparison table could not be written");
        }
    }

    /// Writes the aggregated results as pretty-printed JSON.
    pub(crate) fn results(&mut self, results: &ComprehensiveResults) -> Result<(), OutputError> {
        let path = self.output_dir.join(RESULTS_FILE);
        let io_error = |source| OutputError::Io {
            path: path.clone(),
            source,
        };
        let mut out = BufWriter::new(File::create(&path).map_err(io_error)?);
        serde_json::to_writer_pretty(&mut out, results).map_err(|source| OutputError::Json {
            path: path.clone(),
            source,
        })?;
        out.write_all(b"\n").map_err(io_error)?;
        out.flush().map_err(io_error)?;
        self.artefacts.push(path);
        Ok(())
    }

    pub(crate) fn into_artefacts(self) -> Vec<PathBuf> {
        self.artefacts
    }
}

//! External pipeline results read from previously written JSON documents.
//!
//! The GNN section comes from the GNN-only document when it carries one and
//! from the comparison document otherwise; the traditional section always
//! comes from the comparison document. Sections stay opaque maps so they
//! round-trip into the report unchanged. [`PipelineMetrics`] is the typed
//! view, available only when every required key is present.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Document section holding GNN pipeline metrics.
pub const GNN_SECTION: &str = "gnn_results";
/// Document section holding traditional pipeline metrics.
pub const TRADITIONAL_SECTION: &str = "traditional_results";

/// Opaque mapping of named metrics for one pipeline.
pub type MetricSection = Map<String, Value>;

/// Errors raised while reading an external results document.
#[derive(Debug, Error)]
pub enum ExternalResultError {
    /// The file exists but could not be read.
    #[error("failed to read `{path}`: {source}")]
    Io {
        /// Path of the document.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// The file is not valid JSON.
    #[error("`{path}` is not valid JSON: {source}")]
    Json {
        /// Path of the document.
        path: PathBuf,
        /// Underlying parse failure.
        #[source]
        source: serde_json::Error,
    },
    /// The top-level JSON value is not an object.
    #[error("`{path}` must hold a JSON object at the top level")]
    NotAnObject {
        /// Path of the document.
        path: PathBuf,
    },
}

/// Parsed top-level object of an external results document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExternalDocument {
    root: Map<String, Value>,
}

impl ExternalDocument {
    /// Reads the document at `path`; a missing file yields `Ok(None)`.
    ///
    /// # Errors
    /// Returns [`ExternalResultError`] when the file cannot be read, is not
    /// JSON, or does not hold an object.
    pub fn read(path: &Path) -> Result<Option<Self>, ExternalResultError> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(ExternalResultError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        Self::parse(&raw, path).map(Some)
    }

    fn parse(raw: &str, path: &Path) -> Result<Self, ExternalResultError> {
        let value = serde_json::from_str(raw).map_err(|source| ExternalResultError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        match value {
            Value::Object(root) => Ok(Self { root }),
            _ => Err(ExternalResultError::NotAnObject {
                path: path.to_path_buf(),
            }),
        }
    }

    /// Reads the document, treating unreadable or malformed files as absent.
    #[must_use]
    pub fn load(path: &Path) -> Option<Self> {
        match Self::read(path) {
            Ok(Some(document)) => {
                debug!(path = %path.display(), "external results loaded");
                Some(document)
            }
            Ok(None) => {
                info!(path = %path.display(), "external results not found");
                None
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "ignoring unreadable external results");
                None
            }
        }
    }

    /// Returns the object stored under `name`. An empty object counts as
    /// absent.
    #[must_use]
    pub fn section(&self, name: &str) -> Option<&MetricSection> {
        self.root
            .get(name)
            .and_then(Value::as_object)
            .filter(|section| !section.is_empty())
    }
}

/// Pipelines whose summaries can be compared.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Pipeline {
    /// Graph neural network pipeline.
    Gnn,
    /// Traditional network analysis pipeline.
    Traditional,
}

impl Pipeline {
    /// Label used in tables and figures.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Gnn => "GNN",
            Self::Traditional => "Traditional",
        }
    }

    /// Keys the pipeline's section must carry, in [`PipelineMetrics`] field order.
    #[must_use]
    pub const fn required_keys(self) -> [&'static str; 5] {
        match self {
            Self::Gnn => [
                "training_time",
                "silhouette_score",
                "optimal_clusters",
                "high_confidence_predictions",
                "mean_similarity",
            ],
            Self::Traditional => [
                "processing_time",
                "silhouette_score",
                "num_components",
                "high_confidence_predictions",
                "mean_similarity",
            ],
        }
    }
}

/// A section lacked a required key or held a value of the wrong kind.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum MetricsError {
    /// A required key was absent.
    #[error("missing key `{key}`")]
    MissingKey {
        /// The absent key.
        key: &'static str,
    },
    /// A required key held a value of the wrong kind.
    #[error("key `{key}` must be a {expected}")]
    InvalidValue {
        /// The offending key.
        key: &'static str,
        /// Kind of value expected.
        expected: &'static str,
    },
}

/// Typed view over the metrics every pipeline summary carries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PipelineMetrics {
    /// Training time (GNN) or processing time (traditional) in seconds.
    pub time_seconds: f64,
    /// Silhouette score of the pipeline's clustering.
    pub silhouette_score: f64,
    /// Optimal clusters (GNN) or connected components (traditional).
    pub clusters: u64,
    /// Number of high-confidence link predictions.
    pub high_confidence_predictions: u64,
    /// Mean pairwise similarity.
    pub mean_similarity: f64,
}

impl PipelineMetrics {
    /// Extracts the typed view from `section`.
    ///
    /// # Errors
    /// Returns [`MetricsError`] naming the first missing or mistyped key.
    pub fn from_section(pipeline: Pipeline, section: &MetricSection) -> Result<Self, MetricsError> {
        let [time, silhouette, clusters, predictions, similarity] = pipeline.required_keys();
        Ok(Self {
            time_seconds: number(section, time)?,
            silhouette_score: number(section, silhouette)?,
            clusters: count(section, clusters)?,
            high_confidence_predictions: count(section, predictions)?,
            mean_similarity: number(section, similarity)?,
        })
    }
}

fn field<'a>(section: &'a MetricSection, key: &'static str) -> Result<&'a Value, MetricsError> {
    section.get(key).ok_or(MetricsError::MissingKey { key })
}

fn number(section: &MetricSection, key: &'static str) -> Result<f64, MetricsError> {
    field(section, key)?
        .as_f64()
        .ok_or(MetricsError::InvalidValue {
            key,
            expected: "number",
        })
}

fn count(section: &MetricSection, key: &'static str) -> Result<u64, MetricsError> {
    field(section, key)?
        .as_u64()
        .ok_or(MetricsError::InvalidValue {
            key,
            expected: "non-negative integer",
        })
}

/// Why the full comparison cannot run.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum IncompleteResults {
    /// No document supplied the pipeline's section.
    #[error("no {} results available", .pipeline.label())]
    MissingSection {
        /// Pipeline lacking a section.
        pipeline: Pipeline,
    },
    /// The pipeline's section lacked a usable required key.
    #[error("{} results are incomplete: {source}", .pipeline.label())]
    InvalidSection {
        /// Pipeline whose section is incomplete.
        pipeline: Pipeline,
        /// The first offending key.
        #[source]
        source: MetricsError,
    },
}

/// Sections selected from the external documents.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExternalResults {
    /// GNN pipeline section.
    pub gnn: Option<MetricSection>,
    /// Traditional pipeline section.
    pub traditional: Option<MetricSection>,
}

impl ExternalResults {
    /// Applies the merge policy to already loaded documents.
    #[must_use]
    pub fn merge(gnn_only: Option<&ExternalDocument>, comparison: Option<&ExternalDocument>) -> Self {
        let gnn = gnn_only
            .and_then(|document| document.section(GNN_SECTION))
            .or_else(|| comparison.and_then(|document| document.section(GNN_SECTION)))
            .cloned();
        let traditional = comparison
            .and_then(|document| document.section(TRADITIONAL_SECTION))
            .cloned();
        Self { gnn, traditional }
    }

    /// Takes both sections from a single comparison document.
    #[must_use]
    pub fn from_comparison(comparison: &ExternalDocument) -> Self {
        Self::merge(None, Some(comparison))
    }

    /// Loads both documents, treating missing or malformed files as absent,
    /// and applies the merge policy.
    #[must_use]
    pub fn load(gnn_only: &Path, comparison: &Path) -> Self {
        let gnn_only = ExternalDocument::load(gnn_only);
        let comparison = ExternalDocument::load(comparison);
        Self::merge(gnn_only.as_ref(), comparison.as_ref())
    }

    /// Returns the typed GNN and traditional metrics.
    ///
    /// # Errors
    /// Returns [`IncompleteResults`] when either section is absent or lacks a
    /// required key.
    pub fn metrics(&self) -> Result<(PipelineMetrics, PipelineMetrics), IncompleteResults> {
        let gnn = typed(Pipeline::Gnn, self.gnn.as_ref())?;
        let traditional = typed(Pipeline::Traditional, self.traditional.as_ref())?;
        Ok((gnn, traditional))
    }
}

fn typed(
    pipeline: Pipeline,
    section: Option<&MetricSection>,
) -> Result<PipelineMetrics, IncompleteResults> {
    let section = section.ok_or(IncompleteResults::MissingSection { pipeline })?;
    PipelineMetrics::from_section(pipeline, section)
        .map_err(|source| IncompleteResults::InvalidSection { pipeline, source })
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;
    use serde_json::json;

    fn document(value: &Value) -> ExternalDocument {
        ExternalDocument::parse(&value.to_string(), Path::new("doc.json")).expect("object")
    }

    fn gnn_section(training_time: f64) -> Value {
        json!({
            "training_time": training_time,
            "silhouette_score": 0.41,
            "optimal_clusters": 8,
            "high_confidence_predictions": 15000,
            "mean_similarity": 0.62,
        })
    }

    fn traditional_section() -> Value {
        json!({
            "processing_time": 3.5,
            "silhouette_score": 0.2,
            "num_components": 40,
            "high_confidence_predictions": 900,
            "mean_similarity": 0.3,
        })
    }

    #[rstest]
    fn gnn_only_document_takes_precedence() {
        let gnn_only = document(&json!({ "gnn_results": gnn_section(100.0) }));
        let comparison = document(&json!({
            "gnn_results": gnn_section(7.0),
            "traditional_results": traditional_section(),
        }));
        let merged = ExternalResults::merge(Some(&gnn_only), Some(&comparison));
        let (gnn, traditional) = merged.metrics().expect("complete");
        assert_eq!(gnn.time_seconds, 100.0);
        assert_eq!(traditional.clusters, 40);
    }

    #[rstest]
    fn comparison_document_supplies_missing_gnn_section() {
        let gnn_only = document(&json!({ "other": 1 }));
        let comparison = document(&json!({
            "gnn_results": gnn_section(7.0),
            "traditional_results": traditional_section(),
        }));
        let merged = ExternalResults::merge(Some(&gnn_only), Some(&comparison));
        assert_eq!(merged.metrics().expect("complete").0.time_seconds, 7.0);
    }

    #[rstest]
    fn empty_gnn_section_defers_to_comparison_document() {
        let gnn_only = document(&json!({ "gnn_results": {} }));
        let comparison = document(&json!({
            "gnn_results": gnn_section(7.0),
            "traditional_results": traditional_section(),
        }));
        let merged = ExternalResults::merge(Some(&gnn_only), Some(&comparison));
        let (gnn, traditional) = merged.metrics().expect("complete");
        assert_eq!(gnn.time_seconds, 7.0);
        assert_eq!(traditional.clusters, 40);
    }

    #[rstest]
    fn empty_traditional_section_is_missing() {
        let comparison = document(&json!({
            "gnn_results": gnn_section(7.0),
            "traditional_results": {},
        }));
        let merged = ExternalResults::from_comparison(&comparison);
        assert_eq!(merged.traditional, None);
        assert!(matches!(
            merged.metrics(),
            Err(IncompleteResults::MissingSection {
                pipeline: Pipeline::Traditional
            })
        ));
    }

    #[rstest]
    fn traditional_section_only_comes_from_comparison_document() {
        let gnn_only = document(&json!({
            "gnn_results": gnn_section(1.0),
            "traditional_results": traditional_section(),
        }));
        let merged = ExternalResults::merge(Some(&gnn_only), None);
        assert_eq!(
            merged.metrics(),
            Err(IncompleteResults::MissingSection {
                pipeline: Pipeline::Traditional
            })
        );
    }

    #[rstest]
    #[case("training_time", MetricsError::MissingKey { key: "training_time" })]
    #[case("optimal_clusters", MetricsError::MissingKey { key: "optimal_clusters" })]
    fn missing_key_is_reported(#[case] removed: &str, #[case] expected: MetricsError) {
        let mut section = gnn_section(1.0);
        section.as_object_mut().expect("object").remove(removed);
        let merged = ExternalResults::merge(
            None,
            Some(&document(&json!({
                "gnn_results": section,
                "traditional_results": traditional_section(),
            }))),
        );
        assert_eq!(
            merged.metrics(),
            Err(IncompleteResults::InvalidSection {
                pipeline: Pipeline::Gnn,
                source: expected,
            })
        );
    }

    #[rstest]
    fn fractional_count_is_invalid() {
        let mut section = traditional_section();
        section["num_components"] = json!(2.5);
        let map = section.as_object().expect("object");
        assert_eq!(
            PipelineMetrics::from_section(Pipeline::Traditional, map),
            Err(MetricsError::InvalidValue {
                key: "num_components",
                expected: "non-negative integer",
            })
        );
    }

    #[rstest]
    fn missing_file_is_absent_not_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let read = ExternalDocument::read(&dir.path().join("absent.json")).expect("not an error");
        assert!(read.is_none());
    }

    #[rstest]
    #[case("{ not json", "not valid JSON")]
    #[case("[1, 2, 3]", "JSON object")]
    fn malformed_documents_are_rejected(#[case] contents: &str, #[case] message: &str) {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("bad.json");
        fs::write(&path, contents).expect("write document");
        let err = ExternalDocument::read(&path).expect_err("malformed document");
        assert!(err.to_string().contains(message), "{err}");
        assert!(ExternalDocument::load(&path).is_none());
    }
}

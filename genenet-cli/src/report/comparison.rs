//! Results of the GNN-vs-traditional stage.

use genenet_core::BasicComparison;
use serde::Serialize;

use super::external::{ExternalResults, MetricSection, Pipeline, PipelineMetrics};

/// Outcome of the comparison stage.
///
/// Serialises untagged: the full comparison keeps the external sections and
/// a column-wise summary table; the fallback is the basic comparison itself.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum GnnComparison {
    /// Both external pipelines supplied every required metric.
    Full(FullComparison),
    /// Traditional-only clustering baseline computed from the TEC network.
    Basic(BasicComparison),
}

impl GnnComparison {
    /// Returns the full comparison, if that branch ran.
    #[must_use]
    pub const fn full(&self) -> Option<&FullComparison> {
        match self {
            Self::Full(full) => Some(full),
            Self::Basic(_) => None,
        }
    }
}

/// Full comparison between the external GNN and traditional summaries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FullComparison {
    /// GNN section exactly as read.
    pub gnn_results: MetricSection,
    /// Traditional section exactly as read.
    pub traditional_results: MetricSection,
    /// Formatted table, also written as CSV.
    pub comparison_summary: ComparisonSummary,
    /// Typed GNN metrics.
    #[serde(skip)]
    pub gnn: PipelineMetrics,
    /// Typed traditional metrics.
    #[serde(skip)]
    pub traditional: PipelineMetrics,
}

impl FullComparison {
    /// Builds the comparison from merged sections and their typed views.
    #[must_use]
    pub fn new(
        external: &ExternalResults,
        gnn: PipelineMetrics,
        traditional: PipelineMetrics,
    ) -> Self {
        Self {
            gnn_results: external.gnn.clone().unwrap_or_default(),
            traditional_results: external.traditional.clone().unwrap_or_default(),
            comparison_summary: ComparisonSummary {
                rows: [
                    ComparisonRow::new(Pipeline::Gnn, &gnn),
                    ComparisonRow::new(Pipeline::Traditional, &traditional),
                ],
            },
            gnn,
            traditional,
        }
    }
}

/// One formatted table row; field names double as CSV headers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComparisonRow {
    /// Pipeline label.
    #[serde(rename = "Method")]
    pub method: &'static str,
    /// Time with one decimal and an `s` suffix.
    #[serde(rename = "Processing_Time")]
    pub processing_time: String,
    /// Silhouette score with four decimals.
    #[serde(rename = "Silhouette_Score")]
    pub silhouette_score: String,
    /// Cluster or component count.
    #[serde(rename = "Clusters_Components")]
    pub clusters_components: u64,
    /// High-confidence prediction count.
    #[serde(rename = "High_Conf_Predictions")]
    pub high_conf_predictions: u64,
    /// Mean similarity with four decimals.
    #[serde(rename = "Mean_Similarity")]
    pub mean_similarity: String,
}

impl ComparisonRow {
    fn new(pipeline: Pipeline, metrics: &PipelineMetrics) -> Self {
        Self {
            method: pipeline.label(),
            processing_time: format!("{:.1}s", metrics.time_seconds),
            silhouette_score: format!("{:.4}", metrics.silhouette_score),
            clusters_components: metrics.clusters,
            high_conf_predictions: metrics.high_confidence_predictions,
            mean_similarity: format!("{:.4}", metrics.mean_similarity),
        }
    }
}

/// GNN and traditional rows, serialised column-wise in JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "ComparisonColumns")]
pub struct ComparisonSummary {
    /// GNN row followed by the traditional row.
    pub rows: [ComparisonRow; 2],
}

#[derive(Serialize)]
struct ComparisonColumns {
    #[serde(rename = "Method")]
    method: [&'static str; 2],
    #[serde(rename = "Processing_Time")]
    processing_time: [String; 2],
    #[serde(rename = "Silhouette_Score")]
    silhouette_score: [String; 2],
    #[serde(rename = "Clusters_Components")]
    clusters_components: [u64; 2],
    #[serde(rename = "High_Conf_Predictions")]
    high_conf_predictions: [u64; 2],
    #[serde(rename = "Mean_Similarity")]
    mean_similarity: [String; 2],
}

impl From<ComparisonSummary> for ComparisonColumns {
    fn from(summary: ComparisonSummary) -> Self {
        let [gnn, traditional] = summary.rows;
        Self {
            method: [gnn.method, traditional.method],
            processing_time: [gnn.processing_time, traditional.processing_time],
            silhouette_score: [gnn.silhouette_score, traditional.silhouette_score],
            clusters_components: [gnn.clusters_components, traditional.clusters_components],
            high_conf_predictions: [gnn.high_conf_predictions, traditional.high_conf_predictions],
            mean_similarity: [gnn.mean_similarity, traditional.mean_similarity],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;
    use serde_json::json;

    fn metrics(time_seconds: f64, clusters: u64) -> PipelineMetrics {
        PipelineMetrics {
            time_seconds,
            silhouette_score: 0.123_456,
            clusters,
            high_confidence_predictions: 1_500,
            mean_similarity: 0.5,
        }
    }

    #[rstest]
    fn rows_are_formatted_for_the_table() {
        let full = FullComparison::new(&ExternalResults::default(), metrics(120.46, 8), metrics(3.0, 40));
        let [gnn, traditional] = &full.comparison_summary.rows;
        assert_eq!(gnn.method, "GNN");
        assert_eq!(gnn.processing_time, "120.5s");
        assert_eq!(gnn.silhouette_score, "0.1235");
        assert_eq!(traditional.method, "Traditional");
        assert_eq!(traditional.processing_time, "3.0s");
        assert_eq!(traditional.clusters_components, 40);
        assert_eq!(traditional.mean_similarity, "0.5000");
    }

    #[rstest]
    fn summary_serialises_column_wise() {
        let full = FullComparison::new(&ExternalResults::default(), metrics(1.0, 2), metrics(4.0, 5));
        let value = serde_json::to_value(&full).expect("serialise");
        assert_eq!(value["comparison_summary"]["Method"], json!(["GNN", "Traditional"]));
        assert_eq!(value["comparison_summary"]["Clusters_Components"], json!([2, 5]));
        assert!(value.get("gnn").is_none());
        assert_eq!(value["gnn_results"], json!({}));
    }
}

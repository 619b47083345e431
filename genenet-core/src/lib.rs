//! Genenet core library.
//!
//! Turns gene correlation matrices into thresholded co-expression networks
//! and measures them: edge and component counts across threshold sweeps,
//! clustering coefficients, power-law fits of the degree distribution, and
//! a k-means based traditional clustering baseline. The crate performs no
//! I/O; loading and reporting live in the provider and CLI crates.

mod adjacency;
mod clustering;
mod comparison;
mod config;
mod error;
mod graph;
mod matrix;
mod powerlaw;
mod sweep;
mod union_find;

pub use crate::{
    adjacency::AdjacencyMatrix,
    clustering::{
        CandidateScore, ClusterCountSelection, KMeansFit, kmeans, select_cluster_count,
        silhouette_score,
    },
    comparison::{BasicComparison, NetworkProperties, TraditionalSummary, basic_comparison},
    config::{
        AnalysisConfig, AnalysisConfigBuilder, DEFAULT_MAX_CLUSTERS, DEFAULT_NETWORK_THRESHOLD,
        DEFAULT_SEED, DEFAULT_SUPPLEMENTAL_THRESHOLDS, DEFAULT_SWEEP_THRESHOLDS,
    },
    error::{
        AnalysisError, AnalysisErrorCode, ClusteringError, ClusteringErrorCode, MatrixError,
        MatrixErrorCode, Result,
    },
    graph::{Graph, GraphSummary},
    matrix::CorrelationMatrix,
    powerlaw::{DegreePoint, PowerLawFit, PowerLawOutcome, degree_histogram, fit_power_law},
    sweep::{NetworkCounts, SweepRecord, ThresholdSweep, Thresholds, threshold_sweep},
};

//! Error types for the genenet core library.
//!
//! Defines error enums exposed by the public API, their stable
//! machine-readable codes, and a convenient result alias.

use std::fmt;

use thiserror::Error;

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            #[must_use]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// An error produced while constructing a [`crate::CorrelationMatrix`].
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum MatrixError {
    /// The matrix contained no genes.
    #[error("correlation matrix contains no genes")]
    Empty,
    /// The value buffer does not describe a square matrix.
    #[error("correlation matrix with {genes} genes must hold {expected} values but has {actual}")]
    NotSquare {
        /// Number of gene labels supplied.
        genes: usize,
        /// Number of values a square matrix of that size requires.
        expected: usize,
        /// Number of values actually supplied.
        actual: usize,
    },
    /// The matrix is too large to index on this host.
    #[error("correlation matrix with {genes} genes exceeds capacity limits")]
    CapacityOverflow {
        /// Number of gene labels supplied.
        genes: usize,
    },
}

define_error_codes! {
    /// Stable codes describing [`MatrixError`] variants.
    enum MatrixErrorCode for MatrixError {
        /// The matrix contained no genes.
        Empty => Empty => "MATRIX_EMPTY",
        /// The value buffer does not describe a square matrix.
        NotSquare => NotSquare { .. } => "MATRIX_NOT_SQUARE",
        /// The matrix is too large to index on this host.
        CapacityOverflow => CapacityOverflow { .. } => "MATRIX_CAPACITY_OVERFLOW",
    }
}

/// An error produced by the k-means and silhouette routines.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum ClusteringError {
    /// No feature vectors were supplied.
    #[error("clustering requires at least one feature vector")]
    NoPoints,
    /// Feature vectors had inconsistent or zero dimensions.
    #[error("feature vector {index} has dimension {actual} but expected {expected}")]
    DimensionMismatch {
        /// Index of the offending vector.
        index: usize,
        /// Dimension of the first vector.
        expected: usize,
        /// Dimension of the offending vector.
        actual: usize,
    },
    /// The requested cluster count cannot partition the points.
    #[error("cannot form {clusters} clusters from {points} points")]
    InvalidClusterCount {
        /// Requested number of clusters.
        clusters: usize,
        /// Number of points available.
        points: usize,
    },
    /// Labels and points had different lengths.
    #[error("label length mismatch: points={points}, labels={labels}")]
    LabelLengthMismatch {
        /// Number of points.
        points: usize,
        /// Number of labels.
        labels: usize,
    },
    /// The labelling has too few or too many distinct clusters to score.
    #[error("silhouette needs 2..={max} distinct labels but found {distinct}")]
    DegenerateLabels {
        /// Number of distinct labels found.
        distinct: usize,
        /// Largest admissible label count (points - 1).
        max: usize,
    },
}

define_error_codes! {
    /// Stable codes describing [`ClusteringError`] variants.
    enum ClusteringErrorCode for ClusteringError {
        /// No feature vectors were supplied.
        NoPoints => NoPoints => "CLUSTERING_NO_POINTS",
        /// Feature vectors had inconsistent or zero dimensions.
        DimensionMismatch => DimensionMismatch { .. } => "CLUSTERING_DIMENSION_MISMATCH",
        /// The requested cluster count cannot partition the points.
        InvalidClusterCount => InvalidClusterCount { .. } => "CLUSTERING_INVALID_CLUSTER_COUNT",
        /// Labels and points had different lengths.
        LabelLengthMismatch => LabelLengthMismatch { .. } => "CLUSTERING_LABEL_LENGTH_MISMATCH",
        /// The labelling has too few or too many distinct clusters to score.
        DegenerateLabels => DegenerateLabels { .. } => "CLUSTERING_DEGENERATE_LABELS",
    }
}

/// Error type produced when configuring or running an analysis.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum AnalysisError {
    /// A threshold list contained no values.
    #[error("threshold list `{list}` must not be empty")]
    EmptyThresholds {
        /// Name of the offending list.
        list: &'static str,
    },
    /// A threshold was NaN or infinite.
    #[error("threshold list `{list}` contains non-finite value {value} at position {index}")]
    NonFiniteThreshold {
        /// Name of the offending list.
        list: &'static str,
        /// Position of the offending value.
        index: usize,
        /// The offending value.
        value: f32,
    },
    /// A threshold list was neither strictly ascending nor strictly descending.
    #[error("threshold list `{list}` is not strictly ordered at position {index}")]
    UnorderedThresholds {
        /// Name of the offending list.
        list: &'static str,
        /// First position breaking the ordering.
        index: usize,
    },
    /// The single network threshold was NaN or infinite.
    #[error("network threshold must be finite (got {got})")]
    InvalidNetworkThreshold {
        /// The invalid threshold supplied by the caller.
        got: f32,
    },
    /// The candidate cluster ceiling was below two.
    #[error("max_clusters must be at least 2 (got {got})")]
    InvalidMaxClusters {
        /// The invalid ceiling supplied by the caller.
        got: usize,
    },
    /// Two matrices compared side by side had different sizes.
    #[error("matrix `{left_name}` has {left} genes but `{right_name}` has {right}")]
    ShapeMismatch {
        /// Name of the left-hand matrix.
        left_name: String,
        /// Gene count of the left-hand matrix.
        left: usize,
        /// Name of the right-hand matrix.
        right_name: String,
        /// Gene count of the right-hand matrix.
        right: usize,
    },
    /// Building a correlation matrix failed.
    #[error("matrix `{matrix}` is invalid: {error}")]
    Matrix {
        /// Name of the matrix being built.
        matrix: String,
        /// Underlying matrix error.
        #[source]
        error: MatrixError,
    },
    /// The clustering baseline failed.
    #[error("clustering failed: {error}")]
    Clustering {
        /// Underlying clustering error.
        #[source]
        error: ClusteringError,
    },
}

define_error_codes! {
    /// Stable codes describing [`AnalysisError`] variants.
    enum AnalysisErrorCode for AnalysisError {
        /// A threshold list contained no values.
        EmptyThresholds => EmptyThresholds { .. } => "ANALYSIS_EMPTY_THRESHOLDS",
        /// A threshold was NaN or infinite.
        NonFiniteThreshold => NonFiniteThreshold { .. } => "ANALYSIS_NON_FINITE_THRESHOLD",
        /// A threshold list was not strictly ordered.
        UnorderedThresholds => UnorderedThresholds { .. } => "ANALYSIS_UNORDERED_THRESHOLDS",
        /// The single network threshold was NaN or infinite.
        InvalidNetworkThreshold => InvalidNetworkThreshold { .. } => "ANALYSIS_INVALID_NETWORK_THRESHOLD",
        /// The candidate cluster ceiling was below two.
        InvalidMaxClusters => InvalidMaxClusters { .. } => "ANALYSIS_INVALID_MAX_CLUSTERS",
        /// Two matrices compared side by side had different sizes.
        ShapeMismatch => ShapeMismatch { .. } => "ANALYSIS_SHAPE_MISMATCH",
        /// Building a correlation matrix failed.
        MatrixFailure => Matrix { .. } => "ANALYSIS_MATRIX_FAILURE",
        /// The clustering baseline failed.
        ClusteringFailure => Clustering { .. } => "ANALYSIS_CLUSTERING_FAILURE",
    }
}

impl AnalysisError {
    /// Retrieve the inner [`MatrixErrorCode`] when the error originated in matrix construction.
    #[must_use]
    pub const fn matrix_code(&self) -> Option<MatrixErrorCode> {
        match self {
            Self::Matrix { error, .. } => Some(error.code()),
            _ => None,
        }
    }

    /// Retrieve the inner [`ClusteringErrorCode`] when the error originated in clustering.
    #[must_use]
    pub const fn clustering_code(&self) -> Option<ClusteringErrorCode> {
        match self {
            Self::Clustering { error } => Some(error.code()),
            _ => None,
        }
    }
}

impl From<ClusteringError> for AnalysisError {
    fn from(error: ClusteringError) -> Self {
        Self::Clustering { error }
    }
}

/// Convenient alias for results returned by the core API.
pub type Result<T> = core::result::Result<T, AnalysisError>;

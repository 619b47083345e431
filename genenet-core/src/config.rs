//! Analysis configuration and its validating builder.
//!
//! Every stage of a report run reads its thresholds and clustering
//! parameters from one immutable [`AnalysisConfig`].

use crate::{Result, error::AnalysisError, sweep::Thresholds};

/// Thresholds swept by the tissue network analysis.
pub const DEFAULT_SWEEP_THRESHOLDS: [f32; 7] = [0.9, 0.85, 0.8, 0.75, 0.7, 0.65, 0.6];

/// Thresholds swept by the supplemental analysis.
pub const DEFAULT_SUPPLEMENTAL_THRESHOLDS: [f32; 9] =
    [0.9, 0.85, 0.8, 0.75, 0.7, 0.65, 0.6, 0.55, 0.5];

/// Threshold of the single network used by the comparison stages.
pub const DEFAULT_NETWORK_THRESHOLD: f32 = 0.75;

/// Seed of the k-means baseline.
pub const DEFAULT_SEED: u64 = 42;

/// Largest candidate cluster count of the k-means baseline.
pub const DEFAULT_MAX_CLUSTERS: usize = 10;

/// Validated parameters of one report run.
///
/// # Examples
/// ```
/// use genenet_core::{AnalysisConfig, DEFAULT_NETWORK_THRESHOLD};
///
/// let config = AnalysisConfig::builder().build()?;
/// assert_eq!(config.network_threshold(), DEFAULT_NETWORK_THRESHOLD);
/// assert_eq!(config.sweep_thresholds().len(), 7);
/// # Ok::<(), genenet_core::AnalysisError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    sweep_thresholds: Thresholds,
    supplemental_thresholds: Thresholds,
    network_threshold: f32,
    seed: u64,
    max_clusters: usize,
}

impl AnalysisConfig {
    /// Starts a builder populated with the defaults.
    #[must_use]
    pub fn builder() -> AnalysisConfigBuilder {
        AnalysisConfigBuilder::new()
    }

    /// Thresholds of the tissue sweep.
    #[must_use]
    pub const fn sweep_thresholds(&self) -> &Thresholds {
        &self.sweep_thresholds
    }

    /// Thresholds of the supplemental sweep.
    #[must_use]
    pub const fn supplemental_thresholds(&self) -> &Thresholds {
        &self.supplemental_thresholds
    }

    /// Threshold of the single comparison network.
    #[must_use]
    pub const fn network_threshold(&self) -> f32 {
        self.network_threshold
    }

    /// Seed of the k-means baseline.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Largest candidate cluster count.
    #[must_use]
    pub const fn max_clusters(&self) -> usize {
        self.max_clusters
    }
}

/// Configures and validates [`AnalysisConfig`] instances.
///
/// # Examples
/// ```
/// use genenet_core::AnalysisConfigBuilder;
///
/// let config = AnalysisConfigBuilder::new()
///     .with_network_threshold(0.8)
///     .with_max_clusters(4)
///     .with_seed(7)
///     .build()?;
/// assert_eq!(config.max_clusters(), 4);
/// assert_eq!(config.seed(), 7);
///
/// let invalid = AnalysisConfigBuilder::new().with_max_clusters(1).build();
/// assert!(invalid.is_err());
/// # Ok::<(), genenet_core::AnalysisError>(())
/// ```
#[derive(Debug, Clone)]
pub struct AnalysisConfigBuilder {
    sweep_thresholds: Vec<f32>,
    supplemental_thresholds: Vec<f32>,
    network_threshold: f32,
    seed: u64,
    max_clusters: usize,
}

impl Default for AnalysisConfigBuilder {
    fn default() -> Self {
        Self {
            sweep_thresholds: DEFAULT_SWEEP_THRESHOLDS.to_vec(),
            supplemental_thresholds: DEFAULT_SUPPLEMENTAL_THRESHOLDS.to_vec(),
            network_threshold: DEFAULT_NETWORK_THRESHOLD,
            seed: DEFAULT_SEED,
            max_clusters: DEFAULT_MAX_CLUSTERS,
        }
    }
}

impl AnalysisConfigBuilder {
    /// Creates a builder populated with default parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the tissue sweep thresholds.
    #[must_use]
    pub fn with_sweep_thresholds(mut self, thresholds: Vec<f32>) -> Self {
        self.sweep_thresholds = thresholds;
        self
    }

    /// Overrides the supplemental sweep thresholds.
    #[must_use]
    pub fn with_supplemental_thresholds(mut self, thresholds: Vec<f32>) -> Self {
        self.supplemental_thresholds = thresholds;
        self
    }

    /// Overrides the comparison network threshold.
    #[must_use]
    pub const fn with_network_threshold(mut self, threshold: f32) -> Self {
        self.network_threshold = threshold;
        self
    }

    /// Overrides the k-means seed.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Overrides the largest candidate cluster count.
    #[must_use]
    pub const fn with_max_clusters(mut self, max_clusters: usize) -> Self {
        self.max_clusters = max_clusters;
        self
    }

    /// Validates the configuration and constructs an [`AnalysisConfig`].
    ///
    /// # Errors
    /// Returns the threshold-list errors of [`Thresholds::try_new`],
    /// [`AnalysisError::InvalidNetworkThreshold`] for a non-finite network
    /// threshold and [`AnalysisError::InvalidMaxClusters`] when the ceiling is
    /// below two.
    pub fn build(self) -> Result<AnalysisConfig> {
        let sweep_thresholds = Thresholds::try_new("sweep", self.sweep_thresholds)?;
        let supplemental_thresholds =
            Thresholds::try_new("supplemental", self.supplemental_thresholds)?;
        if !self.network_threshold.is_finite() {
            return Err(AnalysisError::InvalidNetworkThreshold {
                got: self.network_threshold,
            });
        }
        if self.max_clusters < 2 {
            return Err(AnalysisError::InvalidMaxClusters {
                got: self.max_clusters,
            });
        }
        Ok(AnalysisConfig {
            sweep_thresholds,
            supplemental_thresholds,
            network_threshold: self.network_threshold,
            seed: self.seed,
            max_clusters: self.max_clusters,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    fn defaults_are_valid() {
        let config = AnalysisConfigBuilder::new().build().expect("defaults are valid");
        assert_eq!(config.sweep_thresholds().as_slice(), &DEFAULT_SWEEP_THRESHOLDS);
        assert_eq!(
            config.supplemental_thresholds().as_slice(),
            &DEFAULT_SUPPLEMENTAL_THRESHOLDS
        );
        assert_eq!(config.seed(), 42);
        assert_eq!(config.max_clusters(), 10);
        assert_eq!(config.supplemental_thresholds().position(0.75), Some(3));
    }

    #[rstest]
    #[case::nan(f32::NAN)]
    #[case::infinite(f32::INFINITY)]
    fn rejects_non_finite_network_threshold(#[case] threshold: f32) {
        let err = AnalysisConfigBuilder::new()
            .with_network_threshold(threshold)
            .build()
            .expect_err("non-finite threshold");
        assert_eq!(err.code().as_str(), "ANALYSIS_INVALID_NETWORK_THRESHOLD");
    }

    #[rstest]
    fn names_the_offending_list() {
        let err = AnalysisConfigBuilder::new()
            .with_supplemental_thresholds(Vec::new())
            .build()
            .expect_err("empty list");
        assert_eq!(err, AnalysisError::EmptyThresholds { list: "supplemental" });
    }

    #[rstest]
    fn negative_network_threshold_is_accepted() {
        let config = AnalysisConfigBuilder::new()
            .with_network_threshold(-0.5)
            .build()
            .expect("finite threshold");
        assert_eq!(config.network_threshold(), -0.5);
    }
}

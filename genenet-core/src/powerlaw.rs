//! Power-law fits of network degree distributions.
//!
//! Frequencies of the distinct nonzero degrees are fitted on log-log axes by
//! ordinary least squares. The exponent is the negated slope and the fit
//! quality is the squared Pearson correlation of the log values.

use std::collections::BTreeMap;

use serde::Serialize;

/// One bin of a degree histogram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DegreePoint {
    /// Node degree (always above zero).
    pub degree: usize,
    /// Number of nodes with that degree.
    pub frequency: usize,
}

/// Parameters of a fitted power law.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PowerLawFit {
    /// Power-law exponent, the negated slope.
    pub alpha: f64,
    /// Squared correlation of log degree against log frequency.
    ///
    /// `None` when all frequencies are equal and the correlation is undefined.
    pub r_squared: Option<f64>,
    /// Least-squares slope on log-log axes.
    pub slope: f64,
    /// Least-squares intercept on log-log axes.
    pub intercept: f64,
    /// Histogram the line was fitted to.
    pub points: Vec<DegreePoint>,
}

impl PowerLawFit {
    /// Evaluates the fitted curve `e^b · d^m` at `degree`.
    #[must_use]
    #[expect(clippy::float_arithmetic, reason = "evaluating the fitted curve")]
    pub fn frequency_at(&self, degree: f64) -> f64 {
        (self.intercept + self.slope * degree.ln()).exp()
    }
}

/// Result of attempting a power-law fit.
#[derive(Debug, Clone, PartialEq)]
pub enum PowerLawOutcome {
    /// At least two distinct nonzero degrees were present.
    Fitted(PowerLawFit),
    /// Too few distinct nonzero degrees to fit a line.
    InsufficientData {
        /// Number of distinct nonzero degrees found.
        distinct_degrees: usize,
    },
}

impl PowerLawOutcome {
    /// Returns the fit when one was produced.
    #[must_use]
    pub const fn fit(&self) -> Option<&PowerLawFit> {
        match self {
            Self::Fitted(fit) => Some(fit),
            Self::InsufficientData { .. } => None,
        }
    }
}

/// Counts nodes per distinct nonzero degree, ordered by degree.
///
/// # Examples
/// ```
/// use genenet_core::{DegreePoint, degree_histogram};
///
/// let histogram = degree_histogram(&[0, 2, 1, 2, 0]);
/// assert_eq!(
///     histogram,
///     vec![
///         DegreePoint { degree: 1, frequency: 1 },
///         DegreePoint { degree: 2, frequency: 2 },
///     ]
/// );
/// ```
#[must_use]
pub fn degree_histogram(degrees: &[usize]) -> Vec<DegreePoint> {
    let mut counts = BTreeMap::new();
    for &degree in degrees.iter().filter(|&&degree| degree > 0) {
        *counts.entry(degree).or_insert(0_usize) += 1;
    }
    counts
        .into_iter()
        .map(|(degree, frequency)| DegreePoint { degree, frequency })
        .collect()
}

/// Fits a power law to the degree sequence `degrees`.
///
/// Zero degrees are ignored. Fewer than two distinct nonzero degrees yield
/// [`PowerLawOutcome::InsufficientData`]; this is a valid outcome, not an
/// error.
///
/// # Examples
/// ```
/// use genenet_core::{PowerLawOutcome, fit_power_law};
///
/// // f(d) = 60 / d for d = 1..=5
/// let mut degrees = Vec::new();
/// for (degree, count) in [(1, 60), (2, 30), (3, 20), (4, 15), (5, 12)] {
///     degrees.extend(std::iter::repeat(degree).take(count));
/// }
/// let PowerLawOutcome::Fitted(fit) = fit_power_law(&degrees) else {
///     panic!("five distinct degrees must fit");
/// };
/// assert!((fit.alpha - 1.0).abs() < 1e-9);
///
/// assert_eq!(
///     fit_power_law(&[3, 3, 0]),
///     PowerLawOutcome::InsufficientData { distinct_degrees: 1 }
/// );
/// ```
#[must_use]
#[expect(
    clippy::cast_precision_loss,
    clippy::float_arithmetic,
    reason = "least squares over log-transformed counts"
)]
pub fn fit_power_law(degrees: &[usize]) -> PowerLawOutcome {
    let points = degree_histogram(degrees);
    if points.len() < 2 {
        return PowerLawOutcome::InsufficientData {
            distinct_degrees: points.len(),
        };
    }

    let xs: Vec<f64> = points.iter().map(|p| (p.degree as f64).ln()).collect();
    let ys: Vec<f64> = points.iter().map(|p| (p.frequency as f64).ln()).collect();
    let count = points.len() as f64;
    let mean_x = xs.iter().sum::<f64>() / count;
    let mean_y = ys.iter().sum::<f64>() / count;

    let (mut sxx, mut syy, mut sxy) = (0.0_f64, 0.0_f64, 0.0_f64);
    for (x, y) in xs.iter().zip(&ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        sxx += dx * dx;
        syy += dy * dy;
        sxy += dx * dy;
    }

    // Distinct positive degrees have distinct logs, so sxx > 0.
    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;
    let r_squared = (syy > 0.0).then(|| (sxy * sxy) / (sxx * syy));

    PowerLawOutcome::Fitted(PowerLawFit {
        alpha: -slope,
        r_squared,
        slope,
        intercept,
        points,
    })
}

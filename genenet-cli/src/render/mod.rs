//! Figure rendering with `plotters`.
//!
//! Figures draw onto any [`DrawingBackend`]; [`render_figure`] picks the
//! backend from the requested [`FigureFormat`]. PNG is the default and
//! requires the `png` cargo feature, which is enabled by default. SVG needs
//! no system fonts and is always available, so `--no-default-features`
//! builds fall back to it.

mod chart;
mod figures;

use std::{
    fmt,
    path::{Path, PathBuf},
};

use clap::ValueEnum;
use plotters::{
    coord::Shift,
    prelude::{DrawingArea, DrawingAreaErrorKind, DrawingBackend, IntoDrawingArea, SVGBackend, WHITE},
};
use thiserror::Error;

pub use self::figures::{
    ComparisonFigure, DegreeDistributionFigure, FinalSummaryFigure, PowerLawFigure,
    RnaComparisonFigure, SupplementalFigure, TissueNetworkFigure,
};

/// Output format of rendered figures.
#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum FigureFormat {
    /// Scalable vector graphics.
    Svg,
    /// Portable network graphics; requires the `png` feature.
    Png,
}

impl Default for FigureFormat {
    /// PNG when the `png` feature is enabled, SVG otherwise.
    fn default() -> Self {
        if cfg!(feature = "png") {
            Self::Png
        } else {
            Self::Svg
        }
    }
}

impl FigureFormat {
    /// File extension without the leading dot.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Svg => "svg",
            Self::Png => "png",
        }
    }
}

impl fmt::Display for FigureFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Errors raised while rendering a figure.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The format needs a cargo feature this build lacks.
    #[error("figure format `{format}` requires the `{feature}` cargo feature")]
    FormatUnavailable {
        /// Requested format.
        format: FigureFormat,
        /// Feature enabling it.
        feature: &'static str,
    },
    /// The backend failed while drawing or writing the figure.
    #[error("failed to draw figure: {message}")]
    Drawing {
        /// Rendered backend error.
        message: String,
    },
    /// Splitting the canvas yielded an unexpected number of panels.
    #[error("expected {expected} panels but layout produced {actual}")]
    Layout {
        /// Panels the figure draws.
        expected: usize,
        /// Panels the split produced.
        actual: usize,
    },
}

impl<E> From<DrawingAreaErrorKind<E>> for RenderError
where
    E: std::error::Error + Send + Sync,
{
    fn from(error: DrawingAreaErrorKind<E>) -> Self {
        Self::Drawing {
            message: error.to_string(),
        }
    }
}

/// A figure written to its own file.
pub trait Figure {
    /// File stem, without extension.
    const STEM: &'static str;
    /// Canvas size in pixels.
    const SIZE: (u32, u32);

    /// Draws the figure onto `root`, which is already filled white.
    ///
    /// # Errors
    /// Returns [`RenderError`] when the backend fails.
    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<(), RenderError>;
}

/// Renders `figure` into `output_dir` and returns the written path.
///
/// Existing files are overwritten.
///
/// # Errors
/// Returns [`RenderError::FormatUnavailable`] for PNG in builds without the
/// `png` feature and [`RenderError::Drawing`] when drawing or writing fails.
pub fn render_figure<F: Figure>(
    figure: &F,
    output_dir: &Path,
    format: FigureFormat,
) -> Result<PathBuf, RenderError> {
    let path = output_dir.join(format!("{}.{}", F::STEM, format.extension()));
    match format {
        FigureFormat::Svg => {
            let root = SVGBackend::new(&path, F::SIZE).into_drawing_area();
            draw_and_present(figure, &root)?;
        }
        FigureFormat::Png => render_png(figure, &path)?,
    }
    Ok(path)
}

fn draw_and_present<F, DB>(figure: &F, root: &DrawingArea<DB, Shift>) -> Result<(), RenderError>
where
    F: Figure,
    DB: DrawingBackend,
{
    root.fill(&WHITE)?;
    figure.draw(root)?;
    root.present()?;
    Ok(())
}

#[cfg(feature = "png")]
fn render_png<F: Figure>(figure: &F, path: &Path) -> Result<(), RenderError> {
    use plotters::prelude::BitMapBackend;

    let root = BitMapBackend::new(path, F::SIZE).into_drawing_area();
    draw_and_present(figure, &root)
}

#[cfg(not(feature = "png"))]
fn render_png<F: Figure>(_figure: &F, _path: &Path) -> Result<(), RenderError> {
    Err(RenderError::FormatUnavailable {
        format: FigureFormat::Png,
        feature: "png",
    })
}

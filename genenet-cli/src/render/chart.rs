//! Chart building blocks shared by the figures.

use std::ops::Range;

use plotters::{coord::Shift, prelude::*};

use super::RenderError;

pub(super) const SKY_BLUE: RGBColor = RGBColor(135, 206, 235);
pub(super) const LIGHT_CORAL: RGBColor = RGBColor(240, 128, 128);
pub(super) const LIGHT_SALMON: RGBColor = RGBColor(255, 160, 122);
pub(super) const LIGHT_BLUE: RGBColor = RGBColor(173, 216, 230);
pub(super) const FIT_RED: RGBColor = RGBColor(214, 39, 40);
pub(super) const REFERENCE_GREY: RGBColor = RGBColor(128, 128, 128);
pub(super) const DARK_GREEN: RGBColor = RGBColor(0, 100, 0);

pub(super) const FONT: &str = "sans-serif";
pub(super) const CAPTION_SIZE: u32 = 20;

#[expect(clippy::cast_precision_loss, reason = "report counts stay far below 2^52")]
pub(super) const fn count(value: usize) -> f64 {
    value as f64
}

#[expect(clippy::cast_precision_loss, reason = "report counts stay far below 2^52")]
pub(super) const fn count_u64(value: u64) -> f64 {
    value as f64
}

/// Splits `root` into `rows × cols` panels in row-major order.
pub(super) fn panels<DB: DrawingBackend, const N: usize>(
    root: &DrawingArea<DB, Shift>,
    rows: usize,
    cols: usize,
) -> Result<[DrawingArea<DB, Shift>; N], RenderError> {
    let areas = root.split_evenly((rows, cols));
    let actual = areas.len();
    areas
        .try_into()
        .map_err(|_| RenderError::Layout { expected: N, actual })
}

/// Range covering zero and every finite value, padded by a tenth.
pub(super) fn linear_range(values: impl IntoIterator<Item = f64>) -> Range<f64> {
    let (low, high) = values
        .into_iter()
        .filter(|value| value.is_finite())
        .fold((0.0_f64, 0.0_f64), |(low, high), value| {
            (low.min(value), high.max(value))
        });
    if high - low <= f64::EPSILON {
        return 0.0..1.0;
    }
    (low * 1.1)..(high * 1.1)
}

/// Log-axis bounds covering every positive value with room either side.
pub(super) fn log_range(values: impl IntoIterator<Item = f64>) -> Range<f64> {
    let (low, high) = values
        .into_iter()
        .filter(|value| value.is_finite() && *value > 0.0)
        .fold((f64::INFINITY, 0.0_f64), |(low, high), value| {
            (low.min(value), high.max(value))
        });
    if high <= 0.0 {
        return 0.5..10.0;
    }
    (low / 2.0)..(high * 2.0)
}

/// Threshold axis bounds with a small margin either side.
pub(super) fn threshold_range(thresholds: &[f32]) -> Range<f64> {
    let (low, high) = thresholds
        .iter()
        .map(|&threshold| f64::from(threshold))
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(low, high), value| {
            (low.min(value), high.max(value))
        });
    if low > high {
        return 0.0..1.0;
    }
    (low - 0.02)..(high + 0.02)
}

/// Axis bounds for an index axis of `len` evenly spaced categories.
pub(super) fn index_range(len: usize) -> Range<f64> {
    -0.5..(count(len) - 0.5)
}

/// Label of the category at `position`, empty between categories.
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "position is rounded and checked non-negative first"
)]
pub(super) fn index_label(labels: &[String], position: f64) -> String {
    let rounded = position.round();
    if rounded < 0.0 || (position - rounded).abs() > 1e-6 {
        return String::new();
    }
    labels.get(rounded as usize).cloned().unwrap_or_default()
}

pub(super) fn segment_label(labels: &[&str], value: &SegmentValue<usize>) -> String {
    match value {
        SegmentValue::CenterOf(index) => labels
            .get(*index)
            .map_or_else(String::new, |label| (*label).to_owned()),
        _ => String::new(),
    }
}

/// Formats thresholds for tick labels.
pub(super) fn threshold_labels(thresholds: &[f32]) -> Vec<String> {
    thresholds.iter().map(|threshold| format!("{threshold:.2}")).collect()
}

/// Point marker drawn along a line.
#[derive(Clone, Copy, Debug)]
pub(super) enum Marker {
    Circle,
    Triangle,
    /// Plain reference line.
    None,
}

/// A labelled polyline with markers.
#[derive(Clone, Debug)]
pub(super) struct Line {
    pub(super) label: String,
    pub(super) colour: RGBColor,
    pub(super) marker: Marker,
    pub(super) points: Vec<(f64, f64)>,
}

impl Line {
    pub(super) fn new(
        label: impl Into<String>,
        colour: RGBColor,
        marker: Marker,
        points: impl IntoIterator<Item = (f64, f64)>,
    ) -> Self {
        Self {
            label: label.into(),
            colour,
            marker,
            points: points.into_iter().collect(),
        }
    }

    /// Drops points a log y axis cannot show.
    #[must_use]
    pub(super) fn positive(mut self) -> Self {
        self.points.retain(|&(_, y)| y > 0.0);
        self
    }
}

/// Draws lines with markers and legend entries onto a chart whose x and y
/// values are both `f64`.
macro_rules! draw_lines {
    ($chart:expr, $lines:expr) => {
        for line in $lines {
            let colour = line.colour;
            $chart
                .draw_series(LineSeries::new(
                    line.points.iter().copied(),
                    colour.stroke_width(2),
                ))?
                .label(line.label.as_str())
                .legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 20, y)], colour.stroke_width(2))
                });
            match line.marker {
                Marker::Circle => {
                    $chart.draw_series(
                        line.points
                            .iter()
                            .map(|&point| Circle::new(point, 4, colour.filled())),
                    )?;
                }
                Marker::Triangle => {
                    $chart.draw_series(
                        line.points
                            .iter()
                            .map(|&point| TriangleMarker::new(point, 5, colour.filled())),
                    )?;
                }
                Marker::None => {}
            }
        }
    };
}

pub(super) use draw_lines;

/// Axis and caption text of one panel.
#[derive(Clone, Copy, Debug)]
pub(super) struct Axes<'a> {
    pub(super) caption: &'a str,
    pub(super) x_desc: &'a str,
    pub(super) y_desc: &'a str,
}

/// Line panel with a linear y axis.
pub(super) fn line_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    axes: Axes<'_>,
    x_range: Range<f64>,
    lines: &[Line],
) -> Result<(), RenderError> {
    let y_range = linear_range(lines.iter().flat_map(|line| line.points.iter().map(|&(_, y)| y)));
    let mut chart = ChartBuilder::on(area)
        .caption(axes.caption, (FONT, CAPTION_SIZE))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range, y_range)?;
    chart
        .configure_mesh()
        .x_desc(axes.x_desc)
        .y_desc(axes.y_desc)
        .draw()?;
    draw_lines!(chart, lines);
    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;
    Ok(())
}

/// Line panel with a logarithmic y axis; non-positive points are dropped.
pub(super) fn log_line_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    axes: Axes<'_>,
    x_range: Range<f64>,
    lines: &[Line],
) -> Result<(), RenderError> {
    let lines: Vec<Line> = lines.iter().cloned().map(Line::positive).collect();
    let y_range = log_range(lines.iter().flat_map(|line| line.points.iter().map(|&(_, y)| y)));
    let mut chart = ChartBuilder::on(area)
        .caption(axes.caption, (FONT, CAPTION_SIZE))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d(x_range, y_range.log_scale())?;
    chart
        .configure_mesh()
        .x_desc(axes.x_desc)
        .y_desc(axes.y_desc)
        .draw()?;
    draw_lines!(chart, &lines);
    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;
    Ok(())
}

/// One bar per category.
#[derive(Clone, Copy, Debug)]
pub(super) struct Bars<'a> {
    pub(super) caption: &'a str,
    pub(super) y_desc: &'a str,
    pub(super) labels: &'a [&'a str],
    pub(super) values: &'a [f64],
    pub(super) colours: &'a [RGBColor],
}

fn bar_rectangles(
    bars: &Bars<'_>,
    base: f64,
    floor: f64,
) -> impl Iterator<Item = Rectangle<(SegmentValue<usize>, f64)>> {
    bars.values
        .iter()
        .zip(bars.colours.iter().cycle())
        .enumerate()
        .map(move |(index, (&value, colour))| {
            let top = if value.is_finite() { value.max(floor) } else { base };
            let mut bar = Rectangle::new(
                [
                    (SegmentValue::Exact(index), base),
                    (SegmentValue::Exact(index + 1), top),
                ],
                colour.mix(0.8).filled(),
            );
            bar.set_margin(0, 0, 25, 25);
            bar
        })
}

/// Bar panel with a linear y axis that always includes zero.
pub(super) fn bar_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    bars: &Bars<'_>,
) -> Result<(), RenderError> {
    let y_range = linear_range(bars.values.iter().copied());
    let mut chart = ChartBuilder::on(area)
        .caption(bars.caption, (FONT, CAPTION_SIZE))
        .margin(15)
        .x_label_area_size(35)
        .y_label_area_size(60)
        .build_cartesian_2d((0..bars.values.len()).into_segmented(), y_range)?;
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(bars.labels.len())
        .x_label_formatter(&|value: &SegmentValue<usize>| segment_label(bars.labels, value))
        .y_desc(bars.y_desc)
        .draw()?;
    chart.draw_series(bar_rectangles(bars, 0.0, f64::MIN))?;
    Ok(())
}

/// Bar panel with a logarithmic y axis; bars rise from the axis floor.
pub(super) fn log_bar_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    bars: &Bars<'_>,
) -> Result<(), RenderError> {
    let y_range = log_range(bars.values.iter().copied());
    let base = y_range.start;
    let mut chart = ChartBuilder::on(area)
        .caption(bars.caption, (FONT, CAPTION_SIZE))
        .margin(15)
        .x_label_area_size(35)
        .y_label_area_size(70)
        .build_cartesian_2d((0..bars.values.len()).into_segmented(), y_range.log_scale())?;
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(bars.labels.len())
        .x_label_formatter(&|value: &SegmentValue<usize>| segment_label(bars.labels, value))
        .y_desc(bars.y_desc)
        .draw()?;
    chart.draw_series(bar_rectangles(bars, base, base))?;
    Ok(())
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "fractions of a canvas dimension fit in i32"
)]
fn pixel(extent: u32, fraction: f64) -> i32 {
    (f64::from(extent) * fraction) as i32
}

/// Writes `text` inside `area` at the given fractions of its size.
pub(super) fn text_at<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    text: &str,
    (x, y): (f64, f64),
    size: u32,
) -> Result<(), RenderError> {
    let (width, height) = area.dim_in_pixel();
    area.draw(&Text::new(
        text,
        (pixel(width, x), pixel(height, y)),
        (FONT, size).into_font().color(&BLACK),
    ))?;
    Ok(())
}

/// Titles `area` and explains that it has nothing to show.
pub(super) fn empty_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    caption: &str,
    reason: &str,
) -> Result<(), RenderError> {
    let inner = area.titled(caption, (FONT, CAPTION_SIZE))?;
    text_at(&inner, reason, (0.3, 0.45), 18)
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    #[case(vec![], 0.0..1.0)]
    #[case(vec![0.0, 0.0], 0.0..1.0)]
    #[case(vec![2.0, 10.0], 0.0..11.0)]
    #[case(vec![-1.0, 0.5], -1.1..0.55)]
    fn linear_range_includes_zero(#[case] values: Vec<f64>, #[case] expected: Range<f64>) {
        let range = linear_range(values);
        assert!((range.start - expected.start).abs() < 1e-9);
        assert!((range.end - expected.end).abs() < 1e-9);
    }

    #[rstest]
    #[case(vec![0.0, -3.0], 0.5..10.0)]
    #[case(vec![0.0, 4.0, 100.0], 2.0..200.0)]
    fn log_range_ignores_non_positive_values(#[case] values: Vec<f64>, #[case] expected: Range<f64>) {
        assert_eq!(log_range(values), expected);
    }

    #[rstest]
    #[case(0.0, "0.90")]
    #[case(2.0, "0.80")]
    #[case(1.5, "")]
    #[case(-1.0, "")]
    #[case(7.0, "")]
    fn index_labels_sit_on_categories(#[case] position: f64, #[case] expected: &str) {
        let labels = threshold_labels(&[0.9, 0.85, 0.8]);
        assert_eq!(index_label(&labels, position), expected);
    }

    #[rstest]
    fn non_positive_points_are_dropped_for_log_axes() {
        let line = Line::new("TEC", SKY_BLUE, Marker::Circle, [(0.9, 0.0), (0.8, 3.0)]).positive();
        assert_eq!(line.points, vec![(0.8, 3.0)]);
    }
}

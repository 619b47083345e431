//! The report's figures.

use genenet_core::PowerLawFit;
use plotters::{coord::Shift, prelude::*};

use super::{
    Figure, RenderError,
    chart::{
        Axes, Bars, DARK_GREEN, FIT_RED, FONT, LIGHT_BLUE, LIGHT_CORAL, LIGHT_SALMON, Line, Marker,
        REFERENCE_GREY, SKY_BLUE, bar_panel, count, count_u64, draw_lines, empty_panel, index_label,
        index_range, line_panel, linear_range, log_bar_panel, log_line_panel, log_range, panels,
        text_at, threshold_labels, threshold_range,
    },
};
use crate::report::{PipelineMetrics, RnaComparison, SupplementalAnalysis, TissueNetwork};

const PIPELINES: [&str; 2] = ["GNN", "Traditional"];
const TITLE_SIZE: u32 = 28;

fn threshold_points(thresholds: &[f32], values: &[usize]) -> Vec<(f64, f64)> {
    thresholds
        .iter()
        .zip(values)
        .map(|(&threshold, &value)| (f64::from(threshold), count(value)))
        .collect()
}

fn pipeline_bars<'a>(
    caption: &'a str,
    y_desc: &'a str,
    values: &'a [f64],
    colours: &'a [RGBColor],
) -> Bars<'a> {
    Bars {
        caption,
        y_desc,
        labels: &PIPELINES,
        values,
        colours,
    }
}

fn index_points(values: &[usize]) -> Vec<(f64, f64)> {
    values
        .iter()
        .enumerate()
        .map(|(index, &value)| (count(index), count(value)))
        .collect()
}

/// Edge and connected-node counts across the tissue sweep.
#[derive(Debug, Clone, Copy)]
pub struct TissueNetworkFigure<'a>(pub &'a TissueNetwork);

impl Figure for TissueNetworkFigure<'_> {
    const STEM: &'static str = "tissue_network_analysis";
    const SIZE: (u32, u32) = (1400, 600);

    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<(), RenderError> {
        let Self(tissue) = *self;
        let [edges, nodes] = panels(root, 1, 2)?;
        let x_range = threshold_range(&tissue.threshold);
        log_line_panel(
            &edges,
            Axes {
                caption: "Network Edges vs Correlation Threshold",
                x_desc: "Correlation Threshold",
                y_desc: "Number of Edges",
            },
            x_range.clone(),
            &[
                Line::new("TEC", SKY_BLUE, Marker::Circle, threshold_points(&tissue.threshold, &tissue.tec_edges)),
                Line::new("RNA", LIGHT_CORAL, Marker::Circle, threshold_points(&tissue.threshold, &tissue.rna_edges)),
            ],
        )?;
        line_panel(
            &nodes,
            Axes {
                caption: "Connected Nodes vs Correlation Threshold",
                x_desc: "Correlation Threshold",
                y_desc: "Connected Nodes",
            },
            x_range,
            &[
                Line::new("TEC", SKY_BLUE, Marker::Circle, threshold_points(&tissue.threshold, &tissue.tec_nodes)),
                Line::new("RNA", LIGHT_CORAL, Marker::Circle, threshold_points(&tissue.threshold, &tissue.rna_nodes)),
            ],
        )
    }
}

/// Structure of both networks at the network threshold.
#[derive(Debug, Clone, Copy)]
pub struct RnaComparisonFigure<'a>(pub &'a RnaComparison);

impl Figure for RnaComparisonFigure<'_> {
    const STEM: &'static str = "rna_comparison_analysis";
    const SIZE: (u32, u32) = (1200, 1000);

    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<(), RenderError> {
        let Self(comparison) = *self;
        let (tec, rna) = (&comparison.tec, &comparison.rna);
        let [size, fragmentation, clustering, density] = panels(root, 2, 2)?;
        let labels = ["TEC", "RNA"];
        let colours = [SKY_BLUE, LIGHT_CORAL];
        let panel = |caption: &str, y_desc: &str, values: &[f64], area: &DrawingArea<DB, Shift>| {
            bar_panel(
                area,
                &Bars {
                    caption,
                    y_desc,
                    labels: &labels,
                    values,
                    colours: &colours,
                },
            )
        };
        panel(
            "Network Size",
            "Number of Edges",
            &[count(tec.edges), count(rna.edges)],
            &size,
        )?;
        panel(
            "Network Fragmentation",
            "Connected Components",
            &[count(tec.connected_components), count(rna.connected_components)],
            &fragmentation,
        )?;
        panel(
            "Network Clustering",
            "Average Clustering Coefficient",
            &[tec.avg_clustering, rna.avg_clustering],
            &clustering,
        )?;
        panel(
            "Network Density",
            "Density",
            &[tec.density, rna.density],
            &density,
        )
    }
}

/// Degree histogram with the fitted power law, on log and ln axes.
#[derive(Debug, Clone, Copy)]
pub struct PowerLawFigure<'a>(pub &'a PowerLawFit);

impl PowerLawFigure<'_> {
    fn log_log<DB: DrawingBackend>(&self, area: &DrawingArea<DB, Shift>) -> Result<(), RenderError> {
        let Self(fit) = *self;
        let observed: Vec<(f64, f64)> = fit
            .points
            .iter()
            .map(|point| (count(point.degree), count(point.frequency)))
            .collect();
        let fitted: Vec<(f64, f64)> = observed
            .iter()
            .map(|&(degree, _)| (degree, fit.frequency_at(degree)))
            .filter(|&(_, frequency)| frequency.is_finite() && frequency > 0.0)
            .collect();
        let x_range = log_range(observed.iter().map(|&(degree, _)| degree));
        let y_range = log_range(
            observed
                .iter()
                .chain(&fitted)
                .map(|&(_, frequency)| frequency),
        );

        let mut chart = ChartBuilder::on(area)
            .caption("TEC Degree Distribution", (FONT, 20))
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(x_range.log_scale(), y_range.log_scale())?;
        chart
            .configure_mesh()
            .x_desc("Degree")
            .y_desc("Frequency")
            .draw()?;
        chart
            .draw_series(
                observed
                    .iter()
                    .map(|&point| Circle::new(point, 5, SKY_BLUE.filled())),
            )?
            .label("Observed")
            .legend(|(x, y)| Circle::new((x + 10, y), 5, SKY_BLUE.filled()));
        chart
            .draw_series(LineSeries::new(fitted, FIT_RED.stroke_width(2)))?
            .label(format!("Fit: α = {:.2}", fit.alpha))
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], FIT_RED.stroke_width(2)));
        chart
            .configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()?;
        Ok(())
    }

    fn linearised<DB: DrawingBackend>(&self, area: &DrawingArea<DB, Shift>) -> Result<(), RenderError> {
        let Self(fit) = *self;
        let observed: Vec<(f64, f64)> = fit
            .points
            .iter()
            .map(|point| (count(point.degree).ln(), count(point.frequency).ln()))
            .collect();
        let x_range = linear_range(observed.iter().map(|&(x, _)| x));
        let fitted: Vec<(f64, f64)> = [x_range.start, x_range.end]
            .into_iter()
            .map(|x| (x, fit.intercept + fit.slope * x))
            .collect();
        let y_range = linear_range(
            observed
                .iter()
                .chain(&fitted)
                .map(|&(_, y)| y),
        );

        let mut chart = ChartBuilder::on(area)
            .caption(format!("Power Law Fit (α={:.2})", fit.alpha), (FONT, 20))
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(x_range, y_range)?;
        chart
            .configure_mesh()
            .x_desc("ln(Degree)")
            .y_desc("ln(Frequency)")
            .draw()?;
        chart.draw_series(
            observed
                .iter()
                .map(|&point| Circle::new(point, 5, LIGHT_CORAL.filled())),
        )?;
        chart.draw_series(LineSeries::new(fitted, FIT_RED.stroke_width(2)))?;
        Ok(())
    }
}

impl Figure for PowerLawFigure<'_> {
    const STEM: &'static str = "powerlaw_analysis";
    const SIZE: (u32, u32) = (1400, 600);

    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<(), RenderError> {
        let [log_log, linearised] = panels(root, 1, 2)?;
        self.log_log(&log_log)?;
        self.linearised(&linearised)
    }
}

/// Component counts and network size across the supplemental sweep.
#[derive(Debug, Clone, Copy)]
pub struct SupplementalFigure<'a> {
    /// Sweep to draw.
    pub analysis: &'a SupplementalAnalysis,
    /// Position of the network threshold in the sweep, marked when present.
    pub network_threshold_index: Option<usize>,
}

impl SupplementalFigure<'_> {
    fn components<DB: DrawingBackend>(&self, area: &DrawingArea<DB, Shift>) -> Result<(), RenderError> {
        const HALF_WIDTH: f64 = 0.35;
        let analysis = self.analysis;
        let labels = threshold_labels(&analysis.thresholds);
        let y_range = linear_range(
            analysis
                .tec_connected_components
                .iter()
                .chain(&analysis.rna_connected_components)
                .map(|&components| count(components)),
        );

        let mut chart = ChartBuilder::on(area)
            .caption("Connected Components vs Threshold", (FONT, 20))
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(index_range(labels.len()), y_range)?;
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(labels.len())
            .x_label_formatter(&|position: &f64| index_label(&labels, *position))
            .x_desc("Correlation Threshold")
            .y_desc("Connected Components")
            .draw()?;

        for (series, colour, offset, values) in [
            ("TEC", SKY_BLUE, -HALF_WIDTH, &analysis.tec_connected_components),
            ("RNA", LIGHT_SALMON, 0.0, &analysis.rna_connected_components),
        ] {
            chart
                .draw_series(values.iter().enumerate().map(|(index, &value)| {
                    let left = count(index) + offset;
                    Rectangle::new(
                        [(left, 0.0), (left + HALF_WIDTH, count(value))],
                        colour.mix(0.8).filled(),
                    )
                }))?
                .label(series)
                .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 15, y + 5)], colour.filled()));
        }
        chart
            .configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()?;
        Ok(())
    }

    fn network_size<DB: DrawingBackend>(&self, area: &DrawingArea<DB, Shift>) -> Result<(), RenderError> {
        let analysis = self.analysis;
        let steps = analysis.thresholds.len();
        let x_range = index_range(steps);
        let mut lines = vec![
            Line::new("TEC nodes", SKY_BLUE, Marker::Circle, index_points(&analysis.tec_connected_nodes)),
            Line::new("RNA nodes", LIGHT_SALMON, Marker::Circle, index_points(&analysis.rna_connected_nodes)),
            Line::new("TEC edges", SKY_BLUE, Marker::Triangle, index_points(&analysis.tec_edges)),
            Line::new("RNA edges", LIGHT_SALMON, Marker::Triangle, index_points(&analysis.rna_edges)),
        ];
        let genes = count(analysis.total_genes);
        lines.push(Line::new(
            format!("Total genes ({})", analysis.total_genes),
            REFERENCE_GREY,
            Marker::None,
            [(x_range.start, genes), (x_range.end, genes)],
        ));
        if let Some(index) = self.network_threshold_index {
            let span = log_range(
                lines
                    .iter()
                    .flat_map(|line| line.points.iter().map(|&(_, y)| y)),
            );
            let x = count(index);
            lines.push(Line::new(
                format!("Network threshold ({:.2})", analysis.network_threshold),
                DARK_GREEN,
                Marker::None,
                [(x, span.start * 1.5), (x, span.end / 1.5)],
            ));
        }
        let labels = threshold_labels(&analysis.thresholds);

        let lines: Vec<Line> = lines.into_iter().map(Line::positive).collect();
        let y_range = log_range(
            lines
                .iter()
                .flat_map(|line| line.points.iter().map(|&(_, y)| y)),
        );
        let mut chart = ChartBuilder::on(area)
            .caption("Network Size vs Threshold", (FONT, 20))
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(70)
            .build_cartesian_2d(x_range, y_range.log_scale())?;
        chart
            .configure_mesh()
            .x_labels(steps)
            .x_label_formatter(&|position: &f64| index_label(&labels, *position))
            .x_desc("Correlation Threshold")
            .y_desc("Count")
            .draw()?;
        draw_lines!(chart, &lines);
        chart
            .configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()?;
        Ok(())
    }
}

impl Figure for SupplementalFigure<'_> {
    const STEM: &'static str = "supplemental_analysis";
    const SIZE: (u32, u32) = (1400, 600);

    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<(), RenderError> {
        let [components, size] = panels(root, 1, 2)?;
        self.components(&components)?;
        self.network_size(&size)
    }
}

/// Histogram of RNA degrees at the network threshold.
#[derive(Debug, Clone, Copy)]
pub struct DegreeDistributionFigure<'a>(pub &'a SupplementalAnalysis);

impl Figure for DegreeDistributionFigure<'_> {
    const STEM: &'static str = "degree_distribution";
    const SIZE: (u32, u32) = (900, 650);

    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<(), RenderError> {
        let Self(analysis) = *self;
        let caption = format!(
            "RNA Degree Distribution (threshold {:.2})",
            analysis.network_threshold
        );
        if analysis.max_degree_rna == 0 {
            return empty_panel(root, &caption, "No RNA edges at this threshold");
        }

        let counts = analysis.rna_degree_counts();
        let y_range = log_range(counts.iter().map(|&genes| count(genes)));
        let base = y_range.start;
        let mut chart = ChartBuilder::on(root)
            .caption(caption, (FONT, 22))
            .margin(20)
            .x_label_area_size(40)
            .y_label_area_size(70)
            .build_cartesian_2d((0..counts.len()).into_segmented(), y_range.log_scale())?;
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_label_formatter(&|value: &SegmentValue<usize>| match value {
                SegmentValue::CenterOf(degree) => degree.to_string(),
                _ => String::new(),
            })
            .x_desc("Degree")
            .y_desc("Number of Genes")
            .draw()?;
        chart.draw_series(
            counts
                .iter()
                .enumerate()
                .filter(|&(_, &genes)| genes > 0)
                .map(|(degree, &genes)| {
                    let mut bar = Rectangle::new(
                        [
                            (SegmentValue::Exact(degree), base),
                            (SegmentValue::Exact(degree + 1), count(genes)),
                        ],
                        LIGHT_SALMON.filled(),
                    );
                    bar.set_margin(0, 0, 2, 2);
                    bar
                }),
        )?;
        Ok(())
    }
}

/// GNN against traditional pipeline metrics.
#[derive(Debug, Clone, Copy)]
pub struct ComparisonFigure {
    /// GNN pipeline metrics.
    pub gnn: PipelineMetrics,
    /// Traditional pipeline metrics.
    pub traditional: PipelineMetrics,
}

impl Figure for ComparisonFigure {
    const STEM: &'static str = "gnn_vs_traditional_comprehensive";
    const SIZE: (u32, u32) = (1500, 1200);

    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<(), RenderError> {
        let Self { gnn, traditional } = self;
        let body = root.titled("GNN vs Traditional Pipeline", (FONT, TITLE_SIZE))?;
        let [time, silhouette, predictions, similarity] = panels(&body, 2, 2)?;
        let colours = [LIGHT_BLUE, LIGHT_CORAL];
        log_bar_panel(
            &time,
            &pipeline_bars(
                "Processing Time",
                "Seconds (log scale)",
                &[gnn.time_seconds, traditional.time_seconds],
                &colours,
            ),
        )?;
        bar_panel(
            &silhouette,
            &pipeline_bars(
                "Clustering Quality",
                "Silhouette Score",
                &[gnn.silhouette_score, traditional.silhouette_score],
                &colours,
            ),
        )?;
        log_bar_panel(
            &predictions,
            &pipeline_bars(
                "High-Confidence Predictions",
                "Predictions (log scale)",
                &[
                    count_u64(gnn.high_confidence_predictions),
                    count_u64(traditional.high_confidence_predictions),
                ],
                &colours,
            ),
        )?;
        bar_panel(
            &similarity,
            &pipeline_bars(
                "Mean Similarity",
                "Mean Similarity Score",
                &[gnn.mean_similarity, traditional.mean_similarity],
                &colours,
            ),
        )
    }
}

/// Cross-cutting summary of the comparison, tissue sweep and power law.
#[derive(Debug, Clone, Copy)]
pub struct FinalSummaryFigure<'a> {
    /// GNN and traditional metrics from the comparison document.
    pub comparison: Option<(PipelineMetrics, PipelineMetrics)>,
    /// This run's tissue sweep.
    pub tissue: Option<&'a TissueNetwork>,
    /// This run's power-law fit.
    pub powerlaw: Option<&'a PowerLawFit>,
}

impl FinalSummaryFigure<'_> {
    fn powerlaw_panel<DB: DrawingBackend>(&self, area: &DrawingArea<DB, Shift>) -> Result<(), RenderError> {
        const CAPTION: &str = "Power Law Analysis";
        let Some(fit) = self.powerlaw else {
            return empty_panel(area, CAPTION, "No power-law fit available");
        };
        let inner = area.titled(CAPTION, (FONT, 20))?;
        let r_squared = fit
            .r_squared
            .map_or_else(|| "n/a".to_owned(), |r_squared| format!("{r_squared:.3}"));
        text_at(&inner, &format!("α = {:.3}", fit.alpha), (0.35, 0.35), 26)?;
        text_at(&inner, &format!("R² = {r_squared}"), (0.35, 0.5), 26)?;
        text_at(
            &inner,
            &format!("{} degree bins", fit.points.len()),
            (0.35, 0.65),
            18,
        )
    }
}

impl Figure for FinalSummaryFigure<'_> {
    const STEM: &'static str = "final_experimental_summary";
    const SIZE: (u32, u32) = (1600, 1200);

    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<(), RenderError> {
        let body = root.titled("Experimental Summary", (FONT, TITLE_SIZE))?;
        let [time, silhouette, edges, powerlaw] = panels(&body, 2, 2)?;
        let colours = [SKY_BLUE, LIGHT_CORAL];

        match &self.comparison {
            Some((gnn, traditional)) => {
                log_bar_panel(
                    &time,
                    &pipeline_bars(
                        "Processing Time",
                        "Seconds (log scale)",
                        &[gnn.time_seconds, traditional.time_seconds],
                        &colours,
                    ),
                )?;
                bar_panel(
                    &silhouette,
                    &pipeline_bars(
                        "Clustering Quality",
                        "Silhouette Score",
                        &[gnn.silhouette_score, traditional.silhouette_score],
                        &colours,
                    ),
                )?;
            }
            None => {
                empty_panel(&time, "Processing Time", "No comparison results available")?;
                empty_panel(&silhouette, "Clustering Quality", "No comparison results available")?;
            }
        }

        match self.tissue {
            Some(tissue) => log_line_panel(
                &edges,
                Axes {
                    caption: "TEC Network Edges vs Threshold",
                    x_desc: "Correlation Threshold",
                    y_desc: "Number of Edges",
                },
                threshold_range(&tissue.threshold),
                &[Line::new(
                    "TEC",
                    SKY_BLUE,
                    Marker::Circle,
                    threshold_points(&tissue.threshold, &tissue.tec_edges),
                )],
            )?,
            None => empty_panel(&edges, "TEC Network Edges vs Threshold", "No tissue sweep available")?,
        }

        self.powerlaw_panel(&powerlaw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    fn threshold_points_pair_values_in_order() {
        let points = threshold_points(&[0.9, 0.8], &[1, 4]);
        assert_eq!(points.len(), 2);
        assert!((points[0].0 - 0.9).abs() < 1e-6);
        assert!((points[1].1 - 4.0).abs() < f64::EPSILON);
    }

    #[rstest]
    fn index_points_use_positions() {
        assert_eq!(index_points(&[3, 0]), vec![(0.0, 3.0), (1.0, 0.0)]);
    }
}

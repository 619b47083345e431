//! Unit tests for argument parsing and command execution.

use std::io::Cursor;

use clap::Parser;
use genenet_core::AnalysisError;
use genenet_test_support::{
    fixtures::{block_tables, write_store},
    tracing::RecordingLayer,
};
use rstest::rstest;

use super::commands::run_command;
use super::test_helpers::{
    OUTPUT_DIR, STORE_FILE, command_in, run_command_expecting_error, temp_dir,
};
use super::{Cli, CliError, Command, run_cli};
use crate::render::FigureFormat;
use crate::report::{GnnComparison, RESULTS_FILE, render_digest};

type TestResult = Result<(), Box<dyn std::error::Error>>;

#[rstest]
fn run_defaults_match_documented_values() {
    let cli = Cli::try_parse_from(["genenet", "run"]).expect("defaults parse");
    let Command::Run(run) = cli.command;
    assert_eq!(run.store.to_str(), Some("./data/gene_network_data.parquet"));
    assert_eq!(run.output_dir.to_str(), Some("analysis_results"));
    assert_eq!(run.gnn_results.to_str(), Some("gnn_only_results.json"));
    assert_eq!(
        run.comparison_results.to_str(),
        Some("gnn_vs_traditional_comparison.json")
    );
    assert!((run.network_threshold - 0.75).abs() < f32::EPSILON);
    assert_eq!(run.seed, 42);
    assert_eq!(run.max_clusters, 10);
    assert_eq!(run.figure_format, FigureFormat::default());
    assert!(run.sweep_thresholds.is_none());
    assert!(run.supplemental_thresholds.is_none());
}

#[rstest]
fn threshold_lists_split_on_commas() {
    let cli = Cli::try_parse_from([
        "genenet",
        "run",
        "--sweep-thresholds",
        "0.9,0.8,0.7",
        "--supplemental-thresholds=0.95,0.9",
        "--figure-format",
        "svg",
    ])
    .expect("arguments parse");
    let Command::Run(run) = cli.command;
    assert_eq!(run.sweep_thresholds, Some(vec![0.9, 0.8, 0.7]));
    assert_eq!(run.supplemental_thresholds, Some(vec![0.95, 0.9]));
    assert_eq!(run.figure_format, FigureFormat::Svg);
}

#[rstest]
#[case::unknown_format(&["--figure-format", "jpeg"])]
#[case::non_numeric_threshold(&["--network-threshold", "high"])]
#[case::negative_seed(&["--seed", "-1"])]
fn malformed_arguments_are_rejected(#[case] extra: &[&str]) {
    let args = ["genenet", "run"].into_iter().chain(extra.iter().copied());
    assert!(Cli::try_parse_from(args).is_err());
}

#[rstest]
#[case::unordered_sweep(&["--sweep-thresholds", "0.8,0.9,0.85"])]
#[case::single_cluster(&["--max-clusters", "1"])]
#[case::non_finite_network(&["--network-threshold", "NaN"])]
fn invalid_parameters_fail_before_any_output(#[case] extra: &[&str]) {
    let dir = temp_dir();
    let command = command_in(dir.path(), extra);
    let err = run_command_expecting_error(&command, "invalid parameters must fail");
    assert!(matches!(err, CliError::Config(_)), "unexpected error: {err:?}");
    assert!(!dir.path().join(OUTPUT_DIR).exists());
}

#[rstest]
fn unordered_sweep_reports_position() {
    let dir = temp_dir();
    let command = command_in(dir.path(), &["--sweep-thresholds", "0.8,0.9,0.85"]);
    let err = run_command_expecting_error(&command, "unordered sweep must fail");
    assert!(matches!(
        err,
        CliError::Config(AnalysisError::UnorderedThresholds { list: "sweep", index: 2 })
    ));
}

#[rstest]
fn run_writes_report_for_block_store() -> TestResult {
    let dir = temp_dir();
    write_store(&dir.path().join(STORE_FILE), &block_tables());
    let outcome = run_command(&command_in(dir.path(), &[]))?;

    let results = &outcome.results;
    let tissue = results.tissue_network.as_ref().ok_or("tissue sweep missing")?;
    assert_eq!(tissue.threshold.len(), 7);
    let comparison = results.rna_comparison.as_ref().ok_or("comparison missing")?;
    assert_eq!(comparison.tec.edges, 17);
    assert!(results.powerlaw_analysis.is_some());
    assert!(matches!(results.gnn_comparison, Some(GnnComparison::Basic(_))));

    let output = dir.path().join(OUTPUT_DIR);
    let extension = FigureFormat::default().extension();
    for stem in [
        "tissue_network_analysis",
        "rna_comparison_analysis",
        "powerlaw_analysis",
        "supplemental_analysis",
        "degree_distribution",
        "final_experimental_summary",
    ] {
        let name = format!("{stem}.{extension}");
        assert!(output.join(&name).is_file(), "{name} must be written");
    }
    assert!(output.join(RESULTS_FILE).is_file());
    assert!(
        !output
            .join(format!("gnn_vs_traditional_comprehensive.{extension}"))
            .exists()
    );
    assert_eq!(outcome.artefacts.last(), Some(&output.join(RESULTS_FILE)));
    Ok(())
}

#[cfg(feature = "png")]
#[rstest]
fn png_is_the_default_figure_format() {
    let cli = Cli::try_parse_from(["genenet", "run"]).expect("defaults parse");
    let Command::Run(run) = cli.command;
    assert_eq!(run.figure_format, FigureFormat::Png);
}

#[cfg(not(feature = "png"))]
#[rstest]
fn svg_is_the_default_without_png_support() {
    assert_eq!(FigureFormat::default(), FigureFormat::Svg);
}

#[rstest]
fn digest_lists_artefacts_and_findings() -> TestResult {
    let dir = temp_dir();
    write_store(&dir.path().join(STORE_FILE), &block_tables());
    let outcome = run_command(&command_in(dir.path(), &[]))?;

    let mut buffer = Cursor::new(Vec::new());
    render_digest(&outcome, &mut buffer)?;
    let digest = String::from_utf8(buffer.into_inner())?;
    assert!(digest.starts_with("Results saved to "));
    assert!(digest.contains(&format!("- {RESULTS_FILE}\n")));
    assert!(digest.contains("Key findings:"));
    assert!(digest.contains("- Power Law Exponent: α = "));
    assert!(!digest.contains("GNN Training Time"));
    Ok(())
}

#[rstest]
fn run_cli_records_command_span() -> TestResult {
    let dir = temp_dir();
    let run = command_in(dir.path(), &[]);
    let layer = RecordingLayer::default();
    let outcome = layer.record(|| {
        run_cli(Cli {
            command: Command::Run(run),
        })
    })?;
    assert!(outcome.results.tissue_network.is_none());
    let span = layer.span("cli.run").ok_or("cli.run span missing")?;
    assert_eq!(span.fields.get("command").map(String::as_str), Some("run"));
    assert!(layer.has_span("report.run"));
    assert!(layer.has_span("report.tissue_network"));
    Ok(())
}

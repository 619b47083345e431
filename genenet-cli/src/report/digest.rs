//! Human-readable digest of a finished run.

use std::io::{self, Write};

use super::ReportOutcome;

/// Writes the artefact list and key findings of `outcome` to `writer`.
///
/// Findings cover the GNN and traditional metrics when the full comparison
/// ran and the power-law exponent when a fit exists.
///
/// # Errors
/// Returns [`io::Error`] if writing to `writer` fails.
pub fn render_digest(outcome: &ReportOutcome, mut writer: impl Write) -> io::Result<()> {
    writeln!(writer, "Results saved to {}", outcome.output_dir.display())?;
    for artefact in &outcome.artefacts {
        let name = artefact
            .file_name()
            .map_or_else(|| artefact.display().to_string(), |name| name.to_string_lossy().into_owned());
        writeln!(writer, "- {name}")?;
    }

    let full = outcome
        .results
        .gnn_comparison
        .as_ref()
        .and_then(|comparison| comparison.full());
    let powerlaw = outcome.results.powerlaw_analysis.as_ref();
    if full.is_none() && powerlaw.is_none() {
        return Ok(());
    }

    writeln!(writer)?;
    writeln!(writer, "Key findings:")?;
    if let Some(full) = full {
        let (gnn, traditional) = (&full.gnn, &full.traditional);
        writeln!(writer, "- GNN Training Time: {:.1}s", gnn.time_seconds)?;
        writeln!(writer, "- Traditional Processing: {:.1}s", traditional.time_seconds)?;
        writeln!(writer, "- GNN Silhouette Score: {:.4}", gnn.silhouette_score)?;
        writeln!(writer, "- Traditional Silhouette: {:.4}", traditional.silhouette_score)?;
        writeln!(
            writer,
            "- GNN Predictions: {}",
            group_thousands(gnn.high_confidence_predictions)
        )?;
        writeln!(
            writer,
            "- Traditional Predictions: {}",
            group_thousands(traditional.high_confidence_predictions)
        )?;
    }
    if let Some(fit) = powerlaw {
        writeln!(writer, "- Power Law Exponent: α = {:.3}", fit.alpha)?;
    }
    Ok(())
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    #[case(0, "0")]
    #[case(999, "999")]
    #[case(1_000, "1,000")]
    #[case(15_234, "15,234")]
    #[case(1_234_567, "1,234,567")]
    fn thousands_are_grouped(#[case] value: u64, #[case] expected: &str) {
        assert_eq!(group_thousands(value), expected);
    }
}

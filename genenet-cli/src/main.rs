//! CLI entry point for the genenet report generator.
//!
//! Parses command-line arguments with clap, runs every analysis stage,
//! prints the digest to stdout and maps errors to a failing exit code.
//! Logging is initialised eagerly so every stage can emit structured
//! diagnostics via `tracing`.

use std::io::{self, BufWriter, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use genenet_cli::{
    cli::{Cli, CliError, run_cli},
    logging::{self, LoggingError},
    report::render_digest,
};
use tracing::{error, field};

/// Parse CLI arguments, run the report, print the digest and flush stdout.
fn try_main() -> Result<()> {
    let cli = Cli::parse();
    let outcome = run_cli(cli).context("failed to execute command")?;
    let stdout = io::stdout();
    let mut writer = BufWriter::new(stdout.lock());
    render_digest(&outcome, &mut writer).context("failed to render digest")?;
    writer.flush().context("failed to flush output")?;
    Ok(())
}

fn main() -> ExitCode {
    if let Err(err) = logging::init_logging() {
        report_logging_init_error(&err);
        return ExitCode::FAILURE;
    }

    if let Err(err) = try_main() {
        let (code, matrix_code) = err
            .downcast_ref::<CliError>()
            .and_then(|cli_error| match cli_error {
                CliError::Config(config) => Some((Some(config.code()), config.matrix_code())),
                CliError::Report(_) => None,
            })
            .unwrap_or((None, None));

        let code_field = code.map(|code| field::display(code.as_str()));
        let matrix_code_field = matrix_code.map(|code| field::display(code.as_str()));

        error!(
            error = %err,
            code = code_field,
            matrix_code = matrix_code_field,
            "command execution failed"
        );
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

#[expect(
    clippy::print_stderr,
    reason = "Emit one-off diagnostic before tracing is initialised"
)]
fn report_logging_init_error(err: &LoggingError) {
    eprintln!("failed to initialise logging: {err}");
}

//! Command-line interface for the genenet report generator.
//!
//! The CLI offers a single `run` command that executes every analysis stage
//! against a Parquet correlation store and writes the report.

mod commands;

pub use commands::{Cli, CliError, Command, RunCommand, run_cli};

#[cfg(test)]
mod test_helpers;
#[cfg(test)]
mod tests;

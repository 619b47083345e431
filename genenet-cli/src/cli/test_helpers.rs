//! Small helpers shared across CLI tests.

use std::ffi::OsString;
use std::path::Path;

use clap::Parser;
use tempfile::TempDir;

use super::commands::run_command;
use super::{Cli, CliError, Command, RunCommand};

pub(super) const STORE_FILE: &str = "store.parquet";
pub(super) const OUTPUT_DIR: &str = "out";

pub(super) fn temp_dir() -> TempDir {
    match TempDir::new() {
        Ok(dir) => dir,
        Err(err) => panic!("failed to create temp dir: {err}"),
    }
}

/// Parses a `run` command whose inputs and outputs all live under `dir`.
pub(super) fn command_in(dir: &Path, extra: &[&str]) -> RunCommand {
    let mut args: Vec<OsString> = vec!["genenet".into(), "run".into()];
    for (flag, name) in [
        ("--store", STORE_FILE),
        ("--output-dir", OUTPUT_DIR),
        ("--gnn-results", "gnn_only_results.json"),
        ("--comparison-results", "gnn_vs_traditional_comparison.json"),
    ] {
        args.push(flag.into());
        args.push(dir.join(name).into_os_string());
    }
    args.extend(extra.iter().map(OsString::from));
    match Cli::try_parse_from(args) {
        Ok(Cli {
            command: Command::Run(run),
        }) => run,
        Err(err) => panic!("arguments must parse: {err}"),
    }
}

pub(super) fn run_command_expecting_error(cmd: &RunCommand, panic_msg: &str) -> CliError {
    match run_command(cmd) {
        Ok(_) => panic!("{panic_msg}"),
        Err(err) => err,
    }
}

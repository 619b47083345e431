//! Support library for the genenet CLI binary.
//!
//! Exposes the argument parser, the report pipeline and its renderers so
//! integration tests can drive a full run without forking a subprocess.

pub mod cli;
pub mod logging;
pub mod render;
pub mod report;

//! Shared test utilities used across genenet crates.

pub mod fixtures;
pub mod tracing;

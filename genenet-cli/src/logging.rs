//! Logging initialisation for the genenet CLI.
//!
//! Installs a global `tracing` subscriber writing to `stderr`, so the digest
//! on `stdout` stays clean, and bridges the `log` facade into it.

use std::{env, sync::OnceLock};

use thiserror::Error;
use tracing_log::LogTracer;
use tracing_subscriber::{
    EnvFilter, Layer, fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt,
};

/// Environment variable selecting the log format.
pub const LOG_FORMAT_ENV: &str = "GENENET_LOG_FORMAT";

const DEFAULT_FILTER: &str = "info";

static INITIALISED: OnceLock<LogFormat> = OnceLock::new();

/// Output format of the installed subscriber.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Human,
    /// One JSON object per event, with the current span and span list.
    Json,
}

impl LogFormat {
    /// Parses a format name, ignoring case and surrounding whitespace.
    ///
    /// # Errors
    /// Returns [`LoggingError::UnsupportedFormat`] for anything other than
    /// `human` or `json`.
    pub fn parse(raw: &str) -> Result<Self, LoggingError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "human" => Ok(Self::Human),
            "json" => Ok(Self::Json),
            other => Err(LoggingError::UnsupportedFormat {
                provided: other.to_owned(),
            }),
        }
    }

    /// Reads the format from [`LOG_FORMAT_ENV`], defaulting to human output.
    ///
    /// # Errors
    /// Returns [`LoggingError`] when the variable is not valid Unicode or
    /// names an unsupported format.
    pub fn from_env() -> Result<Self, LoggingError> {
        match env::var(LOG_FORMAT_ENV) {
            Ok(raw) => Self::parse(&raw),
            Err(env::VarError::NotPresent) => Ok(Self::default()),
            Err(source @ env::VarError::NotUnicode(_)) => Err(LoggingError::InvalidUnicode {
                name: LOG_FORMAT_ENV,
                source,
            }),
        }
    }
}

/// Errors raised while initialising structured logging.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// Environment variable contained invalid UTF-8 data.
    #[error("environment variable `{name}` contained invalid UTF-8: {source}")]
    InvalidUnicode {
        /// Name of the offending environment variable.
        name: &'static str,
        /// Underlying parse failure.
        #[source]
        source: env::VarError,
    },
    /// Unsupported log format requested via `GENENET_LOG_FORMAT`.
    #[error("unsupported log format `{provided}`; expected `human` or `json`")]
    UnsupportedFormat {
        /// Raw value supplied by the user.
        provided: String,
    },
    /// Failed to install the global tracing subscriber.
    #[error("failed to install tracing subscriber: {source}")]
    InstallFailed {
        /// Error raised by `tracing_subscriber`.
        #[source]
        source: tracing_subscriber::util::TryInitError,
    },
}

/// Install global structured logging unless it is already configured.
///
/// `RUST_LOG` controls the filter (default `info`) and
/// `GENENET_LOG_FORMAT=json` switches to JSON lines. A subscriber installed
/// elsewhere in the process is kept rather than treated as an error.
///
/// # Errors
/// Returns [`LoggingError`] if the format variable is invalid.
pub fn init_logging() -> Result<LogFormat, LoggingError> {
    if let Some(format) = INITIALISED.get() {
        return Ok(*format);
    }

    let format = LogFormat::from_env()?;
    match install_subscriber(format) {
        Ok(()) => {}
        Err(LoggingError::InstallFailed { source }) => {
            tracing::debug!(error = %source, "tracing subscriber already installed");
        }
        Err(err) => return Err(err),
    }
    Ok(*INITIALISED.get_or_init(|| format))
}

fn install_subscriber(format: LogFormat) -> Result<(), LoggingError> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(std::io::stderr);

    let fmt_layer = match format {
        LogFormat::Json => fmt_layer
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .boxed(),
        LogFormat::Human => fmt_layer.boxed(),
    };

    // Another logger may already own the `log` slot; keep it if so.
    if LogTracer::init().is_err() {
        tracing::debug!("log facade already bridged");
    }

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|source| LoggingError::InstallFailed { source })
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    #[case("human", LogFormat::Human)]
    #[case("HUMAN", LogFormat::Human)]
    #[case(" json ", LogFormat::Json)]
    #[case("Json\n", LogFormat::Json)]
    fn parse_accepts_supported_values(#[case] raw: &str, #[case] expected: LogFormat) {
        let format = LogFormat::parse(raw).expect("format must parse");
        assert_eq!(format, expected);
    }

    #[rstest]
    #[case("xml")]
    #[case("")]
    fn parse_rejects_unknown_values(#[case] raw: &str) {
        let err = LogFormat::parse(raw).expect_err("format must be rejected");
        match err {
            LoggingError::UnsupportedFormat { provided } => assert_eq!(provided, raw.trim()),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn init_logging_is_idempotent() {
        let first = init_logging().expect("logging must initialise");
        let second = init_logging().expect("subsequent calls must be no-ops");
        assert_eq!(first, second);
    }
}

//! Structured logging setup for the controller binary.

use std::str::FromStr;

use thiserror::Error;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Filter used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "info,kube=warn";

/// Output format for log lines.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum LogFormat {
    /// Human readable lines.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

impl FromStr for LogFormat {
    type Err = TelemetryError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(TelemetryError::UnknownFormat(other.to_owned())),
        }
    }
}

/// Errors raised while initialising logging.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum TelemetryError {
    /// Raised for an unsupported log format name.
    #[error("unknown log format: {0}")]
    UnknownFormat(String),
    /// Raised when a global subscriber is already installed.
    #[error("failed to initialise tracing subscriber: {0}")]
    SubscriberInit(String),
}

/// Installs the global tracing subscriber. Log lines go to stderr so command
/// output on stdout stays machine readable.
///
/// # Errors
///
/// Returns [`TelemetryError::SubscriberInit`] when a subscriber is already
/// installed.
pub fn init_tracing(format: LogFormat) -> Result<(), TelemetryError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let registry = tracing_subscriber::registry().with(filter);
    let result = match format {
        LogFormat::Text => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
    };
    result.map_err(|err| TelemetryError::SubscriberInit(err.to_string()))
}

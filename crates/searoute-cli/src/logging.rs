//! Logging setup for the CLI.
//!
//! Logs go to stderr so route output on stdout stays machine-readable.
//!
//! # Environment Variables
//!
//! - `SEAROUTE_LOG_FORMAT`: `text` (default) or `json`, used when
//!   `--log-format` is not given
//! - `RUST_LOG`: Log level filter (default: `info`)

use clap::ValueEnum;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable selecting the log format.
pub const LOG_FORMAT_ENV: &str = "SEAROUTE_LOG_FORMAT";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    /// Human-readable text logging.
    #[default]
    Text,
    /// JSON structured logging, one object per line.
    Json,
}

impl LogFormat {
    /// Parse a log format name.
    ///
    /// Accepts "json", "text", or "pretty" (alias for text), ignoring case.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "json" => Some(LogFormat::Json),
            "text" | "pretty" => Some(LogFormat::Text),
            _ => None,
        }
    }

    /// Pick the explicit format, then the environment, then the default.
    pub fn resolve(explicit: Option<LogFormat>) -> Self {
        explicit
            .or_else(|| {
                std::env::var(LOG_FORMAT_ENV)
                    .ok()
                    .and_then(|value| Self::parse(&value))
            })
            .unwrap_or_default()
    }
}

/// Install the global tracing subscriber.
///
/// Calling this more than once leaves the first subscriber in place.
pub fn init_logging(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    let result = match format {
        LogFormat::Text => registry
            .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
            .try_init(),
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(false)
                    .with_span_list(false)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
    };

    if result.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}

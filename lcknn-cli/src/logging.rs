//! Structured logging for the lcknn binary.
//!
//! The binary writes reports to `stdout` and everything else through one
//! `tracing` registry on `stderr`, as terminal lines or JSON objects.

use std::{env, str::FromStr, sync::OnceLock};

use thiserror::Error;
use tracing_log::LogTracer;
use tracing_subscriber::{
    EnvFilter, Layer, fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt,
};

const LOG_FORMAT_ENV: &str = "LCKNN_LOG_FORMAT";

static INITIALISED: OnceLock<()> = OnceLock::new();

/// Why diagnostics could not be routed through `tracing`.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// `LCKNN_LOG_FORMAT` held bytes that are not UTF-8.
    #[error("`{name}` is not valid UTF-8: {source}")]
    InvalidUnicode {
        /// Variable that was read.
        name: &'static str,
        /// Lookup failure reported by the standard library.
        #[source]
        source: env::VarError,
    },
    /// `LCKNN_LOG_FORMAT` named neither `human` nor `json`.
    #[error("unsupported log format `{provided}`; expected `human` or `json`")]
    UnsupportedFormat {
        /// Normalised value that was rejected.
        provided: String,
    },
    /// The registry refused to become the global default.
    #[error("could not register the diagnostics subscriber: {source}")]
    InstallFailed {
        /// Refusal reported by `tracing_subscriber`.
        #[source]
        source: tracing_subscriber::util::TryInitError,
    },
}

/// Shape of the lines written to `stderr`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum LogFormat {
    /// Compact single-line events for terminals.
    Human,
    /// One JSON object per event, with the enclosing span stack.
    Json,
}

impl FromStr for LogFormat {
    type Err = LoggingError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "human" => Ok(Self::Human),
            "json" => Ok(Self::Json),
            other => Err(LoggingError::UnsupportedFormat {
                provided: other.to_owned(),
            }),
        }
    }
}

impl LogFormat {
    /// Reads `LCKNN_LOG_FORMAT`, treating an unset variable as `human`.
    fn from_env() -> Result<Self, LoggingError> {
        match env::var(LOG_FORMAT_ENV) {
            Ok(raw) => raw.parse(),
            Err(env::VarError::NotPresent) => Ok(Self::Human),
            Err(source) => Err(LoggingError::InvalidUnicode {
                name: LOG_FORMAT_ENV,
                source,
            }),
        }
    }
}

/// Routes every diagnostic of the `lcknn` binary, including `log` records
/// from dependencies, to `stderr` so command reports own `stdout`.
///
/// Levels come from `RUST_LOG` (default `info`) and the line shape from
/// `LCKNN_LOG_FORMAT`. Closed spans are logged, which gives build, query and
/// update phases their timings. Calling this again is a no-op.
///
/// # Errors
/// Returns [`LoggingError`] for an unreadable or unknown
/// `LCKNN_LOG_FORMAT`. When some other subscriber already owns the global
/// slot, that is noted on `stderr` and the existing one stays in charge.
pub fn init_logging() -> Result<(), LoggingError> {
    if INITIALISED.get().is_some() {
        return Ok(());
    }

    match install_subscriber(LogFormat::from_env()?) {
        Ok(()) => {}
        Err(LoggingError::InstallFailed { source }) => report_existing_subscriber(&source),
        Err(err) => return Err(err),
    }
    INITIALISED.get_or_init(|| ());
    Ok(())
}

#[expect(
    clippy::print_stderr,
    reason = "tracing is owned by another subscriber at this point"
)]
fn report_existing_subscriber(source: &tracing_subscriber::util::TryInitError) {
    eprintln!("lcknn diagnostics stay with the existing subscriber: {source}");
}

fn install_subscriber(format: LogFormat) -> Result<(), LoggingError> {
    let levels = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let events = tracing_subscriber::fmt::layer()
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false)
        .with_writer(std::io::stderr);
    let events = match format {
        LogFormat::Json => events
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .boxed(),
        LogFormat::Human => events.boxed(),
    };

    // A logger installed first keeps the `log` slot.
    if LogTracer::init().is_err() {
        tracing::debug!("log bridge already installed");
    }

    tracing_subscriber::registry()
        .with(levels)
        .with(events)
        .try_init()
        .map_err(|source| LoggingError::InstallFailed { source })
}

//! Tracing subscriber setup for the command-line binary.
//!
//! The library only emits `tracing` events; installing a subscriber is left
//! to whoever embeds it.

use std::sync::OnceLock;

use tracing_subscriber::filter::ParseError;
use tracing_subscriber::{EnvFilter, Registry, fmt, prelude::*};

static INSTALLED: OnceLock<()> = OnceLock::new();

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    /// The fallback directive (e.g. `--log-level`) is not a valid filter.
    #[error("Invalid log directive '{directive}': {source}")]
    InvalidDirective {
        directive: String,
        source: ParseError,
    },
    #[error("Failed to install global tracing subscriber: {0}")]
    SetGlobal(tracing::subscriber::SetGlobalDefaultError),
}

/// Installs a stderr subscriber filtered by `RUST_LOG`, or by
/// `default_directive` when `RUST_LOG` is unset or invalid.
///
/// Subsequent calls are no-ops.
pub fn init(default_directive: &str) -> Result<(), LoggingError> {
    if INSTALLED.get().is_some() {
        return Ok(());
    }

    let env_filter = build_env_filter(default_directive)?;
    let stderr_layer = fmt::layer().with_target(false).with_writer(std::io::stderr);

    let subscriber = Registry::default().with(env_filter).with(stderr_layer);
    tracing::subscriber::set_global_default(subscriber).map_err(LoggingError::SetGlobal)?;
    let _ = INSTALLED.set(());

    tracing::debug!(default_directive, "logging initialized");
    Ok(())
}

fn build_env_filter(default_directive: &str) -> Result<EnvFilter, LoggingError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(default_directive).map_err(|source| LoggingError::InvalidDirective {
        directive: default_directive.to_string(),
        source,
    })
}

//! Console logging for pipeline runs.
//!
//! Stages log through the `tracing` macros; the binary installs a
//! subscriber once at start-up:
//!
//! ```no_run
//! student_prep::logging::init().expect("Failed to initialise logging");
//! tracing::info!("Run started");
//! ```
//!
//! The level defaults to `info` and can be overridden with `RUST_LOG`, e.g.
//! `RUST_LOG=student_prep=debug` to see per-stage statistics.

use crate::error::{PrepError, Result};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _};

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "info";

/// Build the level filter from `RUST_LOG`, falling back to [`DEFAULT_FILTER`].
///
/// # Errors
///
/// Fails if neither directive string parses.
pub fn env_filter() -> Result<EnvFilter> {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(DEFAULT_FILTER))
        .map_err(|e| PrepError::Config(format!("Invalid log filter: {e}")))
}

/// Install the global subscriber writing to stderr.
///
/// # Errors
///
/// Fails if the filter is invalid or a subscriber is already installed.
pub fn init() -> Result<()> {
    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(env_filter()?)
        .with(stderr_layer)
        .try_init()
        .map_err(|e| PrepError::Other(format!("Failed to initialise logging: {e}")))?;

    tracing::debug!("Logging initialised");
    Ok(())
}

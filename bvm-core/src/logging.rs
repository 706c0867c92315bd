//! Logging setup for applications embedding the assessment library.
//!
//! The library itself only emits `tracing` events; installing a subscriber
//! is left to the caller.

use crate::error::{BvmError, Result};

/// Maps CLI-style verbosity flags to a tracing level.
fn level_for(verbose: u8, quiet: bool) -> tracing::Level {
    match (quiet, verbose) {
        (true, _) => tracing::Level::ERROR,
        (false, 0) => tracing::Level::INFO,
        (false, 1) => tracing::Level::DEBUG,
        (false, _) => tracing::Level::TRACE,
    }
}

/// Installs a compact stderr subscriber for the assessment events.
///
/// What each level shows:
/// - `ERROR`: internal consistency failures that abort a run
/// - `WARN`: clamped risk thresholds and threshold violations
/// - `DEBUG`: one summary per assessment (records, classes, attributes)
/// - `TRACE`: every folded equivalence class, noisy on large tables
///
/// `quiet` wins over `verbose`; otherwise 0 selects `INFO`, 1 `DEBUG` and
/// anything higher `TRACE`. Fails with [`BvmError::Configuration`] when a
/// global subscriber is already installed.
///
/// ```rust,no_run
/// bvm_core::logging::init_logging(1, false)?;
/// # Ok::<(), bvm_core::BvmError>(())
/// ```
pub fn init_logging(verbose: u8, quiet: bool) -> Result<()> {
    tracing_subscriber::fmt()
        .compact()
        .with_writer(std::io::stderr)
        .with_max_level(level_for(verbose, quiet))
        .with_target(false)
        .try_init()
        .map_err(|e| BvmError::configuration(format!("cannot install log subscriber: {e}")))
}

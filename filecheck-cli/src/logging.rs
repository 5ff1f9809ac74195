//! Tracing subscriber setup for the `filecheck` binary.

use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is unset. Per-file lines are emitted at
/// `info` only in verbose mode, so this keeps them hidden otherwise.
const DEFAULT_FILTER: &str = "info";

/// Install a stderr `fmt` subscriber filtered by `RUST_LOG`.
///
/// Stdout carries the summary and the invalid-file listing, so logs never go
/// there. If a global subscriber is already installed it is kept, and the
/// refusal is reported through it.
pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
    if let Err(err) = installed {
        debug!(error = %err, "keeping the existing tracing subscriber");
    }
}

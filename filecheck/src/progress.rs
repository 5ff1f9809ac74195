//! Scan progress reporting.
//!
//! Two tiers: checkpoints, validator failures, walk errors and interruption
//! are always emitted; per-file lines are emitted at `info` only when verbose
//! (otherwise at `debug`).

use std::io;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::report::ScanCounters;

/// Emit a running-totals checkpoint every this many scanned files.
pub const CHECKPOINT_INTERVAL: usize = 1000;

/// Whether a scan that has just counted its `total_scanned`-th file owes a
/// checkpoint.
#[must_use]
pub const fn is_checkpoint(total_scanned: usize) -> bool {
    total_scanned != 0 && total_scanned.is_multiple_of(CHECKPOINT_INTERVAL)
}

/// Logging configuration threaded through a scan.
#[derive(Debug, Clone, Default)]
pub struct ProgressLog {
    verbose: bool,
}

#[allow(clippy::unused_self)]
impl ProgressLog {
    /// Per-file lines go to `info` when `verbose`, to `debug` otherwise.
    #[must_use]
    pub const fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// A file matched an exclusion pattern.
    pub fn excluded(&self, path: &Path) {
        if self.verbose {
            info!(path = %path.display(), "excluded");
        } else {
            debug!(path = %path.display(), "excluded");
        }
    }

    /// A file has no registered format.
    pub fn unsupported(&self, path: &Path, extension: &str) {
        if self.verbose {
            info!(path = %path.display(), extension, "unsupported format");
        } else {
            debug!(path = %path.display(), extension, "unsupported format");
        }
    }

    /// A validator accepted a file.
    pub fn valid(&self, path: &Path, format: &str) {
        if self.verbose {
            info!(path = %path.display(), format, "valid");
        } else {
            debug!(path = %path.display(), format, "valid");
        }
    }

    /// A validator rejected a file.
    pub fn invalid(&self, path: &Path, format: &str, reason: &str) {
        if self.verbose {
            info!(path = %path.display(), format, reason, "invalid");
        } else {
            debug!(path = %path.display(), format, reason, "invalid");
        }
    }

    /// A validator could not decide; always emitted.
    pub fn validator_error(&self, path: &Path, format: &str, cause: &str) {
        warn!(path = %path.display(), format, cause, "validator failed, counting file as invalid");
    }

    /// Hashing a file failed; the record is written without a digest.
    pub fn digest_failed(&self, path: &Path, err: &io::Error) {
        warn!(path = %path.display(), error = %err, "digest failed");
    }

    /// The walker could not read an entry; always emitted.
    pub fn walk_error(&self, err: &walkdir::Error) {
        match err.path() {
            Some(path) => warn!(path = %path.display(), error = %err, "skipping unreadable path"),
            None => warn!(error = %err, "skipping unreadable path"),
        }
    }

    /// Running totals every [`CHECKPOINT_INTERVAL`] scanned files, whatever
    /// the verbosity.
    pub fn checkpoint(&self, counters: &ScanCounters) {
        if !is_checkpoint(counters.total_scanned) {
            return;
        }
        info!(
            scanned = counters.total_scanned,
            invalid = counters.total_invalid,
            unsupported = counters.total_unsupported,
            "checkpoint"
        );
    }

    /// The cancel flag stopped the scan early.
    pub fn interrupted(&self, counters: &ScanCounters) {
        warn!(
            scanned = counters.total_scanned,
            invalid = counters.total_invalid,
            "scan interrupted, returning partial results"
        );
    }
}

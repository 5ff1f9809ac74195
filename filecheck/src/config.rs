//! Configuration for one scan invocation.
//!
//! Fields are filled one by one on a `Default` value; the scan validates the
//! whole configuration before it visits any file.

use std::path::PathBuf;

/// Default ledger location, relative to the working directory.
pub const DEFAULT_TRACKING_FILE: &str = "tracking.jsonl";

/// Tracking ledger options.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct TrackingConfig {
    /// Record every visited file in the ledger (default: `false`).
    pub enabled: bool,
    /// Ledger location (default: `tracking.jsonl`).
    pub path: PathBuf,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            path: PathBuf::from(DEFAULT_TRACKING_FILE),
        }
    }
}

/// Options for one scan.
///
/// NOTE: `roots` is required and must be non-empty; every root must exist.
#[derive(Debug, Clone, Default)]
#[non_exhaustive]
pub struct ScanConfig {
    /// Files or directories to scan.
    pub roots: Vec<PathBuf>,
    /// Optional file of glob patterns, one per line. When set, the file must
    /// exist.
    pub exclude_file: Option<PathBuf>,
    /// Where the invalid-file listing goes; standard output when `None`.
    pub output_file: Option<PathBuf>,
    /// Tracking ledger options.
    pub tracking: TrackingConfig,
    /// Compute a prefix digest of each scanned file for the ledger.
    pub digest: bool,
    /// Emit one log line per file instead of only checkpoints and errors.
    pub verbose: bool,
    /// Follow symbolic links while walking (default: `false`).
    pub follow_links: bool,
    /// Maximum directory depth below each root; `None` for unlimited.
    pub max_depth: Option<usize>,
}

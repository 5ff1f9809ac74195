//! Error types for file integrity scanning.
//!
//! Only configuration problems and ledger storage failures surface as errors.
//! Per-file problems (unsupported formats, corrupt content, misbehaving
//! validators) are outcomes, counted in the report and never returned here.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A fatal configuration problem, detected before any file is visited.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// No root paths were given.
    #[error("No paths provided for scanning")]
    NoRoots,

    /// A root path does not exist.
    #[error("Path does not exist: {}", .0.display())]
    MissingRoot(PathBuf),

    /// A root path exists but could not be made absolute.
    #[error("Failed to resolve path {}: {source}", .path.display())]
    ResolveRoot {
        /// The root as given.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// An exclude pattern file was requested but does not exist.
    #[error("Exclude pattern file does not exist: {}", .0.display())]
    MissingExcludeFile(PathBuf),

    /// The exclude pattern file exists but could not be read.
    #[error("Failed to read exclude pattern file {}: {source}", .path.display())]
    ReadExcludeFile {
        /// The pattern file.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// A line of the exclude pattern file is not a valid glob.
    #[error("Invalid exclude glob pattern '{pattern}': {source}")]
    InvalidExcludePattern {
        /// The offending pattern, trimmed.
        pattern: String,
        /// Parser diagnostic.
        #[source]
        source: glob::PatternError,
    },

    /// The tracking ledger could not be opened for appending.
    #[error("Failed to open tracking ledger {}: {source}", .path.display())]
    OpenLedger {
        /// The ledger path.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
}

/// Rejected format registration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RegistryError {
    /// The extension already resolves to a format.
    #[error("Extension '{extension}' is already registered to format '{existing}'")]
    DuplicateExtension {
        /// Normalized extension (lower-case, no dot).
        extension: String,
        /// Logical name of the format that owns it.
        existing: String,
    },

    /// A format with this logical name is already registered.
    #[error("Format '{0}' is already registered")]
    DuplicateFormat(String),

    /// A format was registered without any extension.
    #[error("Format '{0}' must declare at least one extension")]
    NoExtensions(String),
}

/// A scan that could not run to completion.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ScanError {
    /// The scan was misconfigured; nothing was scanned.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Appending to the tracking ledger failed mid-scan. Records appended
    /// before the failure remain in the ledger.
    #[error("Failed to append to tracking ledger {}: {source}", .path.display())]
    Ledger {
        /// The ledger path.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
}

impl ScanError {
    /// Whether this error was raised before the walk began.
    #[must_use]
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

//! # filecheck
//!
//! Bulk integrity scanning: walk a file tree once, classify every file by
//! extension, run the format's validator, and account for every outcome.
//!
//! The crate separates the **dispatch contract** (`FormatRegistry` and
//! `FormatValidator`) from the **scan pipeline** (`Scanner`). Concrete
//! validators live outside this crate and plug into the registry, so the
//! pipeline is testable with fake validators.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::path::{Path, PathBuf};
//! use filecheck::{FormatRegistry, ScanConfig, ValidationOutcome, scan};
//!
//! let mut registry = FormatRegistry::new();
//! registry
//!     .register("text", &["txt"], |path: &Path| match std::fs::read_to_string(path) {
//!         Ok(_) => ValidationOutcome::Valid,
//!         Err(e) => ValidationOutcome::from_io_error(&e),
//!     })
//!     .unwrap();
//!
//! let mut config = ScanConfig::default();
//! config.roots = vec![PathBuf::from("docs")];
//!
//! let report = scan(&registry, &config).unwrap();
//! println!("Files scanned: {}", report.total_scanned());
//! println!("Invalid files: {}", report.total_invalid());
//! println!("Unsupported:   {}", report.total_unsupported());
//! ```

mod classify;
mod config;
pub mod digest;
mod error;
pub mod output;
mod progress;
mod registry;
mod report;
mod scan;
pub mod strategy;
pub mod tracking;
mod validator;

pub use classify::{Classification, extension_of};
pub use config::{DEFAULT_TRACKING_FILE, ScanConfig, TrackingConfig};
pub use error::{ConfigError, RegistryError, ScanError};
pub use progress::{CHECKPOINT_INTERVAL, ProgressLog};
pub use registry::{FormatDescriptor, FormatRegistry, ResolvedFormat, normalize_extension};
pub use report::{FormatCounts, InvalidFileIndex, InvalidGroup, ScanCounters, ScanReport};
pub use scan::{Scanner, scan};
pub use strategy::exclude::ExcludeRules;
pub use strategy::fs::{FileWalk, WalkOptions, walk};
pub use tracking::{LedgerSummary, TrackStatus, TrackingLedger, TrackingRecord, read_ledger};
pub use validator::{FormatValidator, ValidationOutcome, is_transient_io_error};

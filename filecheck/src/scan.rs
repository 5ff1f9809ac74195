//! The scan pipeline: walk, exclude, classify, validate, count, track.
//!
//! Single-threaded and sequential: each file is fully classified, validated
//! and tracked before the next one is pulled from the walker. Per-file
//! problems never escape the loop; only configuration errors (raised before
//! the walk) and ledger write failures end a scan early.

use std::any::Any;
use std::cell::Cell;
use std::fs;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Once};

use tracing::info;

use crate::classify::Classification;
use crate::config::ScanConfig;
use crate::digest::prefix_digest;
use crate::error::{ConfigError, ScanError};
use crate::progress::ProgressLog;
use crate::registry::{FormatRegistry, ResolvedFormat};
use crate::report::ScanReport;
use crate::strategy::exclude::ExcludeRules;
use crate::strategy::fs::{WalkOptions, walk};
use crate::tracking::{TrackStatus, TrackingLedger, TrackingRecord};
use crate::validator::{FormatValidator, ValidationOutcome};

/// Drives one scan over a registry and configuration.
pub struct Scanner<'a> {
    registry: &'a FormatRegistry,
    config: &'a ScanConfig,
    log: ProgressLog,
    cancel: Option<Arc<AtomicBool>>,
}

impl std::fmt::Debug for Scanner<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scanner")
            .field("registry", self.registry)
            .field("config", self.config)
            .field("log", &self.log)
            .field("cancel", &self.cancel)
            .finish()
    }
}

/// Mutable state of a running scan.
struct ScanState {
    report: ScanReport,
    ledger: TrackingLedger,
}

impl<'a> Scanner<'a> {
    /// A scanner with no cancel flag.
    #[must_use]
    pub fn new(registry: &'a FormatRegistry, config: &'a ScanConfig) -> Self {
        Self {
            registry,
            config,
            log: ProgressLog::new(config.verbose),
            cancel: None,
        }
    }

    /// Stop before the next file once `flag` is set. The partial report is
    /// returned with `interrupted` set.
    #[must_use]
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Run the scan.
    ///
    /// # Errors
    ///
    /// Returns `ScanError::Config` before visiting any file if `roots` is
    /// empty, a root does not exist, the exclude file is missing or invalid,
    /// or the ledger cannot be opened. Returns `ScanError::Ledger` if a
    /// ledger append fails mid-scan.
    pub fn run(&self) -> Result<ScanReport, ScanError> {
        let roots = resolve_roots(&self.config.roots)?;
        let roots = if self.config.max_depth.is_none() {
            collapse_nested_roots(roots)
        } else {
            roots
        };
        let exclude = match &self.config.exclude_file {
            Some(path) => ExcludeRules::load(path)?,
            None => ExcludeRules::default(),
        };
        let ledger = TrackingLedger::from_config(&self.config.tracking)?;
        let options = WalkOptions {
            follow_links: self.config.follow_links,
            max_depth: self.config.max_depth,
        };

        let mut state = ScanState {
            report: ScanReport::default(),
            ledger,
        };

        'roots: for root in &roots {
            for entry in walk(root, options) {
                if self.is_cancelled() {
                    state.report.interrupted = true;
                    self.log.interrupted(&state.report.counters);
                    break 'roots;
                }
                match entry {
                    Ok(path) => self.visit(&path, &exclude, &mut state)?,
                    Err(err) => {
                        state.report.walk_errors += 1;
                        self.log.walk_error(&err);
                    }
                }
            }
        }

        Ok(state.report)
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    fn visit(
        &self,
        path: &Path,
        exclude: &ExcludeRules,
        state: &mut ScanState,
    ) -> Result<(), ScanError> {
        if exclude.is_excluded(path) {
            state.report.total_excluded += 1;
            self.log.excluded(path);
            return track(state, path, TrackStatus::Excluded, None);
        }

        state.report.counters.record_scanned();
        let digest = if self.config.digest {
            self.digest(path)
        } else {
            None
        };

        let (status, digest) = match self.registry.classify(path) {
            Classification::Unsupported { extension } => {
                state.report.counters.record_unsupported();
                self.log.unsupported(path, &extension);
                (TrackStatus::Unsupported, digest)
            }
            Classification::Supported { format, .. } => {
                self.check(path, format, digest, &mut state.report)
            }
        };

        track(state, path, status, digest)?;
        self.log.checkpoint(&state.report.counters);
        Ok(())
    }

    /// Validate a supported file and count the outcome. Returns the ledger
    /// status and the digest to record with it.
    fn check(
        &self,
        path: &Path,
        format: ResolvedFormat<'_>,
        digest: Option<String>,
        report: &mut ScanReport,
    ) -> (TrackStatus, Option<String>) {
        match run_validator(format.validator, path) {
            ValidationOutcome::Valid => {
                report.counters.record_valid(format.name);
                self.log.valid(path, format.name);
                (TrackStatus::Valid, digest)
            }
            ValidationOutcome::Invalid { reason } => {
                report.counters.record_invalid(format.name);
                report.invalid_files.push(format.name, path.to_path_buf());
                self.log.invalid(path, format.name, &reason);
                (TrackStatus::Invalid, digest)
            }
            ValidationOutcome::ValidatorError { cause } => {
                report.counters.record_invalid(format.name);
                report.validator_errors += 1;
                report.invalid_files.push(format.name, path.to_path_buf());
                self.log.validator_error(path, format.name, &cause);
                (TrackStatus::Invalid, None)
            }
            ValidationOutcome::Unsupported { extension } => {
                report.counters.record_unsupported();
                self.log.unsupported(path, &extension);
                (TrackStatus::Unsupported, digest)
            }
        }
    }

    fn digest(&self, path: &Path) -> Option<String> {
        match prefix_digest(path) {
            Ok(digest) => Some(digest),
            Err(err) => {
                self.log.digest_failed(path, &err);
                None
            }
        }
    }
}

/// Scan with a registry and configuration, without cancellation.
///
/// # Errors
///
/// See [`Scanner::run`].
pub fn scan(registry: &FormatRegistry, config: &ScanConfig) -> Result<ScanReport, ScanError> {
    Scanner::new(registry, config).run()
}

fn track(
    state: &mut ScanState,
    path: &Path,
    status: TrackStatus,
    digest: Option<String>,
) -> Result<(), ScanError> {
    let record = TrackingRecord::new(path, status, digest);
    state.ledger.append(&record).map_err(|source| ScanError::Ledger {
        path: state
            .ledger
            .path()
            .map(Path::to_path_buf)
            .unwrap_or_default(),
        source,
    })
}

/// Check that every root exists and make it absolute (lexically; symlinks
/// are not resolved) so exclusion patterns always see absolute paths.
fn resolve_roots(roots: &[PathBuf]) -> Result<Vec<PathBuf>, ConfigError> {
    if roots.is_empty() {
        return Err(ConfigError::NoRoots);
    }
    roots
        .iter()
        .map(|root| {
            if !root.exists() {
                return Err(ConfigError::MissingRoot(root.clone()));
            }
            std::path::absolute(root).map_err(|source| ConfigError::ResolveRoot {
                path: root.clone(),
                source,
            })
        })
        .collect()
}

/// Drop roots that lie under (or repeat) another root, so a walk of the
/// outer root is the only one that reaches their files. Only applied
/// without `max_depth`, where the outer walk reaches every nested file.
/// Roots are compared by their canonical form when it resolves, so a root
/// reached through a symlink is not mistaken for a nested one.
fn collapse_nested_roots(roots: Vec<PathBuf>) -> Vec<PathBuf> {
    let mut kept: Vec<(PathBuf, PathBuf)> = Vec::with_capacity(roots.len());
    for root in roots {
        let key = fs::canonicalize(&root).unwrap_or_else(|_| root.clone());
        if let Some((outer, _)) = kept.iter().find(|(_, outer_key)| key.starts_with(outer_key)) {
            info!(
                root = %root.display(),
                covered_by = %outer.display(),
                "skipping nested root"
            );
            continue;
        }
        kept.retain(|(inner, inner_key)| {
            let nested = inner_key.starts_with(&key);
            if nested {
                info!(
                    root = %inner.display(),
                    covered_by = %root.display(),
                    "skipping nested root"
                );
            }
            !nested
        });
        kept.push((root, key));
    }
    kept.into_iter().map(|(root, _)| root).collect()
}

thread_local! {
    static IN_VALIDATOR: Cell<bool> = const { Cell::new(false) };
}

static QUIET_VALIDATOR_PANICS: Once = Once::new();

/// Chain a panic hook that stays silent for panics raised inside
/// [`run_validator`] on this thread; the caught panic is reported as a
/// `ValidatorError` instead. Panics anywhere else reach the previous hook.
fn install_panic_hook() {
    QUIET_VALIDATOR_PANICS.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if !IN_VALIDATOR.with(Cell::get) {
                previous(info);
            }
        }));
    });
}

/// Run a validator behind an unwind boundary so a panicking parser becomes
/// a `ValidatorError` instead of ending the scan.
fn run_validator(validator: &dyn FormatValidator, path: &Path) -> ValidationOutcome {
    install_panic_hook();
    IN_VALIDATOR.with(|flag| flag.set(true));
    let result = panic::catch_unwind(AssertUnwindSafe(|| validator.validate(path)));
    IN_VALIDATOR.with(|flag| flag.set(false));

    result.unwrap_or_else(|payload| {
        ValidationOutcome::validator_error(format!(
            "validator panicked: {}",
            panic_message(payload.as_ref())
        ))
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        *message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "non-string panic payload"
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_roots_rejects_empty_and_missing() {
        assert!(matches!(resolve_roots(&[]), Err(ConfigError::NoRoots)));

        let tmp = tempfile::TempDir::new().unwrap();
        let missing = tmp.path().join("missing");
        let err = resolve_roots(&[tmp.path().to_path_buf(), missing.clone()]).unwrap_err();
        assert!(
            matches!(err, ConfigError::MissingRoot(ref p) if *p == missing),
            "got: {err}"
        );
    }

    #[test]
    fn test_resolve_roots_makes_paths_absolute() {
        let roots = resolve_roots(&[PathBuf::from(".")]).unwrap();
        assert!(roots[0].is_absolute(), "got: {}", roots[0].display());
    }

    #[test]
    fn test_run_validator_catches_panics() {
        let exploding = |_: &Path| -> ValidationOutcome { panic!("parser blew up") };
        match run_validator(&exploding, Path::new("x.bin")) {
            ValidationOutcome::ValidatorError { cause } => {
                assert!(cause.contains("parser blew up"), "got: {cause}");
            }
            other => panic!("expected ValidatorError, got: {other:?}"),
        }
        assert!(!IN_VALIDATOR.with(Cell::get), "flag must be cleared after a panic");
    }

    #[test]
    fn test_collapse_nested_roots() {
        // Nonexistent paths, so roots are compared lexically.
        let base = Path::new("/nonexistent/filecheck");
        let roots = vec![
            base.join("d/sub"),
            base.join("e"),
            base.join("d"),
            base.join("e"),
            base.join("e/file.txt"),
            base.join("dd"),
        ];
        assert_eq!(
            collapse_nested_roots(roots),
            vec![base.join("e"), base.join("d"), base.join("dd")]
        );
    }
}

//! Append-only tracking ledger.
//!
//! One JSON object per line, one line per visited file (excluded files
//! included). Records are written and flushed as they are produced; nothing
//! is rewritten or removed. A crash mid-scan leaves every record appended up
//! to that point, and a second scan appends a second set of records.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::config::TrackingConfig;
use crate::error::ConfigError;

/// Per-file status recorded in the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackStatus {
    Valid,
    Invalid,
    Unsupported,
    Excluded,
}

impl TrackStatus {
    /// Lower-case name as stored in the ledger.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Valid => "valid",
            Self::Invalid => "invalid",
            Self::Unsupported => "unsupported",
            Self::Excluded => "excluded",
        }
    }
}

impl fmt::Display for TrackStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One ledger line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingRecord {
    /// Path as visited by the walker.
    pub file: String,
    /// Outcome for the file.
    pub status: TrackStatus,
    /// Prefix digest, when digesting was enabled and succeeded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
}

impl TrackingRecord {
    /// Build a record for `path`.
    #[must_use]
    pub fn new(path: &Path, status: TrackStatus, digest: Option<String>) -> Self {
        Self {
            file: path.to_string_lossy().into_owned(),
            status,
            digest,
        }
    }
}

struct LedgerFile {
    path: PathBuf,
    file: File,
}

/// Handle to the ledger. A disabled ledger accepts and discards records.
pub struct TrackingLedger {
    sink: Option<LedgerFile>,
    appended: usize,
}

impl fmt::Debug for TrackingLedger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrackingLedger")
            .field("path", &self.path())
            .field("appended", &self.appended)
            .finish_non_exhaustive()
    }
}

impl TrackingLedger {
    /// A ledger that records nothing.
    #[must_use]
    pub const fn disabled() -> Self {
        Self {
            sink: None,
            appended: 0,
        }
    }

    /// Open (creating if needed) the ledger at `path` for appending.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::OpenLedger` if the file cannot be opened.
    pub fn open(path: &Path) -> Result<Self, ConfigError> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|source| ConfigError::OpenLedger {
                path: path.to_owned(),
                source,
            })?;
        Ok(Self {
            sink: Some(LedgerFile {
                path: path.to_owned(),
                file,
            }),
            appended: 0,
        })
    }

    /// Open the configured ledger, or a disabled one when tracking is off.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::OpenLedger` if tracking is on and the file
    /// cannot be opened.
    pub fn from_config(config: &TrackingConfig) -> Result<Self, ConfigError> {
        if config.enabled {
            Self::open(&config.path)
        } else {
            Ok(Self::disabled())
        }
    }

    /// Append one record and flush it. No-op when disabled.
    ///
    /// # Errors
    ///
    /// Returns the I/O error if the write fails.
    pub fn append(&mut self, record: &TrackingRecord) -> io::Result<()> {
        let Some(sink) = self.sink.as_mut() else {
            return Ok(());
        };
        let mut line = serde_json::to_vec(record)?;
        line.push(b'\n');
        // One write per record so O_APPEND keeps lines whole.
        sink.file.write_all(&line)?;
        sink.file.flush()?;
        self.appended += 1;
        Ok(())
    }

    /// Whether records are persisted.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.sink.is_some()
    }

    /// Ledger location, when enabled.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.sink.as_ref().map(|sink| sink.path.as_path())
    }

    /// Records appended through this handle.
    #[must_use]
    pub fn appended(&self) -> usize {
        self.appended
    }
}

/// Read every record of a ledger, in append order.
///
/// # Errors
///
/// Returns an error if the file cannot be read or a non-blank line is not a
/// valid record.
pub fn read_ledger(path: &Path) -> anyhow::Result<Vec<TrackingRecord>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read tracking ledger {}", path.display()))?;
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            serde_json::from_str::<TrackingRecord>(line).with_context(|| {
                format!("Malformed ledger record at {}:{}", path.display(), index + 1)
            })
        })
        .collect()
}

/// Aggregate view of a ledger, for audits and reconciliation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LedgerSummary {
    /// Number of records.
    pub records: usize,
    /// Number of distinct file paths.
    pub distinct_files: usize,
    /// Records per status.
    pub by_status: BTreeMap<TrackStatus, usize>,
    /// Records carrying a digest.
    pub with_digest: usize,
}

impl LedgerSummary {
    /// Summarise a sequence of records.
    #[must_use]
    pub fn from_records(records: &[TrackingRecord]) -> Self {
        let mut summary = Self {
            records: records.len(),
            ..Self::default()
        };
        let mut files = HashSet::new();
        for record in records {
            files.insert(record.file.as_str());
            *summary.by_status.entry(record.status).or_insert(0) += 1;
            if record.digest.is_some() {
                summary.with_digest += 1;
            }
        }
        summary.distinct_files = files.len();
        summary
    }

    /// Records with the given status.
    #[must_use]
    pub fn count(&self, status: TrackStatus) -> usize {
        self.by_status.get(&status).copied().unwrap_or(0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_record_serialization_omits_missing_digest() {
        let record = TrackingRecord::new(Path::new("/d/a.zip"), TrackStatus::Excluded, None);
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"file":"/d/a.zip","status":"excluded"}"#);

        let record = TrackingRecord::new(
            Path::new("/d/b.pdf"),
            TrackStatus::Valid,
            Some("00ff00ff00ff00ff".to_owned()),
        );
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains(r#""digest":"00ff00ff00ff00ff""#), "got: {json}");
    }

    #[test]
    fn test_disabled_ledger_is_noop() {
        let mut ledger = TrackingLedger::disabled();
        let record = TrackingRecord::new(Path::new("x"), TrackStatus::Valid, None);
        ledger.append(&record).unwrap();
        assert!(!ledger.is_enabled());
        assert!(ledger.path().is_none());
        assert_eq!(ledger.appended(), 0);
    }

    #[test]
    fn test_append_and_read_back_in_order() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("tracking.jsonl");

        let mut ledger = TrackingLedger::open(&path).unwrap();
        ledger
            .append(&TrackingRecord::new(Path::new("a"), TrackStatus::Valid, None))
            .unwrap();
        ledger
            .append(&TrackingRecord::new(Path::new("b"), TrackStatus::Invalid, None))
            .unwrap();
        assert_eq!(ledger.appended(), 2);

        // Records are on disk before the handle is dropped.
        let records = read_ledger(&path).unwrap();
        let files: Vec<&str> = records.iter().map(|r| r.file.as_str()).collect();
        assert_eq!(files, ["a", "b"]);
    }

    #[test]
    fn test_reopen_appends_instead_of_truncating() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("tracking.jsonl");
        for _ in 0..2 {
            let mut ledger = TrackingLedger::open(&path).unwrap();
            ledger
                .append(&TrackingRecord::new(Path::new("same"), TrackStatus::Valid, None))
                .unwrap();
        }
        let summary = LedgerSummary::from_records(&read_ledger(&path).unwrap());
        assert_eq!(summary.records, 2);
        assert_eq!(summary.distinct_files, 1);
        assert_eq!(summary.count(TrackStatus::Valid), 2);
    }

    #[test]
    fn test_open_in_missing_directory_is_config_error() {
        let tmp = tempfile::TempDir::new().unwrap();
        let err = TrackingLedger::open(&tmp.path().join("no/such/dir/t.jsonl")).unwrap_err();
        assert!(matches!(err, ConfigError::OpenLedger { .. }), "got: {err}");
    }

    #[test]
    fn test_read_ledger_reports_malformed_line() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("tracking.jsonl");
        fs::write(
            &path,
            "{\"file\":\"a\",\"status\":\"valid\"}\n\nnot json\n",
        )
        .unwrap();
        let err = read_ledger(&path).unwrap_err();
        assert!(err.to_string().contains(":3"), "got: {err}");
    }

    #[test]
    fn test_summary_counts() {
        let records = vec![
            TrackingRecord::new(Path::new("a"), TrackStatus::Valid, Some("1".to_owned())),
            TrackingRecord::new(Path::new("b"), TrackStatus::Invalid, None),
            TrackingRecord::new(Path::new("c"), TrackStatus::Excluded, None),
            TrackingRecord::new(Path::new("d"), TrackStatus::Unsupported, Some("2".to_owned())),
        ];
        let summary = LedgerSummary::from_records(&records);
        assert_eq!(summary.records, 4);
        assert_eq!(summary.with_digest, 2);
        assert_eq!(summary.count(TrackStatus::Excluded), 1);
        assert_eq!(summary.count(TrackStatus::Invalid), 1);
    }
}

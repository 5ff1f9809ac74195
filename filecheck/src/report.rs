//! Scan counters and the final report.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;

/// Valid/invalid tally for one logical format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FormatCounts {
    /// Files that passed their validator.
    pub valid: usize,
    /// Files that failed, including validator errors.
    pub invalid: usize,
}

/// Aggregate counters for one scan. Excluded files are not counted here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanCounters {
    /// Files that passed exclusion (supported or not).
    pub total_scanned: usize,
    /// Files classified invalid.
    pub total_invalid: usize,
    /// Files with no registered validator. Never counted as invalid.
    pub total_unsupported: usize,
    /// Tallies per logical format name.
    pub per_format: BTreeMap<String, FormatCounts>,
}

impl ScanCounters {
    /// Count a file that passed exclusion.
    pub fn record_scanned(&mut self) {
        self.total_scanned += 1;
    }

    /// Count a file no validator handles.
    pub fn record_unsupported(&mut self) {
        self.total_unsupported += 1;
    }

    /// Count a valid file of `format`.
    pub fn record_valid(&mut self, format: &str) {
        self.format_entry(format).valid += 1;
    }

    /// Count an invalid file of `format`.
    pub fn record_invalid(&mut self, format: &str) {
        self.format_entry(format).invalid += 1;
        self.total_invalid += 1;
    }

    /// Tally for `format`, if any file of it was validated.
    #[must_use]
    pub fn format(&self, format: &str) -> Option<FormatCounts> {
        self.per_format.get(format).copied()
    }

    fn format_entry(&mut self, format: &str) -> &mut FormatCounts {
        self.per_format.entry(format.to_owned()).or_default()
    }
}

/// Invalid files of one format, in discovery order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvalidGroup {
    /// Logical format name.
    pub format: String,
    /// Invalid files in the order they were found.
    pub files: Vec<PathBuf>,
}

/// Invalid files grouped by format. Groups appear in the order their first
/// invalid file was found.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct InvalidFileIndex {
    groups: Vec<InvalidGroup>,
}

impl InvalidFileIndex {
    /// Record an invalid file.
    pub fn push(&mut self, format: &str, path: PathBuf) {
        if let Some(group) = self.groups.iter_mut().find(|g| g.format == format) {
            group.files.push(path);
        } else {
            self.groups.push(InvalidGroup {
                format: format.to_owned(),
                files: vec![path],
            });
        }
    }

    /// All groups, in first-discovery order.
    #[must_use]
    pub fn groups(&self) -> &[InvalidGroup] {
        &self.groups
    }

    /// Invalid files of one format.
    #[must_use]
    pub fn files(&self, format: &str) -> &[PathBuf] {
        match self.groups.iter().find(|g| g.format == format) {
            Some(group) => &group.files,
            None => &[],
        }
    }

    /// Every invalid file, grouped by format.
    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.groups
            .iter()
            .flat_map(|g| g.files.iter().map(PathBuf::as_path))
    }

    /// Total invalid files.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.iter().map(|g| g.files.len()).sum()
    }

    /// Whether no invalid file was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Result of a scan.
#[derive(Debug, Clone, Default, Serialize)]
#[non_exhaustive]
pub struct ScanReport {
    /// Aggregate counters.
    #[serde(flatten)]
    pub counters: ScanCounters,
    /// Files skipped by exclusion patterns.
    pub total_excluded: usize,
    /// Files whose validator failed internally (already counted invalid).
    pub validator_errors: usize,
    /// Traversal failures (unreadable directories, symlink loops).
    pub walk_errors: usize,
    /// Invalid files by format.
    pub invalid_files: InvalidFileIndex,
    /// The scan was cancelled; counters cover the files visited so far.
    pub interrupted: bool,
}

impl ScanReport {
    /// Files that passed exclusion.
    #[must_use]
    pub fn total_scanned(&self) -> usize {
        self.counters.total_scanned
    }

    /// Files classified invalid.
    #[must_use]
    pub fn total_invalid(&self) -> usize {
        self.counters.total_invalid
    }

    /// Files with no registered validator.
    #[must_use]
    pub fn total_unsupported(&self) -> usize {
        self.counters.total_unsupported
    }
}

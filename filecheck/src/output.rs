//! Shared output formatting for scan reports.
//!
//! Provides JSON and plain-text formatters for `ScanReport`, the invalid-file
//! listing, and ledger summaries. Everything here writes to a caller-supplied
//! sink and is never subject to log-level filtering.

use std::io::Write;

use crate::report::ScanReport;
use crate::tracking::{LedgerSummary, TrackStatus};

/// Format a `ScanReport` as JSON to a writer.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_json(report: &ScanReport, writer: &mut dyn Write) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    writeln!(writer, "{json}")?;
    Ok(())
}

/// Format a `ScanReport` summary as human-readable plain text to a writer.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_human(report: &ScanReport, writer: &mut dyn Write) -> anyhow::Result<()> {
    let counters = &report.counters;

    writeln!(writer)?;
    writeln!(writer, "{}", "=".repeat(80))?;
    writeln!(writer, "  FILE INTEGRITY SCAN")?;
    writeln!(writer, "{}", "=".repeat(80))?;
    writeln!(writer)?;
    writeln!(writer, "  Files scanned:      {}", counters.total_scanned)?;
    writeln!(writer, "  Unsupported files:  {}", counters.total_unsupported)?;
    writeln!(writer, "  Invalid files:      {}", counters.total_invalid)?;
    if report.total_excluded > 0 {
        writeln!(writer, "  Excluded files:     {}", report.total_excluded)?;
    }
    if report.validator_errors > 0 {
        writeln!(writer, "  Validator errors:   {}", report.validator_errors)?;
    }
    if report.walk_errors > 0 {
        writeln!(writer, "  Unreadable paths:   {}", report.walk_errors)?;
    }
    writeln!(writer)?;

    if !counters.per_format.is_empty() {
        writeln!(writer, "{}", "-".repeat(80))?;
        writeln!(writer, "  PER FORMAT")?;
        writeln!(writer, "{}", "-".repeat(80))?;
        for (format, counts) in &counters.per_format {
            writeln!(
                writer,
                "  {format:<12} valid: {:<8} invalid: {}",
                counts.valid, counts.invalid
            )?;
        }
        writeln!(writer)?;
    }

    writeln!(writer, "{}", "=".repeat(80))?;
    if report.interrupted {
        writeln!(
            writer,
            "\u{2717} Scan interrupted after {} file(s); totals are partial",
            counters.total_scanned
        )?;
    }
    if counters.total_invalid == 0 {
        writeln!(
            writer,
            "\u{2713} No invalid files among {} scanned",
            counters.total_scanned
        )?;
    } else {
        writeln!(
            writer,
            "\u{2717} {} invalid file(s) found",
            counters.total_invalid
        )?;
    }
    writeln!(writer, "{}", "=".repeat(80))?;

    Ok(())
}

/// Write the invalid-file listing: the total, then one path per line,
/// grouped by format in discovery order.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_invalid_listing(report: &ScanReport, writer: &mut dyn Write) -> anyhow::Result<()> {
    writeln!(writer, "Total invalid files: {}", report.invalid_files.len())?;
    for path in report.invalid_files.iter() {
        writeln!(writer, "{}", path.display())?;
    }
    Ok(())
}

/// Format a ledger summary as plain text.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_ledger_summary(summary: &LedgerSummary, writer: &mut dyn Write) -> anyhow::Result<()> {
    writeln!(writer, "  Records:         {}", summary.records)?;
    writeln!(writer, "  Distinct files:  {}", summary.distinct_files)?;
    writeln!(writer, "  With digest:     {}", summary.with_digest)?;
    for status in [
        TrackStatus::Valid,
        TrackStatus::Invalid,
        TrackStatus::Unsupported,
        TrackStatus::Excluded,
    ] {
        writeln!(writer, "  {:<16} {}", format!("{status}:"), summary.count(status))?;
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn sample_report() -> ScanReport {
        let mut report = ScanReport::default();
        for _ in 0..4 {
            report.counters.record_scanned();
        }
        report.counters.record_unsupported();
        report.counters.record_valid("zip");
        report.counters.record_invalid("zip");
        report.counters.record_invalid("pdf");
        report.invalid_files.push("zip", PathBuf::from("/d/broken.zip"));
        report.invalid_files.push("pdf", PathBuf::from("/d/broken.pdf"));
        report
    }

    #[test]
    fn test_write_human_lists_totals_and_formats() {
        let mut buf = Vec::new();
        write_human(&sample_report(), &mut buf).unwrap();
        let output = String::from_utf8(buf).unwrap();

        assert!(output.contains("Files scanned:      4"), "got: {output}");
        assert!(output.contains("Unsupported files:  1"), "got: {output}");
        assert!(output.contains("Invalid files:      2"), "got: {output}");
        assert!(output.contains("zip          valid: 1        invalid: 1"), "got: {output}");
        assert!(output.contains("2 invalid file(s) found"), "got: {output}");
        assert!(!output.contains("Excluded files"), "zero excluded is omitted");
    }

    #[test]
    fn test_write_human_clean_scan() {
        let mut report = ScanReport::default();
        report.counters.record_scanned();
        report.counters.record_valid("pdf");
        let mut buf = Vec::new();
        write_human(&report, &mut buf).unwrap();
        let output = String::from_utf8(buf).unwrap();
        assert!(output.contains("No invalid files among 1 scanned"), "got: {output}");
    }

    #[test]
    fn test_write_invalid_listing_grouped() {
        let mut buf = Vec::new();
        write_invalid_listing(&sample_report(), &mut buf).unwrap();
        let output = String::from_utf8(buf).unwrap();
        assert_eq!(
            output,
            "Total invalid files: 2\n/d/broken.zip\n/d/broken.pdf\n"
        );
    }

    #[test]
    fn test_write_json_contract() {
        let mut buf = Vec::new();
        write_json(&sample_report(), &mut buf).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&buf).unwrap();

        assert_eq!(json["total_scanned"], 4);
        assert_eq!(json["total_invalid"], 2);
        assert_eq!(json["total_unsupported"], 1);
        assert_eq!(json["per_format"]["zip"]["valid"], 1);
        assert_eq!(json["invalid_files"][0]["format"], "zip");
        assert_eq!(json["invalid_files"][0]["files"][0], "/d/broken.zip");
        assert_eq!(json["interrupted"], false);
    }
}

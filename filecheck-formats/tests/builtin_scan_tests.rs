//! End-to-end scans over real fixtures with the built-in registry.

#![allow(clippy::unwrap_used)]

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use filecheck::output::write_invalid_listing;
use filecheck::{FormatCounts, ScanConfig, TrackStatus, read_ledger, scan};
use filecheck_formats::builtin_registry;
use tempfile::TempDir;
use zip::write::SimpleFileOptions;

fn config_for(root: &Path) -> ScanConfig {
    let mut config = ScanConfig::default();
    config.roots = vec![root.to_path_buf()];
    config
}

fn write_zip(path: &Path, entries: &[(&str, &[u8])]) {
    let mut writer = zip::ZipWriter::new(File::create(path).unwrap());
    for (name, content) in entries {
        writer
            .start_file(*name, SimpleFileOptions::default())
            .unwrap();
        writer.write_all(content).unwrap();
    }
    writer.finish().unwrap();
}

fn truncate_half(source: &Path, target: &Path) {
    let bytes = fs::read(source).unwrap();
    fs::write(target, &bytes[..bytes.len() / 2]).unwrap();
}

fn write_png(path: &Path) {
    image::RgbImage::from_pixel(8, 8, image::Rgb([10, 200, 30]))
        .save_with_format(path, image::ImageFormat::Png)
        .unwrap();
}

fn listing(report: &filecheck::ScanReport) -> String {
    let mut buf = Vec::new();
    write_invalid_listing(report, &mut buf).unwrap();
    String::from_utf8(buf).unwrap()
}

#[test]
fn test_valid_and_truncated_zip() {
    let tmp = TempDir::new().unwrap();
    let good = tmp.path().join("a.zip");
    write_zip(
        &good,
        &[("one.txt", b"first entry".as_slice()), ("two.txt", b"second entry".as_slice())],
    );
    let broken = tmp.path().join("b.zip");
    truncate_half(&good, &broken);

    let registry = builtin_registry().unwrap();
    let report = scan(&registry, &config_for(tmp.path())).unwrap();

    assert_eq!(report.total_scanned(), 2);
    assert_eq!(report.total_invalid(), 1);
    assert_eq!(report.total_unsupported(), 0);
    assert_eq!(
        report.counters.format("zip"),
        Some(FormatCounts {
            valid: 1,
            invalid: 1
        })
    );

    let output = listing(&report);
    assert!(output.starts_with("Total invalid files: 1\n"), "got: {output}");
    assert!(output.contains(&broken.display().to_string()), "got: {output}");
    assert!(!output.contains(&good.display().to_string()), "got: {output}");
}

#[test]
fn test_csv_is_unsupported() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("data.csv"), "a,b\n1,2\n").unwrap();

    let registry = builtin_registry().unwrap();
    let report = scan(&registry, &config_for(tmp.path())).unwrap();
    assert_eq!(report.total_scanned(), 1);
    assert_eq!(report.total_unsupported(), 1);
    assert_eq!(report.total_invalid(), 0);
    assert_eq!(listing(&report), "Total invalid files: 0\n");
}

#[test]
fn test_mixed_tree_groups_invalid_files_by_format() {
    let tmp = TempDir::new().unwrap();
    let docs = tmp.path().join("docs");
    let pics = tmp.path().join("pics");
    fs::create_dir_all(&docs).unwrap();
    fs::create_dir_all(&pics).unwrap();

    write_zip(
        &docs.join("letter.docx"),
        &[
            ("[Content_Types].xml", b"<Types/>".as_slice()),
            ("word/document.xml", b"<w:document/>".as_slice()),
        ],
    );
    write_zip(
        &docs.join("memo.docx"),
        &[("[Content_Types].xml", b"<Types/>".as_slice())],
    );
    fs::write(docs.join("budget.xlsx"), "not a workbook").unwrap();
    fs::write(docs.join("scan.pdf"), "not a pdf").unwrap();
    fs::write(docs.join("notes.txt"), "plain").unwrap();

    let photo = pics.join("photo.PNG");
    write_png(&photo);
    truncate_half(&photo, &pics.join("cropped.png"));

    let registry = builtin_registry().unwrap();
    let report = scan(&registry, &config_for(tmp.path())).unwrap();

    assert_eq!(report.total_scanned(), 7);
    assert_eq!(report.total_unsupported(), 1);
    assert_eq!(report.total_invalid(), 4);
    assert_eq!(report.counters.format("word"), Some(FormatCounts { valid: 1, invalid: 1 }));
    assert_eq!(report.counters.format("image"), Some(FormatCounts { valid: 1, invalid: 1 }));
    assert_eq!(report.counters.format("excel").unwrap().invalid, 1);
    assert_eq!(report.counters.format("pdf").unwrap().invalid, 1);

    assert_eq!(report.invalid_files.files("word").len(), 1);
    assert!(report.invalid_files.files("word")[0].ends_with("memo.docx"));
    assert!(report.invalid_files.files("image")[0].ends_with("cropped.png"));
    assert_eq!(report.invalid_files.len(), 4);
}

#[test]
fn test_tracked_scan_with_digests() {
    let tmp = TempDir::new().unwrap();
    let data = tmp.path().join("data");
    fs::create_dir_all(&data).unwrap();
    let archive = data.join("bundle.zip");
    write_zip(&archive, &[("x.txt", b"payload".as_slice())]);
    fs::write(data.join("readme.md"), "hello").unwrap();
    let ledger = tmp.path().join("tracking.jsonl");

    let mut config = config_for(&data);
    config.tracking.enabled = true;
    config.tracking.path = ledger.clone();
    config.digest = true;
    scan(&builtin_registry().unwrap(), &config).unwrap();

    let records = read_ledger(&ledger).unwrap();
    assert_eq!(records.len(), 2);
    let zip_record = records
        .iter()
        .find(|r| Path::new(&r.file) == archive.as_path())
        .unwrap();
    assert_eq!(zip_record.status, TrackStatus::Valid);
    let digest = zip_record.digest.as_deref().unwrap();
    assert_eq!(digest.len(), 16);
    assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));

    let readme = records
        .iter()
        .find(|r| r.file.ends_with("readme.md"))
        .unwrap();
    assert_eq!(readme.status, TrackStatus::Unsupported);
}

#[test]
fn test_single_file_root() {
    let tmp = TempDir::new().unwrap();
    let good: PathBuf = tmp.path().join("good.zip");
    write_zip(&good, &[("x.txt", b"payload".as_slice())]);
    truncate_half(&good, &tmp.path().join("bad.zip"));

    let registry = builtin_registry().unwrap();
    let report = scan(&registry, &config_for(&good)).unwrap();
    assert_eq!(report.total_scanned(), 1);
    assert_eq!(report.total_invalid(), 0);
}

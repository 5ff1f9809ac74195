//! Zip archive validation.
//!
//! The central directory must parse and every entry must decompress to the
//! end, which makes the `zip` crate verify each entry's CRC-32.

use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

use filecheck::{FormatValidator, ValidationOutcome};
use zip::ZipArchive;
use zip::result::ZipError;

/// Validator for `.zip` archives.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZipValidator;

impl FormatValidator for ZipValidator {
    fn validate(&self, path: &Path) -> ValidationOutcome {
        let mut archive = match open_archive(path) {
            Ok(archive) => archive,
            Err(outcome) => return outcome,
        };

        for index in 0..archive.len() {
            let mut entry = match archive.by_index(index) {
                Ok(entry) => entry,
                Err(err) => return zip_error_outcome(&err),
            };
            if entry.is_dir() {
                continue;
            }
            if let Err(err) = io::copy(&mut entry, &mut io::sink()) {
                return ValidationOutcome::from_io_error(&err);
            }
        }
        ValidationOutcome::Valid
    }
}

/// Open `path` and read its central directory.
///
/// # Errors
///
/// Returns the outcome describing why the archive could not be opened.
pub fn open_archive(path: &Path) -> Result<ZipArchive<BufReader<File>>, ValidationOutcome> {
    let file = File::open(path).map_err(|err| ValidationOutcome::from_io_error(&err))?;
    ZipArchive::new(BufReader::new(file)).map_err(|err| zip_error_outcome(&err))
}

/// Map a zip failure: I/O errors follow the shared I/O mapping, features the
/// reader does not implement (encryption, exotic compression) are checker
/// errors, anything else is a corrupt archive.
#[must_use]
pub fn zip_error_outcome(err: &ZipError) -> ValidationOutcome {
    match err {
        ZipError::Io(io_err) => ValidationOutcome::from_io_error(io_err),
        ZipError::UnsupportedArchive(detail) => {
            ValidationOutcome::validator_error(format!("unsupported zip feature: {detail}"))
        }
        other => ValidationOutcome::invalid(other.to_string()),
    }
}

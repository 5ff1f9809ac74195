//! Spreadsheet validation with `calamine`.
//!
//! The container is detected from the leading bytes, not the extension: an
//! OLE compound file is opened as a BIFF (`.xls`) workbook and a zip package
//! as an OOXML (`.xlsx`) workbook, whatever the file is called. Only content
//! matching neither falls back to the parser the extension names. The sheet
//! list must load and name at least one sheet.
//!
//! Password-protected workbooks cannot be checked without the password and
//! come back as `ValidatorError`.

use std::fs::{self, File};
use std::io::{self, BufReader, Read, Seek};
use std::path::Path;

use calamine::{Reader, XlsError, Xls, Xlsx};
use filecheck::{FormatValidator, ValidationOutcome, extension_of};

use crate::failure::parse_failure;

/// Signature of an OLE compound file (BIFF workbooks, encrypted OOXML).
const OLE_MAGIC: [u8; 8] = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];
/// Local file header signature opening a zip package.
const ZIP_MAGIC: [u8; 4] = *b"PK\x03\x04";
/// Compound-file stream holding an encrypted OOXML package.
const ENCRYPTED_STREAM: &str = "EncryptedPackage";

/// Validator for Excel workbooks (`.xls` and `.xlsx`).
#[derive(Debug, Clone, Copy, Default)]
pub struct ExcelValidator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Container {
    Compound,
    Package,
    Unknown,
}

impl FormatValidator for ExcelValidator {
    fn validate(&self, path: &Path) -> ValidationOutcome {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(err) => return ValidationOutcome::from_io_error(&err),
        };
        let mut reader = BufReader::new(file);
        let container = match sniff(&mut reader) {
            Ok(container) => container,
            Err(err) => return ValidationOutcome::from_io_error(&err),
        };

        match container {
            Container::Compound => open_compound(path, reader),
            Container::Package => open_package(reader),
            Container::Unknown if extension_of(path) == "xls" => open_compound(path, reader),
            Container::Unknown => open_package(reader),
        }
    }
}

/// Read the leading bytes and rewind.
fn sniff<R: Read + Seek>(reader: &mut R) -> io::Result<Container> {
    let mut magic = Vec::with_capacity(OLE_MAGIC.len());
    reader
        .by_ref()
        .take(OLE_MAGIC.len() as u64)
        .read_to_end(&mut magic)?;
    reader.rewind()?;

    Ok(if magic.starts_with(&OLE_MAGIC) {
        Container::Compound
    } else if magic.starts_with(&ZIP_MAGIC) {
        Container::Package
    } else {
        Container::Unknown
    })
}

fn open_compound(path: &Path, reader: BufReader<File>) -> ValidationOutcome {
    match Xls::new(reader) {
        Ok(workbook) => sheet_outcome(&workbook.sheet_names()),
        Err(XlsError::Password) => {
            ValidationOutcome::validator_error("workbook is password protected")
        }
        Err(_) if is_encrypted_package(path) => {
            ValidationOutcome::validator_error("workbook is encrypted")
        }
        Err(err) => parse_failure(&calamine::Error::from(err)),
    }
}

fn open_package(reader: BufReader<File>) -> ValidationOutcome {
    match Xlsx::new(reader) {
        Ok(workbook) => sheet_outcome(&workbook.sheet_names()),
        Err(err) => parse_failure(&calamine::Error::from(err)),
    }
}

fn sheet_outcome(names: &[String]) -> ValidationOutcome {
    if names.is_empty() {
        ValidationOutcome::invalid("workbook has no sheets")
    } else {
        ValidationOutcome::Valid
    }
}

/// Encrypted OOXML is a compound file whose directory names an
/// `EncryptedPackage` stream (UTF-16LE on disk).
fn is_encrypted_package(path: &Path) -> bool {
    let marker: Vec<u8> = ENCRYPTED_STREAM
        .encode_utf16()
        .flat_map(u16::to_le_bytes)
        .collect();
    fs::read(path).is_ok_and(|bytes| {
        bytes
            .windows(marker.len())
            .any(|window| window == marker.as_slice())
    })
}

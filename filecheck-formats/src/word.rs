//! Word (`.docx`) validation.
//!
//! A `.docx` file is an OPC package: a zip archive that must carry a content
//! types part and the main document part. The main document is decompressed
//! in full so a damaged body is caught even when the directory is intact.

use std::io;
use std::path::Path;

use filecheck::{FormatValidator, ValidationOutcome};

use crate::archive::{open_archive, zip_error_outcome};

/// Parts every `.docx` package must contain.
pub const REQUIRED_PARTS: [&str; 2] = ["[Content_Types].xml", MAIN_DOCUMENT];

const MAIN_DOCUMENT: &str = "word/document.xml";

/// Validator for Word `.docx` documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct WordValidator;

impl FormatValidator for WordValidator {
    fn validate(&self, path: &Path) -> ValidationOutcome {
        let mut archive = match open_archive(path) {
            Ok(archive) => archive,
            Err(outcome) => return outcome,
        };

        let names: Vec<&str> = archive.file_names().collect();
        if let Some(missing) = REQUIRED_PARTS.into_iter().find(|part| !names.contains(part)) {
            return ValidationOutcome::invalid(format!("missing package part {missing}"));
        }

        let mut document = match archive.by_name(MAIN_DOCUMENT) {
            Ok(document) => document,
            Err(err) => return zip_error_outcome(&err),
        };
        match io::copy(&mut document, &mut io::sink()) {
            Ok(_) => ValidationOutcome::Valid,
            Err(err) => ValidationOutcome::from_io_error(&err),
        }
    }
}

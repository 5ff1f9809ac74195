//! PDF validation with `lopdf`.
//!
//! Loading parses the header, cross-reference table, trailer and object
//! table. The trailer's `/Root` must then resolve to the catalog dictionary.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use filecheck::{FormatValidator, ValidationOutcome};
use lopdf::{Document, Object};

use crate::failure::parse_failure;

/// Validator for PDF documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfValidator;

impl FormatValidator for PdfValidator {
    fn validate(&self, path: &Path) -> ValidationOutcome {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(err) => return ValidationOutcome::from_io_error(&err),
        };
        let document = match Document::load_from(BufReader::new(file)) {
            Ok(document) => document,
            Err(err) => return parse_failure(&err),
        };

        let catalog = document
            .trailer
            .get(b"Root")
            .and_then(Object::as_reference)
            .and_then(|id| document.get_object(id))
            .and_then(Object::as_dict);
        match catalog {
            Ok(_) => ValidationOutcome::Valid,
            Err(err) => ValidationOutcome::invalid(format!("unreadable document catalog: {err}")),
        }
    }
}

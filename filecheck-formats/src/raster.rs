//! Image validation with the `image` crate.
//!
//! The format is guessed from the file's magic bytes, falling back to the
//! extension, and the whole image is decoded so truncated pixel data is
//! caught, not just a damaged header.

use std::path::Path;

use filecheck::{FormatValidator, ValidationOutcome};
use image::{ImageError, ImageReader};

/// Validator for raster images (`jpg`, `jpeg`, `png`, `gif`, `bmp`, `ico`).
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageValidator;

impl FormatValidator for ImageValidator {
    fn validate(&self, path: &Path) -> ValidationOutcome {
        let reader = match ImageReader::open(path).and_then(ImageReader::with_guessed_format) {
            Ok(reader) => reader,
            Err(err) => return ValidationOutcome::from_io_error(&err),
        };
        match reader.decode() {
            Ok(_) => ValidationOutcome::Valid,
            Err(err) => image_error_outcome(&err),
        }
    }
}

/// Decoder limits and formats this build cannot decode are checker errors;
/// decoding failures are corrupt files.
fn image_error_outcome(err: &ImageError) -> ValidationOutcome {
    match err {
        ImageError::IoError(io_err) => ValidationOutcome::from_io_error(io_err),
        ImageError::Unsupported(_) | ImageError::Limits(_) => {
            ValidationOutcome::validator_error(err.to_string())
        }
        _ => ValidationOutcome::invalid(err.to_string()),
    }
}

//! Mapping parser failures onto validation outcomes.

use std::error::Error;
use std::io;

use filecheck::{ValidationOutcome, is_transient_io_error};

/// Classify a parser error: a transient I/O failure anywhere in its source
/// chain means the checker could not decide; anything else means the file
/// is corrupt.
pub fn parse_failure(err: &(dyn Error + 'static)) -> ValidationOutcome {
    match io_cause(err) {
        Some(io_err) if is_transient_io_error(io_err) => {
            ValidationOutcome::validator_error(format!("transient I/O error: {err}"))
        }
        _ => ValidationOutcome::invalid(err.to_string()),
    }
}

/// First `io::Error` in the source chain, including `err` itself.
fn io_cause<'a>(err: &'a (dyn Error + 'static)) -> Option<&'a io::Error> {
    let mut current = Some(err);
    while let Some(candidate) = current {
        if let Some(io_err) = candidate.downcast_ref::<io::Error>() {
            return Some(io_err);
        }
        current = candidate.source();
    }
    None
}

//! The contract between the scan pipeline and format-specific checkers.

use std::io;
use std::path::Path;

/// Result of checking one file. Exactly one is produced per scanned file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    /// The file opened and parsed under its format's rules.
    Valid,
    /// The content is corrupt: truncated, malformed, or unreadable.
    Invalid {
        /// Parser diagnostic.
        reason: String,
    },
    /// No validator handles this extension.
    Unsupported {
        /// Normalized extension, empty when the file has none.
        extension: String,
    },
    /// The checker itself failed in a way that says nothing about the file
    /// (transient I/O, unsupported sub-format, a panic inside the parser).
    ValidatorError {
        /// What went wrong.
        cause: String,
    },
}

impl ValidationOutcome {
    /// Build an `Invalid` outcome.
    #[must_use]
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::Invalid {
            reason: reason.into(),
        }
    }

    /// Build a `ValidatorError` outcome.
    #[must_use]
    pub fn validator_error(cause: impl Into<String>) -> Self {
        Self::ValidatorError {
            cause: cause.into(),
        }
    }

    /// Map an I/O failure raised while opening or reading a file.
    ///
    /// Transient failures become `ValidatorError`; everything else (missing
    /// file, permission denied, unexpected EOF, bad data) is `Invalid`.
    #[must_use]
    pub fn from_io_error(err: &io::Error) -> Self {
        if is_transient_io_error(err) {
            Self::validator_error(format!("transient I/O error: {err}"))
        } else {
            Self::invalid(err.to_string())
        }
    }

    /// Whether this is `Valid`.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }
}

/// I/O error kinds that reflect the environment, not the file's content.
#[must_use]
pub fn is_transient_io_error(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::Interrupted | io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock
    )
}

/// A format-specific integrity check.
///
/// Implementations receive only a path, perform the minimal parse needed to
/// confirm structural integrity, and release every handle they open before
/// returning. They must not panic on malformed input; the scan pipeline
/// catches panics anyway and reports them as `ValidatorError`.
pub trait FormatValidator: Send + Sync {
    /// Check the file at `path`.
    fn validate(&self, path: &Path) -> ValidationOutcome;
}

impl<F> FormatValidator for F
where
    F: Fn(&Path) -> ValidationOutcome + Send + Sync,
{
    fn validate(&self, path: &Path) -> ValidationOutcome {
        self(path)
    }
}

//! Path to format classification. Pure: never touches the filesystem.

use std::path::Path;

use crate::registry::{FormatRegistry, ResolvedFormat, normalize_extension};

/// What the registry knows about a path.
#[derive(Debug, Clone)]
pub enum Classification<'a> {
    /// A validator is registered for the extension.
    Supported {
        /// Normalized extension.
        extension: String,
        /// The resolved format and its validator.
        format: ResolvedFormat<'a>,
    },
    /// No validator handles the extension.
    Unsupported {
        /// Normalized extension, empty when the file has none.
        extension: String,
    },
}

impl Classification<'_> {
    /// The normalized extension the classification was made on.
    #[must_use]
    pub fn extension(&self) -> &str {
        match self {
            Self::Supported { extension, .. } | Self::Unsupported { extension } => extension,
        }
    }

    /// Logical format name, if supported.
    #[must_use]
    pub fn format_name(&self) -> Option<&str> {
        match self {
            Self::Supported { format, .. } => Some(format.name),
            Self::Unsupported { .. } => None,
        }
    }
}

/// Normalized extension of a path: text after the last dot of the file name,
/// lower-cased. Empty for `Makefile` or `.bashrc`.
#[must_use]
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|ext| normalize_extension(&ext.to_string_lossy()))
        .unwrap_or_default()
}

impl FormatRegistry {
    /// Classify a path by its extension.
    #[must_use]
    pub fn classify(&self, path: &Path) -> Classification<'_> {
        let extension = extension_of(path);
        match self.resolve(&extension) {
            Some(format) => Classification::Supported { extension, format },
            None => Classification::Unsupported { extension },
        }
    }
}

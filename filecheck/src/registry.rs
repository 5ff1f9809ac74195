//! Extension to validator dispatch table.
//!
//! A `FormatRegistry` is built once at startup and handed to the scanner by
//! reference. It is never mutated while a scan runs.

use std::collections::HashMap;
use std::fmt;

use crate::error::RegistryError;
use crate::validator::FormatValidator;

/// One extension and the logical format it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatDescriptor {
    /// Lower-case extension without the dot.
    pub extension: String,
    /// Logical format name, e.g. `excel`.
    pub name: String,
}

struct FormatEntry {
    name: String,
    extensions: Vec<String>,
    validator: Box<dyn FormatValidator>,
}

/// A format resolved from an extension.
#[derive(Clone, Copy)]
pub struct ResolvedFormat<'a> {
    /// Logical format name.
    pub name: &'a str,
    /// The validator bound to that format.
    pub validator: &'a dyn FormatValidator,
}

impl fmt::Debug for ResolvedFormat<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedFormat")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Mapping from file extension to `{logical name, validator}`.
#[derive(Default)]
pub struct FormatRegistry {
    formats: Vec<FormatEntry>,
    by_extension: HashMap<String, usize>,
}

impl fmt::Debug for FormatRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormatRegistry")
            .field("formats", &self.format_names())
            .field("extensions", &self.by_extension.len())
            .finish_non_exhaustive()
    }
}

/// Lower-case an extension and strip any leading dots.
#[must_use]
pub fn normalize_extension(extension: &str) -> String {
    extension.trim_start_matches('.').to_lowercase()
}

impl FormatRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a logical format for a set of extensions.
    ///
    /// Extensions are normalized (case-folded, leading dot stripped) and
    /// de-duplicated. Registration is all-or-nothing.
    ///
    /// # Errors
    ///
    /// Returns an error if `name` is already registered, if `extensions` is
    /// empty, or if any extension already belongs to another format.
    pub fn register<V>(
        &mut self,
        name: &str,
        extensions: &[&str],
        validator: V,
    ) -> Result<(), RegistryError>
    where
        V: FormatValidator + 'static,
    {
        if self.formats.iter().any(|entry| entry.name == name) {
            return Err(RegistryError::DuplicateFormat(name.to_owned()));
        }

        let mut normalized: Vec<String> = Vec::with_capacity(extensions.len());
        for extension in extensions {
            let extension = normalize_extension(extension);
            if extension.is_empty() || normalized.contains(&extension) {
                continue;
            }
            if let Some(&index) = self.by_extension.get(&extension) {
                return Err(RegistryError::DuplicateExtension {
                    extension,
                    existing: self.formats[index].name.clone(),
                });
            }
            normalized.push(extension);
        }

        if normalized.is_empty() {
            return Err(RegistryError::NoExtensions(name.to_owned()));
        }

        let index = self.formats.len();
        for extension in &normalized {
            self.by_extension.insert(extension.clone(), index);
        }
        self.formats.push(FormatEntry {
            name: name.to_owned(),
            extensions: normalized,
            validator: Box::new(validator),
        });
        Ok(())
    }

    /// Look up an extension. Case-insensitive; a leading dot is ignored.
    ///
    /// `None` is the normal answer for unknown extensions, not an error.
    #[must_use]
    pub fn resolve(&self, extension: &str) -> Option<ResolvedFormat<'_>> {
        let index = *self.by_extension.get(&normalize_extension(extension))?;
        let entry = &self.formats[index];
        Some(ResolvedFormat {
            name: &entry.name,
            validator: entry.validator.as_ref(),
        })
    }

    /// Logical format names in registration order.
    #[must_use]
    pub fn format_names(&self) -> Vec<&str> {
        self.formats.iter().map(|entry| entry.name.as_str()).collect()
    }

    /// Every registered extension with its logical name, sorted by extension.
    #[must_use]
    pub fn descriptors(&self) -> Vec<FormatDescriptor> {
        let mut descriptors: Vec<FormatDescriptor> = self
            .formats
            .iter()
            .flat_map(|entry| {
                entry.extensions.iter().map(|extension| FormatDescriptor {
                    extension: extension.clone(),
                    name: entry.name.clone(),
                })
            })
            .collect();
        descriptors.sort_by(|a, b| a.extension.cmp(&b.extension));
        descriptors
    }

    /// Number of logical formats.
    #[must_use]
    pub fn len(&self) -> usize {
        self.formats.len()
    }

    /// Whether no format is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.formats.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::validator::ValidationOutcome;

    fn valid(_: &Path) -> ValidationOutcome {
        ValidationOutcome::Valid
    }

    fn invalid(_: &Path) -> ValidationOutcome {
        ValidationOutcome::invalid("always corrupt")
    }

    #[test]
    fn test_resolve_is_case_insensitive_and_ignores_dot() {
        let mut registry = FormatRegistry::new();
        registry.register("excel", &["xls", "XLSX"], valid).unwrap();

        for extension in ["xls", "XLS", ".xlsx", "Xlsx"] {
            let format = registry.resolve(extension).unwrap();
            assert_eq!(format.name, "excel", "extension {extension}");
        }
        assert!(registry.resolve("csv").is_none());
        assert!(registry.resolve("").is_none());
    }

    #[test]
    fn test_resolve_returns_bound_validator() {
        let mut registry = FormatRegistry::new();
        registry.register("good", &["ok"], valid).unwrap();
        registry.register("bad", &["ko"], invalid).unwrap();

        let path = Path::new("x");
        assert!(registry.resolve("ok").unwrap().validator.validate(path).is_valid());
        assert!(!registry.resolve("ko").unwrap().validator.validate(path).is_valid());
    }

    #[test]
    fn test_duplicate_extension_rejected_without_partial_registration() {
        let mut registry = FormatRegistry::new();
        registry.register("zip", &["zip"], valid).unwrap();

        let err = registry
            .register("archive", &["tar", "ZIP"], valid)
            .unwrap_err();
        assert_eq!(
            err,
            RegistryError::DuplicateExtension {
                extension: "zip".to_owned(),
                existing: "zip".to_owned(),
            }
        );
        assert!(registry.resolve("tar").is_none(), "tar must not leak in");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_duplicate_format_and_empty_extensions_rejected() {
        let mut registry = FormatRegistry::new();
        registry.register("pdf", &["pdf"], valid).unwrap();
        assert_eq!(
            registry.register("pdf", &["pdfa"], valid).unwrap_err(),
            RegistryError::DuplicateFormat("pdf".to_owned())
        );
        assert_eq!(
            registry.register("nothing", &["", "."], valid).unwrap_err(),
            RegistryError::NoExtensions("nothing".to_owned())
        );
    }

    #[test]
    fn test_descriptors_sorted_by_extension() {
        let mut registry = FormatRegistry::new();
        registry.register("image", &["png", "bmp"], valid).unwrap();
        registry.register("word", &["docx"], valid).unwrap();

        let extensions: Vec<String> = registry
            .descriptors()
            .into_iter()
            .map(|d| d.extension)
            .collect();
        assert_eq!(extensions, ["bmp", "docx", "png"]);
        assert_eq!(registry.format_names(), ["image", "word"]);
    }
}

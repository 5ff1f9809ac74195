//! Shell-glob exclusion rules.

use std::fs;
use std::io;
use std::path::Path;

use glob::Pattern;

use crate::error::ConfigError;

/// An ordered set of glob patterns. A path is excluded when any pattern
/// matches its full string form; order only affects how soon that is known.
#[derive(Debug, Clone, Default)]
pub struct ExcludeRules {
    patterns: Vec<Pattern>,
}

impl ExcludeRules {
    /// Compile patterns, skipping blank entries.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidExcludePattern` for the first pattern that
    /// does not compile.
    pub fn from_patterns<I, S>(patterns: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut compiled = Vec::new();
        for raw in patterns {
            let pattern = raw.as_ref().trim();
            if pattern.is_empty() {
                continue;
            }
            let glob = Pattern::new(pattern).map_err(|source| ConfigError::InvalidExcludePattern {
                pattern: pattern.to_owned(),
                source,
            })?;
            compiled.push(glob);
        }
        Ok(Self { patterns: compiled })
    }

    /// Parse pattern-file content: one pattern per line, surrounding
    /// whitespace trimmed, blank lines ignored. There is no comment syntax.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidExcludePattern` for an invalid line.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Self::from_patterns(content.lines())
    }

    /// Load a pattern file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingExcludeFile` if the file does not exist,
    /// `ConfigError::ReadExcludeFile` if it cannot be read, and
    /// `ConfigError::InvalidExcludePattern` for an invalid line.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                ConfigError::MissingExcludeFile(path.to_owned())
            } else {
                ConfigError::ReadExcludeFile {
                    path: path.to_owned(),
                    source,
                }
            }
        })?;
        Self::parse(&content)
    }

    /// Whether `path` matches any pattern.
    #[must_use]
    pub fn is_excluded(&self, path: &Path) -> bool {
        if self.patterns.is_empty() {
            return false;
        }
        let path_str = path.to_string_lossy();
        self.patterns.iter().any(|pattern| pattern.matches(&path_str))
    }

    /// Number of compiled patterns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Whether there are no patterns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

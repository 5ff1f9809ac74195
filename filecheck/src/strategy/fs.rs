//! Filesystem traversal.
//!
//! Produces a lazy, forward-only sequence of regular files under a root.
//! Traversal is iterative (`walkdir` keeps its own stack), so deep trees do
//! not grow the call stack. Properties:
//! - A root that is a regular file yields exactly that file
//! - Directories, sockets, FIFOs and devices are skipped silently
//! - Symlinks are not followed unless `follow_links` is set
//! - Every file is yielded at most once; order is not guaranteed stable
//! - Concurrent renames/deletes are best-effort: a vanished entry surfaces as a
//!   walk error or is simply not yielded

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Traversal options.
#[derive(Debug, Clone, Copy, Default)]
pub struct WalkOptions {
    /// Follow symbolic links (default: `false`).
    pub follow_links: bool,
    /// Maximum directory depth below the root; `None` for unlimited.
    pub max_depth: Option<usize>,
}

/// Lazy sequence of regular files under one root.
///
/// Yields `Err` for traversal failures (permission denied, symlink loops);
/// callers decide whether to continue.
pub struct FileWalk {
    inner: walkdir::IntoIter,
}

impl std::fmt::Debug for FileWalk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileWalk").finish_non_exhaustive()
    }
}

/// Start walking `root`. Nothing is read until the iterator is advanced.
#[must_use]
pub fn walk(root: &Path, options: WalkOptions) -> FileWalk {
    let mut walker = WalkDir::new(root).follow_links(options.follow_links);
    if let Some(depth) = options.max_depth {
        walker = walker.max_depth(depth);
    }
    FileWalk {
        inner: walker.into_iter(),
    }
}

impl Iterator for FileWalk {
    type Item = Result<PathBuf, walkdir::Error>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.inner.next()? {
                Ok(entry) => {
                    if entry.file_type().is_file() {
                        return Some(Ok(entry.into_path()));
                    }
                }
                Err(err) => return Some(Err(err)),
            }
        }
    }
}

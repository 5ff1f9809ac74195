//! Filesystem input: what to visit and what to skip.
//!
//! `fs` walks the tree; `exclude` decides which yielded paths are skipped
//! before classification.

pub mod exclude;
pub mod fs;

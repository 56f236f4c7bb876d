//! Output tree traversal for postbuild.
//!
//! This module handles:
//! - Recursive directory walking with subtree pruning
//! - Asset copying with extension exclusion
//! - Read / transform / write-if-changed of individual files

pub mod copy;
pub mod file_unit;
pub mod walker;

pub use copy::{CopyReport, copy_tree};
pub use file_unit::{FileUnit, rewrite_tree};
pub use walker::{TreeWalker, is_logs_dir};

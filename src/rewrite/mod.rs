//! Import specifier rewriting for postbuild.
//!
//! This module handles:
//! - Compiling alias table entries into catch/exact pattern pairs
//! - Appending `.js` to extensionless relative specifiers
//! - Resolving aliased specifiers (first match wins)
//! - ESM-only source fixes (JSON import attributes, `__dirname`)

pub mod esm;
pub mod pattern;
pub mod specifier;

pub use esm::EsmAdjuster;
pub use pattern::{AliasPattern, compile_aliases, find_matching_alias, resolve_alias};
pub use specifier::{
	SCRIPT_EXTENSION, SpecifierRewriter, is_relative_or_rooted, lacks_extension, needs_extension,
};

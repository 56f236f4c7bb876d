use crate::error::{PostbuildError, Result};
use crate::tree::walker::TreeWalker;
use std::borrow::Cow;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// A text file read from an output tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUnit {
	pub path: PathBuf,
	pub raw_content: String,
}

impl FileUnit {
	pub fn read(path: &Path) -> Result<Self> {
		let raw_content = fs::read_to_string(path).map_err(|source| PostbuildError::Io {
			path: path.to_path_buf(),
			source,
		})?;

		Ok(FileUnit {
			path: path.to_path_buf(),
			raw_content,
		})
	}

	/// Apply `transform` and write the file back only if the content changed.
	///
	/// Returns whether the file was written.
	pub fn rewrite<F>(&self, transform: F) -> Result<bool>
	where
		F: for<'a> Fn(&'a str) -> Cow<'a, str>,
	{
		match transform(&self.raw_content) {
			Cow::Owned(content) if content != self.raw_content => {
				fs::write(&self.path, content).map_err(|source| PostbuildError::Io {
					path: self.path.clone(),
					source,
				})?;
				Ok(true)
			}
			_ => Ok(false),
		}
	}
}

/// Run `transform` over every file under `root` whose extension is one of
/// `extensions` (without the dot). Returns how many files were rewritten.
///
/// Files that are not valid UTF-8 are left as they are.
pub fn rewrite_tree<F>(root: &Path, extensions: &[&str], transform: F) -> Result<usize>
where
	F: for<'a> Fn(&'a str) -> Cow<'a, str>,
{
	let mut rewritten = 0;

	TreeWalker::new(root).visit_files(|path| {
		let matches_extension = path
			.extension()
			.and_then(|ext| ext.to_str())
			.is_some_and(|ext| extensions.contains(&ext));
		if !matches_extension {
			return Ok(());
		}

		let unit = match FileUnit::read(path) {
			Ok(unit) => unit,
			Err(PostbuildError::Io { source, .. }) if source.kind() == ErrorKind::InvalidData => {
				warn!(path = %path.display(), "not valid UTF-8, left unchanged");
				return Ok(());
			}
			Err(e) => return Err(e),
		};

		if unit.rewrite(&transform)? {
			debug!(path = %path.display(), "rewrote");
			rewritten += 1;
		}
		Ok(())
	})?;

	Ok(rewritten)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_rewrite_writes_changed_content() {
		let temp = tempfile::tempdir().unwrap();
		let path = temp.path().join("index.js");
		fs::write(&path, "hello").unwrap();

		let unit = FileUnit::read(&path).unwrap();
		assert_eq!(unit.raw_content, "hello");

		let written = unit
			.rewrite(|text| Cow::Owned(text.replace("hello", "bye")))
			.unwrap();
		assert!(written);
		assert_eq!(fs::read_to_string(&path).unwrap(), "bye");
	}

	#[test]
	fn test_rewrite_skips_unchanged_content() {
		let temp = tempfile::tempdir().unwrap();
		let path = temp.path().join("index.js");
		fs::write(&path, "same").unwrap();
		let unit = FileUnit::read(&path).unwrap();

		assert!(!unit.rewrite(|text| Cow::Borrowed(text)).unwrap());
		assert!(!unit.rewrite(|text| Cow::Owned(text.to_string())).unwrap());
	}

	#[test]
	fn test_rewrite_tree_filters_by_extension() {
		let temp = tempfile::tempdir().unwrap();
		let root = temp.path();
		fs::create_dir_all(root.join("nested")).unwrap();
		fs::write(root.join("a.js"), "x").unwrap();
		fs::write(root.join("nested/b.js"), "x").unwrap();
		fs::write(root.join("nested/c.mjs"), "x").unwrap();
		fs::write(root.join("d.txt"), "x").unwrap();

		let count = rewrite_tree(root, &["js"], |text| Cow::Owned(text.replace('x', "y"))).unwrap();
		assert_eq!(count, 2);
		assert_eq!(fs::read_to_string(root.join("nested/b.js")).unwrap(), "y");
		assert_eq!(fs::read_to_string(root.join("nested/c.mjs")).unwrap(), "x");
		assert_eq!(fs::read_to_string(root.join("d.txt")).unwrap(), "x");

		let count = rewrite_tree(root, &["js", "mjs"], |text| Cow::Owned(text.replace('x', "y"))).unwrap();
		assert_eq!(count, 1);
	}

	#[test]
	fn test_rewrite_tree_leaves_non_utf8_files_alone() {
		let temp = tempfile::tempdir().unwrap();
		let root = temp.path();
		let binary = [0xff, 0xfe, b'x', 0x00];
		fs::write(root.join("a.js"), binary).unwrap();
		fs::write(root.join("b.js"), "x").unwrap();

		let count = rewrite_tree(root, &["js"], |text| Cow::Owned(text.replace('x', "y"))).unwrap();

		assert_eq!(count, 1);
		assert_eq!(fs::read(root.join("a.js")).unwrap(), binary);
		assert_eq!(fs::read_to_string(root.join("b.js")).unwrap(), "y");
	}

	#[test]
	fn test_read_missing_file() {
		let temp = tempfile::tempdir().unwrap();
		let err = FileUnit::read(&temp.path().join("nope.js")).unwrap_err();
		assert!(matches!(err, PostbuildError::Io { .. }));
	}
}

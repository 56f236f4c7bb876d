use crate::error::{PostbuildError, Result};
use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::{DirEntry, WalkDir};

/// Recursive directory visitor with subtree pruning.
pub struct TreeWalker {
	root: PathBuf,
	skip_dir: Option<Box<dyn Fn(&Path) -> bool>>,
}

impl TreeWalker {
	pub fn new(root: impl Into<PathBuf>) -> Self {
		TreeWalker {
			root: root.into(),
			skip_dir: None,
		}
	}

	/// Prune every directory below the root for which `predicate` is true,
	/// together with everything inside it.
	pub fn skip_dirs(mut self, predicate: impl Fn(&Path) -> bool + 'static) -> Self {
		self.skip_dir = Some(Box::new(predicate));
		self
	}

	/// Visit every entry (root included) in a parent-before-children order.
	///
	/// Symbolic links are followed, so a linked directory is visited like a
	/// real one. A link that points back at one of its ancestors is skipped.
	pub fn visit<F>(&self, mut action: F) -> Result<()>
	where
		F: FnMut(&DirEntry) -> Result<()>,
	{
		let entries = WalkDir::new(&self.root)
			.follow_links(true)
			.sort_by_file_name()
			.into_iter()
			.filter_entry(|entry| !self.is_skipped(entry));

		for entry in entries {
			let entry = match entry {
				Ok(entry) => entry,
				Err(err) if err.loop_ancestor().is_some() => {
					warn!(path = ?err.path(), "skipping symlink loop");
					continue;
				}
				Err(source) => return Err(PostbuildError::Walk { source }),
			};
			action(&entry)?;
		}

		Ok(())
	}

	/// Visit regular files only.
	pub fn visit_files<F>(&self, mut action: F) -> Result<()>
	where
		F: FnMut(&Path) -> Result<()>,
	{
		self.visit(|entry| {
			if entry.file_type().is_file() {
				action(entry.path())?;
			}
			Ok(())
		})
	}

	fn is_skipped(&self, entry: &DirEntry) -> bool {
		entry.depth() > 0
			&& entry.file_type().is_dir()
			&& self.skip_dir.as_ref().is_some_and(|skip| skip(entry.path()))
	}
}

/// Directories whose name contains `logs` in any case.
pub fn is_logs_dir(path: &Path) -> bool {
	path.file_name()
		.is_some_and(|name| name.to_string_lossy().to_lowercase().contains("logs"))
}

use crate::config::CopySpec;
use crate::error::{PostbuildError, Result};
use crate::tree::walker::{TreeWalker, is_logs_dir};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Outcome of copying one asset tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopyReport {
	pub copied: usize,
	pub excluded: usize,
}

/// Mirror `spec.from` into `to`.
///
/// Files with an excluded extension and directories whose name contains
/// `logs` are not copied. Destination directories are created before any
/// file is written into them. Neither `to` nor any directory in
/// `output_dirs` is copied when it lives inside the source tree, so
/// sibling output trees never end up inside each other.
pub fn copy_tree(spec: &CopySpec, to: &Path, output_dirs: &[&Path]) -> Result<CopyReport> {
	create_dir_all(to)?;

	let mut pruned: Vec<PathBuf> = output_dirs.iter().map(|dir| dir.to_path_buf()).collect();
	pruned.push(to.to_path_buf());
	let walker = TreeWalker::new(&spec.from)
		.skip_dirs(move |dir| is_logs_dir(dir) || pruned.iter().any(|out| out == dir));

	let mut report = CopyReport::default();
	walker.visit(|entry| {
		let Ok(relative) = entry.path().strip_prefix(&spec.from) else {
			return Ok(());
		};
		let target = to.join(relative);

		if entry.file_type().is_dir() {
			return create_dir_all(&target);
		}

		if spec.is_excluded(entry.path()) {
			debug!(path = %entry.path().display(), "excluded");
			report.excluded += 1;
			return Ok(());
		}

		fs::copy(entry.path(), &target).map_err(|source| PostbuildError::Io {
			path: target,
			source,
		})?;
		debug!("Copied: {}", entry.path().display());
		report.copied += 1;
		Ok(())
	})?;

	Ok(report)
}

fn create_dir_all(dir: &Path) -> Result<()> {
	fs::create_dir_all(dir).map_err(|source| PostbuildError::Io {
		path: dir.to_path_buf(),
		source,
	})
}

use crate::config::{ModuleKind, to_pretty_json};
use crate::error::{PostbuildError, Result};
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};

/// Marker file declaring a tree's module type.
pub const MARKER_FILE_NAME: &str = "package.json";

/// Contents of the marker file for `kind`.
pub fn marker_content(kind: ModuleKind) -> serde_json::Result<String> {
	to_pretty_json(&json!({ "type": kind.package_type() }))
}

/// Write the marker into `dir`, creating the directory if needed.
pub fn write_marker(dir: &Path, kind: ModuleKind) -> Result<PathBuf> {
	let path = dir.join(MARKER_FILE_NAME);
	let content = marker_content(kind).map_err(|source| PostbuildError::Json {
		path: path.clone(),
		source,
	})?;

	fs::create_dir_all(dir).map_err(|source| PostbuildError::Io {
		path: dir.to_path_buf(),
		source,
	})?;
	fs::write(&path, content).map_err(|source| PostbuildError::Io {
		path: path.clone(),
		source,
	})?;

	Ok(path)
}

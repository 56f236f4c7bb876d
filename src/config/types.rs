use serde::Serialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// File name of the configuration file looked up in the project root.
pub const CONFIG_FILE_NAME: &str = "postbuild.config.json";

/// Output directory used for `"esmDir": "auto"`, relative to the project root.
pub const ESM_REL_PATH: &str = "dist/esm";

/// Output directory used for `"cjsDir": "auto"`, relative to the project root.
pub const CJS_REL_PATH: &str = "dist/cjs";

/// Copy source used when `copyFiles.from` is omitted.
pub const DEFAULT_SOURCE_DIR: &str = "src";

/// Source-only extension that is never copied into an output tree.
pub const SOURCE_EXTENSION: &str = ".ts";

/// One of the two parallel output trees.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleKind {
	Esm,
	Cjs,
}

impl ModuleKind {
	/// Both trees, in processing order.
	pub const ALL: [ModuleKind; 2] = [ModuleKind::Esm, ModuleKind::Cjs];

	/// Value of the `"type"` field in the tree's `package.json` marker.
	pub fn package_type(&self) -> &'static str {
		match self {
			ModuleKind::Esm => "module",
			ModuleKind::Cjs => "commonjs",
		}
	}

	/// Short human label used in progress messages.
	pub fn label(&self) -> &'static str {
		match self {
			ModuleKind::Esm => "ESM",
			ModuleKind::Cjs => "CJS",
		}
	}

	/// Config key naming this tree's output directory.
	pub fn config_key(&self) -> &'static str {
		match self {
			ModuleKind::Esm => "esmDir",
			ModuleKind::Cjs => "cjsDir",
		}
	}

	/// Conventional output directory used for `"auto"`.
	pub fn default_rel_path(&self) -> &'static str {
		match self {
			ModuleKind::Esm => ESM_REL_PATH,
			ModuleKind::Cjs => CJS_REL_PATH,
		}
	}
}

/// Asset copy policy from `copyFiles`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CopySpec {
	/// Source tree to copy from.
	pub from: PathBuf,

	/// Extensions (with leading `.`) that are never copied.
	/// Always contains [`SOURCE_EXTENSION`].
	pub exclude: BTreeSet<String>,
}

impl CopySpec {
	/// Build a copy policy; the source-only extension is always excluded.
	pub fn new(from: impl Into<PathBuf>, exclude: impl IntoIterator<Item = String>) -> Self {
		let mut exclude: BTreeSet<String> = exclude.into_iter().collect();
		exclude.insert(SOURCE_EXTENSION.to_string());
		CopySpec {
			from: from.into(),
			exclude,
		}
	}

	/// Whether the file at `path` carries one of the excluded extensions.
	///
	/// Matching is done on the file name suffix so that multi-part entries
	/// such as `.d.ts` work as well as `.map`.
	pub fn is_excluded(&self, path: &Path) -> bool {
		let Some(name) = path.file_name() else {
			return false;
		};
		let name = name.to_string_lossy();
		self.exclude
			.iter()
			.any(|ext| name.len() > ext.len() && name.ends_with(ext.as_str()))
	}
}

/// A single alias entry: the alias as written in source and its replacement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AliasEntry {
	pub alias: String,
	pub resolved: String,
}

/// Alias table in file order. First match wins during rewriting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AliasTable(Vec<AliasEntry>);

impl AliasTable {
	pub fn new() -> Self {
		Self::default()
	}

	/// Append an entry. A repeated alias replaces the earlier value in place.
	pub fn insert(&mut self, alias: impl Into<String>, resolved: impl Into<String>) {
		let alias = alias.into();
		let resolved = resolved.into();
		match self.0.iter_mut().find(|entry| entry.alias == alias) {
			Some(entry) => entry.resolved = resolved,
			None => self.0.push(AliasEntry { alias, resolved }),
		}
	}

	pub fn iter(&self) -> impl Iterator<Item = &AliasEntry> {
		self.0.iter()
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

impl<A: Into<String>, R: Into<String>> FromIterator<(A, R)> for AliasTable {
	fn from_iter<I: IntoIterator<Item = (A, R)>>(iter: I) -> Self {
		let mut table = AliasTable::new();
		for (alias, resolved) in iter {
			table.insert(alias, resolved);
		}
		table
	}
}

/// Validated configuration for one run. Never mutated after loading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
	/// Project root that relative paths were resolved against.
	pub root: PathBuf,

	/// ESM output tree. `None` means the tree is not processed at all.
	pub esm_dir: Option<PathBuf>,

	/// CJS output tree. `None` means the tree is not processed at all.
	pub cjs_dir: Option<PathBuf>,

	/// Asset copy policy.
	pub copy_files: Option<CopySpec>,

	/// Append `.js` to relative specifiers that lack an extension.
	pub add_extensions: bool,

	/// Alias table for specifier resolution.
	pub aliases: Option<AliasTable>,

	/// Print progress messages.
	pub verbose: bool,
}

impl Config {
	/// An empty configuration rooted at `root`: nothing is processed.
	pub fn new(root: impl Into<PathBuf>) -> Self {
		Config {
			root: root.into(),
			esm_dir: None,
			cjs_dir: None,
			copy_files: None,
			add_extensions: false,
			aliases: None,
			verbose: false,
		}
	}

	/// Output directory configured for `kind`, if any.
	pub fn output_dir(&self, kind: ModuleKind) -> Option<&Path> {
		match kind {
			ModuleKind::Esm => self.esm_dir.as_deref(),
			ModuleKind::Cjs => self.cjs_dir.as_deref(),
		}
	}

	/// Configured output trees, ESM first.
	pub fn output_dirs(&self) -> impl Iterator<Item = (ModuleKind, &Path)> {
		ModuleKind::ALL
			.into_iter()
			.filter_map(|kind| self.output_dir(kind).map(|dir| (kind, dir)))
	}
}

use crate::config::types::{
	AliasTable, CONFIG_FILE_NAME, Config, CopySpec, DEFAULT_SOURCE_DIR, ModuleKind,
};
use crate::error::{PostbuildError, Result};
use serde_json::{Map, Value};
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Load `postbuild.config.json` from the project root.
pub fn load_config(root: &Path) -> Result<Config> {
	parse_config_file(&root.join(CONFIG_FILE_NAME), root)
}

/// Parse a config file from the given path, resolving relative paths against `root`.
pub fn parse_config_file(path: &Path, root: &Path) -> Result<Config> {
	if !path.exists() {
		return Err(PostbuildError::ConfigMissing {
			path: path.to_path_buf(),
		});
	}

	let content = std::fs::read_to_string(path).map_err(|source| PostbuildError::ConfigRead {
		path: path.to_path_buf(),
		source,
	})?;

	debug!(path = %path.display(), "reading config file");
	parse_config_str(&content, path, root)
}

/// Parse a config from a string (useful for testing).
pub fn parse_config_str(content: &str, path: &Path, root: &Path) -> Result<Config> {
	let value: Value =
		serde_json::from_str(content).map_err(|source| PostbuildError::ConfigParse {
			path: path.to_path_buf(),
			source,
		})?;

	let Value::Object(map) = value else {
		return Err(PostbuildError::invalid(format!(
			"expecting a JSON object, instead got {}",
			kind_of(&value)
		)));
	};

	resolve_config(&map, root)
}

/// Validate the raw JSON object and normalize it into a [`Config`].
fn resolve_config(map: &Map<String, Value>, root: &Path) -> Result<Config> {
	let mut config = Config::new(root);

	config.verbose = optional_bool(map, "verbose")?.unwrap_or(false);
	config.esm_dir = resolve_output_dir(map, ModuleKind::Esm, root)?;
	config.cjs_dir = resolve_output_dir(map, ModuleKind::Cjs, root)?;
	config.copy_files = resolve_copy_files(map, root)?;
	config.add_extensions = optional_bool(map, "addExtensions")?.unwrap_or(false);
	config.aliases = resolve_aliases(map)?;

	Ok(config)
}

fn resolve_output_dir(
	map: &Map<String, Value>,
	kind: ModuleKind,
	root: &Path,
) -> Result<Option<PathBuf>> {
	let key = kind.config_key();
	let Some(value) = map.get(key) else {
		return Ok(None);
	};

	let dir = expect_string(value, key)?;
	if dir == "auto" {
		return Ok(Some(resolve_path(root, kind.default_rel_path())));
	}

	existing_path(key, resolve_path(root, dir)).map(Some)
}

fn resolve_copy_files(map: &Map<String, Value>, root: &Path) -> Result<Option<CopySpec>> {
	let Some(value) = map.get("copyFiles") else {
		return Ok(None);
	};

	let Value::Object(copy_files) = value else {
		return Err(PostbuildError::invalid(format!(
			"the provided \"copyFiles\" must be an object, instead got {}",
			kind_of(value)
		)));
	};

	let mut exclude = Vec::new();
	if let Some(value) = copy_files.get("exclude") {
		let Value::Array(entries) = value else {
			return Err(PostbuildError::invalid(format!(
				"\"copyFiles.exclude\" is expecting an array of strings, instead got {}",
				kind_of(value)
			)));
		};

		for entry in entries {
			let ext = expect_string(entry, "copyFiles.exclude")?;
			if !ext.starts_with('.') {
				return Err(PostbuildError::invalid(format!(
					"\"copyFiles.exclude\" should list file extensions in this format: \".ts\". \"{ext}\" is not a valid extension"
				)));
			}
			exclude.push(ext.to_string());
		}
	}

	let from = match copy_files.get("from") {
		Some(value) => resolve_path(root, expect_string(value, "copyFiles.from")?),
		None => resolve_path(root, DEFAULT_SOURCE_DIR),
	};
	let from = existing_path("copyFiles.from", from)?;

	Ok(Some(CopySpec::new(from, exclude)))
}

fn resolve_aliases(map: &Map<String, Value>) -> Result<Option<AliasTable>> {
	let Some(value) = map.get("aliases") else {
		return Ok(None);
	};

	let Value::Object(aliases) = value else {
		return Err(PostbuildError::invalid(format!(
			"the \"aliases\" option is expecting an object, instead got {}",
			kind_of(value)
		)));
	};

	let mut table = AliasTable::new();
	for (alias, resolved) in aliases {
		let Value::String(resolved) = resolved else {
			return Err(PostbuildError::invalid(format!(
				"the alias \"{alias}\" must map to a string, instead got {}",
				kind_of(resolved)
			)));
		};
		table.insert(alias.as_str(), resolved.as_str());
	}

	Ok(Some(table))
}

fn optional_bool(map: &Map<String, Value>, key: &str) -> Result<Option<bool>> {
	match map.get(key) {
		None => Ok(None),
		Some(Value::Bool(flag)) => Ok(Some(*flag)),
		Some(other) => Err(PostbuildError::invalid(format!(
			"the \"{key}\" option is expecting a boolean value, instead got {}",
			kind_of(other)
		))),
	}
}

/// Require a non-blank string.
fn expect_string<'a>(value: &'a Value, key: &str) -> Result<&'a str> {
	match value {
		Value::String(s) if !s.trim().is_empty() => Ok(s),
		Value::String(_) => Err(PostbuildError::invalid(format!(
			"\"{key}\" is expecting a non-empty string"
		))),
		other => Err(PostbuildError::invalid(format!(
			"\"{key}\" is expecting a string, instead got {}",
			kind_of(other)
		))),
	}
}

fn existing_path(key: &str, path: PathBuf) -> Result<PathBuf> {
	if path.exists() {
		Ok(path)
	} else {
		Err(PostbuildError::PathNotFound {
			key: key.to_string(),
			path,
		})
	}
}

/// Join `path` onto `root` (absolute paths win) and drop `.` components.
fn resolve_path(root: &Path, path: &str) -> PathBuf {
	root.join(path)
		.components()
		.filter(|component| !matches!(component, Component::CurDir))
		.collect()
}

/// JSON type name used in error messages.
fn kind_of(value: &Value) -> &'static str {
	match value {
		Value::Null => "null",
		Value::Bool(_) => "a boolean",
		Value::Number(_) => "a number",
		Value::String(_) => "a string",
		Value::Array(_) => "an array",
		Value::Object(_) => "an object",
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::fs;

	fn parse(content: &str, root: &Path) -> Result<Config> {
		parse_config_str(content, &root.join(CONFIG_FILE_NAME), root)
	}

	#[test]
	fn test_parse_empty_object() {
		let root = tempfile::tempdir().unwrap();
		let config = parse("{}", root.path()).unwrap();

		assert!(config.esm_dir.is_none());
		assert!(config.cjs_dir.is_none());
		assert!(config.copy_files.is_none());
		assert!(!config.add_extensions);
		assert!(config.aliases.is_none());
		assert!(!config.verbose);
	}

	#[test]
	fn test_parse_auto_dirs() {
		let root = tempfile::tempdir().unwrap();
		let config = parse(
			r#"{ "esmDir": "auto", "cjsDir": "auto", "verbose": true }"#,
			root.path(),
		)
		.unwrap();

		assert_eq!(config.esm_dir, Some(root.path().join("dist/esm")));
		assert_eq!(config.cjs_dir, Some(root.path().join("dist/cjs")));
		assert!(config.verbose);
	}

	#[test]
	fn test_parse_explicit_dir_must_exist() {
		let root = tempfile::tempdir().unwrap();
		fs::create_dir_all(root.path().join("out/esm")).unwrap();

		let config = parse(r#"{ "esmDir": "./out/esm" }"#, root.path()).unwrap();
		assert_eq!(config.esm_dir, Some(root.path().join("out/esm")));

		match parse(r#"{ "cjsDir": "out/cjs" }"#, root.path()).unwrap_err() {
			PostbuildError::PathNotFound { key, path } => {
				assert_eq!(key, "cjsDir");
				assert_eq!(path, root.path().join("out/cjs"));
			}
			other => panic!("Expected PathNotFound error, got {other:?}"),
		}
	}

	#[test]
	fn test_parse_copy_files() {
		let root = tempfile::tempdir().unwrap();
		fs::create_dir_all(root.path().join("assets")).unwrap();

		let config = parse(
			r#"{ "copyFiles": { "from": "assets", "exclude": [".map", ".md"] } }"#,
			root.path(),
		)
		.unwrap();

		let copy = config.copy_files.unwrap();
		assert_eq!(copy.from, root.path().join("assets"));
		let exclude: Vec<_> = copy.exclude.iter().map(String::as_str).collect();
		assert_eq!(exclude, vec![".map", ".md", ".ts"]);
	}

	#[test]
	fn test_parse_copy_files_defaults_to_src() {
		let root = tempfile::tempdir().unwrap();

		let err = parse(r#"{ "copyFiles": {} }"#, root.path()).unwrap_err();
		assert!(matches!(err, PostbuildError::PathNotFound { ref key, .. } if key == "copyFiles.from"));

		fs::create_dir_all(root.path().join("src")).unwrap();
		let copy = parse(r#"{ "copyFiles": {} }"#, root.path())
			.unwrap()
			.copy_files
			.unwrap();
		assert_eq!(copy.from, root.path().join("src"));
		assert!(copy.exclude.contains(".ts"));
	}

	#[test]
	fn test_parse_rejects_bad_exclude_entries() {
		let root = tempfile::tempdir().unwrap();
		fs::create_dir_all(root.path().join("src")).unwrap();

		for content in [
			r#"{ "copyFiles": { "exclude": "map" } }"#,
			r#"{ "copyFiles": { "exclude": ["map"] } }"#,
			r#"{ "copyFiles": { "exclude": [3] } }"#,
			r#"{ "copyFiles": { "exclude": [""] } }"#,
			r#"{ "copyFiles": [] }"#,
		] {
			let err = parse(content, root.path()).unwrap_err();
			assert!(
				matches!(err, PostbuildError::ConfigInvalid { .. }),
				"{content} should be invalid, got {err:?}"
			);
		}
	}

	#[test]
	fn test_parse_add_extensions_must_be_bool() {
		let root = tempfile::tempdir().unwrap();
		assert!(parse(r#"{ "addExtensions": true }"#, root.path()).unwrap().add_extensions);

		let err = parse(r#"{ "addExtensions": "yes" }"#, root.path()).unwrap_err();
		assert!(err.to_string().contains("addExtensions"));
	}

	#[test]
	fn test_parse_aliases_preserves_file_order() {
		let root = tempfile::tempdir().unwrap();
		let config = parse(
			r#"{ "aliases": { "@utils/*": "./utils", "@app/*": "../../shared", "@config": "./config.js" } }"#,
			root.path(),
		)
		.unwrap();

		let aliases: Vec<_> = config
			.aliases
			.unwrap()
			.iter()
			.map(|entry| entry.alias.clone())
			.collect();
		assert_eq!(aliases, vec!["@utils/*", "@app/*", "@config"]);
	}

	#[test]
	fn test_parse_aliases_rejects_non_string_values() {
		let root = tempfile::tempdir().unwrap();
		let err = parse(r#"{ "aliases": { "@app/*": 1 } }"#, root.path()).unwrap_err();
		assert!(matches!(err, PostbuildError::ConfigInvalid { .. }));
		assert!(err.to_string().contains("@app/*"));

		let err = parse(r#"{ "aliases": ["@app"] }"#, root.path()).unwrap_err();
		assert!(matches!(err, PostbuildError::ConfigInvalid { .. }));
	}

	#[test]
	fn test_parse_rejects_non_object_and_bad_json() {
		let root = tempfile::tempdir().unwrap();

		let err = parse("[]", root.path()).unwrap_err();
		assert!(matches!(err, PostbuildError::ConfigInvalid { .. }));

		let err = parse("{ esmDir: auto", root.path()).unwrap_err();
		assert!(matches!(err, PostbuildError::ConfigParse { .. }));
		assert!(err.is_config_error());
		assert!(
			err.to_string()
				.starts_with("Unable to read postbuild config file:")
		);
	}

	#[test]
	fn test_load_config_missing_file() {
		let root = tempfile::tempdir().unwrap();
		match load_config(root.path()).unwrap_err() {
			PostbuildError::ConfigMissing { path } => {
				assert_eq!(path, root.path().join(CONFIG_FILE_NAME));
			}
			other => panic!("Expected ConfigMissing error, got {other:?}"),
		}
	}

	#[test]
	fn test_load_config_from_disk() {
		let root = tempfile::tempdir().unwrap();
		fs::write(
			root.path().join(CONFIG_FILE_NAME),
			r#"{ "cjsDir": "auto", "addExtensions": true }"#,
		)
		.unwrap();

		let config = load_config(root.path()).unwrap();
		assert!(config.esm_dir.is_none());
		assert_eq!(config.cjs_dir, Some(root.path().join("dist/cjs")));
		assert!(config.add_extensions);
	}
}

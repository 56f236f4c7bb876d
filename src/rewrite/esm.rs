use crate::error::Result;
use crate::rewrite::pattern::compile_regex;
use regex::{NoExpand, Regex};
use std::borrow::Cow;

/// `import x from './file.json';` without import attributes.
const JSON_IMPORT: &str = r#"(\bimport\s+[^;'"()]*?\bfrom\s*)(['"])([^'"\r\n]+\.json)(['"])(\s*;)"#;

const DIRNAME: &str = r"\b__dirname\b";

const JSON_ATTRIBUTES: &str = r#"${1}${2}${3}${4} with { type: "json" }${5}"#;

const IMPORT_META_DIRNAME: &str = "import.meta.dirname";

/// Source fixes that only apply to the ESM output tree.
#[derive(Debug, Clone)]
pub struct EsmAdjuster {
	json_import: Regex,
	dirname: Regex,
}

impl EsmAdjuster {
	pub fn new() -> Result<Self> {
		Ok(EsmAdjuster {
			json_import: compile_regex(JSON_IMPORT)?,
			dirname: compile_regex(DIRNAME)?,
		})
	}

	/// Add `with { type: "json" }` to static JSON imports.
	///
	/// Only statements whose closing quote is directly followed by `;` are
	/// touched, so imports that already carry attributes are left alone.
	pub fn add_json_import_attributes<'t>(&self, text: &'t str) -> Cow<'t, str> {
		self.json_import.replace_all(text, JSON_ATTRIBUTES)
	}

	/// Replace the CommonJS `__dirname` global with `import.meta.dirname`.
	pub fn convert_dirname<'t>(&self, text: &'t str) -> Cow<'t, str> {
		self.dirname.replace_all(text, NoExpand(IMPORT_META_DIRNAME))
	}

	/// Both adjustments, JSON attributes first.
	pub fn apply<'t>(&self, text: &'t str) -> Cow<'t, str> {
		match self.add_json_import_attributes(text) {
			Cow::Borrowed(text) => self.convert_dirname(text),
			Cow::Owned(text) => Cow::Owned(self.convert_dirname(&text).into_owned()),
		}
	}
}

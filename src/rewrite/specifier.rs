use crate::error::Result;
use crate::rewrite::pattern::{AliasPattern, compile_regex, resolve_alias};
use regex::{Captures, Regex};
use std::borrow::Cow;

/// Extension appended to extensionless relative specifiers.
pub const SCRIPT_EXTENSION: &str = ".js";

// Each statement pattern captures: 1 = everything up to the opening quote,
// 2 = opening quote, 3 = specifier, 4 = closing quote.

/// `import <bindings> from '<spec>'`; bindings may span lines, `import(...)` never matches.
const IMPORT_FROM: &str = r#"(\bimport\s*[\s{*][^;'"()]*?\bfrom\s*)(['"])([^'"\r\n]*)(['"])"#;

/// `export { <bindings> } from '<spec>'`
const EXPORT_FROM: &str = r#"(\bexport\s*\{[^}]*\}\s*from\s*)(['"])([^'"\r\n]*)(['"])"#;

/// Any `from '<spec>'` clause, import or export.
const FROM_CLAUSE: &str = r#"(\bfrom\s*)(['"])([^'"\r\n]+)(['"])"#;

/// Rewrites module specifiers inside JavaScript source text.
///
/// Matching is regex-based and purely textual: the filesystem is never
/// consulted. Both passes only return new text; persisting it is up to the
/// caller. Unrecognized syntax passes through unchanged.
#[derive(Debug, Clone)]
pub struct SpecifierRewriter {
	import_from: Regex,
	export_from: Regex,
	from_clause: Regex,
}

impl SpecifierRewriter {
	/// Compile the statement matchers.
	pub fn new() -> Result<Self> {
		Ok(SpecifierRewriter {
			import_from: compile_regex(IMPORT_FROM)?,
			export_from: compile_regex(EXPORT_FROM)?,
			from_clause: compile_regex(FROM_CLAUSE)?,
		})
	}

	/// Append [`SCRIPT_EXTENSION`] to relative and rooted specifiers in
	/// `import … from` and `export { … } from` statements that lack one.
	pub fn rewrite_extensions<'t>(&self, text: &'t str) -> Cow<'t, str> {
		let imports = replace_specifiers(&self.import_from, text, with_script_extension);
		let current = imports.as_deref().unwrap_or(text);

		match replace_specifiers(&self.export_from, current, with_script_extension) {
			Some(rewritten) => Cow::Owned(rewritten),
			None => imports.map_or(Cow::Borrowed(text), Cow::Owned),
		}
	}

	/// Resolve aliased specifiers in every `from '…'` clause.
	///
	/// Patterns are tried in order and the first one that catches a specifier
	/// wins. With `append_extension`, a resolved specifier whose last segment
	/// has no extension gets [`SCRIPT_EXTENSION`].
	pub fn rewrite_aliases<'t>(
		&self,
		text: &'t str,
		patterns: &[AliasPattern],
		append_extension: bool,
	) -> Cow<'t, str> {
		if patterns.is_empty() {
			return Cow::Borrowed(text);
		}

		let resolve = |specifier: &str| resolve_specifier(specifier, patterns, append_extension);
		match replace_specifiers(&self.from_clause, text, resolve) {
			Some(rewritten) => Cow::Owned(rewritten),
			None => Cow::Borrowed(text),
		}
	}
}

/// Run `rewrite` over every specifier captured by `re`.
///
/// Returns `None` when no specifier changed.
fn replace_specifiers<F>(re: &Regex, text: &str, rewrite: F) -> Option<String>
where
	F: Fn(&str) -> Option<String>,
{
	let mut changed = false;
	let rewritten = re.replace_all(text, |caps: &Captures| match rewrite(&caps[3]) {
		Some(specifier) if specifier != caps[3] => {
			changed = true;
			format!("{}{}{}{}", &caps[1], &caps[2], specifier, &caps[4])
		}
		_ => caps[0].to_string(),
	});

	changed.then(|| rewritten.into_owned())
}

fn with_script_extension(specifier: &str) -> Option<String> {
	needs_extension(specifier).then(|| format!("{specifier}{SCRIPT_EXTENSION}"))
}

fn resolve_specifier(
	specifier: &str,
	patterns: &[AliasPattern],
	append_extension: bool,
) -> Option<String> {
	// Relative and rooted specifiers are already resolved.
	if is_relative_or_rooted(specifier) {
		return None;
	}

	let mut resolved = resolve_alias(patterns, specifier)?;
	if append_extension && lacks_extension(&resolved) {
		resolved.push_str(SCRIPT_EXTENSION);
	}
	Some(resolved)
}

/// Specifiers starting with `.` or `/` point into the package itself.
pub fn is_relative_or_rooted(specifier: &str) -> bool {
	specifier.starts_with('.') || specifier.starts_with('/')
}

/// The last path segment is a file name without any `.` in it.
///
/// An empty last segment (`./dir/`) is a directory reference and never
/// lacks an extension.
pub fn lacks_extension(specifier: &str) -> bool {
	let last = specifier.rsplit('/').next().unwrap_or(specifier);
	!last.is_empty() && !last.contains('.')
}

/// Whether the extension pass should append [`SCRIPT_EXTENSION`].
///
/// Bare package references such as `lodash` or `lodash/fp` are left alone.
pub fn needs_extension(specifier: &str) -> bool {
	is_relative_or_rooted(specifier) && lacks_extension(specifier)
}

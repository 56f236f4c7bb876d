use crate::config::AliasTable;
use crate::error::{PostbuildError, Result};
use regex::Regex;

/// Wildcard accepted inside alias keys.
const WILDCARD: char = '*';

/// A compiled alias ready for matching against import specifiers.
#[derive(Debug, Clone)]
pub struct AliasPattern {
	/// The alias as written in the config.
	pub alias: String,

	/// Matches a whole specifier that uses this alias, `*` expanded to `.*`.
	pub catch_regex: Regex,

	/// Matches the literal alias prefix that gets replaced.
	pub exact_regex: Regex,

	/// Replacement for the literal prefix.
	pub resolved_path: String,
}

impl AliasPattern {
	/// Compile a single alias entry.
	pub fn compile(alias: &str, resolved_path: &str) -> Result<Self> {
		Ok(AliasPattern {
			alias: alias.to_string(),
			catch_regex: compile_regex(&catch_pattern(alias))?,
			exact_regex: compile_regex(&exact_pattern(alias))?,
			resolved_path: resolved_path.to_string(),
		})
	}

	/// Check if this alias catches the whole specifier.
	pub fn matches(&self, specifier: &str) -> bool {
		self.catch_regex.is_match(specifier)
	}

	/// Resolve `specifier` through this alias, or `None` if it is not caught.
	pub fn resolve(&self, specifier: &str) -> Option<String> {
		if !self.matches(specifier) {
			return None;
		}

		let prefix = self.exact_regex.find(specifier)?;
		Some(join_resolved(&self.resolved_path, &specifier[prefix.end()..]))
	}
}

/// `^<escaped pieces joined by .*>$`
fn catch_pattern(alias: &str) -> String {
	let body = alias
		.split(WILDCARD)
		.map(regex::escape)
		.collect::<Vec<_>>()
		.join(".*");
	format!("^{body}$")
}

/// `^<escaped literal prefix>`
fn exact_pattern(alias: &str) -> String {
	format!("^{}", regex::escape(literal_prefix(alias)))
}

/// The part of the alias before the first wildcard.
///
/// A `/` right before the wildcard stays with the remainder, so `@app/*`
/// has the literal `@app` and `@app/utils` keeps `/utils` as its suffix.
fn literal_prefix(alias: &str) -> &str {
	match alias.find(WILDCARD) {
		Some(idx) => {
			let literal = &alias[..idx];
			literal.strip_suffix('/').unwrap_or(literal)
		}
		None => alias,
	}
}

/// Join the resolved path and the specifier remainder with at most one `/`.
fn join_resolved(resolved: &str, rest: &str) -> String {
	if rest.starts_with('/') {
		format!("{}{}", resolved.trim_end_matches('/'), rest)
	} else {
		format!("{resolved}{rest}")
	}
}

/// Compile a regex pattern string.
pub(crate) fn compile_regex(pattern: &str) -> Result<Regex> {
	Regex::new(pattern).map_err(|source| PostbuildError::InvalidRegex {
		pattern: pattern.to_string(),
		source,
	})
}

/// Compile every alias in table order.
pub fn compile_aliases(table: &AliasTable) -> Result<Vec<AliasPattern>> {
	table
		.iter()
		.map(|entry| AliasPattern::compile(&entry.alias, &entry.resolved))
		.collect()
}

/// Find the first alias that catches the specifier.
pub fn find_matching_alias<'a>(
	patterns: &'a [AliasPattern],
	specifier: &str,
) -> Option<&'a AliasPattern> {
	patterns.iter().find(|pattern| pattern.matches(specifier))
}

/// Resolve a specifier with the first matching alias.
pub fn resolve_alias(patterns: &[AliasPattern], specifier: &str) -> Option<String> {
	find_matching_alias(patterns, specifier).and_then(|pattern| pattern.resolve(specifier))
}

#[cfg(test)]
mod tests {
	use super::*;

	fn compile(entries: &[(&str, &str)]) -> Vec<AliasPattern> {
		let table: AliasTable = entries.iter().copied().collect();
		compile_aliases(&table).unwrap()
	}

	#[test]
	fn test_catch_pattern_escapes_metacharacters() {
		assert_eq!(catch_pattern("@app/*"), r"^@app/.*$");
		assert_eq!(catch_pattern("~lib.v2"), r"^\~lib\.v2$");
		assert_eq!(catch_pattern("(x)+"), r"^\(x\)\+$");
	}

	#[test]
	fn test_exact_pattern_is_literal_prefix() {
		assert_eq!(exact_pattern("@app/*"), "^@app");
		assert_eq!(exact_pattern("@config"), "^@config");
		assert_eq!(exact_pattern("#lib*"), r"^\#lib");
		assert_eq!(exact_pattern("*"), "^");
	}

	#[test]
	fn test_wildcard_alias_resolves_remainder() {
		let patterns = compile(&[("@app/*", "../../shared")]);

		assert_eq!(
			resolve_alias(&patterns, "@app/utils/log"),
			Some("../../shared/utils/log".to_string())
		);
		assert_eq!(resolve_alias(&patterns, "@apple/x"), None);
		assert_eq!(resolve_alias(&patterns, "lodash"), None);
	}

	#[test]
	fn test_resolved_path_trailing_slash_is_joined_once() {
		let patterns = compile(&[("~/*", "./src/")]);
		assert_eq!(
			resolve_alias(&patterns, "~/models/user"),
			Some("./src/models/user".to_string())
		);
	}

	#[test]
	fn test_literal_alias_matches_only_itself() {
		let patterns = compile(&[("@config", "./config/index.js")]);

		assert_eq!(
			resolve_alias(&patterns, "@config"),
			Some("./config/index.js".to_string())
		);
		assert_eq!(resolve_alias(&patterns, "@config/extra"), None);
	}

	#[test]
	fn test_wildcard_not_at_end_uses_prefix() {
		let patterns = compile(&[("@lib/*/index", "./lib")]);
		assert_eq!(
			resolve_alias(&patterns, "@lib/net/index"),
			Some("./lib/net/index".to_string())
		);
		assert_eq!(resolve_alias(&patterns, "@lib/net/other"), None);
	}

	#[test]
	fn test_first_match_wins() {
		let patterns = compile(&[("@app/*", "./first"), ("@app/utils/*", "./second")]);

		let matched = find_matching_alias(&patterns, "@app/utils/log").unwrap();
		assert_eq!(matched.alias, "@app/*");
		assert_eq!(
			resolve_alias(&patterns, "@app/utils/log"),
			Some("./first/utils/log".to_string())
		);
	}

	#[test]
	fn test_compile_preserves_table_order() {
		let patterns = compile(&[("b", "./b"), ("a", "./a"), ("c/*", "./c")]);
		let aliases: Vec<_> = patterns.iter().map(|p| p.alias.as_str()).collect();
		assert_eq!(aliases, vec!["b", "a", "c/*"]);
	}

	#[test]
	fn test_exact_is_prefix_of_every_catch_match() {
		for alias in ["@app/*", "@config", "~*", "#x/*/y", "*"] {
			let pattern = AliasPattern::compile(alias, "./r").unwrap();
			for specifier in ["@app/a/b", "@config", "~thing", "#x/1/y", "anything"] {
				if pattern.matches(specifier) {
					assert!(
						pattern.exact_regex.is_match(specifier),
						"{alias} caught {specifier} without an exact prefix"
					);
				}
			}
		}
	}
}

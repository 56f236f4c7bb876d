//! Configuration loading and validation for postbuild.
//!
//! This module handles:
//! - `postbuild.config.json` parsing and per-key validation
//! - Path resolution against an explicit project root
//! - The `--init` template

pub mod parser;
pub mod template;
pub mod types;

pub use parser::{load_config, parse_config_file, parse_config_str};
pub use template::{generate_init_template, to_pretty_json};
pub use types::{
	AliasEntry, AliasTable, CJS_REL_PATH, CONFIG_FILE_NAME, Config, CopySpec, ESM_REL_PATH,
	ModuleKind, SOURCE_EXTENSION,
};

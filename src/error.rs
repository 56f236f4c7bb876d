use std::path::PathBuf;

/// Library-level structured errors for postbuild.
///
/// Use `thiserror` for structured errors that library consumers can match on.
/// The CLI binary wraps these with `anyhow` for rich context chains.
#[derive(Debug, thiserror::Error)]
pub enum PostbuildError {
	#[error("Unable to read postbuild config file: {path} is missing")]
	ConfigMissing { path: PathBuf },

	#[error("Unable to read postbuild config file: {path}")]
	ConfigRead {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Unable to read postbuild config file: {path} is not valid JSON")]
	ConfigParse {
		path: PathBuf,
		#[source]
		source: serde_json::Error,
	},

	#[error("Unable to read postbuild config file: {reason}")]
	ConfigInvalid { reason: String },

	#[error("Unable to read postbuild config file: the provided \"{key}\" ({path}) does not exist")]
	PathNotFound { key: String, path: PathBuf },

	#[error("Invalid alias pattern: {pattern}")]
	InvalidRegex {
		pattern: String,
		#[source]
		source: regex::Error,
	},

	#[error("I/O error on {path}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to serialize JSON for {path}")]
	Json {
		path: PathBuf,
		#[source]
		source: serde_json::Error,
	},

	#[error("Failed to walk directory tree")]
	Walk {
		#[source]
		source: walkdir::Error,
	},
}

impl PostbuildError {
	/// Shorthand for a `ConfigInvalid` error.
	pub fn invalid(reason: impl Into<String>) -> Self {
		PostbuildError::ConfigInvalid {
			reason: reason.into(),
		}
	}

	/// Whether the error originated from loading the configuration.
	pub fn is_config_error(&self) -> bool {
		matches!(
			self,
			PostbuildError::ConfigMissing { .. }
				| PostbuildError::ConfigRead { .. }
				| PostbuildError::ConfigParse { .. }
				| PostbuildError::ConfigInvalid { .. }
				| PostbuildError::PathNotFound { .. }
		)
	}
}

/// Result type alias using PostbuildError.
pub type Result<T> = std::result::Result<T, PostbuildError>;

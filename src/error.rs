use std::path::PathBuf;

/// Library-level structured errors for url-paths.
///
/// Use `thiserror` for structured errors that library consumers can match on.
/// The CLI binary wraps these with `anyhow` for rich context chains.
#[derive(Debug, thiserror::Error)]
pub enum UrlPathsError {
	#[error("Failed to read settings file: {path}")]
	SettingsReadError {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to parse settings file: {path}")]
	SettingsParseError {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},

	#[error("Invalid settings: {reason}")]
	InvalidSettings { reason: String },

	#[error("Failed to read rule store: {path}")]
	StoreReadError {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to parse rule store: {path}")]
	StoreParseError {
		path: PathBuf,
		#[source]
		source: serde_json::Error,
	},

	#[error("Failed to write rule store: {path}")]
	StoreWriteError {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to parse import document")]
	ImportParseError {
		#[source]
		source: serde_json::Error,
	},

	#[error("Failed to serialize rules")]
	SerializeError {
		#[source]
		source: serde_json::Error,
	},

	#[error("Invalid regex pattern in rule: {pattern}")]
	InvalidRegex {
		pattern: String,
		#[source]
		source: regex::Error,
	},

	#[error("Malformed rule: {reason}")]
	MalformedRule { reason: String },

	#[error("No rule at index {index} (have {len})")]
	RuleIndexOutOfRange { index: usize, len: usize },

	#[error("No transformation at index {index} in rule {rule} (have {len})")]
	TransformationIndexOutOfRange { rule: usize, index: usize, len: usize },

	#[error("Failed to resolve data directory")]
	DataDirectoryNotFound,
}

/// Result type alias using UrlPathsError.
pub type Result<T> = std::result::Result<T, UrlPathsError>;

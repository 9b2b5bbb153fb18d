use crate::config::types::Settings;
use crate::error::{Result, UrlPathsError};
use std::path::Path;

/// Parse a settings file from the given path.
pub fn parse_settings_file(path: &Path) -> Result<Settings> {
	let content = std::fs::read_to_string(path).map_err(|source| UrlPathsError::SettingsReadError {
		path: path.to_path_buf(),
		source,
	})?;

	parse_settings_str(&content, path)
}

/// Parse settings from a string (useful for testing).
pub fn parse_settings_str(content: &str, path: &Path) -> Result<Settings> {
	let settings: Settings =
		toml::from_str(content).map_err(|source| UrlPathsError::SettingsParseError {
			path: path.to_path_buf(),
			source,
		})?;

	settings.validate()?;

	Ok(settings)
}

/// Template written by `url-paths --init`.
pub fn settings_template() -> &'static str {
	r#"# url-paths settings

# How the stored rule `type` is read:
#   "legacy"     - "regex" rules use regular expressions, everything else is a substring match
#   "regex-only" - every rule pattern is a regular expression
match-mode = "legacy"

# Drop generated targets that are not fully qualified URLs
strict = true

# Rule store location, relative to this file
# store = "url-paths-rules.json"
"#
}

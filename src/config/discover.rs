use crate::config::parser::parse_settings_file;
use crate::config::types::LoadedSettings;
use crate::error::{Result, UrlPathsError};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Name of the settings file looked up in each directory.
pub const SETTINGS_FILE_NAME: &str = ".url-paths.toml";

/// Environment variable that, if truthy, skips the ~/.url-paths.toml lookup.
pub const NO_USER_SETTINGS_ENV_VAR: &str = "URL_PATHS_NO_USER_CONFIG";

/// Find and load the effective settings.
///
/// The lookup order is:
/// 1. Start from `start_dir` and walk up looking for `.url-paths.toml`
/// 2. The first file found wins
/// 3. Otherwise ~/.url-paths.toml (unless disabled by env var)
/// 4. Otherwise built-in defaults
pub fn load_settings(start_dir: &Path) -> Result<LoadedSettings> {
	if let Some(path) = find_settings_file(start_dir) {
		return load_from(path);
	}

	if is_env_truthy(NO_USER_SETTINGS_ENV_VAR) {
		return Ok(LoadedSettings::default());
	}

	match user_settings_path() {
		Some(path) if path.is_file() => load_from(path),
		_ => Ok(LoadedSettings::default()),
	}
}

fn load_from(path: PathBuf) -> Result<LoadedSettings> {
	let settings = parse_settings_file(&path)?;
	debug!(path = %path.display(), "Loaded settings");
	Ok(LoadedSettings {
		settings,
		path: Some(path),
	})
}

/// Walk up from `start_dir` to the filesystem root looking for a settings file.
pub fn find_settings_file(start_dir: &Path) -> Option<PathBuf> {
	start_dir
		.ancestors()
		.map(|dir| dir.join(SETTINGS_FILE_NAME))
		.find(|path| path.is_file())
}

/// Check if an environment variable is set to a truthy value.
fn is_env_truthy(var_name: &str) -> bool {
	match std::env::var(var_name) {
		Ok(value) => {
			let lower = value.to_lowercase();
			!value.is_empty() && lower != "0" && lower != "false" && lower != "no"
		}
		Err(_) => false,
	}
}

/// Path of the user's settings file, if there is a home directory.
pub fn user_settings_path() -> Option<PathBuf> {
	dirs::home_dir().map(|home| home.join(SETTINGS_FILE_NAME))
}

/// Get the default rule store location in the platform data directory.
pub fn default_store_path() -> Result<PathBuf> {
	let data_dir = dirs::data_dir().ok_or(UrlPathsError::DataDirectoryNotFound)?;
	Ok(data_dir.join("url-paths").join("rules.json"))
}

/// Resolve the store path: an explicit override, then settings, then the default.
pub fn resolve_store_path(explicit: Option<&Path>, loaded: &LoadedSettings) -> Result<PathBuf> {
	if let Some(path) = explicit {
		return Ok(path.to_path_buf());
	}
	match loaded.configured_store() {
		Some(path) => Ok(path),
		None => default_store_path(),
	}
}

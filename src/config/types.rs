use crate::rules::MatchModePolicy;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Top-level settings from a `.url-paths.toml` file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Settings {
	/// How stored rule types are interpreted.
	#[serde(default)]
	pub match_mode: MatchModePolicy,

	/// Default for dropping results that are not well-formed URLs.
	#[serde(default = "default_strict")]
	pub strict: bool,

	/// Rule store file. Relative paths resolve against the settings file.
	#[serde(default)]
	pub store: Option<PathBuf>,
}

fn default_strict() -> bool {
	true
}

impl Default for Settings {
	fn default() -> Self {
		Self {
			match_mode: MatchModePolicy::default(),
			strict: default_strict(),
			store: None,
		}
	}
}

impl Settings {
	/// Validate field values that deserialization alone cannot check.
	pub fn validate(&self) -> Result<(), crate::error::UrlPathsError> {
		if let Some(ref store) = self.store
			&& store.as_os_str().is_empty()
		{
			return Err(crate::error::UrlPathsError::InvalidSettings {
				reason: "store path must not be empty".to_string(),
			});
		}
		Ok(())
	}
}

/// Settings with the path they were loaded from, if any.
#[derive(Debug, Clone, Default)]
pub struct LoadedSettings {
	/// The parsed settings.
	pub settings: Settings,

	/// The file these settings came from. `None` means built-in defaults.
	pub path: Option<PathBuf>,
}

impl LoadedSettings {
	/// The configured store path, resolved against the settings file's directory.
	pub fn configured_store(&self) -> Option<PathBuf> {
		let store = self.settings.store.as_ref()?;
		if store.is_absolute() {
			return Some(store.clone());
		}
		let base = self
			.path
			.as_deref()
			.and_then(Path::parent)
			.unwrap_or_else(|| Path::new("."));
		Some(base.join(store))
	}
}

//! Settings loading and parsing for url-paths.
//!
//! This module handles:
//! - TOML settings file parsing
//! - Settings file discovery
//! - Rule store location

pub mod discover;
pub mod parser;
pub mod types;

pub use discover::{
	SETTINGS_FILE_NAME, default_store_path, find_settings_file, load_settings, resolve_store_path,
	user_settings_path,
};
pub use parser::{parse_settings_file, parse_settings_str, settings_template};
pub use types::{LoadedSettings, Settings};

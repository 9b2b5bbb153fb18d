use crate::error::{Result, UrlPathsError};
use crate::rules::{MatchModePolicy, Normalized, Rule, normalize_rules};
use crate::store::document::rule_values;
use serde::Serialize;
use serde_json::Value;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

/// On-disk layout: the rule list under a single `rules` key.
#[derive(Serialize)]
struct StoredRules<'a> {
	rules: &'a [Rule],
}

/// A JSON file holding the persisted rule list.
#[derive(Debug, Clone)]
pub struct RuleStore {
	path: PathBuf,
	policy: MatchModePolicy,
}

impl RuleStore {
	pub fn new(path: impl Into<PathBuf>, policy: MatchModePolicy) -> Self {
		Self {
			path: path.into(),
			policy,
		}
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	/// Load and normalize the stored rules. A missing file is an empty list.
	pub fn load(&self) -> Result<Normalized<Rule>> {
		if !self.path.exists() {
			debug!(path = %self.path.display(), "Rule store not found, starting empty");
			return Ok(Normalized::default());
		}

		let content =
			std::fs::read_to_string(&self.path).map_err(|source| UrlPathsError::StoreReadError {
				path: self.path.clone(),
				source,
			})?;

		let document: Value =
			serde_json::from_str(&content).map_err(|source| UrlPathsError::StoreParseError {
				path: self.path.clone(),
				source,
			})?;

		let normalized = normalize_rules(rule_values(&document), self.policy);
		if normalized.dropped > 0 {
			warn!(
				path = %self.path.display(),
				dropped = normalized.dropped,
				"Ignored malformed stored rules"
			);
		}
		Ok(normalized)
	}

	/// Replace the stored rules.
	///
	/// The file is written to a temporary sibling and renamed into place, so
	/// a failed write leaves the previous contents intact.
	pub fn save(&self, rules: &[Rule]) -> Result<()> {
		let json = serde_json::to_string_pretty(&StoredRules { rules })
			.map_err(|source| UrlPathsError::SerializeError { source })?;

		let write_error = |source: std::io::Error| UrlPathsError::StoreWriteError {
			path: self.path.clone(),
			source,
		};

		let dir = match self.path.parent() {
			Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
			_ => PathBuf::from("."),
		};
		std::fs::create_dir_all(&dir).map_err(write_error)?;

		let mut temp = NamedTempFile::new_in(&dir).map_err(write_error)?;
		temp.write_all(json.as_bytes()).map_err(write_error)?;
		temp.write_all(b"\n").map_err(write_error)?;
		temp.as_file().sync_all().map_err(write_error)?;
		temp.persist(&self.path).map_err(|e| write_error(e.error))?;

		debug!(path = %self.path.display(), count = rules.len(), "Saved rules");
		Ok(())
	}
}

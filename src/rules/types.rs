use serde::{Deserialize, Serialize};
use serde_json::Value;

/// How a rule's pattern is tested against a URL.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchMode {
	/// Case-sensitive substring containment.
	#[default]
	#[serde(rename = "string")]
	Literal,

	/// Regular expression, first match only.
	#[serde(rename = "regex")]
	Regex,
}

impl MatchMode {
	/// Get the string representation used in stored rules.
	pub fn as_str(&self) -> &'static str {
		match self {
			MatchMode::Literal => "string",
			MatchMode::Regex => "regex",
		}
	}
}

/// How the stored `type` field is interpreted when normalizing rules.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchModePolicy {
	/// `"regex"` selects regex matching; anything else is a literal rule.
	#[default]
	Legacy,

	/// Every rule is a regex rule, whatever its stored type says.
	RegexOnly,
}

impl MatchModePolicy {
	/// Resolve the match mode for a raw `type` value.
	pub fn resolve(&self, raw_type: Option<&Value>) -> MatchMode {
		match self {
			MatchModePolicy::RegexOnly => MatchMode::Regex,
			MatchModePolicy::Legacy => match raw_type.and_then(Value::as_str) {
				Some("regex") => MatchMode::Regex,
				_ => MatchMode::Literal,
			},
		}
	}
}

/// A named template producing one target URL from a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transformation {
	/// Display label. Defaults to the template.
	pub name: String,

	/// Template text with placeholder tokens.
	pub template: String,
}

/// A URL-matching rule with its ordered transformations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
	/// Display label. Defaults to the pattern.
	pub name: String,

	/// Substring or regular expression, depending on `match_mode`.
	pub pattern: String,

	/// Stored as `type` for compatibility with exported rule files.
	#[serde(rename = "type")]
	pub match_mode: MatchMode,

	/// Output order follows this order. Duplicates are allowed.
	#[serde(default)]
	pub transformations: Vec<Transformation>,
}

impl Rule {
	/// The key used to detect duplicate rules when merging imports.
	pub fn dedup_key(&self) -> (String, MatchMode) {
		(self.pattern.clone(), self.match_mode)
	}
}

/// Captured groups from a successful match.
///
/// Index 0 is the whole match. Literal matches carry no groups.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchResult {
	pub groups: Vec<Option<String>>,
}

impl MatchResult {
	/// A match with no capture groups (literal mode).
	pub fn literal() -> Self {
		Self::default()
	}

	/// Get group `index`, if it exists and participated in the match.
	pub fn group(&self, index: usize) -> Option<&str> {
		self.groups.get(index).and_then(|g| g.as_deref())
	}
}

/// One resolved transformation for a matched URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransformationResult {
	pub name: String,
	pub template: String,
	pub target: String,
	pub is_valid_url: bool,
}

/// A normalized list along with how many input elements were dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized<T> {
	pub items: Vec<T>,
	pub dropped: usize,
}

impl<T> Default for Normalized<T> {
	fn default() -> Self {
		Self {
			items: Vec::new(),
			dropped: 0,
		}
	}
}

impl<T> FromIterator<Option<T>> for Normalized<T> {
	fn from_iter<I: IntoIterator<Item = Option<T>>>(iter: I) -> Self {
		let mut normalized = Normalized::default();
		for item in iter {
			match item {
				Some(item) => normalized.items.push(item),
				None => normalized.dropped += 1,
			}
		}
		normalized
	}
}

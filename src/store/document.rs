//! Import and export documents.
//!
//! An import accepts a bare array of rules, an export envelope
//! `{ version, exportDate, rules }`, or the older `{ paths }` form.

use crate::error::{Result, UrlPathsError};
use crate::rules::{MatchModePolicy, Normalized, Rule, normalize_rules};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

/// Version tag written into export envelopes.
pub const EXPORT_VERSION: u32 = 1;

/// An exported rule list with its metadata.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument<'a> {
	pub version: u32,
	pub export_date: DateTime<Utc>,
	pub rules: &'a [Rule],
}

impl<'a> ExportDocument<'a> {
	pub fn new(rules: &'a [Rule], export_date: DateTime<Utc>) -> Self {
		Self {
			version: EXPORT_VERSION,
			export_date,
			rules,
		}
	}
}

/// Pick the rule array out of a parsed document, if it has one.
pub(crate) fn rule_values(document: &Value) -> &[Value] {
	let rules = match document {
		Value::Array(values) => Some(values),
		Value::Object(map) => map
			.get("rules")
			.or_else(|| map.get("paths"))
			.and_then(Value::as_array),
		_ => None,
	};
	rules.map(Vec::as_slice).unwrap_or_default()
}

/// Parse an import document and normalize every rule in it.
///
/// Invalid rules are dropped and counted. A document with no rule array
/// yields an empty result rather than an error.
pub fn parse_import(content: &str, policy: MatchModePolicy) -> Result<Normalized<Rule>> {
	let document: Value =
		serde_json::from_str(content).map_err(|source| UrlPathsError::ImportParseError { source })?;

	let normalized = normalize_rules(rule_values(&document), policy);
	if normalized.dropped > 0 {
		warn!(dropped = normalized.dropped, "Skipped invalid rules in import");
	}
	Ok(normalized)
}

/// Serialize rules for export, optionally wrapped in an envelope.
pub fn export_rules(rules: &[Rule], envelope: bool, export_date: DateTime<Utc>) -> Result<String> {
	let json = if envelope {
		serde_json::to_string_pretty(&ExportDocument::new(rules, export_date))
	} else {
		serde_json::to_string_pretty(rules)
	};
	json.map_err(|source| UrlPathsError::SerializeError { source })
}

/// Default file name for an export made at the given time.
pub fn export_file_name(export_date: DateTime<Utc>) -> String {
	format!("url-paths-{}.json", export_date.format("%Y-%m-%d"))
}

//! Validation and canonicalization of untrusted rule records.

use crate::rules::types::{MatchModePolicy, Normalized, Rule, Transformation};
use serde_json::Value;
use tracing::debug;

/// A transformation as it appears in stored or imported data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransformationInput {
	/// A bare string, used as both name and template.
	Shorthand(String),

	/// An object with a required template and an optional name.
	Explicit {
		name: Option<String>,
		template: String,
	},
}

impl TransformationInput {
	/// Read a transformation from an untrusted JSON value.
	///
	/// Returns `None` when the value is neither a string nor an object with a
	/// string `template`. A non-string `name` is treated as absent.
	pub fn from_value(value: &Value) -> Option<Self> {
		match value {
			Value::String(text) => Some(TransformationInput::Shorthand(text.clone())),
			Value::Object(map) => {
				let template = map.get("template")?.as_str()?.to_string();
				let name = map.get("name").and_then(Value::as_str).map(str::to_string);
				Some(TransformationInput::Explicit { name, template })
			}
			_ => None,
		}
	}

	/// Canonicalize into a `Transformation`, or `None` if the template is blank.
	pub fn normalize(self) -> Option<Transformation> {
		match self {
			TransformationInput::Shorthand(text) => {
				let template = non_blank(&text)?;
				Some(Transformation {
					name: template.clone(),
					template,
				})
			}
			TransformationInput::Explicit { name, template } => {
				let template = non_blank(&template)?;
				let name = name
					.as_deref()
					.and_then(non_blank)
					.unwrap_or_else(|| template.clone());
				Some(Transformation { name, template })
			}
		}
	}
}

/// Trim a string, returning `None` if nothing is left.
fn non_blank(text: &str) -> Option<String> {
	let trimmed = text.trim();
	if trimmed.is_empty() {
		None
	} else {
		Some(trimmed.to_string())
	}
}

/// Normalize a single untrusted transformation value.
pub fn normalize_transformation(value: &Value) -> Option<Transformation> {
	TransformationInput::from_value(value)?.normalize()
}

/// Normalize a list of untrusted transformation values.
pub fn normalize_transformations(values: &[Value]) -> Normalized<Transformation> {
	values.iter().map(normalize_transformation).collect()
}

/// Normalize an untrusted rule record.
///
/// Fails when `raw` is not an object or `pattern` is missing, not a string,
/// or blank. Transformations that fail normalization are dropped.
pub fn normalize_rule(raw: &Value, policy: MatchModePolicy) -> Option<Rule> {
	let map = raw.as_object()?;
	let pattern = non_blank(map.get("pattern")?.as_str()?)?;

	let name = map
		.get("name")
		.and_then(Value::as_str)
		.and_then(non_blank)
		.unwrap_or_else(|| pattern.clone());

	let raw_type = map.get("type").or_else(|| map.get("matchMode"));
	let match_mode = policy.resolve(raw_type);

	let transformations = match map.get("transformations") {
		Some(Value::Array(values)) => normalize_transformations(values),
		_ => Normalized::default(),
	};

	if transformations.dropped > 0 {
		debug!(
			pattern = %pattern,
			dropped = transformations.dropped,
			"Dropped malformed transformations"
		);
	}

	Some(Rule {
		name,
		pattern,
		match_mode,
		transformations: transformations.items,
	})
}

/// Normalize a list of untrusted rule records.
pub fn normalize_rules(values: &[Value], policy: MatchModePolicy) -> Normalized<Rule> {
	let normalized: Normalized<Rule> = values.iter().map(|v| normalize_rule(v, policy)).collect();
	if normalized.dropped > 0 {
		debug!(dropped = normalized.dropped, "Dropped malformed rules");
	}
	normalized
}

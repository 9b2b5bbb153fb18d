use crate::rules::types::{MatchMode, MatchResult};
use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Numeric group references: `{{N}}`, or the older `\N` form.
static GROUP_REGEX: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"\{\{(\d+)\}\}|\\(\d+)").unwrap());

/// Named placeholders available to literal rules.
static NAMED_REGEX: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"(?i)\{\{\s*(url|pattern)\s*\}\}").unwrap());

/// Expand a template against a match.
///
/// Regex rules substitute numbered groups; a group that is out of range or
/// did not participate becomes the empty string. Literal rules substitute
/// `{{url}}` and `{{pattern}}`. Substituted values are never re-scanned.
pub fn resolve_template(
	template: &str,
	matched: &MatchResult,
	url: &str,
	pattern: &str,
	mode: MatchMode,
) -> String {
	match mode {
		MatchMode::Regex => GROUP_REGEX
			.replace_all(template, |caps: &Captures| {
				caps.get(1)
					.or_else(|| caps.get(2))
					.and_then(|m| m.as_str().parse::<usize>().ok())
					.and_then(|index| matched.group(index))
					.unwrap_or_default()
					.to_string()
			})
			.into_owned(),
		MatchMode::Literal => NAMED_REGEX
			.replace_all(template, |caps: &Captures| {
				if caps[1].eq_ignore_ascii_case("url") {
					url.to_string()
				} else {
					pattern.to_string()
				}
			})
			.into_owned(),
	}
}

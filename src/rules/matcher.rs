use crate::error::{Result, UrlPathsError};
use crate::rules::types::{MatchMode, MatchResult, Rule};
use regex::Regex;

/// A compiled pattern ready for matching.
#[derive(Debug, Clone)]
pub enum CompiledPattern {
	/// Substring containment.
	Literal(String),

	/// Compiled regular expression.
	Regex(Regex),
}

/// A compiled rule ready for matching.
#[derive(Debug, Clone)]
pub struct CompiledRule {
	/// The original rule.
	pub rule: Rule,

	/// Compiled pattern.
	pub pattern: CompiledPattern,
}

impl CompiledRule {
	/// Compile a rule's pattern according to its match mode.
	pub fn compile(rule: &Rule) -> Result<Self> {
		let pattern = match rule.match_mode {
			MatchMode::Literal => CompiledPattern::Literal(rule.pattern.clone()),
			MatchMode::Regex => CompiledPattern::Regex(compile_regex(&rule.pattern)?),
		};

		Ok(CompiledRule {
			rule: rule.clone(),
			pattern,
		})
	}

	/// Test the URL against this rule, returning captured groups on a match.
	pub fn match_url(&self, url: &str) -> Option<MatchResult> {
		match &self.pattern {
			CompiledPattern::Literal(pattern) => url.contains(pattern.as_str()).then(MatchResult::literal),
			CompiledPattern::Regex(regex) => {
				let caps = regex.captures(url)?;
				let groups = caps
					.iter()
					.map(|m| m.map(|m| m.as_str().to_string()))
					.collect();
				Some(MatchResult { groups })
			}
		}
	}
}

/// Compile a regex pattern string.
pub fn compile_regex(pattern: &str) -> Result<Regex> {
	Regex::new(pattern).map_err(|source| UrlPathsError::InvalidRegex {
		pattern: pattern.to_string(),
		source,
	})
}

//! End-to-end evaluation of rules against a URL.

use crate::rules::matcher::CompiledRule;
use crate::rules::resolver::resolve_template;
use crate::rules::types::{Rule, TransformationResult};
use crate::rules::validate::is_well_formed_url;
use std::error::Error;
use tracing::warn;

/// Options controlling how evaluation results are filtered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvaluateOptions {
	/// Drop results whose target is not a well-formed URL.
	pub strict: bool,
}

impl Default for EvaluateOptions {
	fn default() -> Self {
		Self { strict: true }
	}
}

/// Outcome of evaluating one rule against one URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Evaluation {
	/// The rule does not apply to the URL.
	NoMatch,

	/// The rule's regex pattern does not compile.
	InvalidPattern { pattern: String, message: String },

	/// The rule applied. The list may be empty.
	Matched(Vec<TransformationResult>),
}

impl Evaluation {
	/// The results, if the rule matched.
	pub fn results(&self) -> Option<&[TransformationResult]> {
		match self {
			Evaluation::Matched(results) => Some(results.as_slice()),
			_ => None,
		}
	}

	pub fn is_match(&self) -> bool {
		matches!(self, Evaluation::Matched(_))
	}
}

/// A rule from a list that produced at least one result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleMatch<'a> {
	/// Position of the rule in the evaluated list.
	pub index: usize,
	pub rule: &'a Rule,
	pub results: Vec<TransformationResult>,
}

/// Evaluate a rule against a URL.
///
/// Never fails: an uncompilable regex becomes `Evaluation::InvalidPattern`.
pub fn evaluate(rule: &Rule, url: &str, options: &EvaluateOptions) -> Evaluation {
	if rule.pattern.trim().is_empty() {
		return Evaluation::NoMatch;
	}

	match CompiledRule::compile(rule) {
		Ok(compiled) => evaluate_compiled(&compiled, url, options),
		Err(e) => {
			// Report the regex engine's message, not the wrapper's
			let message = e.source().map_or_else(|| e.to_string(), |source| source.to_string());
			warn!(pattern = %rule.pattern, error = %message, "Invalid regex pattern");
			Evaluation::InvalidPattern {
				pattern: rule.pattern.clone(),
				message,
			}
		}
	}
}

/// Evaluate an already compiled rule against a URL.
pub fn evaluate_compiled(compiled: &CompiledRule, url: &str, options: &EvaluateOptions) -> Evaluation {
	let Some(matched) = compiled.match_url(url) else {
		return Evaluation::NoMatch;
	};

	let rule = &compiled.rule;
	let results = rule
		.transformations
		.iter()
		.map(|t| {
			let target = resolve_template(&t.template, &matched, url, &rule.pattern, rule.match_mode);
			let is_valid_url = is_well_formed_url(&target);
			TransformationResult {
				name: t.name.clone(),
				template: t.template.clone(),
				target,
				is_valid_url,
			}
		})
		.filter(|result| !options.strict || result.is_valid_url)
		.collect();

	Evaluation::Matched(results)
}

/// Evaluate every rule in a list, keeping those with at least one result.
pub fn evaluate_all<'a>(rules: &'a [Rule], url: &str, options: &EvaluateOptions) -> Vec<RuleMatch<'a>> {
	rules
		.iter()
		.enumerate()
		.filter_map(|(index, rule)| match evaluate(rule, url, options) {
			Evaluation::Matched(results) if !results.is_empty() => Some(RuleMatch {
				index,
				rule,
				results,
			}),
			_ => None,
		})
		.collect()
}

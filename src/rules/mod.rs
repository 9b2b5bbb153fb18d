//! Rule normalization, matching and template resolution for url-paths.
//!
//! This module handles:
//! - Canonicalizing untrusted rule records
//! - Matching URLs by substring or regular expression
//! - Expanding transformation templates and validating the targets

pub mod evaluate;
pub mod matcher;
pub mod normalize;
pub mod resolver;
pub mod types;
pub mod validate;

pub use evaluate::{EvaluateOptions, Evaluation, RuleMatch, evaluate, evaluate_all, evaluate_compiled};
pub use matcher::{CompiledPattern, CompiledRule, compile_regex};
pub use normalize::{
	TransformationInput, normalize_rule, normalize_rules, normalize_transformation,
	normalize_transformations,
};
pub use resolver::resolve_template;
pub use types::{
	MatchMode, MatchModePolicy, MatchResult, Normalized, Rule, Transformation, TransformationResult,
};
pub use validate::is_well_formed_url;

use crate::rules::{MatchMode, Rule};
use serde::Deserialize;
use std::collections::HashSet;

/// How imported rules combine with the existing list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportMode {
	/// Discard existing rules.
	Replace,

	/// Append new rules, skipping duplicates by (pattern, match mode).
	#[default]
	Merge,
}

/// The rule list after an import, with what happened to the incoming rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportOutcome {
	pub rules: Vec<Rule>,

	/// Incoming rules that ended up in the list.
	pub added: usize,

	/// Incoming rules skipped as duplicates (merge only).
	pub duplicates: usize,
}

impl ImportOutcome {
	/// True when the import leaves the list unchanged.
	pub fn is_noop(&self) -> bool {
		self.added == 0
	}
}

/// Combine an existing rule list with imported rules.
///
/// An empty import is a no-op under either mode: the existing list is kept.
pub fn apply_import(existing: &[Rule], incoming: Vec<Rule>, mode: ImportMode) -> ImportOutcome {
	if incoming.is_empty() {
		return ImportOutcome {
			rules: existing.to_vec(),
			added: 0,
			duplicates: 0,
		};
	}

	match mode {
		ImportMode::Replace => ImportOutcome {
			added: incoming.len(),
			rules: incoming,
			duplicates: 0,
		},
		ImportMode::Merge => {
			let mut seen: HashSet<(String, MatchMode)> = existing.iter().map(Rule::dedup_key).collect();
			let mut rules = existing.to_vec();
			let mut duplicates = 0;

			for rule in incoming {
				if seen.insert(rule.dedup_key()) {
					rules.push(rule);
				} else {
					duplicates += 1;
				}
			}

			ImportOutcome {
				added: rules.len() - existing.len(),
				rules,
				duplicates,
			}
		}
	}
}

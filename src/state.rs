//! Application state for rule management.
//!
//! Front ends hold an `AppState` and turn user events into `Action`s. Each
//! dispatch returns a new state; the old one is untouched, so a caller can
//! persist the new rules first and only adopt the new state once the write
//! succeeds.

use crate::error::{Result, UrlPathsError};
use crate::rules::{MatchMode, Rule, Transformation, TransformationInput};
use crate::store::{ImportMode, ImportOutcome, apply_import};

/// A rule as entered by a user, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleDraft {
	pub name: String,
	pub pattern: String,
	pub match_mode: MatchMode,
	pub transformations: Vec<TransformationInput>,
}

impl RuleDraft {
	/// Validate the draft into a rule.
	///
	/// The pattern must be non-blank. Blank transformations are dropped; a
	/// rule may end up with none.
	pub fn into_rule(self) -> Result<Rule> {
		let pattern = self.pattern.trim().to_string();
		if pattern.is_empty() {
			return Err(UrlPathsError::MalformedRule {
				reason: "pattern is required".to_string(),
			});
		}

		let name = match self.name.trim() {
			"" => pattern.clone(),
			name => name.to_string(),
		};

		let transformations: Vec<Transformation> = self
			.transformations
			.into_iter()
			.filter_map(TransformationInput::normalize)
			.collect();

		Ok(Rule {
			name,
			pattern,
			match_mode: self.match_mode,
			transformations,
		})
	}
}

/// A state transition requested by a front end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
	/// Append a rule and select it.
	AddRule(RuleDraft),

	/// Replace the rule at `index`.
	UpdateRule { index: usize, draft: RuleDraft },

	DeleteRule(usize),

	Select(Option<usize>),

	AddTransformation {
		rule: usize,
		input: TransformationInput,
	},

	RemoveTransformation { rule: usize, index: usize },

	Import { rules: Vec<Rule>, mode: ImportMode },
}

/// The rule list and the current selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppState {
	pub rules: Vec<Rule>,
	pub selected: Option<usize>,
}

impl AppState {
	pub fn new(rules: Vec<Rule>) -> Self {
		Self {
			rules,
			selected: None,
		}
	}

	/// The selected rule, if any.
	pub fn selected_rule(&self) -> Option<&Rule> {
		self.selected.and_then(|i| self.rules.get(i))
	}

	/// Apply an action, returning the next state.
	pub fn dispatch(&self, action: Action) -> Result<AppState> {
		let mut next = self.clone();

		match action {
			Action::AddRule(draft) => {
				next.rules.push(draft.into_rule()?);
				next.selected = Some(next.rules.len() - 1);
			}
			Action::UpdateRule { index, draft } => {
				self.check_rule_index(index)?;
				next.rules[index] = draft.into_rule()?;
			}
			Action::DeleteRule(index) => {
				self.check_rule_index(index)?;
				next.rules.remove(index);
				next.selected = match self.selected {
					Some(selected) if selected == index => None,
					Some(selected) if selected > index => Some(selected - 1),
					other => other,
				};
			}
			Action::Select(selected) => {
				if let Some(index) = selected {
					self.check_rule_index(index)?;
				}
				next.selected = selected;
			}
			Action::AddTransformation { rule, input } => {
				self.check_rule_index(rule)?;
				let transformation = input.normalize().ok_or_else(|| UrlPathsError::MalformedRule {
					reason: "transformation template is required".to_string(),
				})?;
				next.rules[rule].transformations.push(transformation);
			}
			Action::RemoveTransformation { rule, index } => {
				self.check_rule_index(rule)?;
				let len = self.rules[rule].transformations.len();
				if index >= len {
					return Err(UrlPathsError::TransformationIndexOutOfRange { rule, index, len });
				}
				next.rules[rule].transformations.remove(index);
			}
			Action::Import { rules, mode } => {
				next = self.import(rules, mode).0;
			}
		}

		Ok(next)
	}

	/// Import rules, reporting what was added.
	///
	/// A no-op import keeps the current selection; any other import clears it.
	pub fn import(&self, rules: Vec<Rule>, mode: ImportMode) -> (AppState, ImportOutcome) {
		let outcome = apply_import(&self.rules, rules, mode);
		let selected = if outcome.is_noop() { self.selected } else { None };
		let next = AppState {
			rules: outcome.rules.clone(),
			selected,
		};
		(next, outcome)
	}

	fn check_rule_index(&self, index: usize) -> Result<()> {
		if index < self.rules.len() {
			Ok(())
		} else {
			Err(UrlPathsError::RuleIndexOutOfRange {
				index,
				len: self.rules.len(),
			})
		}
	}
}

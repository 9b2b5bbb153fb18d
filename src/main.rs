use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use url_paths::config::{
	LoadedSettings, SETTINGS_FILE_NAME, load_settings, resolve_store_path, settings_template,
};
use url_paths::UrlPathsError;
use url_paths::rules::{
	EvaluateOptions, Evaluation, MatchMode, Rule, TransformationInput, TransformationResult,
	evaluate, evaluate_all,
};
use url_paths::state::{Action, AppState, RuleDraft};
use url_paths::store::{ImportMode, RuleStore, export_file_name, export_rules, parse_import};

#[derive(Parser)]
#[command(name = "url-paths")]
#[command(
	author,
	version,
	about = "Match URLs against rules and generate transformed target URLs"
)]
#[command(arg_required_else_help = true)]
struct Cli {
	#[command(subcommand)]
	command: Option<Commands>,

	/// Create a template .url-paths.toml in the current directory
	#[arg(long)]
	init: bool,

	/// Overwrite existing .url-paths.toml when using --init
	#[arg(long, requires = "init")]
	force: bool,

	/// Rule store file (overrides settings)
	#[arg(long, global = true, value_name = "FILE")]
	store: Option<PathBuf>,

	/// Enable debug logging
	#[arg(long, global = true)]
	debug: bool,
}

#[derive(Subcommand)]
enum Commands {
	/// Show the targets every stored rule produces for a URL
	Eval {
		/// The URL to evaluate
		url: String,

		/// Keep targets that are not fully qualified URLs
		#[arg(long)]
		no_strict: bool,
	},
	/// Try an unsaved rule against a sample URL
	Test {
		/// The sample URL
		url: String,

		/// Substring (or regex with --regex) to match
		#[arg(long)]
		pattern: String,

		/// Treat the pattern as a regular expression
		#[arg(long)]
		regex: bool,

		/// Transformation template (repeatable)
		#[arg(long = "template", required = true)]
		templates: Vec<String>,
	},
	/// Rule management commands
	Rules {
		#[command(subcommand)]
		action: RulesAction,
	},
	/// Import rules from a JSON file
	Import {
		file: PathBuf,

		#[arg(long, value_enum, default_value_t = ImportModeArg::Merge)]
		mode: ImportModeArg,
	},
	/// Export rules as JSON
	Export {
		/// Output file or directory (stdout if omitted)
		#[arg(long, short)]
		output: Option<PathBuf>,

		/// Write a bare array instead of the versioned envelope
		#[arg(long)]
		bare: bool,
	},
}

#[derive(Subcommand)]
enum RulesAction {
	/// List stored rules
	List,
	/// Show one rule in detail
	Show {
		/// Rule number as shown by `rules list`
		number: usize,
	},
	/// Add a rule
	Add {
		/// Substring (or regex with --regex) to match
		#[arg(long)]
		pattern: String,

		/// Display name (defaults to the pattern)
		#[arg(long)]
		name: Option<String>,

		/// Treat the pattern as a regular expression
		#[arg(long)]
		regex: bool,

		/// Transformation template (repeatable)
		#[arg(long = "template")]
		templates: Vec<String>,

		/// Name for the --template at the same position (repeatable)
		#[arg(long = "template-name", value_name = "NAME")]
		template_names: Vec<String>,
	},
	/// Change a rule's name, pattern or match type
	Edit {
		/// Rule number as shown by `rules list`
		number: usize,

		#[arg(long)]
		name: Option<String>,

		#[arg(long)]
		pattern: Option<String>,

		/// Treat the pattern as a regular expression
		#[arg(long, conflicts_with = "literal")]
		regex: bool,

		/// Treat the pattern as a substring
		#[arg(long)]
		literal: bool,
	},
	/// Append a transformation to a rule
	AddTemplate {
		/// Rule number as shown by `rules list`
		number: usize,

		template: String,

		/// Display name (defaults to the template)
		#[arg(long)]
		name: Option<String>,
	},
	/// Remove a transformation from a rule
	RemoveTemplate {
		/// Rule number as shown by `rules list`
		number: usize,

		/// Transformation number as shown by `rules show`
		template: usize,
	},
	/// Remove a rule
	Remove {
		/// Rule number as shown by `rules list`
		number: usize,
	},
}

#[derive(Clone, Copy, ValueEnum)]
enum ImportModeArg {
	Replace,
	Merge,
}

impl From<ImportModeArg> for ImportMode {
	fn from(mode: ImportModeArg) -> Self {
		match mode {
			ImportModeArg::Replace => ImportMode::Replace,
			ImportModeArg::Merge => ImportMode::Merge,
		}
	}
}

fn main() -> ExitCode {
	let cli = Cli::parse();
	init_logging(cli.debug);

	match run(cli) {
		Ok(code) => code,
		Err(e) => {
			eprintln!("error: {e:?}");
			ExitCode::FAILURE
		}
	}
}

fn init_logging(debug: bool) {
	let filter = if debug {
		EnvFilter::new("url_paths=debug")
	} else {
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
	};
	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_target(false)
		.with_writer(std::io::stderr)
		.init();
}

fn run(cli: Cli) -> Result<ExitCode> {
	if cli.init {
		return handle_init(cli.force);
	}

	// No command specified - this shouldn't happen due to arg_required_else_help
	let Some(command) = cli.command else {
		return Ok(ExitCode::SUCCESS);
	};

	let explicit_store = cli.store.as_deref();

	match command {
		Commands::Eval { url, no_strict } => {
			let (loaded, store) = open_store(explicit_store)?;
			let strict = loaded.settings.strict && !no_strict;
			handle_eval(&store, &url, strict)
		}
		Commands::Test {
			url,
			pattern,
			regex,
			templates,
		} => handle_test(&url, &pattern, regex, &templates),
		Commands::Rules { action } => {
			let (_, store) = open_store(explicit_store)?;
			match action {
				RulesAction::List => handle_rules_list(&store),
				RulesAction::Show { number } => handle_rules_show(&store, number),
				RulesAction::Add {
					pattern,
					name,
					regex,
					templates,
					template_names,
				} => handle_rules_add(&store, pattern, name, regex, &templates, &template_names),
				RulesAction::Edit {
					number,
					name,
					pattern,
					regex,
					literal,
				} => {
					let match_mode = match (regex, literal) {
						(true, _) => Some(MatchMode::Regex),
						(_, true) => Some(MatchMode::Literal),
						_ => None,
					};
					handle_rules_edit(&store, number, name, pattern, match_mode)
				}
				RulesAction::AddTemplate {
					number,
					template,
					name,
				} => handle_rules_add_template(&store, number, template, name),
				RulesAction::RemoveTemplate { number, template } => {
					handle_rules_remove_template(&store, number, template)
				}
				RulesAction::Remove { number } => handle_rules_remove(&store, number),
			}
		}
		Commands::Import { file, mode } => {
			let (loaded, store) = open_store(explicit_store)?;
			handle_import(&store, &loaded, &file, mode.into())
		}
		Commands::Export { output, bare } => {
			let (_, store) = open_store(explicit_store)?;
			handle_export(&store, output.as_deref(), bare)
		}
	}
}

/// Load settings from the current directory and open the rule store they point at.
fn open_store(explicit: Option<&Path>) -> Result<(LoadedSettings, RuleStore)> {
	let cwd = std::env::current_dir().context("Failed to get current directory")?;
	let loaded = load_settings(&cwd).context("Failed to load settings")?;
	let path = resolve_store_path(explicit, &loaded).context("Failed to locate rule store")?;
	let store = RuleStore::new(path, loaded.settings.match_mode);
	Ok((loaded, store))
}

fn load_state(store: &RuleStore) -> Result<AppState> {
	let loaded = store
		.load()
		.with_context(|| format!("Failed to load rules from {}", store.path().display()))?;
	if loaded.dropped > 0 {
		eprintln!(
			"Warning: {} malformed rule(s) in {} were skipped",
			loaded.dropped,
			store.path().display()
		);
	}
	Ok(AppState::new(loaded.items))
}

/// Apply an action and persist the result. The old state stays valid if saving fails.
fn commit(store: &RuleStore, state: &AppState, action: Action) -> Result<AppState> {
	let next = state.dispatch(action)?;
	store
		.save(&next.rules)
		.with_context(|| format!("Failed to save rules to {}", store.path().display()))?;
	Ok(next)
}

/// Convert a 1-based number from the command line into an index.
fn to_index(number: usize, what: &str) -> Result<usize> {
	number
		.checked_sub(1)
		.ok_or_else(|| anyhow::anyhow!("{what} numbers start at 1"))
}

fn rule_index(number: usize) -> Result<usize> {
	to_index(number, "Rule")
}

fn find_rule(state: &AppState, index: usize) -> Result<&Rule> {
	state.rules.get(index).ok_or_else(|| {
		UrlPathsError::RuleIndexOutOfRange {
			index,
			len: state.rules.len(),
		}
		.into()
	})
}

fn print_result(result: &TransformationResult) {
	// Unnamed transformations carry their template as the name
	if result.name == result.template {
		println!("  {}", result.target);
	} else {
		println!("  {}: {}", result.name, result.target);
	}
	if result.template != result.target {
		println!("    Template: {}", result.template);
	}
	if !result.is_valid_url {
		println!("    Note: result is not a fully qualified URL.");
	}
}

fn handle_eval(store: &RuleStore, url: &str, strict: bool) -> Result<ExitCode> {
	let state = load_state(store)?;
	if state.rules.is_empty() {
		println!("No rules configured yet.");
		return Ok(ExitCode::FAILURE);
	}

	let matches = evaluate_all(&state.rules, url, &EvaluateOptions { strict });
	if matches.is_empty() {
		println!("No matching rules for this URL.");
		return Ok(ExitCode::FAILURE);
	}

	for rule_match in &matches {
		println!("{}", rule_match.rule.name);
		for result in &rule_match.results {
			print_result(result);
		}
	}
	Ok(ExitCode::SUCCESS)
}

fn handle_test(url: &str, pattern: &str, regex: bool, templates: &[String]) -> Result<ExitCode> {
	let draft = RuleDraft {
		name: String::new(),
		pattern: pattern.to_string(),
		match_mode: if regex { MatchMode::Regex } else { MatchMode::Literal },
		transformations: templates
			.iter()
			.map(|t| TransformationInput::Shorthand(t.clone()))
			.collect(),
	};
	let rule = draft.into_rule()?;
	if rule.transformations.is_empty() {
		anyhow::bail!("Add a pattern and at least one transformation first.");
	}

	match evaluate(&rule, url, &EvaluateOptions { strict: false }) {
		Evaluation::InvalidPattern { message, .. } => {
			eprintln!("Invalid regular expression: {}", message);
			Ok(ExitCode::FAILURE)
		}
		Evaluation::NoMatch => {
			println!("No match for this sample URL.");
			Ok(ExitCode::FAILURE)
		}
		Evaluation::Matched(results) => {
			for result in &results {
				println!("Target: {}", result.target);
				println!("  Template: {}", result.template);
				if !result.is_valid_url {
					println!("  Note: result is not a fully qualified URL.");
				}
			}
			println!("Match found.");
			Ok(ExitCode::SUCCESS)
		}
	}
}

fn handle_rules_list(store: &RuleStore) -> Result<ExitCode> {
	let state = load_state(store)?;
	if state.rules.is_empty() {
		println!("No rules configured yet.");
		return Ok(ExitCode::SUCCESS);
	}

	for (i, rule) in state.rules.iter().enumerate() {
		println!(
			"{}. {} [{}] {} ({} transformations)",
			i + 1,
			rule.name,
			rule.match_mode.as_str(),
			rule.pattern,
			rule.transformations.len()
		);
	}
	Ok(ExitCode::SUCCESS)
}

fn handle_rules_show(store: &RuleStore, number: usize) -> Result<ExitCode> {
	let state = load_state(store)?;
	let state = state.dispatch(Action::Select(Some(rule_index(number)?)))?;
	let Some(rule) = state.selected_rule() else {
		return Ok(ExitCode::FAILURE);
	};

	println!("Name: {}", rule.name);
	println!("Pattern: {}", rule.pattern);
	println!(
		"Match type: {}",
		match rule.match_mode {
			MatchMode::Regex => "Regular Expression",
			MatchMode::Literal => "String Match",
		}
	);
	if rule.transformations.is_empty() {
		println!("No transformations added yet.");
	} else {
		println!("Transformations:");
		for (i, t) in rule.transformations.iter().enumerate() {
			println!("  {}. {}: {}", i + 1, t.name, t.template);
		}
	}
	Ok(ExitCode::SUCCESS)
}

/// Pair each template with the name given at the same position, if any.
fn transformation_inputs(templates: &[String], names: &[String]) -> Result<Vec<TransformationInput>> {
	if names.len() > templates.len() {
		anyhow::bail!(
			"Got {} template names for {} templates",
			names.len(),
			templates.len()
		);
	}

	Ok(templates
		.iter()
		.enumerate()
		.map(|(i, template)| TransformationInput::Explicit {
			name: names.get(i).cloned(),
			template: template.clone(),
		})
		.collect())
}

fn handle_rules_add(
	store: &RuleStore,
	pattern: String,
	name: Option<String>,
	regex: bool,
	templates: &[String],
	template_names: &[String],
) -> Result<ExitCode> {
	let transformations = transformation_inputs(templates, template_names)?;
	let state = load_state(store)?;
	let draft = RuleDraft {
		name: name.unwrap_or_default(),
		pattern,
		match_mode: if regex { MatchMode::Regex } else { MatchMode::Literal },
		transformations,
	};

	let next = commit(store, &state, Action::AddRule(draft))?;
	if let Some(rule) = next.selected_rule() {
		println!("Rule saved: {}", rule.name);
	}
	Ok(ExitCode::SUCCESS)
}

fn handle_rules_edit(
	store: &RuleStore,
	number: usize,
	name: Option<String>,
	pattern: Option<String>,
	match_mode: Option<MatchMode>,
) -> Result<ExitCode> {
	if name.is_none() && pattern.is_none() && match_mode.is_none() {
		anyhow::bail!("Nothing to change. Pass --name, --pattern, --regex or --literal.");
	}

	let state = load_state(store)?;
	let index = rule_index(number)?;
	let rule = find_rule(&state, index)?;

	// A rule named after its pattern keeps following it
	let name = match name {
		Some(name) => name,
		None if rule.name == rule.pattern => String::new(),
		None => rule.name.clone(),
	};
	let draft = RuleDraft {
		name,
		pattern: pattern.unwrap_or_else(|| rule.pattern.clone()),
		match_mode: match_mode.unwrap_or(rule.match_mode),
		transformations: rule
			.transformations
			.iter()
			.map(|t| TransformationInput::Explicit {
				name: Some(t.name.clone()),
				template: t.template.clone(),
			})
			.collect(),
	};

	let next = commit(store, &state, Action::UpdateRule { index, draft })?;
	println!("Rule saved: {}", next.rules[index].name);
	Ok(ExitCode::SUCCESS)
}

fn handle_rules_add_template(
	store: &RuleStore,
	number: usize,
	template: String,
	name: Option<String>,
) -> Result<ExitCode> {
	let state = load_state(store)?;
	let index = rule_index(number)?;
	let input = TransformationInput::Explicit { name, template };

	let next = commit(store, &state, Action::AddTransformation { rule: index, input })?;
	let rule = &next.rules[index];
	println!(
		"Transformation added to {} ({} total)",
		rule.name,
		rule.transformations.len()
	);
	Ok(ExitCode::SUCCESS)
}

fn handle_rules_remove_template(store: &RuleStore, number: usize, template: usize) -> Result<ExitCode> {
	let state = load_state(store)?;
	let index = rule_index(number)?;
	let position = to_index(template, "Transformation")?;
	let name = find_rule(&state, index)?
		.transformations
		.get(position)
		.map(|t| t.name.clone())
		.unwrap_or_default();

	commit(
		store,
		&state,
		Action::RemoveTransformation {
			rule: index,
			index: position,
		},
	)?;
	println!("Transformation deleted: {}", name);
	Ok(ExitCode::SUCCESS)
}

fn handle_rules_remove(store: &RuleStore, number: usize) -> Result<ExitCode> {
	let state = load_state(store)?;
	let index = rule_index(number)?;
	let name = state
		.rules
		.get(index)
		.map(|r| r.name.clone())
		.unwrap_or_default();

	commit(store, &state, Action::DeleteRule(index))?;
	println!("Rule deleted: {}", name);
	Ok(ExitCode::SUCCESS)
}

fn handle_import(
	store: &RuleStore,
	loaded: &LoadedSettings,
	file: &Path,
	mode: ImportMode,
) -> Result<ExitCode> {
	let content = std::fs::read_to_string(file)
		.with_context(|| format!("Failed to read {}", file.display()))?;
	let imported = parse_import(&content, loaded.settings.match_mode)
		.context("Failed to import rules. Check the file format.")?;

	if imported.items.is_empty() {
		println!("No valid rules found in import file.");
		return Ok(ExitCode::SUCCESS);
	}

	let state = load_state(store)?;
	let (next, outcome) = state.import(imported.items, mode);
	if outcome.is_noop() {
		println!(
			"No new rules imported ({} duplicates skipped).",
			outcome.duplicates
		);
		return Ok(ExitCode::SUCCESS);
	}

	store
		.save(&next.rules)
		.with_context(|| format!("Failed to save rules to {}", store.path().display()))?;

	println!(
		"Rules imported: {} added, {} duplicates skipped, {} invalid entries skipped.",
		outcome.added, outcome.duplicates, imported.dropped
	);
	Ok(ExitCode::SUCCESS)
}

fn handle_export(store: &RuleStore, output: Option<&Path>, bare: bool) -> Result<ExitCode> {
	let state = load_state(store)?;
	let now = chrono::Utc::now();
	let json = export_rules(&state.rules, !bare, now)?;

	match output {
		Some(path) => {
			let path = if path.is_dir() {
				path.join(export_file_name(now))
			} else {
				path.to_path_buf()
			};
			std::fs::write(&path, format!("{json}\n"))
				.with_context(|| format!("Failed to write {}", path.display()))?;
			eprintln!("Exported {} rules to {}", state.rules.len(), path.display());
		}
		None => println!("{}", json),
	}
	Ok(ExitCode::SUCCESS)
}

fn handle_init(force: bool) -> Result<ExitCode> {
	let settings_path = PathBuf::from(SETTINGS_FILE_NAME);

	if settings_path.exists() && !force {
		anyhow::bail!("{} already exists. Use --force to overwrite.", SETTINGS_FILE_NAME);
	}

	std::fs::write(&settings_path, settings_template())
		.with_context(|| format!("Failed to write {}", settings_path.display()))?;

	println!("Created {}", SETTINGS_FILE_NAME);
	Ok(ExitCode::SUCCESS)
}

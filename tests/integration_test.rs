#![allow(deprecated)] // assert_cmd::Command::cargo_bin is deprecated but replacement requires nightly

use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

fn url_paths_cmd() -> assert_cmd::Command {
	let mut cmd = assert_cmd::Command::cargo_bin("url-paths").unwrap();
	cmd.env("URL_PATHS_NO_USER_CONFIG", "1");
	cmd.env_remove("RUST_LOG");
	cmd
}

/// A command running in `dir` against the store file `dir/rules.json`.
fn store_cmd(dir: &Path) -> assert_cmd::Command {
	let mut cmd = url_paths_cmd();
	cmd.current_dir(dir).arg("--store").arg(store_path(dir));
	cmd
}

fn store_path(dir: &Path) -> PathBuf {
	dir.join("rules.json")
}

fn stored_rules(dir: &Path) -> serde_json::Value {
	let content = fs::read_to_string(store_path(dir)).unwrap();
	let value: serde_json::Value = serde_json::from_str(&content).unwrap();
	value["rules"].clone()
}

fn add_gitpod_rule(dir: &Path) {
	store_cmd(dir)
		.args([
			"rules",
			"add",
			"--name",
			"Gitpod",
			"--regex",
			"--pattern",
			r"^https://github\.com/([^/]+)/([^/]+)$",
			"--template",
			"https://gitpod.io/#https://github.com/{{1}}/{{2}}",
		])
		.assert()
		.success();
}

// ============================================================================
// CLI flag tests
// ============================================================================

#[test]
fn test_help_flag() {
	url_paths_cmd()
		.arg("--help")
		.assert()
		.success()
		.stdout(predicate::str::contains("Match URLs against rules"));
}

#[test]
fn test_version_flag() {
	url_paths_cmd()
		.arg("--version")
		.assert()
		.success()
		.stdout(predicate::str::contains("url-paths"));
}

#[test]
fn test_no_args_shows_help() {
	url_paths_cmd()
		.assert()
		.failure()
		.stderr(predicate::str::contains("Usage"));
}

// ============================================================================
// --init tests
// ============================================================================

#[test]
fn test_init_creates_settings() {
	let temp_dir = tempfile::tempdir().unwrap();
	let settings_path = temp_dir.path().join(".url-paths.toml");

	url_paths_cmd()
		.arg("--init")
		.current_dir(temp_dir.path())
		.assert()
		.success()
		.stdout(predicate::str::contains("Created .url-paths.toml"));

	let content = fs::read_to_string(&settings_path).unwrap();
	assert!(content.contains("match-mode = \"legacy\""));
	assert!(content.contains("strict = true"));
}

#[test]
fn test_init_fails_if_exists() {
	let temp_dir = tempfile::tempdir().unwrap();
	fs::write(temp_dir.path().join(".url-paths.toml"), "# existing").unwrap();

	url_paths_cmd()
		.arg("--init")
		.current_dir(temp_dir.path())
		.assert()
		.failure()
		.stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_init_force_overwrites() {
	let temp_dir = tempfile::tempdir().unwrap();
	let settings_path = temp_dir.path().join(".url-paths.toml");
	fs::write(&settings_path, "# existing").unwrap();

	url_paths_cmd()
		.args(["--init", "--force"])
		.current_dir(temp_dir.path())
		.assert()
		.success();

	let content = fs::read_to_string(&settings_path).unwrap();
	assert!(content.contains("strict = true"));
}

// ============================================================================
// rules subcommand tests
// ============================================================================

#[test]
fn test_rules_list_empty() {
	let temp_dir = tempfile::tempdir().unwrap();

	store_cmd(temp_dir.path())
		.args(["rules", "list"])
		.assert()
		.success()
		.stdout(predicate::str::contains("No rules configured yet"));
}

#[test]
fn test_rules_add_list_show_remove() {
	let temp_dir = tempfile::tempdir().unwrap();
	let dir = temp_dir.path();

	store_cmd(dir)
		.args([
			"rules",
			"add",
			"--pattern",
			"  example.com  ",
			"--template",
			"https://archive.test/{{url}}",
			"--template-name",
			"Archive",
			"--template",
			"https://mirror.test/?from={{pattern}}",
		])
		.assert()
		.success()
		.stdout(predicate::str::contains("Rule saved: example.com"));

	let rules = stored_rules(dir);
	assert_eq!(rules[0]["pattern"], "example.com");
	assert_eq!(rules[0]["type"], "string");
	assert_eq!(rules[0]["transformations"][0]["name"], "Archive");
	assert_eq!(
		rules[0]["transformations"][1]["name"],
		"https://mirror.test/?from={{pattern}}"
	);

	add_gitpod_rule(dir);

	store_cmd(dir)
		.args(["rules", "list"])
		.assert()
		.success()
		.stdout(predicate::str::contains("1. example.com [string] example.com (2 transformations)"))
		.stdout(predicate::str::contains("2. Gitpod [regex]"));

	store_cmd(dir)
		.args(["rules", "show", "2"])
		.assert()
		.success()
		.stdout(predicate::str::contains("Match type: Regular Expression"))
		.stdout(predicate::str::contains("{{1}}/{{2}}"));

	store_cmd(dir)
		.args(["rules", "remove", "1"])
		.assert()
		.success()
		.stdout(predicate::str::contains("Rule deleted: example.com"));

	let rules = stored_rules(dir);
	assert_eq!(rules.as_array().unwrap().len(), 1);
	assert_eq!(rules[0]["name"], "Gitpod");
}

#[test]
fn test_rules_add_requires_pattern() {
	let temp_dir = tempfile::tempdir().unwrap();

	store_cmd(temp_dir.path())
		.args(["rules", "add", "--pattern", "   "])
		.assert()
		.failure()
		.stderr(predicate::str::contains("pattern is required"));

	assert!(!store_path(temp_dir.path()).exists());
}

#[test]
fn test_rules_add_keeps_templates_containing_equals() {
	let temp_dir = tempfile::tempdir().unwrap();
	let dir = temp_dir.path();

	store_cmd(dir)
		.args([
			"rules",
			"add",
			"--pattern",
			"example.com",
			"--template",
			"{{url}}?lang=en",
		])
		.assert()
		.success();

	store_cmd(dir)
		.args([
			"rules",
			"add",
			"--regex",
			"--pattern",
			r"github\.com/(\w+)",
			"--template",
			"https://gh.test/{{1}}?tab=x",
			"--template",
			"{{1}}?tab=y",
			"--template-name",
			"Tab X",
		])
		.assert()
		.success();

	let rules = stored_rules(dir);
	assert_eq!(rules[0]["transformations"][0]["template"], "{{url}}?lang=en");
	assert_eq!(rules[0]["transformations"][0]["name"], "{{url}}?lang=en");
	assert_eq!(rules[1]["transformations"][0]["name"], "Tab X");
	assert_eq!(rules[1]["transformations"][0]["template"], "https://gh.test/{{1}}?tab=x");
	assert_eq!(rules[1]["transformations"][1]["name"], "{{1}}?tab=y");
	assert_eq!(rules[1]["transformations"][1]["template"], "{{1}}?tab=y");
}

#[test]
fn test_rules_add_rejects_extra_template_names() {
	let temp_dir = tempfile::tempdir().unwrap();

	store_cmd(temp_dir.path())
		.args([
			"rules",
			"add",
			"--pattern",
			"example.com",
			"--template",
			"https://a.test/",
			"--template-name",
			"A",
			"--template-name",
			"B",
		])
		.assert()
		.failure()
		.stderr(predicate::str::contains("Got 2 template names for 1 templates"));

	assert!(!store_path(temp_dir.path()).exists());
}

#[test]
fn test_rules_edit() {
	let temp_dir = tempfile::tempdir().unwrap();
	let dir = temp_dir.path();

	store_cmd(dir)
		.args([
			"rules",
			"add",
			"--pattern",
			"example.com",
			"--template",
			"https://archive.test/{{url}}",
			"--template-name",
			"Archive",
		])
		.assert()
		.success();

	// The name follows the pattern when it was never set
	store_cmd(dir)
		.args(["rules", "edit", "1", "--pattern", r"example\.com/(\d+)", "--regex"])
		.assert()
		.success()
		.stdout(predicate::str::contains(r"Rule saved: example\.com/(\d+)"));

	let rules = stored_rules(dir);
	assert_eq!(rules[0]["pattern"], r"example\.com/(\d+)");
	assert_eq!(rules[0]["name"], r"example\.com/(\d+)");
	assert_eq!(rules[0]["type"], "regex");
	assert_eq!(rules[0]["transformations"][0]["name"], "Archive");

	store_cmd(dir)
		.args(["rules", "edit", "1", "--name", "Example", "--literal"])
		.assert()
		.success()
		.stdout(predicate::str::contains("Rule saved: Example"));

	let rules = stored_rules(dir);
	assert_eq!(rules[0]["name"], "Example");
	assert_eq!(rules[0]["type"], "string");
	assert_eq!(rules[0]["pattern"], r"example\.com/(\d+)");
}

#[test]
fn test_rules_edit_requires_a_change() {
	let temp_dir = tempfile::tempdir().unwrap();
	add_gitpod_rule(temp_dir.path());

	store_cmd(temp_dir.path())
		.args(["rules", "edit", "1"])
		.assert()
		.failure()
		.stderr(predicate::str::contains("Nothing to change"));

	store_cmd(temp_dir.path())
		.args(["rules", "edit", "3", "--name", "x"])
		.assert()
		.failure()
		.stderr(predicate::str::contains("No rule at index 2"));
}

#[test]
fn test_rules_add_and_remove_template() {
	let temp_dir = tempfile::tempdir().unwrap();
	let dir = temp_dir.path();
	add_gitpod_rule(dir);

	store_cmd(dir)
		.args([
			"rules",
			"add-template",
			"1",
			"https://github.dev/{{1}}/{{2}}?tab=code",
			"--name",
			"github.dev",
		])
		.assert()
		.success()
		.stdout(predicate::str::contains("Transformation added to Gitpod (2 total)"));

	store_cmd(dir)
		.args(["rules", "show", "1"])
		.assert()
		.success()
		.stdout(predicate::str::contains(
			"2. github.dev: https://github.dev/{{1}}/{{2}}?tab=code",
		));

	store_cmd(dir)
		.args(["eval", "https://github.com/acme/widgets"])
		.assert()
		.success()
		.stdout(predicate::str::contains("https://github.dev/acme/widgets?tab=code"));

	store_cmd(dir)
		.args(["rules", "remove-template", "1", "1"])
		.assert()
		.success()
		.stdout(predicate::str::contains("Transformation deleted"));

	let rules = stored_rules(dir);
	let transformations = rules[0]["transformations"].as_array().unwrap();
	assert_eq!(transformations.len(), 1);
	assert_eq!(transformations[0]["name"], "github.dev");

	store_cmd(dir)
		.args(["rules", "remove-template", "1", "4"])
		.assert()
		.failure()
		.stderr(predicate::str::contains("No transformation at index 3"));

	store_cmd(dir)
		.args(["rules", "add-template", "1", "   "])
		.assert()
		.failure()
		.stderr(predicate::str::contains("transformation template is required"));

	assert_eq!(stored_rules(dir)[0]["transformations"].as_array().unwrap().len(), 1);
}

#[test]
fn test_rules_remove_out_of_range() {
	let temp_dir = tempfile::tempdir().unwrap();
	add_gitpod_rule(temp_dir.path());

	store_cmd(temp_dir.path())
		.args(["rules", "remove", "5"])
		.assert()
		.failure()
		.stderr(predicate::str::contains("No rule at index 4"));

	assert_eq!(stored_rules(temp_dir.path()).as_array().unwrap().len(), 1);
}

// ============================================================================
// eval tests
// ============================================================================

#[test]
fn test_eval_regex_rule() {
	let temp_dir = tempfile::tempdir().unwrap();
	add_gitpod_rule(temp_dir.path());

	store_cmd(temp_dir.path())
		.args(["eval", "https://github.com/acme/widgets"])
		.assert()
		.success()
		.stdout(predicate::str::contains("Gitpod"))
		.stdout(predicate::str::contains(
			"https://gitpod.io/#https://github.com/acme/widgets",
		));
}

#[test]
fn test_eval_literal_rule() {
	let temp_dir = tempfile::tempdir().unwrap();

	store_cmd(temp_dir.path())
		.args([
			"rules",
			"add",
			"--pattern",
			"example.com/user",
			"--template",
			"https://archive.test/{{ URL }}",
		])
		.assert()
		.success();

	store_cmd(temp_dir.path())
		.args(["eval", "https://example.com/user/123"])
		.assert()
		.success()
		.stdout(predicate::str::contains(
			"https://archive.test/https://example.com/user/123",
		));
}

#[test]
fn test_eval_no_match() {
	let temp_dir = tempfile::tempdir().unwrap();
	add_gitpod_rule(temp_dir.path());

	store_cmd(temp_dir.path())
		.args(["eval", "https://gitlab.com/acme/widgets"])
		.assert()
		.code(1)
		.stdout(predicate::str::contains("No matching rules for this URL"));
}

#[test]
fn test_eval_strict_and_non_strict() {
	let temp_dir = tempfile::tempdir().unwrap();

	store_cmd(temp_dir.path())
		.args([
			"rules",
			"add",
			"--pattern",
			"search.test",
			"--template",
			"{{pattern}}",
		])
		.assert()
		.success();

	store_cmd(temp_dir.path())
		.args(["eval", "https://search.test/?q=1"])
		.assert()
		.code(1);

	store_cmd(temp_dir.path())
		.args(["eval", "--no-strict", "https://search.test/?q=1"])
		.assert()
		.success()
		.stdout(predicate::str::contains("search.test"))
		.stdout(predicate::str::contains("not a fully qualified URL"));
}

#[test]
fn test_eval_skips_malformed_stored_rules() {
	let temp_dir = tempfile::tempdir().unwrap();
	fs::write(
		store_path(temp_dir.path()),
		r#"{"rules": [
			{"pattern": "", "transformations": ["https://never.test"]},
			{"pattern": "(", "type": "regex", "transformations": ["https://bad.test"]},
			{"pattern": "example", "transformations": [{"name": "Ok", "template": "https://ok.test/"}]}
		]}"#,
	)
	.unwrap();

	store_cmd(temp_dir.path())
		.args(["eval", "https://example.com/"])
		.assert()
		.success()
		.stdout(predicate::str::contains("Ok: https://ok.test/"))
		.stderr(predicate::str::contains("1 malformed rule(s)"));
}

#[test]
fn test_settings_disable_strict_and_set_store() {
	let temp_dir = tempfile::tempdir().unwrap();
	fs::write(
		temp_dir.path().join(".url-paths.toml"),
		"strict = false\nstore = \"data/my-rules.json\"\n",
	)
	.unwrap();

	url_paths_cmd()
		.current_dir(temp_dir.path())
		.args([
			"rules",
			"add",
			"--pattern",
			"search.test",
			"--template",
			"{{pattern}}",
		])
		.assert()
		.success();

	assert!(temp_dir.path().join("data").join("my-rules.json").exists());

	url_paths_cmd()
		.current_dir(temp_dir.path())
		.args(["eval", "https://search.test/"])
		.assert()
		.success()
		.stdout(predicate::str::contains("not a fully qualified URL"));
}

#[test]
fn test_regex_only_settings_reinterpret_stored_rules() {
	let temp_dir = tempfile::tempdir().unwrap();
	fs::write(
		temp_dir.path().join(".url-paths.toml"),
		"match-mode = \"regex-only\"\n",
	)
	.unwrap();
	fs::write(
		store_path(temp_dir.path()),
		r#"{"rules": [{"pattern": "item/(\\d+)", "type": "string", "transformations": ["https://id.test/{{1}}"]}]}"#,
	)
	.unwrap();

	store_cmd(temp_dir.path())
		.args(["eval", "https://shop.test/item/42"])
		.assert()
		.success()
		.stdout(predicate::str::contains("https://id.test/42"));
}

// ============================================================================
// test subcommand
// ============================================================================

#[test]
fn test_test_command_match() {
	url_paths_cmd()
		.args([
			"test",
			"https://github.com/acme/widgets",
			"--regex",
			"--pattern",
			r"github\.com/([^/]+)",
			"--template",
			"https://gh.test/{{1}}",
			"--template",
			"{{1}}",
		])
		.assert()
		.success()
		.stdout(predicate::str::contains("Target: https://gh.test/acme"))
		.stdout(predicate::str::contains("Target: acme"))
		.stdout(predicate::str::contains("not a fully qualified URL"))
		.stdout(predicate::str::contains("Match found."));
}

#[test]
fn test_test_command_invalid_regex() {
	url_paths_cmd()
		.args([
			"test",
			"https://x.test/(",
			"--regex",
			"--pattern",
			"(",
			"--template",
			"https://a.test",
		])
		.assert()
		.failure()
		.stderr(predicate::str::contains("Invalid regular expression"));
}

#[test]
fn test_test_command_no_match() {
	url_paths_cmd()
		.args([
			"test",
			"https://x.test/",
			"--pattern",
			"y.test",
			"--template",
			"https://a.test",
		])
		.assert()
		.code(1)
		.stdout(predicate::str::contains("No match for this sample URL"));
}

// ============================================================================
// import / export tests
// ============================================================================

#[test]
fn test_import_merge_deduplicates() {
	let temp_dir = tempfile::tempdir().unwrap();
	let dir = temp_dir.path();
	add_gitpod_rule(dir);

	let import_path = dir.join("import.json");
	fs::write(
		&import_path,
		r#"[
			{"name": "Copy", "pattern": "^https://github\\.com/([^/]+)/([^/]+)$", "type": "regex", "transformations": []},
			{"pattern": "docs.rs", "type": "string", "transformations": ["https://lib.rs/{{url}}"]},
			{"pattern": "   "},
			"not a rule"
		]"#,
	)
	.unwrap();

	store_cmd(dir)
		.arg("import")
		.arg(&import_path)
		.assert()
		.success()
		.stdout(predicate::str::contains(
			"1 added, 1 duplicates skipped, 2 invalid entries skipped",
		));

	let rules = stored_rules(dir);
	assert_eq!(rules.as_array().unwrap().len(), 2);
	assert_eq!(rules[0]["name"], "Gitpod");
	assert_eq!(rules[1]["pattern"], "docs.rs");
}

#[test]
fn test_import_replace() {
	let temp_dir = tempfile::tempdir().unwrap();
	let dir = temp_dir.path();
	add_gitpod_rule(dir);

	let import_path = dir.join("import.json");
	fs::write(
		&import_path,
		r#"{"version": 1, "exportDate": "2026-01-01T00:00:00Z", "rules": [{"pattern": "docs.rs"}]}"#,
	)
	.unwrap();

	store_cmd(dir)
		.args(["import", "--mode", "replace"])
		.arg(&import_path)
		.assert()
		.success();

	let rules = stored_rules(dir);
	assert_eq!(rules.as_array().unwrap().len(), 1);
	assert_eq!(rules[0]["pattern"], "docs.rs");
}

#[test]
fn test_import_without_valid_rules_keeps_store() {
	let temp_dir = tempfile::tempdir().unwrap();
	let dir = temp_dir.path();
	add_gitpod_rule(dir);
	let before = fs::read_to_string(store_path(dir)).unwrap();

	let import_path = dir.join("import.json");
	fs::write(&import_path, r#"[{"pattern": ""}, 7]"#).unwrap();

	store_cmd(dir)
		.args(["import", "--mode", "replace"])
		.arg(&import_path)
		.assert()
		.success()
		.stdout(predicate::str::contains("No valid rules found in import file"));

	assert_eq!(fs::read_to_string(store_path(dir)).unwrap(), before);
}

#[test]
fn test_import_invalid_json_fails_without_change() {
	let temp_dir = tempfile::tempdir().unwrap();
	let dir = temp_dir.path();
	add_gitpod_rule(dir);
	let before = fs::read_to_string(store_path(dir)).unwrap();

	let import_path = dir.join("import.json");
	fs::write(&import_path, "{ not json").unwrap();

	store_cmd(dir)
		.arg("import")
		.arg(&import_path)
		.assert()
		.failure()
		.stderr(predicate::str::contains("Check the file format"));

	assert_eq!(fs::read_to_string(store_path(dir)).unwrap(), before);
}

#[test]
fn test_export_envelope_to_stdout() {
	let temp_dir = tempfile::tempdir().unwrap();
	add_gitpod_rule(temp_dir.path());

	let output = store_cmd(temp_dir.path()).arg("export").output().unwrap();
	assert!(output.status.success());

	let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
	assert_eq!(value["version"], 1);
	assert!(value["exportDate"].is_string());
	assert_eq!(value["rules"][0]["name"], "Gitpod");
}

#[test]
fn test_export_then_import_replace_round_trip() {
	let source_dir = tempfile::tempdir().unwrap();
	add_gitpod_rule(source_dir.path());
	store_cmd(source_dir.path())
		.args([
			"rules",
			"add",
			"--pattern",
			"example.com",
			"--template",
			"Archive=https://archive.test/{{url}}",
		])
		.assert()
		.success();

	let export_dir = tempfile::tempdir().unwrap();
	store_cmd(source_dir.path())
		.arg("export")
		.arg("--output")
		.arg(export_dir.path())
		.assert()
		.success()
		.stderr(predicate::str::contains("Exported 2 rules"));

	let exported: Vec<_> = fs::read_dir(export_dir.path())
		.unwrap()
		.map(|entry| entry.unwrap().path())
		.collect();
	assert_eq!(exported.len(), 1);
	let file_name = exported[0].file_name().unwrap().to_string_lossy().to_string();
	assert!(file_name.starts_with("url-paths-") && file_name.ends_with(".json"));

	let target_dir = tempfile::tempdir().unwrap();
	store_cmd(target_dir.path())
		.args(["import", "--mode", "replace"])
		.arg(&exported[0])
		.assert()
		.success();

	assert_eq!(stored_rules(target_dir.path()), stored_rules(source_dir.path()));
}

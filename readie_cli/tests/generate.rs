mod common;

use predicates::prelude::*;
use readie_core::AnyEmptyResult;
use similar_asserts::assert_eq;

const CONFIG: &str = r#"{ "title": "Readie", "description": "Generate READMEs." }"#;

#[test]
fn default_command_generates_readme() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("readie.json"), CONFIG)?;

	common::readie_cmd()
		.current_dir(tmp.path())
		.arg("--no-global")
		.assert()
		.success()
		.stdout(predicate::str::contains("Generated: "))
		.stdout(predicate::str::contains("README.md"));

	let content = std::fs::read_to_string(tmp.path().join("README.md"))?;
	assert_eq!(content, "# Readie\n\nGenerate READMEs.\n");

	Ok(())
}

#[test]
fn generate_reports_no_changes() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let config_path = tmp.path().join("readie.json");
	std::fs::write(&config_path, CONFIG)?;

	common::readie_cmd()
		.arg("generate")
		.arg("--config")
		.arg(&config_path)
		.arg("--no-global")
		.assert()
		.success()
		.stdout(predicate::str::contains("Generated: "));

	common::readie_cmd()
		.arg("generate")
		.arg("-c")
		.arg(&config_path)
		.arg("--no-global")
		.assert()
		.success()
		.stdout(predicate::str::contains("No changes: "));

	Ok(())
}

#[test]
fn generate_dry_run_prints_diff_without_writing() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let config_path = tmp.path().join("readie.json");
	let readme_path = tmp.path().join("README.md");
	std::fs::write(&config_path, CONFIG)?;
	std::fs::write(&readme_path, "# Old\n")?;

	common::readie_cmd()
		.arg("generate")
		.arg("--config")
		.arg(&config_path)
		.arg("--dry-run")
		.arg("--diff")
		.arg("--no-global")
		.assert()
		.success()
		.stdout(predicate::str::contains("Would update: "))
		.stdout(predicate::str::contains("-# Old"))
		.stdout(predicate::str::contains("+# Readie"));

	assert_eq!(std::fs::read_to_string(&readme_path)?, "# Old\n");

	Ok(())
}

#[test]
fn generate_writes_to_output_override() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let config_path = tmp.path().join("readie.json");
	let output_path = tmp.path().join("DOCS.md");
	std::fs::write(&config_path, CONFIG)?;

	common::readie_cmd()
		.arg("generate")
		.arg("--config")
		.arg(&config_path)
		.arg("--output")
		.arg(&output_path)
		.arg("--no-global")
		.assert()
		.success();

	assert!(output_path.exists());
	assert!(!tmp.path().join("README.md").exists());

	Ok(())
}

#[test]
fn generate_merges_global_config() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(
		tmp.path().join("readie.global.json"),
		r#"{ "footer": "Shared footer for {{packageName}}" }"#,
	)?;
	let project_dir = tmp.path().join("pkg");
	std::fs::create_dir_all(&project_dir)?;
	std::fs::write(project_dir.join("readie.json"), CONFIG)?;
	std::fs::write(project_dir.join("package.json"), r#"{ "name": "@readie/pkg" }"#)?;

	common::readie_cmd()
		.current_dir(tmp.path())
		.arg("generate")
		.arg("--config")
		.arg("pkg/readie.json")
		.assert()
		.success();

	let content = std::fs::read_to_string(project_dir.join("README.md"))?;
	assert!(content.ends_with("Shared footer for @readie/pkg\n"), "{content}");

	Ok(())
}

#[test]
fn generate_fails_for_missing_config() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	common::readie_cmd()
		.current_dir(tmp.path())
		.arg("generate")
		.arg("--no-global")
		.assert()
		.failure()
		.code(1)
		.stderr(predicate::str::contains("failed to read"));

	Ok(())
}

#[test]
fn generate_fails_for_invalid_config() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(
		tmp.path().join("readie.json"),
		r#"{ "title": "", "description": "D" }"#,
	)?;

	common::readie_cmd()
		.current_dir(tmp.path())
		.arg("--no-global")
		.assert()
		.failure()
		.code(1)
		.stderr(predicate::str::contains("configuration validation failed"));

	assert!(!tmp.path().join("README.md").exists());

	Ok(())
}

#[test]
fn generate_fails_for_malformed_json() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("readie.json"), "{ invalid")?;

	common::readie_cmd()
		.current_dir(tmp.path())
		.arg("generate")
		.arg("--no-global")
		.assert()
		.failure()
		.code(1)
		.stderr(predicate::str::contains("readie::parse"));

	Ok(())
}

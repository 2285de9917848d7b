mod common;

use std::path::Path;

use predicates::prelude::*;
use readie_core::AnyEmptyResult;
use rstest::rstest;

fn write_project(root: &Path, name: &str) -> std::io::Result<()> {
	let dir = root.join(name);
	std::fs::create_dir_all(&dir)?;
	std::fs::write(
		dir.join("readie.json"),
		format!(r#"{{ "title": "{name}", "description": "The {name} package." }}"#),
	)
}

#[test]
fn workspace_generates_every_project() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let root = tmp.path().join("packages");
	write_project(&root, "alpha")?;
	write_project(&root, "beta")?;

	common::readie_cmd()
		.current_dir(tmp.path())
		.arg("generate:workspace")
		.arg("--no-global")
		.assert()
		.success()
		.stdout(predicate::str::contains("Generated README for alpha"))
		.stdout(predicate::str::contains("Generated README for beta"))
		.stdout(predicate::str::contains("Summary"))
		.stdout(predicate::str::contains("- Updated: 2"))
		.stdout(predicate::str::contains("- Unchanged: 0"))
		.stdout(predicate::str::contains("- Failed: 0"))
		.stdout(predicate::str::contains("Skipped by filter").not());

	assert!(root.join("alpha/README.md").exists());
	assert!(root.join("beta/README.md").exists());

	common::readie_cmd()
		.current_dir(tmp.path())
		.arg("generate:workspace")
		.arg("--no-global")
		.assert()
		.success()
		.stdout(predicate::str::contains("No changes for alpha"))
		.stdout(predicate::str::contains("- Unchanged: 2"));

	Ok(())
}

#[rstest]
#[case::repeated(&["-p", "alpha", "-p", "gamma"], "- Updated: 2", "- Skipped by filter: 1")]
#[case::comma_separated(&["--package", "alpha, beta"], "- Updated: 2", "- Skipped by filter: 1")]
#[case::single(&["-p", "beta"], "- Updated: 1", "- Skipped by filter: 2")]
fn workspace_package_filter(
	#[case] filter: &[&str],
	#[case] updated: &str,
	#[case] skipped: &str,
) -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	for name in ["alpha", "beta", "gamma"] {
		write_project(tmp.path(), name)?;
	}

	common::readie_cmd()
		.arg("generate:workspace")
		.arg("--root")
		.arg(tmp.path())
		.args(filter)
		.arg("--no-global")
		.assert()
		.success()
		.stdout(predicate::str::contains(updated))
		.stdout(predicate::str::contains(skipped));

	Ok(())
}

#[test]
fn workspace_reports_failures_and_continues() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	write_project(tmp.path(), "good")?;
	std::fs::create_dir_all(tmp.path().join("bad"))?;
	std::fs::write(tmp.path().join("bad/readie.json"), "{ invalid")?;

	common::readie_cmd()
		.arg("generate:workspace")
		.arg("-r")
		.arg(tmp.path())
		.arg("--no-global")
		.assert()
		.success()
		.stderr(predicate::str::contains("Error generating README for bad:"))
		.stdout(predicate::str::contains("- Updated: 1"))
		.stdout(predicate::str::contains("- Failed: 1"));

	assert!(tmp.path().join("good/README.md").exists());

	Ok(())
}

#[test]
fn workspace_failure_includes_io_cause() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::create_dir_all(tmp.path().join("broken"))?;
	std::fs::write(
		tmp.path().join("broken/readie.json"),
		r#"{ "title": "Broken", "description": "D", "output": "missing/README.md" }"#,
	)?;

	common::readie_cmd()
		.arg("generate:workspace")
		.arg("--root")
		.arg(tmp.path())
		.arg("--no-global")
		.assert()
		.success()
		.stderr(predicate::str::contains("Error generating README for broken:"))
		.stderr(predicate::str::contains("failed to write"))
		.stderr(predicate::str::contains("No such file or directory"))
		.stdout(predicate::str::contains("- Failed: 1"));

	Ok(())
}

#[test]
fn workspace_strict_exits_with_failure() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	write_project(tmp.path(), "good")?;
	std::fs::create_dir_all(tmp.path().join("bad"))?;
	std::fs::write(tmp.path().join("bad/readie.json"), "{ invalid")?;

	common::readie_cmd()
		.arg("generate:workspace")
		.arg("--root")
		.arg(tmp.path())
		.arg("--strict")
		.arg("--no-global")
		.assert()
		.failure()
		.code(1)
		.stdout(predicate::str::contains("- Failed: 1"));

	Ok(())
}

#[test]
fn workspace_dry_run_writes_nothing() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	write_project(tmp.path(), "alpha")?;

	common::readie_cmd()
		.arg("generate:workspace")
		.arg("--root")
		.arg(tmp.path())
		.arg("--dry-run")
		.arg("--no-global")
		.assert()
		.success()
		.stdout(predicate::str::contains("Would update README for alpha"));

	assert!(!tmp.path().join("alpha/README.md").exists());

	Ok(())
}

#[test]
fn workspace_uses_custom_config_name() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	write_project(tmp.path(), "alpha")?;
	std::fs::create_dir_all(tmp.path().join("docs"))?;
	std::fs::write(
		tmp.path().join("docs/docs.json"),
		r#"{ "title": "Docs", "description": "Documentation site." }"#,
	)?;

	common::readie_cmd()
		.arg("generate:workspace")
		.arg("--root")
		.arg(tmp.path())
		.arg("--config-name")
		.arg("docs.json")
		.arg("--no-global")
		.assert()
		.success()
		.stdout(predicate::str::contains("Generated README for docs"))
		.stdout(predicate::str::contains("- Updated: 1"));

	assert!(!tmp.path().join("alpha/README.md").exists());

	Ok(())
}

#[test]
fn workspace_fails_for_missing_root() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	common::readie_cmd()
		.arg("generate:workspace")
		.arg("--root")
		.arg(tmp.path().join("missing"))
		.assert()
		.failure()
		.code(1)
		.stderr(predicate::str::contains("workspace root not found"));

	Ok(())
}

mod common;

use predicates::prelude::*;
use readie_core::AnyEmptyResult;
use similar_asserts::assert_eq;

#[test]
fn init_writes_starter_config() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	common::readie_cmd()
		.current_dir(tmp.path())
		.arg("init")
		.assert()
		.success()
		.stdout(predicate::str::contains("Created starter config:"));

	let content = std::fs::read_to_string(tmp.path().join("readie.json"))?;
	assert!(content.contains(r#""$schema""#));
	assert!(content.contains(r#""title": "My Project""#));
	assert!(content.ends_with("}\n"));

	common::readie_cmd()
		.current_dir(tmp.path())
		.arg("--no-global")
		.assert()
		.success();

	let readme = std::fs::read_to_string(tmp.path().join("README.md"))?;
	assert!(readme.starts_with("# My Project\n"));

	Ok(())
}

#[test]
fn init_does_not_overwrite() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let config_path = tmp.path().join("readie.json");
	std::fs::write(&config_path, "existing config")?;

	common::readie_cmd()
		.arg("init")
		.arg("--config")
		.arg(&config_path)
		.assert()
		.failure()
		.code(1)
		.stderr(predicate::str::contains("config already exists"));

	assert_eq!(std::fs::read_to_string(&config_path)?, "existing config");

	Ok(())
}

#[test]
fn init_force_overwrites() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let config_path = tmp.path().join("custom.json");
	std::fs::write(&config_path, "existing config")?;

	common::readie_cmd()
		.arg("init")
		.arg("-c")
		.arg(&config_path)
		.arg("-f")
		.assert()
		.success();

	let content = std::fs::read_to_string(&config_path)?;
	assert!(content.contains(r#""version": "1""#));

	Ok(())
}

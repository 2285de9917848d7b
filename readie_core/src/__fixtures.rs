use std::path::Path;
use std::path::PathBuf;

use serde_json::Value;
use serde_json::json;

use crate::GenerateOutcome;
use crate::GlobalConfig;
use crate::MergedConfig;
use crate::ProjectConfig;
use crate::ReadieError;
use crate::WorkspaceReporter;

/// A valid project config with `overrides` layered over a neutral title and
/// description.
pub(crate) fn project_config(overrides: Value) -> ProjectConfig {
	let mut value = json!({
		"title": "Readie Demo",
		"description": "A neutral README.",
	});

	if let (Some(base), Some(extra)) = (value.as_object_mut(), overrides.as_object()) {
		for (key, item) in extra {
			base.insert(key.clone(), item.clone());
		}
	}

	ProjectConfig::from_value(value, Path::new("readie.json"))
		.unwrap_or_else(|e| panic!("invalid project config: {e}"))
}

pub(crate) fn global_config(value: Value) -> GlobalConfig {
	GlobalConfig::from_value(value, Path::new("readie.global.json"))
		.unwrap_or_else(|e| panic!("invalid global config: {e}"))
}

/// A merged config without global defaults or placeholder substitution.
pub(crate) fn merged_config(overrides: Value) -> MergedConfig {
	MergedConfig::from_project(project_config(overrides))
}

pub(crate) fn write_json(path: &Path, value: &Value) {
	if let Some(parent) = path.parent() {
		std::fs::create_dir_all(parent)
			.unwrap_or_else(|e| panic!("create_dir_all {}: {e}", parent.display()));
	}

	let content =
		serde_json::to_string_pretty(value).unwrap_or_else(|e| panic!("serialize json: {e}"));
	std::fs::write(path, content).unwrap_or_else(|e| panic!("write {}: {e}", path.display()));
}

/// Write a minimal `readie.json` into `dir` and return its path.
pub(crate) fn write_project(dir: &Path, title: &str, description: &str) -> PathBuf {
	let config_path = dir.join("readie.json");
	write_json(
		&config_path,
		&json!({ "title": title, "description": description }),
	);
	config_path
}

/// Owned names for comparing against [`WorkspaceSummary`] lists.
pub(crate) fn names(items: &[&str]) -> Vec<String> {
	items.iter().map(|item| (*item).to_string()).collect()
}

/// Records reporter callbacks as `event:project` strings.
#[derive(Debug, Default)]
pub(crate) struct RecordingReporter {
	pub(crate) events: Vec<String>,
}

impl WorkspaceReporter for RecordingReporter {
	fn on_project_updated(&mut self, name: &str, _outcome: &GenerateOutcome, dry_run: bool) {
		self.events.push(format!("updated:{name}:{dry_run}"));
	}

	fn on_project_unchanged(&mut self, name: &str, _outcome: &GenerateOutcome) {
		self.events.push(format!("unchanged:{name}"));
	}

	fn on_project_failed(&mut self, name: &str, _error: &ReadieError) {
		self.events.push(format!("failed:{name}"));
	}
}

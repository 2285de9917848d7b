use std::collections::BTreeSet;
use std::path::Path;
use std::path::PathBuf;

use crate::GenerateOptions;
use crate::GenerateOutcome;
use crate::PROJECT_CONFIG_NAME;
use crate::ReadieError;
use crate::ReadieResult;
use crate::absolute_path;
use crate::generate_readme;

/// Options for generating READMEs across the projects of a workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceOptions {
	/// Directory whose immediate subdirectories are candidate projects.
	pub root_dir: PathBuf,
	/// Config file name a subdirectory must contain to count as a project.
	pub config_name: String,
	/// Project directory names to generate. Empty selects every project.
	pub package_filter: BTreeSet<String>,
	/// Compute results without writing anything.
	pub dry_run: bool,
	/// Discover and merge the nearest `readie.global.json` per project.
	pub use_global_config: bool,
}

impl WorkspaceOptions {
	pub fn new(root_dir: impl Into<PathBuf>) -> Self {
		Self {
			root_dir: root_dir.into(),
			config_name: PROJECT_CONFIG_NAME.to_string(),
			package_filter: BTreeSet::new(),
			dry_run: false,
			use_global_config: true,
		}
	}
}

/// A project whose README could not be generated.
#[derive(Debug)]
pub struct WorkspaceFailure {
	/// Project directory name.
	pub name: String,
	pub error: ReadieError,
}

/// Aggregated outcome of a workspace run. Names are project directory names
/// in processing order.
#[derive(Debug, Default)]
pub struct WorkspaceSummary {
	/// Projects whose README was created or changed.
	pub updated: Vec<String>,
	/// Projects whose README was already up to date.
	pub unchanged: Vec<String>,
	pub failed: Vec<WorkspaceFailure>,
	/// Discovered projects left out by the package filter.
	pub skipped_by_filter: Vec<String>,
}

impl WorkspaceSummary {
	pub fn has_failures(&self) -> bool {
		!self.failed.is_empty()
	}
}

/// Receives per-project progress during [`generate_workspace`].
pub trait WorkspaceReporter {
	fn on_project_updated(&mut self, name: &str, outcome: &GenerateOutcome, dry_run: bool);
	fn on_project_unchanged(&mut self, name: &str, outcome: &GenerateOutcome);
	fn on_project_failed(&mut self, name: &str, error: &ReadieError);
}

/// Reports progress as `tracing` events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl WorkspaceReporter for TracingReporter {
	fn on_project_updated(&mut self, name: &str, outcome: &GenerateOutcome, dry_run: bool) {
		tracing::info!(project = name, output = %outcome.output_path.display(), dry_run, "readme updated");
	}

	fn on_project_unchanged(&mut self, name: &str, outcome: &GenerateOutcome) {
		tracing::info!(project = name, output = %outcome.output_path.display(), "readme unchanged");
	}

	fn on_project_failed(&mut self, name: &str, error: &ReadieError) {
		tracing::warn!(project = name, %error, "readme generation failed");
	}
}

/// Generate the README of every project directly under the workspace root.
///
/// Fails before touching any project when the root does not exist. After
/// that, a failing project is recorded in [`WorkspaceSummary::failed`] and
/// the remaining projects are still processed.
pub fn generate_workspace(
	options: &WorkspaceOptions,
	reporter: &mut impl WorkspaceReporter,
) -> ReadieResult<WorkspaceSummary> {
	let root = absolute_path(&options.root_dir)?;
	if !root.exists() {
		return Err(ReadieError::MissingWorkspaceRoot { path: root });
	}

	let projects = discover_projects(&root, &options.config_name)?;
	let mut summary = WorkspaceSummary::default();
	let mut selected = Vec::new();

	for (name, dir) in projects {
		if options.package_filter.is_empty() || options.package_filter.contains(&name) {
			selected.push((name, dir));
		} else {
			summary.skipped_by_filter.push(name);
		}
	}

	for (name, dir) in selected {
		let generate = GenerateOptions::new(dir.join(&options.config_name))
			.dry_run(options.dry_run)
			.use_global_config(options.use_global_config);

		match generate_readme(&generate) {
			Ok(outcome) if outcome.updated => {
				reporter.on_project_updated(&name, &outcome, options.dry_run);
				summary.updated.push(name);
			}
			Ok(outcome) => {
				reporter.on_project_unchanged(&name, &outcome);
				summary.unchanged.push(name);
			}
			Err(error) => {
				reporter.on_project_failed(&name, &error);
				summary.failed.push(WorkspaceFailure { name, error });
			}
		}
	}

	Ok(summary)
}

/// Immediate subdirectories of `root` containing `config_name`, sorted by
/// directory name.
pub fn discover_projects(root: &Path, config_name: &str) -> ReadieResult<Vec<(String, PathBuf)>> {
	let entries = std::fs::read_dir(root).map_err(|source| {
		ReadieError::Read {
			path: root.to_path_buf(),
			source,
		}
	})?;

	let mut projects = Vec::new();
	for entry in entries {
		let dir = entry?.path();
		if !dir.is_dir() || !dir.join(config_name).is_file() {
			continue;
		}

		let Some(name) = dir.file_name().map(|name| name.to_string_lossy().into_owned()) else {
			continue;
		};
		projects.push((name, dir));
	}

	projects.sort_by(|a, b| a.0.cmp(&b.0));
	Ok(projects)
}

/// Parse repeatable, comma separated `--package` values into a set of
/// project names. Blank parts are dropped.
pub fn parse_package_list<I, S>(values: I) -> BTreeSet<String>
where
	I: IntoIterator<Item = S>,
	S: AsRef<str>,
{
	values
		.into_iter()
		.flat_map(|value| {
			value
				.as_ref()
				.split(',')
				.map(str::trim)
				.filter(|name| !name.is_empty())
				.map(str::to_string)
				.collect::<Vec<_>>()
		})
		.collect()
}

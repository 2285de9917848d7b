use std::io::ErrorKind;
use std::path::Path;
use std::path::PathBuf;

use crate::GlobalConfig;
use crate::MergeContext;
use crate::ProjectConfig;
use crate::ReadieError;
use crate::ReadieResult;
use crate::absolute_path;
use crate::merge_configs;
use crate::render_readme;

/// Output file written beside the config when neither the caller nor the
/// config names one.
pub const DEFAULT_OUTPUT_NAME: &str = "README.md";

/// Symlinks followed before giving up on an output path.
const MAX_SYMLINK_HOPS: usize = 40;

/// Package manifest read (best effort) for the `packageName` placeholder.
pub const PACKAGE_MANIFEST_NAME: &str = "package.json";

/// Options for generating a single README.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateOptions {
	/// Path to the project's `readie.json`.
	pub config_path: PathBuf,
	/// Explicit output path. Takes precedence over the config's `output`.
	pub output_path: Option<PathBuf>,
	/// Compute the result without writing anything.
	pub dry_run: bool,
	/// Discover and merge the nearest `readie.global.json`.
	pub use_global_config: bool,
}

impl GenerateOptions {
	pub fn new(config_path: impl Into<PathBuf>) -> Self {
		Self {
			config_path: config_path.into(),
			output_path: None,
			dry_run: false,
			use_global_config: true,
		}
	}

	#[must_use]
	pub fn output_path(mut self, output_path: impl Into<PathBuf>) -> Self {
		self.output_path = Some(output_path.into());
		self
	}

	#[must_use]
	pub fn dry_run(mut self, dry_run: bool) -> Self {
		self.dry_run = dry_run;
		self
	}

	#[must_use]
	pub fn use_global_config(mut self, use_global_config: bool) -> Self {
		self.use_global_config = use_global_config;
		self
	}
}

/// Result of generating a single README.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateOutcome {
	/// Absolute path the README was (or would be) written to.
	pub output_path: PathBuf,
	/// Whether the rendered content differs from the file on disk.
	pub updated: bool,
	/// The rendered markdown.
	pub content: String,
	/// The previous file content, if the output file existed.
	pub previous: Option<String>,
}

/// Load, merge and render one project config, then write the README when
/// its content changed.
///
/// Nothing is written when the output is already byte-for-byte identical or
/// when `dry_run` is set. Writes go through a temporary sibling file so the
/// output is never left half written.
pub fn generate_readme(options: &GenerateOptions) -> ReadieResult<GenerateOutcome> {
	let config_path = absolute_path(&options.config_path)?;
	let config_dir = config_dir(&config_path);
	let project = ProjectConfig::load(&config_path)?;
	let global = if options.use_global_config {
		GlobalConfig::discover(config_dir)?
	} else {
		None
	};

	let context = MergeContext {
		package_name: resolve_package_name(&config_path),
	};
	let config = merge_configs(global, project, &context);
	let output_path = resolve_output_path(
		&config_path,
		config.output.as_deref(),
		options.output_path.as_deref(),
	)?;
	tracing::debug!(output = %output_path.display(), "resolved output path");

	let content = render_readme(&config);
	let previous = read_existing(&output_path)?;
	let updated = previous
		.as_ref()
		.is_none_or(|existing| existing.as_slice() != content.as_bytes());

	if updated && !options.dry_run {
		write_atomic(&output_path, &content)?;
	}

	Ok(GenerateOutcome {
		output_path,
		updated,
		content,
		previous: previous.map(|bytes| String::from_utf8_lossy(&bytes).into_owned()),
	})
}

fn config_dir(config_path: &Path) -> &Path {
	config_path.parent().unwrap_or(config_path)
}

/// Output path precedence: explicit override, then the config's `output`
/// (relative to the config file), then `README.md` beside the config.
pub fn resolve_output_path(
	config_path: &Path,
	config_output: Option<&str>,
	override_path: Option<&Path>,
) -> ReadieResult<PathBuf> {
	if let Some(path) = override_path.filter(|path| !path.as_os_str().is_empty()) {
		return absolute_path(path);
	}

	let dir = config_dir(config_path);
	match config_output.filter(|output| !output.is_empty()) {
		Some(output) => absolute_path(&dir.join(output)),
		None => absolute_path(&dir.join(DEFAULT_OUTPUT_NAME)),
	}
}

/// Read the `name` of the `package.json` beside `config_path`.
///
/// Any failure (missing file, invalid JSON, missing or blank name) yields
/// `None`.
pub fn resolve_package_name(config_path: &Path) -> Option<String> {
	let manifest_path = config_dir(config_path).join(PACKAGE_MANIFEST_NAME);
	let content = match std::fs::read_to_string(&manifest_path) {
		Ok(content) => content,
		Err(error) if error.kind() == ErrorKind::NotFound => {
			tracing::debug!(path = %manifest_path.display(), "no package manifest");
			return None;
		}
		Err(error) => {
			tracing::warn!(path = %manifest_path.display(), %error, "ignoring unreadable package manifest");
			return None;
		}
	};

	let manifest: serde_json::Value = match serde_json::from_str(&content) {
		Ok(manifest) => manifest,
		Err(error) => {
			tracing::warn!(path = %manifest_path.display(), %error, "ignoring invalid package manifest");
			return None;
		}
	};

	manifest
		.get("name")
		.and_then(serde_json::Value::as_str)
		.filter(|name| !name.trim().is_empty())
		.map(str::to_string)
}

fn read_existing(path: &Path) -> ReadieResult<Option<Vec<u8>>> {
	match std::fs::read(path) {
		Ok(bytes) => Ok(Some(bytes)),
		Err(source) if source.kind() == ErrorKind::NotFound => Ok(None),
		Err(source) => {
			Err(ReadieError::Read {
				path: path.to_path_buf(),
				source,
			})
		}
	}
}

/// Write `content` to a temporary sibling and rename it over `path`. A
/// symlinked `path` is resolved first so the link target receives the new
/// content, and an existing file keeps its permissions.
pub(crate) fn write_atomic(path: &Path, content: &str) -> ReadieResult<()> {
	let write_error = |source| {
		ReadieError::Write {
			path: path.to_path_buf(),
			source,
		}
	};

	let target = resolve_write_target(path).map_err(write_error)?;
	let permissions = match std::fs::metadata(&target) {
		Ok(metadata) => Some(metadata.permissions()),
		Err(source) if source.kind() == ErrorKind::NotFound => None,
		Err(source) => return Err(write_error(source)),
	};

	let file_name = target
		.file_name()
		.map_or_else(|| DEFAULT_OUTPUT_NAME.into(), |name| name.to_string_lossy());
	let temp_path = target.with_file_name(format!(".{file_name}.tmp-{}", std::process::id()));

	std::fs::write(&temp_path, content).map_err(write_error)?;

	let renamed = match permissions {
		Some(permissions) => std::fs::set_permissions(&temp_path, permissions),
		None => Ok(()),
	}
	.and_then(|()| std::fs::rename(&temp_path, &target));

	if let Err(source) = renamed {
		let _ = std::fs::remove_file(&temp_path);
		return Err(write_error(source));
	}

	Ok(())
}

/// The file a write to `path` should land on. Symlinks are followed,
/// including dangling ones.
fn resolve_write_target(path: &Path) -> std::io::Result<PathBuf> {
	let mut target = path.to_path_buf();

	for _ in 0..MAX_SYMLINK_HOPS {
		match std::fs::symlink_metadata(&target) {
			Ok(metadata) if metadata.file_type().is_symlink() => {
				let link = std::fs::read_link(&target)?;
				target = match target.parent() {
					Some(parent) if link.is_relative() => parent.join(link),
					_ => link,
				};
			}
			Ok(_) => return Ok(target),
			Err(error) if error.kind() == ErrorKind::NotFound => return Ok(target),
			Err(error) => return Err(error),
		}
	}

	Err(std::io::Error::other(format!(
		"too many levels of symbolic links at {}",
		path.display()
	)))
}

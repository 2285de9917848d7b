use std::path::Path;
use std::path::PathBuf;

use indexmap::IndexMap;
use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;

use crate::ReadieError;
use crate::ReadieResult;

/// Conventional name of a project config file.
pub const PROJECT_CONFIG_NAME: &str = "readie.json";

/// Fixed name of the shared defaults file discovered by walking up from a
/// project config.
pub const GLOBAL_CONFIG_NAME: &str = "readie.global.json";

/// The only config format version currently understood.
pub const CONFIG_VERSION: &str = "1";

/// A config key that distinguishes "not written" from "written as `null`".
///
/// A key that is present with `null` is an explicit opt-out: it resolves to
/// absent during merging and never falls through to the global layer.
///
/// ```json
/// { "footer": null }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field<T> {
	/// The key does not appear in the document.
	Missing,
	/// The key appears with a `null` value.
	Null,
	/// The key appears with a value.
	Value(T),
}

impl<T> Default for Field<T> {
	fn default() -> Self {
		Self::Missing
	}
}

impl<T> Field<T> {
	pub fn is_missing(&self) -> bool {
		matches!(self, Self::Missing)
	}

	/// Whether the document defines this key, including as `null`.
	pub fn is_present(&self) -> bool {
		!self.is_missing()
	}

	pub fn value(&self) -> Option<&T> {
		match self {
			Self::Value(value) => Some(value),
			Self::Missing | Self::Null => None,
		}
	}

	pub fn into_option(self) -> Option<T> {
		match self {
			Self::Value(value) => Some(value),
			Self::Missing | Self::Null => None,
		}
	}

	/// Resolve this (higher precedence) field against a fallback layer.
	///
	/// Presence wins: `Value` and `Null` are both final, only `Missing`
	/// consults the fallback. A `Null` fallback is also absent.
	pub fn or_fallback(self, fallback: Self) -> Option<T> {
		match self {
			Self::Value(value) => Some(value),
			Self::Null => None,
			Self::Missing => fallback.into_option(),
		}
	}
}

impl<T> From<T> for Field<T> {
	fn from(value: T) -> Self {
		Self::Value(value)
	}
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Field<T> {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		Ok(match Option::<T>::deserialize(deserializer)? {
			Some(value) => Self::Value(value),
			None => Self::Null,
		})
	}
}

impl<T: Serialize> Serialize for Field<T> {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		match self {
			Self::Value(value) => value.serialize(serializer),
			Self::Missing | Self::Null => serializer.serialize_none(),
		}
	}
}

/// A CLI command listed in the "Available Commands" section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandEntry {
	pub name: String,
	pub description: String,
}

/// A global CLI flag listed in the "Global Flags" section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagEntry {
	/// Flag token such as `--dry-run`.
	pub flag: String,
	pub description: String,
}

/// A badge image with an optional click-through link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Badge {
	/// Alt text for the image.
	pub label: String,
	/// Image URL.
	pub image: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub link: Option<String>,
}

/// License content: either free markdown text or a linked name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
	untagged,
	expecting = "a license string or an object with non-empty `name` and `url`"
)]
#[non_exhaustive]
pub enum License {
	Text(String),
	Link { name: String, url: String },
}

/// Every optional key shared by project and global configs.
///
/// Each key is a [`Field`] so the merge can tell an explicit `null` apart
/// from an absent key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigFields {
	/// JSON schema URL for editor tooling. Never rendered.
	#[serde(rename = "$schema", default, skip_serializing_if = "Field::is_missing")]
	pub schema: Field<String>,
	/// Config format version, must be `"1"` when set.
	#[serde(default, skip_serializing_if = "Field::is_missing")]
	pub version: Field<String>,
	/// Output path relative to the config file.
	#[serde(default, skip_serializing_if = "Field::is_missing")]
	pub output: Field<String>,
	#[serde(default, skip_serializing_if = "Field::is_missing")]
	pub include_table_of_contents: Field<bool>,
	#[serde(default, skip_serializing_if = "Field::is_missing")]
	pub features: Field<Vec<String>>,
	#[serde(default, skip_serializing_if = "Field::is_missing")]
	pub prerequisites: Field<Vec<String>>,
	#[serde(default, skip_serializing_if = "Field::is_missing")]
	pub installation: Field<Vec<String>>,
	#[serde(default, skip_serializing_if = "Field::is_missing")]
	pub manual_installation: Field<Vec<String>>,
	/// Usage steps. Fenced code blocks are kept verbatim and left unnumbered.
	#[serde(default, skip_serializing_if = "Field::is_missing")]
	pub usage: Field<Vec<String>>,
	#[serde(default, skip_serializing_if = "Field::is_missing")]
	pub commands: Field<Vec<CommandEntry>>,
	#[serde(default, skip_serializing_if = "Field::is_missing")]
	pub global_flags: Field<Vec<FlagEntry>>,
	#[serde(default, skip_serializing_if = "Field::is_missing")]
	pub badges: Field<Vec<Badge>>,
	/// Markdown or HTML rendered before the title.
	#[serde(default, skip_serializing_if = "Field::is_missing")]
	pub banner: Field<String>,
	#[serde(default, skip_serializing_if = "Field::is_missing")]
	pub quick_start: Field<String>,
	#[serde(default, skip_serializing_if = "Field::is_missing")]
	pub support: Field<Vec<String>>,
	#[serde(default, skip_serializing_if = "Field::is_missing")]
	pub contributing: Field<Vec<String>>,
	#[serde(default, skip_serializing_if = "Field::is_missing")]
	pub security: Field<String>,
	#[serde(default, skip_serializing_if = "Field::is_missing")]
	pub license: Field<License>,
	#[serde(default, skip_serializing_if = "Field::is_missing")]
	pub footer: Field<String>,
	#[serde(default, skip_serializing_if = "Field::is_missing")]
	pub docs_link: Field<String>,
	#[serde(default, skip_serializing_if = "Field::is_missing")]
	pub quick_start_link: Field<String>,
	/// Extra sections keyed by heading, rendered in document order.
	#[serde(default, skip_serializing_if = "Field::is_missing")]
	pub custom_sections: Field<IndexMap<String, String>>,
}

/// A project-level `readie.json` document.
///
/// ```json
/// {
///   "title": "My Project",
///   "description": "A short description.",
///   "features": ["Fast", "Simple"],
///   "license": { "name": "MIT", "url": "https://opensource.org/license/mit" }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectConfig {
	/// Rendered as the README H1 unless the banner already carries one.
	pub title: String,
	/// Primary description paragraph.
	pub description: String,
	#[serde(flatten)]
	pub fields: ConfigFields,
}

/// Shared defaults loaded from `readie.global.json`. Every key is optional.
///
/// `title` and `description` are accepted for shape compatibility but are
/// never inherited by a project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalConfig {
	#[serde(default, skip_serializing_if = "Field::is_missing")]
	pub title: Field<String>,
	#[serde(default, skip_serializing_if = "Field::is_missing")]
	pub description: Field<String>,
	#[serde(flatten)]
	pub fields: ConfigFields,
}

impl ProjectConfig {
	/// Create a minimal project config.
	pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
		Self {
			title: title.into(),
			description: description.into(),
			fields: ConfigFields::default(),
		}
	}

	/// Decode an already parsed JSON value, validating its shape. `path` is
	/// only used for error reporting.
	pub fn from_value(value: serde_json::Value, path: &Path) -> ReadieResult<Self> {
		let config: Self = serde_json::from_value(value).map_err(|e| {
			ReadieError::Validation {
				path: path.to_path_buf(),
				reason: e.to_string(),
			}
		})?;

		let mut violations = Vec::new();
		require_non_empty(&mut violations, "title", &config.title);
		require_non_empty(&mut violations, "description", &config.description);
		config.fields.collect_violations(&mut violations);

		if violations.is_empty() {
			Ok(config)
		} else {
			Err(ReadieError::Validation {
				path: path.to_path_buf(),
				reason: violations.join("\n"),
			})
		}
	}

	/// Read, parse and validate a project config file.
	pub fn load(path: &Path) -> ReadieResult<Self> {
		let path = absolute_path(path)?;
		let value = read_json(&path)?;
		Self::from_value(value, &path)
	}
}

impl GlobalConfig {
	/// Decode an already parsed JSON value, validating its shape. `path` is
	/// only used for error reporting.
	pub fn from_value(value: serde_json::Value, path: &Path) -> ReadieResult<Self> {
		let config: Self = serde_json::from_value(value).map_err(|e| {
			ReadieError::GlobalValidation {
				path: path.to_path_buf(),
				reason: e.to_string(),
			}
		})?;

		let mut violations = Vec::new();
		if let Some(title) = config.title.value() {
			require_non_empty(&mut violations, "title", title);
		}
		if let Some(description) = config.description.value() {
			require_non_empty(&mut violations, "description", description);
		}
		config.fields.collect_violations(&mut violations);

		if violations.is_empty() {
			Ok(config)
		} else {
			Err(ReadieError::GlobalValidation {
				path: path.to_path_buf(),
				reason: violations.join("\n"),
			})
		}
	}

	/// Read, parse and validate a global config file.
	pub fn load(path: &Path) -> ReadieResult<Self> {
		let path = absolute_path(path)?;
		let value = read_json(&path)?;
		Self::from_value(value, &path)
	}

	/// Walk up from `start_dir` and load the nearest `readie.global.json`.
	///
	/// Returns `Ok(None)` when no file exists between `start_dir` and the
	/// filesystem root. A file that exists but fails to parse or validate is
	/// an error.
	pub fn discover(start_dir: &Path) -> ReadieResult<Option<Self>> {
		let start_dir = absolute_path(start_dir)?;
		let Some(path) = find_global_config(&start_dir) else {
			tracing::debug!(start = %start_dir.display(), "no global config found");
			return Ok(None);
		};

		tracing::debug!(path = %path.display(), "using global config");
		Self::load(&path).map(Some)
	}
}

impl ConfigFields {
	fn collect_violations(&self, violations: &mut Vec<String>) {
		if let Some(version) = self.version.value() {
			if version != CONFIG_VERSION {
				violations.push(format!(
					"`version` must be \"{CONFIG_VERSION}\", got \"{version}\""
				));
			}
		}

		for (index, command) in self.commands.value().into_iter().flatten().enumerate() {
			require_non_empty(violations, &format!("commands[{index}].name"), &command.name);
			require_non_empty(
				violations,
				&format!("commands[{index}].description"),
				&command.description,
			);
		}

		for (index, flag) in self.global_flags.value().into_iter().flatten().enumerate() {
			require_non_empty(violations, &format!("globalFlags[{index}].flag"), &flag.flag);
			require_non_empty(
				violations,
				&format!("globalFlags[{index}].description"),
				&flag.description,
			);
		}

		for (index, badge) in self.badges.value().into_iter().flatten().enumerate() {
			require_non_empty(violations, &format!("badges[{index}].label"), &badge.label);
			require_non_empty(violations, &format!("badges[{index}].image"), &badge.image);
			if let Some(link) = &badge.link {
				require_non_empty(violations, &format!("badges[{index}].link"), link);
			}
		}

		match self.license.value() {
			Some(License::Text(text)) => require_non_empty(violations, "license", text),
			Some(License::Link { name, url }) => {
				require_non_empty(violations, "license.name", name);
				require_non_empty(violations, "license.url", url);
			}
			None => {}
		}
	}
}

fn require_non_empty(violations: &mut Vec<String>, key: &str, value: &str) {
	if value.is_empty() {
		violations.push(format!("`{key}` must be a non-empty string"));
	}
}

/// Find the nearest global config file at or above `start_dir`.
///
/// The walk stops at the first directory whose parent is itself (or has no
/// parent), so it terminates on every root representation.
pub fn find_global_config(start_dir: &Path) -> Option<PathBuf> {
	let mut current = start_dir.to_path_buf();

	loop {
		let candidate = current.join(GLOBAL_CONFIG_NAME);
		if candidate.is_file() {
			return Some(candidate);
		}

		match current.parent() {
			Some(parent) if parent != current => current = parent.to_path_buf(),
			_ => return None,
		}
	}
}

/// Resolve `path` against the current directory without touching the
/// filesystem.
pub fn absolute_path(path: &Path) -> ReadieResult<PathBuf> {
	Ok(std::path::absolute(path)?)
}

fn read_json(path: &Path) -> ReadieResult<serde_json::Value> {
	let content = std::fs::read_to_string(path).map_err(|source| ReadieError::Read {
		path: path.to_path_buf(),
		source,
	})?;

	serde_json::from_str(&content).map_err(|e| ReadieError::Parse {
		path: path.to_path_buf(),
		reason: e.to_string(),
	})
}

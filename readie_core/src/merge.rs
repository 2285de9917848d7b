use std::borrow::Cow;
use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Captures;
use regex::Regex;

use crate::Badge;
use crate::CommandEntry;
use crate::ConfigFields;
use crate::Field;
use crate::FlagEntry;
use crate::GlobalConfig;
use crate::License;
use crate::ProjectConfig;

/// `{{ name }}` with optional whitespace inside the braces.
static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}\}")
		.unwrap_or_else(|e| panic!("invalid placeholder pattern: {e}"))
});

/// Extra inputs for interpolation that do not come from either config.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeContext {
	/// Package name read from a sibling `package.json`, if any.
	pub package_name: Option<String>,
}

impl MergeContext {
	pub fn with_package_name(package_name: impl Into<String>) -> Self {
		Self {
			package_name: Some(package_name.into()),
		}
	}
}

/// Values substituted for `{{title}}`, `{{packageName}}` and
/// `{{packageNameEncoded}}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholders {
	pub title: String,
	pub package_name: String,
	pub package_name_encoded: String,
}

impl Placeholders {
	/// Build the placeholder values for a project. The package name falls
	/// back to the title when absent or blank.
	pub fn new(title: &str, package_name: Option<&str>) -> Self {
		let package_name = package_name
			.map(str::trim)
			.filter(|name| !name.is_empty())
			.unwrap_or(title)
			.to_string();
		let package_name_encoded = encode_uri_component(&package_name);

		Self {
			title: title.to_string(),
			package_name,
			package_name_encoded,
		}
	}

	pub fn get(&self, name: &str) -> Option<&str> {
		match name {
			"title" => Some(&self.title),
			"packageName" => Some(&self.package_name),
			"packageNameEncoded" => Some(&self.package_name_encoded),
			_ => None,
		}
	}

	/// Replace every known placeholder in `value`. Unknown names are kept
	/// verbatim, braces included.
	pub fn interpolate<'a>(&self, value: &'a str) -> Cow<'a, str> {
		PLACEHOLDER.replace_all(value, |captures: &Captures<'_>| {
			match self.get(&captures[1]) {
				Some(replacement) => replacement.to_string(),
				None => captures[0].to_string(),
			}
		})
	}

	fn apply(&self, value: &mut String) {
		if value.contains("{{") {
			*value = self.interpolate(value).into_owned();
		}
	}

	fn apply_option(&self, value: &mut Option<String>) {
		if let Some(value) = value {
			self.apply(value);
		}
	}
}

/// Characters `urlencoding` escapes that URI component encoding keeps
/// literal.
const URI_COMPONENT_UNRESERVED: [(&str, &str); 5] =
	[("%21", "!"), ("%27", "'"), ("%28", "("), ("%29", ")"), ("%2A", "*")];

/// Percent-encode `value` as a URI component. Only ASCII letters, digits and
/// `- _ . ! ~ * ' ( )` stay unescaped.
pub fn encode_uri_component(value: &str) -> String {
	let mut encoded = urlencoding::encode(value).into_owned();
	for (escaped, literal) in URI_COMPONENT_UNRESERVED {
		if encoded.contains(escaped) {
			encoded = encoded.replace(escaped, literal);
		}
	}

	encoded
}

/// A project config with global defaults applied and placeholders
/// substituted. This is the only input the renderer needs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergedConfig {
	pub title: String,
	pub description: String,
	pub schema: Option<String>,
	pub version: Option<String>,
	pub output: Option<String>,
	pub include_table_of_contents: Option<bool>,
	pub features: Option<Vec<String>>,
	pub prerequisites: Option<Vec<String>>,
	pub installation: Option<Vec<String>>,
	pub manual_installation: Option<Vec<String>>,
	pub usage: Option<Vec<String>>,
	pub commands: Option<Vec<CommandEntry>>,
	pub global_flags: Option<Vec<FlagEntry>>,
	pub badges: Option<Vec<Badge>>,
	pub banner: Option<String>,
	pub quick_start: Option<String>,
	pub support: Option<Vec<String>>,
	pub contributing: Option<Vec<String>>,
	pub security: Option<String>,
	pub license: Option<License>,
	pub footer: Option<String>,
	pub docs_link: Option<String>,
	pub quick_start_link: Option<String>,
	pub custom_sections: Option<IndexMap<String, String>>,
}

impl MergedConfig {
	/// A project config on its own, without defaults or interpolation.
	pub fn from_project(project: ProjectConfig) -> Self {
		merge_fields(project, ConfigFields::default())
	}
}

/// Merge a project config over optional global defaults, then interpolate
/// placeholders exactly once.
///
/// - A key the project defines wins, even when its value is `null` (which
///   resolves to absent).
/// - `title` and `description` always come from the project.
/// - `customSections` merges per heading with project entries overriding
///   global ones, unless the project sets it to `null`.
pub fn merge_configs(
	global: Option<GlobalConfig>,
	project: ProjectConfig,
	context: &MergeContext,
) -> MergedConfig {
	let placeholders = Placeholders::new(&project.title, context.package_name.as_deref());
	let global = global.map(|config| config.fields).unwrap_or_default();
	let mut merged = merge_fields(project, global);
	interpolate_config(&mut merged, &placeholders);
	merged
}

fn merge_fields(project: ProjectConfig, global: ConfigFields) -> MergedConfig {
	let ProjectConfig {
		title,
		description,
		fields: project,
	} = project;
	let custom_sections = merge_custom_sections(project.custom_sections, global.custom_sections);

	MergedConfig {
		title,
		description,
		schema: project.schema.or_fallback(global.schema),
		version: project.version.or_fallback(global.version),
		output: project.output.or_fallback(global.output),
		include_table_of_contents: project
			.include_table_of_contents
			.or_fallback(global.include_table_of_contents),
		features: project.features.or_fallback(global.features),
		prerequisites: project.prerequisites.or_fallback(global.prerequisites),
		installation: project.installation.or_fallback(global.installation),
		manual_installation: project
			.manual_installation
			.or_fallback(global.manual_installation),
		usage: project.usage.or_fallback(global.usage),
		commands: project.commands.or_fallback(global.commands),
		global_flags: project.global_flags.or_fallback(global.global_flags),
		badges: project.badges.or_fallback(global.badges),
		banner: project.banner.or_fallback(global.banner),
		quick_start: project.quick_start.or_fallback(global.quick_start),
		support: project.support.or_fallback(global.support),
		contributing: project.contributing.or_fallback(global.contributing),
		security: project.security.or_fallback(global.security),
		license: project.license.or_fallback(global.license),
		footer: project.footer.or_fallback(global.footer),
		docs_link: project.docs_link.or_fallback(global.docs_link),
		quick_start_link: project.quick_start_link.or_fallback(global.quick_start_link),
		custom_sections,
	}
}

fn merge_custom_sections(
	project: Field<IndexMap<String, String>>,
	global: Field<IndexMap<String, String>>,
) -> Option<IndexMap<String, String>> {
	match project {
		Field::Null => None,
		Field::Missing => global.into_option(),
		Field::Value(sections) => {
			let mut merged = global.into_option().unwrap_or_default();
			// Overridden headings keep their global position.
			merged.extend(sections);
			Some(merged)
		}
	}
}

/// Substitute placeholders in every flat string field and every custom
/// section body. Lists, badges, commands and the linked license form are
/// left untouched.
fn interpolate_config(config: &mut MergedConfig, placeholders: &Placeholders) {
	placeholders.apply(&mut config.title);
	placeholders.apply(&mut config.description);
	placeholders.apply_option(&mut config.schema);
	placeholders.apply_option(&mut config.version);
	placeholders.apply_option(&mut config.output);
	placeholders.apply_option(&mut config.banner);
	placeholders.apply_option(&mut config.quick_start);
	placeholders.apply_option(&mut config.security);
	placeholders.apply_option(&mut config.footer);
	placeholders.apply_option(&mut config.docs_link);
	placeholders.apply_option(&mut config.quick_start_link);

	if let Some(License::Text(text)) = &mut config.license {
		placeholders.apply(text);
	}

	if let Some(sections) = &mut config.custom_sections {
		for body in sections.values_mut() {
			placeholders.apply(body);
		}
	}
}

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::Badge;
use crate::License;
use crate::MergedConfig;

/// Three or more consecutive newlines, i.e. more than one blank line.
static BLANK_LINE_RUN: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"\n{3,}").unwrap_or_else(|e| panic!("invalid blank line pattern: {e}"))
});

const CODE_FENCE: &str = "```";
const BULLET_PREFIX: &str = "- ";

/// Render a merged config into README markdown.
///
/// The output ends with exactly one newline, never contains more than one
/// consecutive blank line and is a pure function of `config`.
pub fn render_readme(config: &MergedConfig) -> String {
	let sections = ReadmeSections::new(config);
	let toc = render_table_of_contents(config.include_table_of_contents, &sections.toc_titles(config));

	let blocks = [
		sections.banner.as_str(),
		sections.title.as_str(),
		sections.badges.as_str(),
		config.description.as_str(),
		toc.as_str(),
		sections.features.as_str(),
		sections.prerequisites.as_str(),
		sections.quick_start.as_str(),
		sections.installation.as_str(),
		sections.manual_installation.as_str(),
		sections.usage.as_str(),
		sections.commands.as_str(),
		sections.global_flags.as_str(),
		sections.docs.as_str(),
		sections.quick_start_link.as_str(),
		sections.support.as_str(),
		sections.contributing.as_str(),
		sections.security.as_str(),
		sections.license.as_str(),
		sections.custom_sections.as_str(),
		sections.footer.as_str(),
	];

	let joined = blocks
		.into_iter()
		.filter(|block| is_non_empty(block))
		.collect::<Vec<_>>()
		.join("\n\n");

	format!("{}\n", collapse_blank_lines(&joined).trim())
}

/// Every top-level block of a README. Empty strings are omitted sections.
#[derive(Debug, Default)]
struct ReadmeSections {
	banner: String,
	title: String,
	badges: String,
	features: String,
	prerequisites: String,
	quick_start: String,
	installation: String,
	manual_installation: String,
	usage: String,
	commands: String,
	global_flags: String,
	docs: String,
	quick_start_link: String,
	support: String,
	contributing: String,
	security: String,
	license: String,
	custom_sections: String,
	footer: String,
}

impl ReadmeSections {
	fn new(config: &MergedConfig) -> Self {
		let banner = non_empty(config.banner.as_deref()).unwrap_or_default();
		let title = if banner_has_h1(banner) {
			String::new()
		} else {
			format!("# {}", config.title)
		};

		Self {
			banner: banner.to_string(),
			title,
			badges: render_badges(config.badges.as_deref()),
			features: render_list_section("## Key Features", config.features.as_deref(), |item| {
				format!("{BULLET_PREFIX}{item}")
			}),
			prerequisites: render_bullet_section("## Prerequisites", config.prerequisites.as_deref()),
			quick_start: render_heading_block("## Quick Start", config.quick_start.as_deref()),
			installation: render_list_section(
				"## Installation",
				config.installation.as_deref(),
				String::clone,
			),
			manual_installation: render_list_section(
				"## Manual Installation",
				config.manual_installation.as_deref(),
				String::clone,
			),
			usage: render_usage_section(config.usage.as_deref()),
			commands: render_list_section("## Available Commands", config.commands.as_deref(), |cmd| {
				format!("{BULLET_PREFIX}`{}`: {}", cmd.name, cmd.description)
			}),
			global_flags: render_list_section(
				"## Global Flags",
				config.global_flags.as_deref(),
				|flag| format!("{BULLET_PREFIX}`{}`: {}", flag.flag, flag.description),
			),
			docs: render_link_section(config.docs_link.as_deref(), |link| {
				format!(
					"## Documentation\n\nFor further information, guides, and examples visit the \
					 [reference documentation]({link})."
				)
			}),
			quick_start_link: render_link_section(config.quick_start_link.as_deref(), |link| {
				format!("## Additional Quick Start\n\nSee the full quick start guide [here]({link}).")
			}),
			support: render_bullet_section("## Support", config.support.as_deref()),
			contributing: render_bullet_section("## Contributing", config.contributing.as_deref()),
			security: render_heading_block("## Security", config.security.as_deref()),
			license: render_license(config.license.as_ref()),
			custom_sections: render_custom_sections(config),
			footer: non_empty(config.footer.as_deref())
				.unwrap_or_default()
				.to_string(),
		}
	}

	/// Titles of every visible section in document order, followed by the
	/// custom section headings.
	fn toc_titles<'a>(&'a self, config: &'a MergedConfig) -> Vec<&'a str> {
		let named = [
			("Key Features", &self.features),
			("Prerequisites", &self.prerequisites),
			("Quick Start", &self.quick_start),
			("Installation", &self.installation),
			("Manual Installation", &self.manual_installation),
			("Usage", &self.usage),
			("Available Commands", &self.commands),
			("Global Flags", &self.global_flags),
			("Documentation", &self.docs),
			("Additional Quick Start", &self.quick_start_link),
			("Support", &self.support),
			("Contributing", &self.contributing),
			("Security", &self.security),
			("License", &self.license),
		];

		let mut titles: Vec<&str> = named
			.into_iter()
			.filter(|(_, section)| is_non_empty(section))
			.map(|(title, _)| title)
			.collect();

		if is_non_empty(&self.custom_sections) {
			if let Some(sections) = &config.custom_sections {
				titles.extend(sections.keys().map(String::as_str));
			}
		}

		titles
	}
}

/// Whether a banner already provides the document's H1.
fn banner_has_h1(banner: &str) -> bool {
	is_non_empty(banner) && banner.to_lowercase().contains("<h1")
}

fn is_non_empty(value: &str) -> bool {
	!value.trim().is_empty()
}

fn non_empty(value: Option<&str>) -> Option<&str> {
	value.filter(|value| is_non_empty(value))
}

/// Collapse every run of more than one blank line down to a single blank
/// line.
pub fn collapse_blank_lines(content: &str) -> String {
	BLANK_LINE_RUN.replace_all(content, "\n\n").into_owned()
}

/// Render free text under `heading`, unless the text already opens with its
/// own level-two heading.
fn render_heading_block(heading: &str, content: Option<&str>) -> String {
	let Some(content) = non_empty(content) else {
		return String::new();
	};

	if content.trim_start().starts_with("## ") {
		content.to_string()
	} else {
		format!("{heading}\n\n{content}")
	}
}

fn render_list_section<T>(
	heading: &str,
	items: Option<&[T]>,
	format_item: impl Fn(&T) -> String,
) -> String {
	match items {
		Some(items) if !items.is_empty() => {
			let body = items.iter().map(format_item).collect::<Vec<_>>().join("\n");
			format!("{heading}\n\n{body}")
		}
		_ => String::new(),
	}
}

fn render_bullet_section(heading: &str, items: Option<&[String]>) -> String {
	render_list_section(heading, items, |item| format!("{BULLET_PREFIX}{item}"))
		.trim()
		.to_string()
}

fn render_link_section(link: Option<&str>, render: impl Fn(&str) -> String) -> String {
	match link {
		Some(link) if !link.is_empty() => render(link),
		_ => String::new(),
	}
}

fn render_badges(badges: Option<&[Badge]>) -> String {
	badges
		.unwrap_or_default()
		.iter()
		.map(|badge| {
			let image = format!("![{}]({})", badge.label, badge.image);
			match non_empty(badge.link.as_deref()) {
				Some(link) => format!("[{image}]({link})"),
				None => image,
			}
		})
		.collect::<Vec<_>>()
		.join("\n")
}

fn render_license(license: Option<&License>) -> String {
	match license {
		Some(License::Text(text)) => render_heading_block("## License", Some(text.as_str())),
		Some(License::Link { name, url }) => format!("## License\n\n[{name}]({url})"),
		None => String::new(),
	}
}

fn render_custom_sections(config: &MergedConfig) -> String {
	config
		.custom_sections
		.iter()
		.flatten()
		.map(|(heading, content)| format!("## {heading}\n\n{content}"))
		.collect::<Vec<_>>()
		.join("\n\n")
}

fn render_usage_section(usage: Option<&[String]>) -> String {
	let body = render_numbered_with_code_blocks(usage.unwrap_or_default());
	if body.is_empty() {
		String::new()
	} else {
		format!("## Usage\n\n{body}")
	}
}

/// Render usage steps as a numbered list.
///
/// Blank entries are skipped. Entries opening a fenced code block are kept
/// verbatim between blank lines and do not take a step number. A leading
/// `- ` bullet on a step is dropped before numbering.
pub fn render_numbered_with_code_blocks(items: &[String]) -> String {
	let mut lines: Vec<String> = Vec::new();
	let mut step = 1;

	for item in items.iter().map(|item| item.trim()) {
		if item.is_empty() {
			continue;
		}

		if item.starts_with(CODE_FENCE) {
			if lines.last().is_some_and(|line| !line.is_empty()) {
				lines.push(String::new());
			}
			lines.push(item.to_string());
			lines.push(String::new());
			continue;
		}

		let text = item.strip_prefix(BULLET_PREFIX).unwrap_or(item);
		lines.push(format!("{step}. {text}"));
		step += 1;
	}

	collapse_blank_lines(&lines.join("\n")).trim().to_string()
}

/// Render the table of contents, or nothing when it is disabled or there is
/// nothing to list.
fn render_table_of_contents(include: Option<bool>, titles: &[&str]) -> String {
	if include == Some(false) || titles.is_empty() {
		return String::new();
	}

	let mut slugs = SlugRegistry::default();
	let links = titles
		.iter()
		.map(|title| format!("- [{title}](#{})", slugs.unique_slug(title)))
		.collect::<Vec<_>>()
		.join("\n");

	format!("## Table of Contents\n\n{links}")
}

/// Anchor slug for a heading: lowercase, keep only `a-z`, `0-9`, spaces and
/// hyphens, then join whitespace runs with a single hyphen.
pub fn slugify_heading(title: &str) -> String {
	let kept: String = title
		.to_lowercase()
		.chars()
		.filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == ' ' || *c == '-')
		.collect();

	kept.split_whitespace().collect::<Vec<_>>().join("-")
}

/// Hands out unique anchors within a single document. The first repeat of a
/// slug gets `-1`, the next `-2`, and so on.
#[derive(Debug, Default)]
pub struct SlugRegistry {
	seen: HashMap<String, usize>,
}

impl SlugRegistry {
	pub fn unique_slug(&mut self, title: &str) -> String {
		let slug = slugify_heading(title);
		let count = self.seen.entry(slug.clone()).or_insert(0);
		let unique = if *count == 0 {
			slug
		} else {
			format!("{slug}-{count}")
		};
		*count += 1;
		unique
	}
}

use std::path::Path;
use std::path::PathBuf;

use crate::CONFIG_VERSION;
use crate::ConfigFields;
use crate::Field;
use crate::ProjectConfig;
use crate::ReadieError;
use crate::ReadieResult;
use crate::absolute_path;
use crate::generate::write_atomic;

/// Schema URL written into starter configs.
pub const DEFAULT_SCHEMA_URL: &str = "https://unpkg.com/readie/schemas/readie.schema.json";

/// The config written by `readie init`.
pub fn starter_config() -> ProjectConfig {
	ProjectConfig {
		title: "My Project".to_string(),
		description: "A short description of what this project does.".to_string(),
		fields: ConfigFields {
			schema: DEFAULT_SCHEMA_URL.to_string().into(),
			version: CONFIG_VERSION.to_string().into(),
			include_table_of_contents: Field::Value(true),
			features: Field::Value(vec![
				"Fast setup".to_string(),
				"Clear docs".to_string(),
				"Simple CLI usage".to_string(),
			]),
			installation: Field::Value(vec!["```bash\nnpm install my-project\n```".to_string()]),
			usage: Field::Value(vec![
				"Explain basic usage in a few steps.".to_string(),
				"```bash\nnpm run start\n```".to_string(),
			]),
			docs_link: "https://example.com/docs".to_string().into(),
			..ConfigFields::default()
		},
	}
}

/// The starter config as pretty printed JSON with a trailing newline.
pub fn starter_config_text() -> ReadieResult<String> {
	let mut text = serde_json::to_string_pretty(&starter_config()).map_err(std::io::Error::from)?;
	text.push('\n');
	Ok(text)
}

/// Write the starter config to `path`, refusing to replace an existing file
/// unless `force` is set. Returns the absolute path written.
pub fn write_starter_config(path: &Path, force: bool) -> ReadieResult<PathBuf> {
	let path = absolute_path(path)?;
	if path.exists() && !force {
		return Err(ReadieError::ConfigExists { path });
	}

	write_atomic(&path, &starter_config_text()?)?;
	Ok(path)
}

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum ReadieError {
	#[error(transparent)]
	#[diagnostic(code(readie::io_error))]
	Io(#[from] std::io::Error),

	#[error("failed to read `{}`", path.display())]
	#[diagnostic(code(readie::read))]
	Read {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("failed to parse JSON in {}: {reason}", path.display())]
	#[diagnostic(code(readie::parse), help("check the file for trailing commas or unquoted keys"))]
	Parse { path: PathBuf, reason: String },

	#[error("configuration validation failed for {}\n{reason}", path.display())]
	#[diagnostic(
		code(readie::validation),
		help("a project config requires non-empty `title` and `description` strings")
	)]
	Validation { path: PathBuf, reason: String },

	#[error("global configuration validation failed for {}\n{reason}", path.display())]
	#[diagnostic(
		code(readie::global_validation),
		help("every key in readie.global.json is optional but must match the project config shape")
	)]
	GlobalValidation { path: PathBuf, reason: String },

	#[error("workspace root not found at {}", path.display())]
	#[diagnostic(
		code(readie::missing_workspace_root),
		help("pass an existing directory with `--root`")
	)]
	MissingWorkspaceRoot { path: PathBuf },

	#[error("failed to write `{}`", path.display())]
	#[diagnostic(code(readie::write))]
	Write {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("config already exists at {}", path.display())]
	#[diagnostic(code(readie::config_exists), help("use `--force` to overwrite"))]
	ConfigExists { path: PathBuf },
}

pub type ReadieResult<T> = Result<T, ReadieError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;

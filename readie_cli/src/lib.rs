use std::path::PathBuf;

use clap::Args;
use clap::Parser;
use clap::Subcommand;
use readie_core::PROJECT_CONFIG_NAME;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Generate consistent README files from readie.json.",
	long_about = "readie generates README files from a declarative readie.json config, layered \
	              over the nearest readie.global.json.\n\nRunning `readie` without a subcommand \
	              is the same as `readie generate`.\n\nQuick start:\n  readie init                 \
	              Create a starter readie.json\n  readie                      Generate README.md \
	              from ./readie.json\n  readie generate:workspace   Generate every README under \
	              ./packages"
)]
pub struct ReadieCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	#[command(flatten)]
	pub generate: GenerateArgs,

	/// Enable verbose output.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Generate one README from a config file.
	///
	/// Loads the config, merges the nearest `readie.global.json` and writes
	/// the README only when its content changed.
	Generate(GenerateArgs),
	/// Generate READMEs for every project inside a workspace root.
	///
	/// Each immediate subdirectory of the root that contains the config file
	/// is a project. A failing project is reported and the rest are still
	/// processed.
	#[command(name = "generate:workspace")]
	GenerateWorkspace(WorkspaceArgs),
	/// Create a starter readie.json.
	Init {
		/// Path for the generated starter config.
		#[arg(long, short, default_value = PROJECT_CONFIG_NAME)]
		config: PathBuf,

		/// Overwrite the config file if it already exists.
		#[arg(long, short, default_value_t = false)]
		force: bool,
	},
}

#[derive(Args, Clone, Debug)]
pub struct GenerateArgs {
	/// Path to the readie config file.
	#[arg(long, short, default_value = PROJECT_CONFIG_NAME)]
	pub config: PathBuf,

	/// Output path for the README. Overrides the config's `output`.
	#[arg(long, short)]
	pub output: Option<PathBuf>,

	/// Show changes without writing files.
	#[arg(long, default_value_t = false)]
	pub dry_run: bool,

	/// Disable readie.global.json discovery and merge.
	#[arg(long, default_value_t = false)]
	pub no_global: bool,

	/// Print a line diff of the current and generated README. Only applies
	/// together with `--dry-run`.
	#[arg(long, default_value_t = false)]
	pub diff: bool,
}

#[derive(Args, Clone, Debug)]
pub struct WorkspaceArgs {
	/// Workspace root directory.
	#[arg(long, short, default_value = "packages")]
	pub root: PathBuf,

	/// Config file name to look for in each project.
	#[arg(long, default_value = PROJECT_CONFIG_NAME)]
	pub config_name: String,

	/// Project name filter. Repeatable, and comma separated lists are
	/// accepted.
	#[arg(long = "package", short)]
	pub packages: Vec<String>,

	/// Show changes without writing files.
	#[arg(long, default_value_t = false)]
	pub dry_run: bool,

	/// Exit with code 1 if any project fails.
	#[arg(long, default_value_t = false)]
	pub strict: bool,

	/// Disable readie.global.json discovery and merge.
	#[arg(long, default_value_t = false)]
	pub no_global: bool,
}

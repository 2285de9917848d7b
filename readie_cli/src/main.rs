use std::path::Path;
use std::process;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

use clap::Parser;
use owo_colors::OwoColorize;
use readie_cli::Commands;
use readie_cli::GenerateArgs;
use readie_cli::ReadieCli;
use readie_cli::WorkspaceArgs;
use readie_core::GenerateOptions;
use readie_core::GenerateOutcome;
use readie_core::ReadieError;
use readie_core::WorkspaceOptions;
use readie_core::WorkspaceReporter;
use readie_core::WorkspaceSummary;
use readie_core::generate_readme;
use readie_core::generate_workspace;
use readie_core::parse_package_list;
use readie_core::write_starter_config;
use similar::ChangeTag;
use similar::TextDiff;
use tracing_subscriber::EnvFilter;

/// Environment variable holding a `tracing` filter directive.
const LOG_ENV: &str = "READIE_LOG";

static USE_COLOR: AtomicBool = AtomicBool::new(true);

fn color_enabled() -> bool {
	USE_COLOR.load(Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,green) => {
		if color_enabled() {
			format!("{}", $text.green())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,yellow) => {
		if color_enabled() {
			format!("{}", $text.yellow())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,bold) => {
		if color_enabled() {
			format!("{}", $text.bold())
		} else {
			format!("{}", $text)
		}
	};
}

fn main() {
	let args = ReadieCli::parse();

	// Color needs a capable terminal and no opt-out.
	let use_color = !args.no_color
		&& std::env::var_os("NO_COLOR").is_none()
		&& supports_color::on(supports_color::Stream::Stdout).is_some();
	if !use_color {
		USE_COLOR.store(false, Ordering::Relaxed);
	}

	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	init_tracing(args.verbose);

	let result = match &args.command {
		Some(Commands::Generate(generate)) => run_generate(generate),
		Some(Commands::GenerateWorkspace(workspace)) => run_workspace(workspace),
		Some(Commands::Init { config, force }) => run_init(config, *force),
		None => run_generate(&args.generate),
	};

	if let Err(e) = result {
		match e.downcast::<ReadieError>() {
			Ok(readie_err) => {
				let report: miette::Report = (*readie_err).into();
				eprintln!("{report:?}");
			}
			Err(e) => {
				eprintln!("{} {e}", colored!("error:", red));
			}
		}
		process::exit(1);
	}
}

/// Log to stderr. `READIE_LOG` takes precedence over `--verbose`.
fn init_tracing(verbose: bool) {
	let default_directive = if verbose { "debug" } else { "warn" };
	let filter =
		EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_directive));

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_ansi(color_enabled())
		.without_time()
		.try_init()
		.ok();
}

fn run_generate(args: &GenerateArgs) -> Result<(), Box<dyn std::error::Error>> {
	let mut options = GenerateOptions::new(&args.config)
		.dry_run(args.dry_run)
		.use_global_config(!args.no_global);
	if let Some(output) = &args.output {
		options = options.output_path(output);
	}

	tracing::debug!(config = %args.config.display(), "generating readme");
	let outcome = generate_readme(&options)?;
	println!(
		"{}: {}",
		generate_status(&outcome, args.dry_run),
		outcome.output_path.display()
	);

	if args.diff && args.dry_run && outcome.updated {
		print_diff(outcome.previous.as_deref().unwrap_or_default(), &outcome.content);
	}

	Ok(())
}

fn generate_status(outcome: &GenerateOutcome, dry_run: bool) -> String {
	match (outcome.updated, dry_run) {
		(false, _) => "No changes".to_string(),
		(true, true) => colored!("Would update", yellow),
		(true, false) => colored!("Generated", green),
	}
}

fn run_workspace(args: &WorkspaceArgs) -> Result<(), Box<dyn std::error::Error>> {
	let mut options = WorkspaceOptions::new(&args.root);
	options.config_name.clone_from(&args.config_name);
	options.package_filter = parse_package_list(&args.packages);
	options.dry_run = args.dry_run;
	options.use_global_config = !args.no_global;
	tracing::debug!(
		root = %args.root.display(),
		filter = ?options.package_filter,
		"generating workspace"
	);

	let summary = generate_workspace(&options, &mut ConsoleReporter)?;
	print_summary(&summary);

	if args.strict && summary.has_failures() {
		process::exit(1);
	}

	Ok(())
}

fn run_init(config: &Path, force: bool) -> Result<(), Box<dyn std::error::Error>> {
	let path = write_starter_config(config, force)?;
	println!("Created starter config: {}", path.display());

	Ok(())
}

/// Prints one line per workspace project as it is processed.
struct ConsoleReporter;

impl WorkspaceReporter for ConsoleReporter {
	fn on_project_updated(&mut self, name: &str, _outcome: &GenerateOutcome, dry_run: bool) {
		let status = if dry_run {
			colored!("Would update", yellow)
		} else {
			colored!("Generated", green)
		};
		println!("{status} README for {name}");
	}

	fn on_project_unchanged(&mut self, name: &str, _outcome: &GenerateOutcome) {
		println!("No changes for {name}");
	}

	fn on_project_failed(&mut self, name: &str, error: &ReadieError) {
		eprintln!(
			"{} {}",
			colored!(format!("Error generating README for {name}:"), red),
			error_chain(error)
		);
	}
}

/// The error message followed by each underlying cause.
fn error_chain(error: &ReadieError) -> String {
	let mut message = error.to_string();
	let mut source = std::error::Error::source(error);
	while let Some(cause) = source {
		message.push_str(": ");
		message.push_str(&cause.to_string());
		source = std::error::Error::source(cause);
	}

	message
}

fn print_summary(summary: &WorkspaceSummary) {
	println!();
	println!("{}", colored!("Summary", bold));
	println!("- Updated: {}", summary.updated.len());
	println!("- Unchanged: {}", summary.unchanged.len());
	println!("- Failed: {}", summary.failed.len());
	if !summary.skipped_by_filter.is_empty() {
		println!("- Skipped by filter: {}", summary.skipped_by_filter.len());
	}
}

fn print_diff(current: &str, expected: &str) {
	let diff = TextDiff::from_lines(current, expected);
	for change in diff.iter_all_changes() {
		match change.tag() {
			ChangeTag::Delete => {
				print!("{}", colored!(format!("-{change}"), red));
			}
			ChangeTag::Insert => {
				print!("{}", colored!(format!("+{change}"), green));
			}
			ChangeTag::Equal => {
				print!(" {change}");
			}
		}
	}
}

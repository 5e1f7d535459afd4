use std::path::Path;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use confgen_cli::Commands;
use confgen_cli::ConfgenCli;
use confgen_cli::OutputFormat;
use confgen_cli::parse_set_arg;
use confgen_core::ConfgenError;
use confgen_core::ConfgenResult;
use confgen_core::ConfigEnvironment;
use confgen_core::FileAvoidWrite;
use confgen_core::STATUS_FILE_NAME;
use confgen_core::create_config_file;
use confgen_core::create_config_header;
use confgen_core::create_makefile;
use owo_colors::OwoColorize;
use similar::ChangeTag;
use similar::TextDiff;
use tracing_subscriber::EnvFilter;

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

fn color_enabled() -> bool {
	USE_COLOR.load(std::sync::atomic::Ordering::Relaxed)
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
	($text:expr,bold) => {
		if color_enabled() {
			format!("{}", $text.bold())
		} else {
			format!("{}", $text)
		}
	};
}

fn main() {
	let args = ConfgenCli::parse();

	// Respect NO_COLOR env var and --no-color flag.
	let use_color = !args.no_color && std::env::var_os("NO_COLOR").is_none();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	// Install miette's fancy handler for rich error diagnostics.
	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::from_default_env())
		.with_writer(std::io::stderr)
		.try_init()
		.ok();

	let result = match args.command {
		Some(Commands::ConfigFile {
			ref outputs,
			ref set,
			dry_run,
		}) => run_config_files(&args, outputs, set, dry_run),
		Some(Commands::Makefile {
			ref outputs,
			stub,
			ref set,
			dry_run,
		}) => run_makefiles(&args, outputs, stub, set, dry_run),
		Some(Commands::Header {
			ref outputs,
			dry_run,
		}) => run_headers(&args, outputs, dry_run),
		Some(Commands::Vars { format }) => run_vars(&args, format),
		None => {
			eprintln!("No subcommand specified. Run `confgen --help` for usage.");
			process::exit(1);
		}
	};

	if let Err(e) = result {
		// Try to render through miette for rich diagnostics with help text
		// and error codes.
		match e.downcast::<ConfgenError>() {
			Ok(err) => {
				let report: miette::Report = (*err).into();
				eprintln!("{report:?}");
			}
			Err(e) => {
				eprintln!("{} {e}", colored!("error:", red));
			}
		}
		process::exit(2);
	}
}

fn status_path(args: &ConfgenCli) -> PathBuf {
	args.status
		.clone()
		.unwrap_or_else(|| PathBuf::from(STATUS_FILE_NAME))
}

fn load_environment(args: &ConfgenCli) -> Result<ConfigEnvironment, Box<dyn std::error::Error>> {
	let path = status_path(args);
	let env = ConfigEnvironment::from_status_file(&path)?;
	if args.verbose {
		println!(
			"Loaded {} define(s) and {} subst(s) from {}",
			env.defines().len(),
			env.substs().len(),
			path.display()
		);
	}
	Ok(env)
}

fn parse_extras(set: &[String]) -> Result<Vec<(String, String)>, Box<dyn std::error::Error>> {
	set.iter()
		.map(|arg| parse_set_arg(arg).map_err(Into::into))
		.collect()
}

/// How one output ended up after a generation call.
enum Generated {
	Written(confgen_core::FileState),
	DryRun { changed: bool },
}

/// Render one output through `render`, then either flush it through the
/// write-if-changed sink or, in dry-run mode, diff it against the current
/// destination content.
fn generate_one(
	env: &ConfigEnvironment,
	output: &Path,
	dry_run: bool,
	render: impl Fn(&ConfigEnvironment, &mut FileAvoidWrite) -> ConfgenResult<()>,
) -> Result<Generated, Box<dyn std::error::Error>> {
	let mut sink = FileAvoidWrite::new(output);
	render(env, &mut sink)?;
	if dry_run {
		let current = std::fs::read_to_string(output).unwrap_or_default();
		let rendered = String::from_utf8_lossy(sink.buffer()).into_owned();
		let changed = current != rendered;
		if changed {
			println!("{}", colored!(format!("{}:", output.display()), bold));
			print_diff(&current, &rendered);
		}
		Ok(Generated::DryRun { changed })
	} else {
		Ok(Generated::Written(sink.finish()?))
	}
}

#[derive(Default)]
struct Report {
	created: usize,
	updated: usize,
	unchanged: usize,
	stale: usize,
}

impl Report {
	fn record(&mut self, args: &ConfgenCli, output: &Path, outcome: &Generated) {
		let label = match outcome {
			Generated::Written(state) if !state.existed => {
				self.created += 1;
				"created"
			}
			Generated::Written(state) if state.updated => {
				self.updated += 1;
				"updated"
			}
			Generated::Written(_) => {
				self.unchanged += 1;
				"unchanged"
			}
			Generated::DryRun { changed: true } => {
				self.stale += 1;
				"stale"
			}
			Generated::DryRun { changed: false } => {
				self.unchanged += 1;
				"unchanged"
			}
		};
		if args.verbose {
			println!("  {label:<9} {}", output.display());
		}
	}

	/// Print the summary line; in dry-run mode a stale output makes the
	/// process exit non-zero so CI can gate on it.
	fn summarize(&self, dry_run: bool) {
		if dry_run {
			if self.stale == 0 {
				println!("All outputs are up to date.");
			} else {
				println!("{} output(s) would change.", self.stale);
				process::exit(1);
			}
		} else {
			println!(
				"Generated {} file(s): {} created, {} updated, {} unchanged.",
				self.created + self.updated + self.unchanged,
				self.created,
				self.updated,
				self.unchanged
			);
		}
	}
}

fn run_config_files(
	args: &ConfgenCli,
	outputs: &[PathBuf],
	set: &[String],
	dry_run: bool,
) -> Result<(), Box<dyn std::error::Error>> {
	let env = load_environment(args)?;
	let extras = parse_extras(set)?;
	let mut report = Report::default();
	for output in outputs {
		let outcome = generate_one(&env, output, dry_run, |env, sink| {
			create_config_file(env, sink, &extras)
		})?;
		report.record(args, output, &outcome);
	}
	report.summarize(dry_run);
	Ok(())
}

fn run_makefiles(
	args: &ConfgenCli,
	outputs: &[PathBuf],
	stub: bool,
	set: &[String],
	dry_run: bool,
) -> Result<(), Box<dyn std::error::Error>> {
	let env = load_environment(args)?;
	let extras = parse_extras(set)?;
	let mut report = Report::default();
	for output in outputs {
		let outcome = generate_one(&env, output, dry_run, |env, sink| {
			create_makefile(env, sink, stub, &extras)
		})?;
		report.record(args, output, &outcome);
	}
	report.summarize(dry_run);
	Ok(())
}

fn run_headers(
	args: &ConfgenCli,
	outputs: &[PathBuf],
	dry_run: bool,
) -> Result<(), Box<dyn std::error::Error>> {
	let env = load_environment(args)?;
	let mut report = Report::default();
	for output in outputs {
		let outcome = generate_one(&env, output, dry_run, create_config_header)?;
		report.record(args, output, &outcome);
	}
	report.summarize(dry_run);
	Ok(())
}

const DERIVED_VARS: [&str; 4] = ["ACDEFINES", "ALLDEFINES", "ALLSUBSTS", "ALLEMPTYSUBSTS"];

fn run_vars(args: &ConfgenCli, format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
	let env = load_environment(args)?;
	let derived = |name: &str| {
		env.substs()
			.get(name)
			.map(|value| value.render().into_owned())
			.unwrap_or_default()
	};

	match format {
		OutputFormat::Json => {
			let mut map = serde_json::Map::new();
			for name in DERIVED_VARS {
				map.insert(name.to_string(), serde_json::Value::String(derived(name)));
			}
			println!("{}", serde_json::Value::Object(map));
		}
		OutputFormat::Text => {
			for name in DERIVED_VARS {
				let value = derived(name);
				println!("{}", colored!(format!("{name}:"), bold));
				if value.is_empty() {
					println!("  (empty)");
				} else {
					for line in value.lines() {
						println!("  {line}");
					}
				}
				println!();
			}
			if args.verbose {
				println!("{}", colored!("substs:", bold));
				for (name, value) in env.substs().iter() {
					if DERIVED_VARS.contains(&name) {
						continue;
					}
					println!("  {name} = {}", value.render());
				}
			}
		}
	}

	Ok(())
}

/// Print a unified diff between two strings, colorized.
fn print_diff(current: &str, expected: &str) {
	let diff = TextDiff::from_lines(current, expected);
	for change in diff.iter_all_changes() {
		match change.tag() {
			ChangeTag::Delete => {
				print!("  {}", colored!(format!("-{change}"), red));
			}
			ChangeTag::Insert => {
				print!("  {}", colored!(format!("+{change}"), green));
			}
			ChangeTag::Equal => {
				print!("   {change}");
			}
		}
	}
}

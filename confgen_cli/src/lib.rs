use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Materialize configure output into an object directory.",
	long_about = "confgen reads the status record written by a configure step and generates \
	              files under the object directory from their templates in the source \
	              tree.\n\nThree kinds of output are supported:\n  config-file  Substitute @VAR@ \
	              references in a template\n  makefile     Same, wrapped in the fixed makefile \
	              frame\n  header       Rewrite #define/#undef lines against the configured \
	              defines\n\nTemplates live at the matching path under the source tree with an \
	              `.in` suffix; files are only rewritten when their content actually changes."
)]
pub struct ConfgenCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Path to the configure status record.
	#[arg(long, short, global = true, value_name = "PATH")]
	pub status: Option<PathBuf>,

	/// Enable verbose output.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Generate config files from their `.in` templates.
	///
	/// Each output path must lie under the configured object directory; the
	/// template is looked up at the matching path under the source tree.
	/// `@VAR@` references are substituted from the configure substs plus the
	/// per-file path context (`srcdir`, `top_srcdir`, `relativesrcdir`,
	/// `DEPTH`); unresolved references pass through unchanged. Outputs whose
	/// basename is `Makefile` get the makefile frame automatically.
	ConfigFile {
		/// Output paths to generate.
		#[arg(required = true)]
		outputs: Vec<PathBuf>,

		/// Extra `NAME=VALUE` substitutions; they win over configured substs
		/// and the path context.
		#[arg(long = "set", value_name = "NAME=VALUE")]
		set: Vec<String>,

		/// Render in memory and print a diff instead of writing.
		#[arg(long, default_value_t = false)]
		dry_run: bool,
	},
	/// Generate makefiles wrapped in the fixed header and footer frame.
	///
	/// The frame pins `DEPTH`, `topsrcdir`, `srcdir`, `VPATH` and
	/// `relativesrcdir`, includes the top-level config makefile, then the
	/// template body, and closes with the recursive-build include.
	Makefile {
		/// Output paths to generate.
		#[arg(required = true)]
		outputs: Vec<PathBuf>,

		/// Emit only the frame, without including the template body.
		#[arg(long, default_value_t = false)]
		stub: bool,

		/// Extra `NAME=VALUE` substitutions; they win over configured substs
		/// and the path context.
		#[arg(long = "set", value_name = "NAME=VALUE")]
		set: Vec<String>,

		/// Render in memory and print a diff instead of writing.
		#[arg(long, default_value_t = false)]
		dry_run: bool,
	},
	/// Rewrite config headers from their `.h.in`-style templates.
	///
	/// `#undef NAME` becomes `#define NAME VALUE` for configured defines,
	/// existing `#define NAME OLD` values are replaced, and `#undef` lines
	/// for unknown names are commented out. Everything else — whitespace,
	/// trailing content, line terminators — is preserved byte for byte.
	Header {
		/// Output paths to generate.
		#[arg(required = true)]
		outputs: Vec<PathBuf>,

		/// Render in memory and print a diff instead of writing.
		#[arg(long, default_value_t = false)]
		dry_run: bool,
	},
	/// Print the derived aggregate variables.
	///
	/// Shows `ACDEFINES`, `ALLDEFINES`, `ALLSUBSTS` and `ALLEMPTYSUBSTS` as
	/// derived from the status record. With `--verbose`, the whole subst
	/// table is listed as well.
	Vars {
		/// Output format.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,
	},
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
	Text,
	Json,
}

/// Split a `NAME=VALUE` argument into its parts.
pub fn parse_set_arg(arg: &str) -> Result<(String, String), String> {
	match arg.split_once('=') {
		Some((name, value)) if !name.is_empty() => Ok((name.to_string(), value.to_string())),
		_ => Err(format!("expected NAME=VALUE, got `{arg}`")),
	}
}

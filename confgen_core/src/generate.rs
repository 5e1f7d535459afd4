//! Template dispatcher: materializes config files and makefiles from their
//! `.in` sources.

use std::ffi::OsStr;
use std::path::PathBuf;

use tracing::debug;

use crate::ConfgenError;
use crate::ConfgenResult;
use crate::environment::ConfigEnvironment;
use crate::output::FileAvoidWrite;
use crate::preprocessor::Preprocessor;

/// Destination basename that routes a config file through makefile framing.
pub const MAKEFILE_NAME: &str = "Makefile";

/// Generate a config file: substitute `@VAR@` references in the matching
/// `.in` template with the snapshot substs, the file's path context, and
/// any caller-supplied extras (extras win on conflict).
///
/// Destinations named [`MAKEFILE_NAME`] are handed to [`create_makefile`]
/// instead.
pub fn create_config_file(
	env: &ConfigEnvironment,
	output: &mut FileAvoidWrite,
	extra: &[(String, String)],
) -> ConfgenResult<()> {
	if output.path().file_name() == Some(OsStr::new(MAKEFILE_NAME)) {
		return create_makefile(env, output, false, extra);
	}
	let input = template_for(env, output)?;
	debug!(output = %output.path().display(), "creating config file");
	let mut pp = preprocessor(env, output, extra)?;
	pp.include_file(&input)?;
	Ok(())
}

/// Generate a makefile: the fixed frame, then — unless `stub` — the
/// template body, a guard blank line, and the recursive-build include.
pub fn create_makefile(
	env: &ConfigEnvironment,
	output: &mut FileAvoidWrite,
	stub: bool,
	extra: &[(String, String)],
) -> ConfgenResult<()> {
	let input = if stub {
		None
	} else {
		Some(template_for(env, output)?)
	};
	debug!(output = %output.path().display(), stub, "creating makefile");
	let mut pp = preprocessor(env, output, extra)?;
	pp.write_line("# THIS FILE WAS AUTOMATICALLY GENERATED. DO NOT MODIFY BY HAND.\n")?;
	pp.write_line("DEPTH := @DEPTH@\n")?;
	pp.write_line("topsrcdir := @top_srcdir@\n")?;
	pp.write_line("srcdir := @srcdir@\n")?;
	pp.write_line("VPATH := @srcdir@\n")?;
	pp.write_line("relativesrcdir := @relativesrcdir@\n")?;
	pp.write_line("include $(DEPTH)/config/autoconf.mk\n")?;
	if let Some(input) = input {
		pp.include_file(&input)?;
	}
	// A template body may end in a backslash continuation; the blank line
	// keeps the trailing include on its own line.
	pp.write_line("\n")?;
	pp.write_line("include $(topsrcdir)/config/recurse.mk\n")?;
	Ok(())
}

fn template_for(env: &ConfigEnvironment, output: &FileAvoidWrite) -> ConfgenResult<PathBuf> {
	let input = env.input_path(output.path());
	if !input.is_file() {
		return Err(ConfgenError::MissingTemplate {
			output: output.path().display().to_string(),
			template: input.display().to_string(),
		});
	}
	Ok(input)
}

/// Assemble the substitution context for one output file: snapshot substs,
/// then the derived path context, then extras. Best-effort mode is enabled
/// because templates routinely reference variables this configuration never
/// defines.
fn preprocessor<'a>(
	env: &ConfigEnvironment,
	output: &'a mut FileAvoidWrite,
	extra: &[(String, String)],
) -> ConfgenResult<Preprocessor<&'a mut FileAvoidWrite>> {
	let context = env.path_context(output.path())?;
	let mut pp = Preprocessor::new(output);
	pp.add_context(
		env.substs()
			.iter()
			.map(|(name, value)| (name.to_string(), value.render().into_owned())),
	);
	pp.add_context([
		("top_srcdir".to_string(), context.top_srcdir),
		("srcdir".to_string(), context.srcdir),
		("relativesrcdir".to_string(), context.relativesrcdir),
		("DEPTH".to_string(), context.depth),
	]);
	pp.add_context(extra.iter().cloned());
	pp.set_best_effort(true);
	Ok(pp)
}

//! Config-header rewrite engine.
//!
//! Rewrites the `#define`/`#undef` lines of a `.h.in` template against the
//! configured defines:
//!
//! - `#undef NAME` becomes `#define NAME VALUE` when `NAME` is configured;
//! - `#define NAME OLD` becomes `#define NAME VALUE`;
//! - `#define NAME` (presence only) is left alone;
//! - `#undef UNKNOWN` is commented out as `/* #undef UNKNOWN */`.
//!
//! All edits splice configured values over the captured directive spans, so
//! every byte outside a substituted span — indentation, interior spacing,
//! trailing content, line terminators — survives exactly. Unknown `#undef`
//! names are a reporting choice, never an error.

use std::borrow::Cow;
use std::io::Write;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::ConfgenResult;
use crate::environment::ConfigEnvironment;
use crate::environment::DefineMap;
use crate::output::FileAvoidWrite;

static DIRECTIVE: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"^\s*#\s*(?P<cmd>[a-z]+)(?:\s+(?P<name>\S+)(?:\s+(?P<value>\S+))?)?")
		.expect("directive pattern is valid")
});

/// Rewrite the header template for `output` into the sink, line by line.
pub fn create_config_header(
	env: &ConfigEnvironment,
	output: &mut FileAvoidWrite,
) -> ConfgenResult<()> {
	let input = env.input_path(output.path());
	let source = std::fs::read_to_string(&input)?;
	debug!(
		output = %output.path().display(),
		input = %input.display(),
		"creating config header"
	);
	for line in source.split_inclusive('\n') {
		output.write_all(rewrite_line(env.defines(), line).as_bytes())?;
	}
	Ok(())
}

/// Rewrite a single template line against the define map.
pub(crate) fn rewrite_line<'a>(defines: &DefineMap, line: &'a str) -> Cow<'a, str> {
	let Some(captures) = DIRECTIVE.captures(line) else {
		return Cow::Borrowed(line);
	};
	let Some(name) = captures.name("name") else {
		return Cow::Borrowed(line);
	};
	let Some(cmd) = captures.name("cmd") else {
		return Cow::Borrowed(line);
	};

	match defines.get(name.as_str()) {
		Some(value) => {
			match (cmd.as_str(), captures.name("value")) {
				("define", Some(original)) => {
					let mut rewritten = String::with_capacity(line.len() + value.len());
					rewritten.push_str(&line[..original.start()]);
					rewritten.push_str(value);
					rewritten.push_str(&line[original.end()..]);
					Cow::Owned(rewritten)
				}
				("undef", _) => {
					let mut rewritten = String::with_capacity(line.len() + value.len() + 8);
					rewritten.push_str(&line[..cmd.start()]);
					rewritten.push_str("define");
					rewritten.push_str(&line[cmd.end()..name.end()]);
					rewritten.push(' ');
					rewritten.push_str(value);
					rewritten.push_str(&line[name.end()..]);
					Cow::Owned(rewritten)
				}
				// A bare `#define NAME` is a presence-only define; any other
				// command (`#ifdef`, `#include`, ...) is not ours to touch.
				_ => Cow::Borrowed(line),
			}
		}
		None if cmd.as_str() == "undef" => {
			// Comment out the directive through the end of the name; any
			// remainder (trailing tokens, whitespace, the newline) stays
			// outside the comment.
			let mut rewritten = String::with_capacity(line.len() + 6);
			rewritten.push_str("/* ");
			rewritten.push_str(&line[..name.end()]);
			rewritten.push_str(" */");
			rewritten.push_str(&line[name.end()..]);
			Cow::Owned(rewritten)
		}
		None => Cow::Borrowed(line),
	}
}

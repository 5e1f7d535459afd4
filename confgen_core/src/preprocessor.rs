//! Minimal `@VAR@` substitution engine for config files and makefiles.
//!
//! This is deliberately not a full preprocessor: there is no conditional or
//! directive handling (markers are disabled in this mode), only raw line
//! emission, file inclusion, and variable substitution over captured spans.
//! Every byte outside a matched `@NAME@` span is written through unchanged.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::ConfgenError;
use crate::ConfgenResult;

static VARIABLE: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"@(\w+)@").expect("variable pattern is valid"));

/// Streams template lines into a sink, replacing `@NAME@` references with
/// context values.
pub struct Preprocessor<W: Write> {
	context: BTreeMap<String, String>,
	best_effort: bool,
	out: W,
}

impl<W: Write> Preprocessor<W> {
	pub fn new(out: W) -> Self {
		Self {
			context: BTreeMap::new(),
			best_effort: false,
			out,
		}
	}

	/// Add or replace context variables. Later additions win on conflict.
	pub fn add_context<I, K, V>(&mut self, vars: I)
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<String>,
	{
		for (name, value) in vars {
			self.context.insert(name.into(), value.into());
		}
	}

	/// In best-effort mode an unresolved `@NAME@` reference passes through
	/// unchanged instead of failing the whole file.
	pub fn set_best_effort(&mut self, best_effort: bool) {
		self.best_effort = best_effort;
	}

	/// Substitute and emit a single line. Callers own line terminators; the
	/// line is written exactly as given outside substituted spans.
	pub fn write_line(&mut self, line: &str) -> ConfgenResult<()> {
		let mut rendered = String::with_capacity(line.len());
		let mut cursor = 0;
		for reference in VARIABLE.find_iter(line) {
			let name = &line[reference.start() + 1..reference.end() - 1];
			rendered.push_str(&line[cursor..reference.start()]);
			match self.context.get(name) {
				Some(value) => rendered.push_str(value),
				None if self.best_effort => rendered.push_str(reference.as_str()),
				None => return Err(ConfgenError::UndefinedVariable(name.to_string())),
			}
			cursor = reference.end();
		}
		rendered.push_str(&line[cursor..]);
		self.out.write_all(rendered.as_bytes())?;
		Ok(())
	}

	/// Stream a template file through the substitution filter, preserving
	/// the original line terminators.
	pub fn include_file(&mut self, path: &Path) -> ConfgenResult<()> {
		let source = std::fs::read_to_string(path)?;
		for line in source.split_inclusive('\n') {
			self.write_line(line)?;
		}
		Ok(())
	}

	/// Consume the preprocessor and hand back the sink.
	pub fn into_inner(self) -> W {
		self.out
	}
}

//! The frozen configuration snapshot and its derived variables.
//!
//! A [`ConfigEnvironment`] is built once per build configuration from the
//! configure-produced defines and substs. Construction derives four
//! aggregate substs in a fixed order — `ACDEFINES`, then `ALLSUBSTS` and
//! `ALLEMPTYSUBSTS` (both from the substs as they exist right after
//! `ACDEFINES` lands), then `ALLDEFINES` — and freezes both maps. The
//! derivation order is an observable contract: each aggregate only sees the
//! substs that existed strictly before its own insertion, so none of them
//! ever references another aggregate or itself.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::collections::HashMap;
use std::collections::HashSet;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::ConfgenError;
use crate::ConfgenResult;
use crate::paths;
use crate::status::BuildConfig;

/// The value of a single substitution variable, tagged at load time as
/// either a scalar string or a list of strings.
///
/// A list is rendered by joining its elements with single spaces. Anything
/// that is neither shape fails deserialization in the status loader, so by
/// the time a value reaches rendering it is always one of the two.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(untagged)]
pub enum SubstValue {
	Scalar(String),
	List(Vec<String>),
}

impl SubstValue {
	/// Whether the value contributes a `NAME = VALUE` line to `ALLSUBSTS`:
	/// a non-empty string or a non-empty list. Falsy values land in
	/// `ALLEMPTYSUBSTS` instead.
	pub fn is_truthy(&self) -> bool {
		match self {
			Self::Scalar(value) => !value.is_empty(),
			Self::List(values) => !values.is_empty(),
		}
	}

	/// The single-string form used in generated files.
	pub fn render(&self) -> Cow<'_, str> {
		match self {
			Self::Scalar(value) => Cow::Borrowed(value),
			Self::List(values) => Cow::Owned(values.join(" ")),
		}
	}
}

impl From<&str> for SubstValue {
	fn from(value: &str) -> Self {
		Self::Scalar(value.to_string())
	}
}

impl From<String> for SubstValue {
	fn from(value: String) -> Self {
		Self::Scalar(value)
	}
}

impl From<Vec<String>> for SubstValue {
	fn from(values: Vec<String>) -> Self {
		Self::List(values)
	}
}

/// Insertion-ordered define map, read-only once the snapshot is built.
///
/// `ACDEFINES` preserves the order in which configure produced the defines,
/// so iteration walks the original entry list while lookups go through a
/// name index. A later duplicate of a name overwrites the value in place
/// without disturbing the original position.
#[derive(Clone, Debug, Default)]
pub struct DefineMap {
	entries: Vec<(String, String)>,
	index: HashMap<String, usize>,
}

impl DefineMap {
	pub(crate) fn from_pairs<I>(pairs: I) -> Self
	where
		I: IntoIterator<Item = (String, String)>,
	{
		let mut map = Self::default();
		for (name, value) in pairs {
			match map.index.get(&name) {
				Some(&slot) => map.entries[slot].1 = value,
				None => {
					map.index.insert(name.clone(), map.entries.len());
					map.entries.push((name, value));
				}
			}
		}
		map
	}

	pub fn get(&self, name: &str) -> Option<&str> {
		self.index
			.get(name)
			.map(|&slot| self.entries[slot].1.as_str())
	}

	pub fn contains(&self, name: &str) -> bool {
		self.index.contains_key(name)
	}

	/// Iterate entries in insertion order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.entries
			.iter()
			.map(|(name, value)| (name.as_str(), value.as_str()))
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

/// Read-only substitution map exposed by the snapshot.
#[derive(Clone, Debug, Default)]
pub struct SubstMap {
	entries: BTreeMap<String, SubstValue>,
}

impl SubstMap {
	pub fn get(&self, name: &str) -> Option<&SubstValue> {
		self.entries.get(name)
	}

	pub fn contains(&self, name: &str) -> bool {
		self.entries.contains_key(name)
	}

	/// Iterate entries in name order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &SubstValue)> {
		self.entries
			.iter()
			.map(|(name, value)| (name.as_str(), value))
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

/// Per-output-file substitution context derived from the file's location in
/// the object tree.
///
/// Recomputed for every generated file and never cached: two outputs at
/// different depths get different values.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PathContext {
	/// Relative path from the file's directory back to the object tree root.
	pub depth: String,
	/// Source directory of the file relative to the top source directory.
	pub relativesrcdir: String,
	/// Source directory corresponding to the file's object directory.
	pub srcdir: String,
	/// The top source directory, re-expressed relative to the file when the
	/// configured `top_srcdir` subst is itself relative.
	pub top_srcdir: String,
}

/// A configured but bare object directory: the frozen defines and substs of
/// one build configuration, plus the path arithmetic needed to generate
/// files anywhere under the object tree.
#[derive(Clone, Debug)]
pub struct ConfigEnvironment {
	topsrcdir: PathBuf,
	topobjdir: PathBuf,
	defines: DefineMap,
	substs: SubstMap,
}

impl ConfigEnvironment {
	/// Build the snapshot. `defines` order is preserved; names listed in
	/// `non_global_defines` stay visible to header rewriting but are left
	/// out of the aggregate `ACDEFINES`/`ALLDEFINES` variables.
	pub fn new(
		topsrcdir: impl Into<PathBuf>,
		topobjdir: impl Into<PathBuf>,
		defines: Vec<(String, String)>,
		non_global_defines: Vec<String>,
		substs: BTreeMap<String, SubstValue>,
	) -> Self {
		let defines = DefineMap::from_pairs(defines);
		let non_global: HashSet<String> = non_global_defines.into_iter().collect();
		let global_define_names: Vec<String> = defines
			.iter()
			.map(|(name, _)| name.to_string())
			.filter(|name| !non_global.contains(name))
			.collect();

		let mut substs = substs;

		let acdefines = global_define_names
			.iter()
			.map(|name| {
				let value = defines.get(name).unwrap_or_default();
				format!("-D{name}={}", quote_define_value(value))
			})
			.collect::<Vec<_>>()
			.join(" ");
		substs.insert("ACDEFINES".to_string(), SubstValue::Scalar(acdefines));

		// ALLSUBSTS and ALLEMPTYSUBSTS partition the substs exactly as they
		// exist at this point: ACDEFINES included, the aggregates themselves
		// excluded. Inserting either before partitioning would leak it into
		// the other.
		let mut full_lines: Vec<String> = Vec::new();
		let mut empty_lines: Vec<String> = Vec::new();
		for (name, value) in &substs {
			if value.is_truthy() {
				full_lines.push(format!("{name} = {}", value.render()));
			} else {
				empty_lines.push(format!("{name} ="));
			}
		}
		full_lines.sort();
		empty_lines.sort();
		substs.insert(
			"ALLSUBSTS".to_string(),
			SubstValue::Scalar(full_lines.join("\n")),
		);
		substs.insert(
			"ALLEMPTYSUBSTS".to_string(),
			SubstValue::Scalar(empty_lines.join("\n")),
		);

		let mut define_lines: Vec<String> = global_define_names
			.iter()
			.map(|name| format!("#define {name} {}", defines.get(name).unwrap_or_default()))
			.collect();
		define_lines.sort();
		substs.insert(
			"ALLDEFINES".to_string(),
			SubstValue::Scalar(define_lines.join("\n")),
		);

		Self {
			topsrcdir: topsrcdir.into(),
			topobjdir: topobjdir.into(),
			defines,
			substs: SubstMap { entries: substs },
		}
	}

	/// Load a status file and build the snapshot from it.
	pub fn from_status_file(path: &Path) -> ConfgenResult<Self> {
		let config = BuildConfig::from_status_file(path)?;
		Ok(Self::new(
			config.topsrcdir,
			config.topobjdir,
			config.defines,
			config.non_global_defines,
			config.substs,
		))
	}

	pub fn topsrcdir(&self) -> &Path {
		&self.topsrcdir
	}

	pub fn topobjdir(&self) -> &Path {
		&self.topobjdir
	}

	pub fn defines(&self) -> &DefineMap {
		&self.defines
	}

	pub fn substs(&self) -> &SubstMap {
		&self.substs
	}

	/// `DEPTH` for a file under the object tree: the relative path from the
	/// file's directory back to the object tree root, slash-normalized.
	pub fn depth(&self, file: &Path) -> String {
		let file = paths::to_forward_slashes(file);
		paths::relative_to(
			&paths::to_forward_slashes(&self.topobjdir),
			paths::dirname(&file),
		)
	}

	/// The file's source directory relative to the top source directory,
	/// `"."` for files directly under the root.
	pub fn relative_srcdir(&self, file: &Path) -> String {
		let relative = paths::relative_to(
			&paths::to_forward_slashes(file),
			&paths::to_forward_slashes(&self.topobjdir),
		);
		let dir = paths::dirname(&relative);
		if dir.is_empty() {
			".".to_string()
		} else {
			dir.to_string()
		}
	}

	/// The top source directory as seen from `file`. An absolute
	/// `top_srcdir` subst (under either slash convention) passes through
	/// unchanged; a relative one is interpreted relative to the object
	/// directory and re-expressed relative to the file.
	pub fn top_srcdir(&self, file: &Path) -> ConfgenResult<String> {
		let Some(value) = self.substs.get("top_srcdir") else {
			return Err(ConfgenError::MissingSubst("top_srcdir".to_string()));
		};
		let top_srcdir = value.render();
		if paths::is_absolute(&top_srcdir) {
			return Ok(top_srcdir.into_owned());
		}
		Ok(paths::normalize(&paths::join(
			&self.depth(file),
			&top_srcdir,
		)))
	}

	/// The source directory corresponding to the file's object directory.
	pub fn file_srcdir(&self, file: &Path) -> ConfgenResult<String> {
		let top_srcdir = self.top_srcdir(file)?;
		Ok(paths::normalize(&paths::join(
			&top_srcdir,
			&self.relative_srcdir(file),
		)))
	}

	/// Bundle all four path-derived variables for one output file.
	pub fn path_context(&self, file: &Path) -> ConfgenResult<PathContext> {
		Ok(PathContext {
			depth: self.depth(file),
			relativesrcdir: self.relative_srcdir(file),
			srcdir: self.file_srcdir(file)?,
			top_srcdir: self.top_srcdir(file)?,
		})
	}

	/// Template source for a given output path: the matching path under the
	/// source tree with an `.in` suffix.
	pub fn input_path(&self, output: &Path) -> PathBuf {
		let relative = paths::relative_to(
			&paths::to_forward_slashes(output),
			&paths::to_forward_slashes(&self.topobjdir),
		);
		self.topsrcdir.join(format!("{relative}.in"))
	}
}

/// Quote a define value for use on a shell command line, then double every
/// literal `$` so the token survives a later make-style recursive expansion.
fn quote_define_value(value: &str) -> String {
	snailquote::escape(value).replace('$', "$$")
}

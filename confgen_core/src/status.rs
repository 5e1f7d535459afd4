//! Loader for the structured status record produced by the configure step.
//!
//! The status file is plain TOML — defines as an ordered array of
//! `[name, value]` pairs, substs as a table of strings or string lists:
//!
//! ```toml
//! topsrcdir = "/path/to/src"
//! topobjdir = "/path/to/obj"
//! non_global_defines = ["HIDDEN"]
//! defines = [["HAVE_FOO", "1"], ["VERSION", "42"]]
//!
//! [substs]
//! top_srcdir = "/path/to/src"
//! LIBS = ["-lfoo", "-lbar"]
//! ```
//!
//! Parsing a declarative record replaces the upstream pattern of executing
//! configure output as code: no code execution, portable across hosts.

use std::collections::BTreeMap;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use tracing::debug;

use crate::ConfgenError;
use crate::ConfgenResult;
use crate::environment::SubstValue;

/// Conventional name of the configure-produced status record.
pub const STATUS_FILE_NAME: &str = "config.status.toml";

/// The raw output of configure, before any derivation happens.
#[derive(Debug, Deserialize)]
pub struct BuildConfig {
	/// Top source directory.
	pub topsrcdir: PathBuf,
	/// Top object (build output) directory.
	pub topobjdir: PathBuf,
	/// Ordered `(name, value)` define pairs. Order is significant: it fixes
	/// the token order of the derived `ACDEFINES` variable.
	#[serde(default)]
	pub defines: Vec<(String, String)>,
	/// Define names excluded from the aggregate `ACDEFINES`/`ALLDEFINES`
	/// variables while remaining visible to header rewriting.
	#[serde(default)]
	pub non_global_defines: Vec<String>,
	/// Substitution variables, scalar or list valued.
	#[serde(default)]
	pub substs: BTreeMap<String, SubstValue>,
}

impl BuildConfig {
	/// Read and parse a status file.
	pub fn from_status_file(path: &Path) -> ConfgenResult<Self> {
		let source = std::fs::read_to_string(path)?;
		let config: Self =
			toml::from_str(&source).map_err(|error| ConfgenError::StatusParse {
				path: path.display().to_string(),
				reason: error.to_string(),
			})?;
		debug!(
			path = %path.display(),
			defines = config.defines.len(),
			substs = config.substs.len(),
			"loaded build configuration"
		);
		Ok(config)
	}
}

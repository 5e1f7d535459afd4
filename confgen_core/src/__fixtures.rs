//! Shared test fixtures: representative configure snapshots for derivation
//! and path-context tests.

use std::collections::BTreeMap;
use std::path::Path;

use crate::ConfigEnvironment;
use crate::SubstValue;

/// Defines in deliberately non-alphabetical order so ordering bugs show up;
/// `HIDDEN` is the conventional non-global name.
pub fn sample_defines() -> Vec<(String, String)> {
	vec![
		("ZEBRA".to_string(), "1".to_string()),
		("APPLE".to_string(), "core".to_string()),
		("HIDDEN".to_string(), "1".to_string()),
	]
}

/// A small subst table covering scalars, lists, and both empty shapes.
pub fn sample_substs(top_srcdir: &str) -> BTreeMap<String, SubstValue> {
	BTreeMap::from([
		("top_srcdir".to_string(), SubstValue::from(top_srcdir)),
		("APP_NAME".to_string(), SubstValue::from("demo")),
		(
			"LIBS".to_string(),
			SubstValue::from(vec!["-lfoo".to_string(), "-lbar".to_string()]),
		),
		("EMPTY".to_string(), SubstValue::from("")),
		("EMPTY_LIST".to_string(), SubstValue::from(Vec::<String>::new())),
	])
}

/// An environment over real directories, with `top_srcdir` pointing at the
/// given source tree.
pub fn sample_env(topsrcdir: &Path, topobjdir: &Path) -> ConfigEnvironment {
	ConfigEnvironment::new(
		topsrcdir,
		topobjdir,
		sample_defines(),
		vec!["HIDDEN".to_string()],
		sample_substs(&topsrcdir.display().to_string()),
	)
}

/// An environment over fixed `/src` and `/obj` roots for pure path math.
pub fn abstract_env() -> ConfigEnvironment {
	ConfigEnvironment::new(
		"/src",
		"/obj",
		sample_defines(),
		vec!["HIDDEN".to_string()],
		sample_substs("/src"),
	)
}

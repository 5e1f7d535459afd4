//! Forward-slash path algebra.
//!
//! Every build-relative variable (`DEPTH`, `srcdir`, `relativesrcdir`) is
//! expressed with `/` separators regardless of host platform, so the
//! resolver works on plain strings with POSIX `normpath` semantics instead
//! of going through `std::path` components. Callers are expected to pass
//! paths that are rooted consistently (both absolute, or both relative to
//! the same base) when computing relative paths.

use std::path::Path;

/// Convert a platform path to its forward-slash string form.
pub fn to_forward_slashes(path: &Path) -> String {
	path.to_string_lossy().replace('\\', "/")
}

/// Everything before the final `/`, like POSIX `dirname`.
///
/// Returns `""` for a bare file name and `"/"` for entries directly under
/// the root.
pub fn dirname(path: &str) -> &str {
	match path.rfind('/') {
		Some(0) => "/",
		Some(index) => &path[..index],
		None => "",
	}
}

/// Whether a path is absolute under either forward-slash or backslash
/// conventions, including the Windows drive-letter form.
pub fn is_absolute(path: &str) -> bool {
	if path.starts_with('/') || path.starts_with('\\') {
		return true;
	}
	let bytes = path.as_bytes();
	bytes.len() >= 3
		&& bytes[0].is_ascii_alphabetic()
		&& bytes[1] == b':'
		&& (bytes[2] == b'/' || bytes[2] == b'\\')
}

/// Collapse `.`, `..` and repeated separators, POSIX `normpath` style.
///
/// Leading `..` components of a relative path are kept; `..` at the root of
/// an absolute path is dropped.
pub fn normalize(path: &str) -> String {
	if path.is_empty() {
		return ".".to_string();
	}
	let absolute = path.starts_with('/');
	let mut parts: Vec<&str> = Vec::new();
	for component in path.split('/') {
		match component {
			"" | "." => {}
			".." => {
				match parts.last() {
					Some(&"..") | None => {
						if !absolute {
							parts.push("..");
						}
					}
					Some(_) => {
						parts.pop();
					}
				}
			}
			component => parts.push(component),
		}
	}
	let joined = parts.join("/");
	if absolute {
		format!("/{joined}")
	} else if joined.is_empty() {
		".".to_string()
	} else {
		joined
	}
}

/// Join two forward-slash paths. An absolute `tail` replaces `base`
/// entirely, matching POSIX `join` semantics.
pub fn join(base: &str, tail: &str) -> String {
	if tail.starts_with('/') || base.is_empty() {
		return tail.to_string();
	}
	if base.ends_with('/') {
		format!("{base}{tail}")
	} else {
		format!("{base}/{tail}")
	}
}

/// Express `path` relative to `start`, walking up with `..` components as
/// needed. Returns `"."` when the two resolve to the same location.
pub fn relative_to(path: &str, start: &str) -> String {
	let path = normalize(path);
	let start = normalize(start);
	let path_parts: Vec<&str> = components(&path);
	let start_parts: Vec<&str> = components(&start);
	let common = path_parts
		.iter()
		.zip(start_parts.iter())
		.take_while(|(a, b)| a == b)
		.count();

	let mut parts: Vec<&str> = Vec::new();
	for _ in common..start_parts.len() {
		parts.push("..");
	}
	parts.extend(&path_parts[common..]);
	if parts.is_empty() {
		".".to_string()
	} else {
		parts.join("/")
	}
}

fn components(path: &str) -> Vec<&str> {
	path.split('/')
		.filter(|component| !component.is_empty() && *component != ".")
		.collect()
}

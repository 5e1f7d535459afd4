use std::path::Path;
use std::path::PathBuf;

use assert_cmd::Command;
use insta_cmd::get_cargo_bin;

pub fn confgen_cmd() -> Command {
	let mut cmd = Command::new(get_cargo_bin("confgen"));
	cmd.env("NO_COLOR", "1");
	cmd
}

/// Lay out a minimal source/object tree under `root` and write a status
/// record pointing at it. Returns the status file path.
pub fn write_status_file(root: &Path) -> PathBuf {
	let srcdir = root.join("src");
	let objdir = root.join("obj");
	std::fs::create_dir_all(srcdir.join("app")).unwrap();
	std::fs::create_dir_all(&objdir).unwrap();
	let status = root.join("config.status.toml");
	let src = srcdir.display().to_string();
	let obj = objdir.display().to_string();
	std::fs::write(
		&status,
		format!(
			r#"topsrcdir = "{src}"
topobjdir = "{obj}"
non_global_defines = ["HIDDEN"]
defines = [["HAVE_FOO", "1"], ["VERSION", "42"], ["HIDDEN", "1"]]

[substs]
top_srcdir = "{src}"
APP_NAME = "demo"
LIBS = ["-lfoo", "-lbar"]
EMPTY = ""
"#
		),
	)
	.unwrap();
	status
}

mod common;

use common::confgen_cmd;
use common::write_status_file;
use predicates::prelude::*;

#[test]
fn prints_derived_variables() {
	let dir = tempfile::tempdir().unwrap();
	let status = write_status_file(dir.path());

	confgen_cmd()
		.arg("--status")
		.arg(&status)
		.arg("vars")
		.assert()
		.success()
		.stdout(predicate::str::contains("ACDEFINES:"))
		.stdout(predicate::str::contains("-DHAVE_FOO=1 -DVERSION=42"))
		.stdout(predicate::str::contains("#define HAVE_FOO 1"))
		.stdout(predicate::str::contains("-DHIDDEN").not());
}

#[test]
fn vars_json_is_parseable() {
	let dir = tempfile::tempdir().unwrap();
	let status = write_status_file(dir.path());

	let output = confgen_cmd()
		.arg("--status")
		.arg(&status)
		.arg("vars")
		.arg("--format")
		.arg("json")
		.output()
		.unwrap();
	assert!(output.status.success());

	let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
	assert_eq!(json["ACDEFINES"], "-DHAVE_FOO=1 -DVERSION=42");
	assert!(
		json["ALLSUBSTS"]
			.as_str()
			.unwrap()
			.contains("APP_NAME = demo")
	);
	assert!(
		json["ALLEMPTYSUBSTS"]
			.as_str()
			.unwrap()
			.contains("EMPTY =")
	);
}

#[test]
fn missing_status_file_fails() {
	confgen_cmd()
		.arg("--status")
		.arg("/nonexistent/config.status.toml")
		.arg("vars")
		.assert()
		.failure()
		.code(2);
}

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum ConfgenError {
	#[error(transparent)]
	#[diagnostic(code(confgen::io_error))]
	Io(#[from] std::io::Error),

	#[error("failed to parse status file `{path}`: {reason}")]
	#[diagnostic(
		code(confgen::status_parse),
		help("the status file must be valid TOML; subst values must be strings or lists of strings")
	)]
	StatusParse { path: String, reason: String },

	#[error("no template for `{output}`: expected `{template}`")]
	#[diagnostic(
		code(confgen::missing_template),
		help("each generated file needs a `<name>.in` template at the matching path under the source tree")
	)]
	MissingTemplate { output: String, template: String },

	#[error("substitution references undefined variable `@{0}@`")]
	#[diagnostic(
		code(confgen::undefined_variable),
		help("define the variable in the configure substs or enable best-effort substitution")
	)]
	UndefinedVariable(String),

	#[error("required subst `{0}` is missing from the configuration")]
	#[diagnostic(
		code(confgen::missing_subst),
		help("the configure step must record a `top_srcdir` subst pointing at the source tree root")
	)]
	MissingSubst(String),
}

pub type ConfgenResult<T> = Result<T, ConfgenError>;

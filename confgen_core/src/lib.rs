//! `confgen_core` materializes a configure-produced build configuration into
//! generated files inside an object directory tree: templated config files,
//! makefiles wrapped in a fixed frame, and C-style headers whose
//! `#define`/`#undef` lines are rewritten to the configured values.
//!
//! ## Processing pipeline
//!
//! ```text
//! config.status.toml
//!   → BuildConfig (status loader, plain TOML — no code execution)
//!   → ConfigEnvironment (frozen snapshot + ACDEFINES / ALLDEFINES /
//!     ALLSUBSTS / ALLEMPTYSUBSTS derivation)
//!   → PathContext per output file (DEPTH, srcdir, top_srcdir,
//!     relativesrcdir)
//!   → create_config_file / create_makefile / create_config_header
//!   → FileAvoidWrite (flushes to disk only when the bytes changed)
//! ```
//!
//! ## Key types
//!
//! - [`ConfigEnvironment`] — the frozen defines/substs snapshot for one
//!   build configuration, safe to share across threads once built.
//! - [`SubstValue`] — a scalar or list substitution value, tagged at load
//!   time.
//! - [`PathContext`] — the per-output-file path variables, recomputed for
//!   every generated file.
//! - [`FileAvoidWrite`] — buffered destination sink that skips the write
//!   when content is unchanged.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! use confgen_core::ConfigEnvironment;
//! use confgen_core::FileAvoidWrite;
//! use confgen_core::create_config_header;
//!
//! # fn main() -> confgen_core::ConfgenResult<()> {
//! let env = ConfigEnvironment::from_status_file(Path::new("config.status.toml"))?;
//! let mut output = FileAvoidWrite::new(env.topobjdir().join("config.h"));
//! create_config_header(&env, &mut output)?;
//! let state = output.finish()?;
//! println!("updated: {}", state.updated);
//! # Ok(())
//! # }
//! ```

pub use environment::*;
pub use error::*;
pub use generate::*;
pub use header::*;
pub use output::*;
pub use preprocessor::*;
pub use status::*;

pub mod environment;
mod error;
mod generate;
mod header;
mod output;
pub mod paths;
mod preprocessor;
pub mod status;

#[cfg(test)]
mod __fixtures;

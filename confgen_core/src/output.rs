//! Write-if-changed output sink.
//!
//! Generated content is buffered in memory and only flushed to disk when it
//! differs from the existing destination bytes, so downstream incremental
//! builds keep their timestamps when nothing changed. Nothing touches the
//! filesystem until [`FileAvoidWrite::finish`], which also means a failed
//! generation leaves no partial output behind.

use std::fs;
use std::io;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use tracing::debug;

/// Outcome of finishing a [`FileAvoidWrite`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FileState {
	/// Whether the destination existed before the write.
	pub existed: bool,
	/// Whether the destination was actually (re)written.
	pub updated: bool,
}

/// An appendable output stream bound to a destination path, deferring the
/// filesystem write until [`finish`](FileAvoidWrite::finish).
#[derive(Debug)]
pub struct FileAvoidWrite {
	path: PathBuf,
	buffer: Vec<u8>,
}

impl FileAvoidWrite {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self {
			path: path.into(),
			buffer: Vec::new(),
		}
	}

	/// Destination path this sink is bound to.
	pub fn path(&self) -> &Path {
		&self.path
	}

	/// The content accumulated so far.
	pub fn buffer(&self) -> &[u8] {
		&self.buffer
	}

	/// Compare the buffer against the destination and write only on change,
	/// creating the parent directory first when missing.
	pub fn finish(self) -> io::Result<FileState> {
		let existing = match fs::read(&self.path) {
			Ok(bytes) => Some(bytes),
			Err(error) if error.kind() == io::ErrorKind::NotFound => None,
			Err(error) => return Err(error),
		};
		let existed = existing.is_some();
		if existing.as_deref() == Some(self.buffer.as_slice()) {
			debug!(path = %self.path.display(), "content unchanged, skipping write");
			return Ok(FileState {
				existed,
				updated: false,
			});
		}
		ensure_parent_dir(&self.path)?;
		fs::write(&self.path, &self.buffer)?;
		debug!(path = %self.path.display(), bytes = self.buffer.len(), "wrote file");
		Ok(FileState {
			existed,
			updated: true,
		})
	}
}

impl Write for FileAvoidWrite {
	fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
		self.buffer.extend_from_slice(buf);
		Ok(buf.len())
	}

	fn flush(&mut self) -> io::Result<()> {
		Ok(())
	}
}

/// Create the parent directory of `path` when it does not exist yet.
pub fn ensure_parent_dir(path: &Path) -> io::Result<()> {
	match path.parent() {
		Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent),
		_ => Ok(()),
	}
}

/* src/signal/target.rs */

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use super::{Result, SignalError};

/// The watched directory plus the one file name inside it that matters.
#[derive(Debug)]
pub(crate) struct CompiledTarget {
	dir: PathBuf,
	file_name: OsString,
}

impl CompiledTarget {
	pub(crate) fn new(file: &Path) -> Result<Self> {
		let file_name = file
			.file_name()
			.ok_or_else(|| SignalError::Config(format!("Not a file path: {:?}", file)))?
			.to_os_string();

		let dir = match file.parent() {
			Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
			_ => PathBuf::from("."),
		};

		Ok(Self { dir, file_name })
	}

	pub(crate) fn dir(&self) -> &Path {
		&self.dir
	}

	/// The registration is non-recursive, so the file name alone identifies
	/// the tracked file.
	pub(crate) fn matches(&self, path: &Path) -> bool {
		path.file_name() == Some(self.file_name.as_os_str())
	}
}

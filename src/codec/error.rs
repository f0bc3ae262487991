/* src/codec/error.rs */

use std::path::PathBuf;

/// Core error type for the codec module.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
	/// IO error while reading or writing the backing file.
	#[error("io error on {path:?}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},
}

/* src/error.rs */

use thiserror::Error;

use crate::codec::CodecError;
#[cfg(feature = "watch")]
use crate::signal::SignalError;

/// Errors that can occur in the settings store.
#[derive(Debug, Error)]
pub enum SettingsError {
	#[error("Codec error: {0}")]
	Codec(#[from] CodecError),

	#[cfg(feature = "watch")]
	#[error("Signal error: {0}")]
	Signal(#[from] SignalError),

	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	#[error("Watch task failed: {0}")]
	Task(#[from] tokio::task::JoinError),
}

/// Result type alias.
pub type Result<T> = std::result::Result<T, SettingsError>;

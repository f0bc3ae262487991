//!
//! Filesystem monitoring for a single backing file.
//!
//! Most platform watch APIs cannot register a single file, so the parent
//! directory is watched non-recursively and events are filtered by file name.
//! Raw `notify` events are debounced per path before being broadcast.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

mod target;
mod watcher;
mod worker;

pub use watcher::Watcher;

/// Custom error type for the signal module.
#[derive(thiserror::Error, Debug)]
pub enum SignalError {
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	#[error("Notify error: {0}")]
	Notify(#[from] notify::Error),

	#[error("Invalid configuration: {0}")]
	Config(String),

	#[error("no Tokio runtime is available to drive the watcher")]
	NoRuntime,
}

/// Result type alias.
pub type Result<T> = std::result::Result<T, SignalError>;

/// Receives errors raised by the platform watcher after start-up.
pub type ErrorHandler = Arc<dyn Fn(SignalError) + Send + Sync>;

/// Configuration for the watcher behavior.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Config {
	/// Time window to debounce events.
	pub debounce: Duration,

	/// Whether to coalesce continuous events of the same file into a single event.
	pub coalesce: bool,

	/// Specific event kinds to listen for. `None` forwards every kind.
	pub listen_events: Option<Vec<EventKind>>,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			debounce: Duration::from_millis(500),
			coalesce: true,
			// Removal is left out: a deleted file would otherwise reconcile
			// into an empty store.
			listen_events: Some(vec![EventKind::Create, EventKind::Modify]),
		}
	}
}

impl Config {
	/// Returns a copy with a different debounce window.
	pub fn with_debounce(mut self, debounce: Duration) -> Self {
		self.debounce = debounce;
		self
	}
}

/// The kind of filesystem event we care about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum EventKind {
	/// File was created (including atomic replace by rename).
	Create,
	/// File content was modified.
	Modify,
	/// File was removed.
	Remove,
}

/// A simplified, high-level filesystem event.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Event {
	/// The path(s) involved in the event.
	pub paths: Vec<PathBuf>,
	pub kind: EventKind,
}

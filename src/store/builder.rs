/* src/store/builder.rs */

use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use arc_swap::ArcSwap;
use tokio::sync::broadcast;

#[cfg(feature = "watch")]
use crate::signal::Config as WatcherConfig;
use crate::{SettingsError, codec};

use super::observer::Observers;
use super::{DEFAULT_EVENT_CAPACITY, ErrorCallback, Settings, Shared, State};

/// Header written above the entries when none is given.
pub const DEFAULT_HEADER: &str =
	"Edit only with great care: If you break it, you get to keep both parts!";

/// Builder for [`Settings`].
pub struct SettingsBuilder {
	path: PathBuf,
	header: Option<String>,
	#[cfg(feature = "watch")]
	watch_config: WatcherConfig,
	watching: bool,
	event_capacity: usize,
	on_error: Option<ErrorCallback>,
}

impl SettingsBuilder {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self {
			path: path.into(),
			header: None,
			#[cfg(feature = "watch")]
			watch_config: WatcherConfig::default(),
			watching: true,
			event_capacity: DEFAULT_EVENT_CAPACITY,
			on_error: None,
		}
	}

	/// Comment written at the top of the file. Lines not starting with `#`
	/// are prefixed with `# `.
	pub fn header(mut self, header: impl Into<String>) -> Self {
		self.header = Some(header.into());
		self
	}

	#[cfg(feature = "watch")]
	pub fn watch_config(mut self, config: WatcherConfig) -> Self {
		self.watch_config = config;
		self
	}

	/// Whether to watch the file for external edits. Defaults to true.
	pub fn watching(mut self, enabled: bool) -> Self {
		self.watching = enabled;
		self
	}

	/// Capacity of the broadcast channel behind [`Settings::subscribe`].
	pub fn event_capacity(mut self, capacity: usize) -> Self {
		self.event_capacity = capacity.max(1);
		self
	}

	pub fn on_error<F>(mut self, f: F) -> Self
	where
		F: Fn(SettingsError) + Send + Sync + 'static,
	{
		self.on_error = Some(Arc::new(f));
		self
	}

	/// Loads the file and starts watching it.
	///
	/// A missing file is an empty store; its parent directory is created so
	/// the file can be saved and watched. Any other read failure is returned.
	/// Failing to start the watcher is not: the error is logged and passed
	/// to `on_error`, and the store works without live reload.
	pub fn open(self) -> crate::Result<Settings> {
		if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
			fs::create_dir_all(parent)?;
		}

		let initial = codec::read_file(&self.path)?;
		tracing::debug!(
			path = %self.path.display(),
			entries = initial.len(),
			"loaded settings"
		);

		let shared = Arc::new(Shared {
			path: self.path,
			header: self.header.unwrap_or_else(|| DEFAULT_HEADER.to_string()),
			mapping: ArcSwap::from_pointee(initial),
			state: Mutex::new(State::default()),
			events: broadcast::channel(self.event_capacity).0,
			observers: Observers::default(),
			on_error: self.on_error,
		});

		#[allow(unused_mut)]
		let mut settings = Settings {
			shared,
			#[cfg(feature = "watch")]
			watch: None,
		};

		#[cfg(feature = "watch")]
		if self.watching {
			settings.start_watching(self.watch_config);
		}

		#[cfg(not(feature = "watch"))]
		if self.watching {
			tracing::debug!("built without the `watch` feature, external edits are not tracked");
		}

		Ok(settings)
	}
}

impl std::fmt::Debug for SettingsBuilder {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let mut s = f.debug_struct("SettingsBuilder");
		s.field("path", &self.path);
		s.field("header", &self.header);
		s.field("watching", &self.watching);
		s.field("event_capacity", &self.event_capacity);
		s.finish_non_exhaustive()
	}
}

//!
//! The settings store: an in-memory mapping bound to one backing file.
//!
//! Reads are wait-free snapshots of an [`ArcSwap`]. Every writer (typed
//! puts, save, reset, reconciliation) serializes through a single mutex that
//! guards the dirty flag and the self-write marker and is held while the new
//! mapping is swapped in. Notifications are delivered after that lock is
//! released, so observers may call back into the store.

mod builder;
mod event;
mod list;
mod merge;
mod observer;
mod persist;
mod read;
mod rect;
#[cfg(feature = "watch")]
mod watch;
mod write;

pub use builder::{DEFAULT_HEADER, SettingsBuilder};
#[cfg(feature = "stream")]
pub use event::EventStream;
pub use event::SettingsEvent;
pub use merge::{MergeResult, merge};
pub use observer::{ObserverFn, ObserverId};
pub use rect::{ParseRectError, Rect};

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use arc_swap::ArcSwap;
use tokio::sync::broadcast;

use crate::SettingsError;
use crate::codec::Mapping;

use observer::Observers;
#[cfg(feature = "watch")]
use watch::WatchState;

/// Default event channel capacity.
pub const DEFAULT_EVENT_CAPACITY: usize = 100;

/// Callback receiving errors raised off the caller's path (watcher start-up,
/// background reloads).
pub type ErrorCallback = Arc<dyn Fn(SettingsError) + Send + Sync>;

/// A typed key/value settings store persisted to a single file.
///
/// Open it with [`Settings::open`] or [`Settings::builder`]. Local edits are
/// kept in memory and marked dirty until [`save`](Settings::save) or
/// [`close`](Settings::close). While open, edits made to the file by other
/// processes are merged in; on conflict the file wins.
pub struct Settings {
	shared: Arc<Shared>,
	#[cfg(feature = "watch")]
	watch: Option<WatchState>,
}

/// Flags guarded by the store-wide lock.
#[derive(Debug, Default)]
pub(crate) struct State {
	/// Local edits not yet written.
	pub(crate) dirty: bool,
	/// Set by `save`, consumed by the next file event.
	pub(crate) just_saved: bool,
	/// Whether a watcher is running, so `save` knows to set `just_saved`.
	pub(crate) watching: bool,
}

pub(crate) struct Shared {
	pub(crate) path: PathBuf,
	pub(crate) header: String,
	pub(crate) mapping: ArcSwap<Mapping>,
	pub(crate) state: Mutex<State>,
	pub(crate) events: broadcast::Sender<SettingsEvent>,
	pub(crate) observers: Observers,
	pub(crate) on_error: Option<ErrorCallback>,
}

impl Shared {
	/// The guarded state is plain flags, so a poisoned lock is still usable.
	pub(crate) fn lock(&self) -> MutexGuard<'_, State> {
		self.state.lock().unwrap_or_else(PoisonError::into_inner)
	}

	/// Edits a copy of the mapping under the lock, swaps it in, marks the
	/// store dirty and publishes the keys returned by `edit`.
	pub(crate) fn mutate<F>(&self, edit: F)
	where
		F: FnOnce(&mut Mapping) -> Vec<String>,
	{
		let keys = {
			let mut state = self.lock();
			let mut next = Mapping::clone(&self.mapping.load());
			let keys = edit(&mut next);
			self.mapping.store(Arc::new(next));
			state.dirty = true;
			keys
		};

		self.publish(SettingsEvent::Changed { keys });
	}

	/// Must not be called while holding the state lock.
	pub(crate) fn publish(&self, event: SettingsEvent) {
		self.observers.notify(&event);
		let _ = self.events.send(event);
	}

	/// Reports an error that has no caller to return to.
	#[cfg_attr(not(feature = "watch"), allow(dead_code))]
	pub(crate) fn report(&self, error: SettingsError) {
		tracing::error!(path = %self.path.display(), "settings error: {}", error);
		if let Some(cb) = &self.on_error {
			cb(error);
		}
	}
}

impl Settings {
	/// Opens the store with default options. See [`SettingsBuilder::open`].
	pub fn open(path: impl Into<PathBuf>, header: Option<&str>) -> crate::Result<Self> {
		let mut builder = Self::builder(path);
		if let Some(header) = header {
			builder = builder.header(header);
		}
		builder.open()
	}

	pub fn builder(path: impl Into<PathBuf>) -> SettingsBuilder {
		SettingsBuilder::new(path)
	}

	/// The backing file.
	pub fn path(&self) -> &Path {
		&self.shared.path
	}

	/// True when local edits have not been written yet.
	pub fn is_dirty(&self) -> bool {
		self.shared.lock().dirty
	}

	/// Returns true if external changes to the file are being picked up.
	pub fn is_watching(&self) -> bool {
		#[cfg(feature = "watch")]
		{
			self.watch.is_some()
		}
		#[cfg(not(feature = "watch"))]
		{
			false
		}
	}

	/// Subscribes to store change events.
	///
	/// Events are dropped for receivers that fall more than the channel
	/// capacity behind.
	pub fn subscribe(&self) -> broadcast::Receiver<SettingsEvent> {
		self.shared.events.subscribe()
	}

	/// Subscribes to store change events as a `Stream`.
	#[cfg(feature = "stream")]
	pub fn stream(&self) -> EventStream {
		EventStream::new(self.subscribe())
	}

	/// Registers a callback invoked synchronously for every event, on the
	/// thread that caused it.
	pub fn observe<F>(&self, f: F) -> ObserverId
	where
		F: Fn(&SettingsEvent) + Send + Sync + 'static,
	{
		self.shared.observers.add(Arc::new(f))
	}

	/// Removes a callback. Returns false if it was not registered.
	pub fn unobserve(&self, id: ObserverId) -> bool {
		self.shared.observers.remove(id)
	}
}

impl std::fmt::Debug for Settings {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let mut s = f.debug_struct("Settings");
		s.field("path", &self.shared.path);
		s.field("entries", &self.shared.mapping.load().len());
		s.field("dirty", &self.is_dirty());
		s.field("watching", &self.is_watching());
		s.finish_non_exhaustive()
	}
}

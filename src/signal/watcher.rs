use std::path::Path;
use std::sync::Arc;

use notify::{RecommendedWatcher, RecursiveMode, Watcher as NotifyWatcher};
use tokio::runtime::Handle;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

use super::target::CompiledTarget;
use super::worker::Worker;
use super::{Config, ErrorHandler, Event, Result, SignalError};

/// Raw and user-facing channel capacity.
const CHANNEL_CAPACITY: usize = 100;

/// Watches one file and broadcasts debounced [`Event`]s for it.
pub struct Watcher {
	_internal_watcher: RecommendedWatcher,
	task_handle: JoinHandle<()>,
	event_tx: broadcast::Sender<Event>,
}

impl Watcher {
	/// Creates a new Watcher and starts monitoring immediately. Errors
	/// reported by the platform watcher afterwards are logged.
	///
	/// Must be called from within a Tokio runtime; the debounce worker is
	/// spawned onto it.
	#[must_use = "Watcher must be kept alive"]
	pub fn new(file: &Path, config: Config) -> Result<Self> {
		Self::spawn(file, config, None)
	}

	/// Like [`Watcher::new`], but errors raised after start-up are passed to
	/// `on_error` instead of only being logged.
	#[must_use = "Watcher must be kept alive"]
	pub fn with_error_handler<F>(file: &Path, config: Config, on_error: F) -> Result<Self>
	where
		F: Fn(SignalError) + Send + Sync + 'static,
	{
		let on_error: ErrorHandler = Arc::new(on_error);
		Self::spawn(file, config, Some(on_error))
	}

	fn spawn(file: &Path, config: Config, on_error: Option<ErrorHandler>) -> Result<Self> {
		let runtime = Handle::try_current().map_err(|_| SignalError::NoRuntime)?;
		let target = CompiledTarget::new(file)?;

		if !target.dir().exists() {
			return Err(SignalError::Config(format!(
				"Path does not exist: {:?}",
				target.dir()
			)));
		}

		let (raw_tx, raw_rx) = mpsc::channel(CHANNEL_CAPACITY);

		let mut internal_watcher =
			notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
				let _ = raw_tx.blocking_send(res);
			})?;

		internal_watcher.watch(target.dir(), RecursiveMode::NonRecursive)?;

		let (user_tx, _) = broadcast::channel(CHANNEL_CAPACITY);
		let worker = Worker::new(target, config, user_tx.clone(), on_error);
		let task_handle = runtime.spawn(worker.run(raw_rx));

		Ok(Self {
			_internal_watcher: internal_watcher,
			task_handle,
			event_tx: user_tx,
		})
	}

	pub fn subscribe(&self) -> broadcast::Receiver<Event> {
		self.event_tx.subscribe()
	}

	pub fn stop(&self) {
		self.task_handle.abort();
	}
}

impl Drop for Watcher {
	fn drop(&mut self) {
		self.task_handle.abort();
	}
}

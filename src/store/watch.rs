/* src/store/watch.rs */

use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::codec;
use crate::signal::{Config as WatcherConfig, SignalError, Watcher};

use super::{Settings, SettingsEvent, Shared, merge};

/// The watcher plus the task that reconciles its events into the store.
pub(crate) struct WatchState {
	watcher: Watcher,
	shutdown: oneshot::Sender<()>,
	task: JoinHandle<()>,
}

impl Settings {
	/// Starts the watcher. Failure leaves the store usable without it.
	pub(crate) fn start_watching(&mut self, config: WatcherConfig) {
		match spawn_watch(&self.shared, config) {
			Ok(state) => {
				self.shared.lock().watching = true;
				self.watch = Some(state);
				tracing::info!(path = %self.shared.path.display(), "Started watching settings");
			}
			Err(e) => {
				tracing::warn!(
					path = %self.shared.path.display(),
					"External edits will not be picked up: {}",
					e
				);
				if let Some(cb) = &self.shared.on_error {
					cb(e.into());
				}
			}
		}
	}

	/// Stops the watcher and waits until the reconcile task has finished, so
	/// no merge can touch the mapping after this returns.
	pub async fn stop_watching(&mut self) -> crate::Result<()> {
		let Some(state) = self.watch.take() else {
			return Ok(());
		};

		{
			let mut flags = self.shared.lock();
			flags.watching = false;
			flags.just_saved = false;
		}

		let _ = state.shutdown.send(());
		let joined = state.task.await;
		state.watcher.stop();

		tracing::info!(path = %self.shared.path.display(), "Stopped watching settings");
		joined.map_err(Into::into)
	}

	/// Aborts without waiting. Used when the store is dropped unclosed.
	pub(crate) fn abort_watching(&mut self) {
		if let Some(state) = self.watch.take() {
			state.task.abort();
			state.watcher.stop();
		}
	}
}

fn spawn_watch(shared: &Arc<Shared>, config: WatcherConfig) -> Result<WatchState, SignalError> {
	let sink = Arc::downgrade(shared);
	let watcher = Watcher::with_error_handler(&shared.path, config, move |e| {
		if let Some(shared) = sink.upgrade() {
			shared.report(e.into());
		}
	})?;
	let mut rx = watcher.subscribe();
	let (shutdown, mut shutdown_rx) = oneshot::channel::<()>();
	let shared = Arc::clone(shared);

	let task = tokio::spawn(async move {
		loop {
			tokio::select! {
				biased;
				_ = &mut shutdown_rx => break,
				received = rx.recv() => match received {
					// A lagged receiver still means the file changed.
					Ok(_) | Err(RecvError::Lagged(_)) => shared.on_file_changed(),
					Err(RecvError::Closed) => break,
				},
			}
		}
	});

	Ok(WatchState {
		watcher,
		shutdown,
		task,
	})
}

impl Shared {
	/// Handles one debounced change of the backing file.
	///
	/// The read happens under the state lock so a concurrent `save` cannot
	/// slip between reading the file and merging it.
	pub(crate) fn on_file_changed(&self) {
		let result = {
			let mut state = self.lock();
			if state.just_saved {
				state.just_saved = false;
				tracing::debug!(path = %self.path.display(), "Ignoring our own write");
				return;
			}

			let shadow = match codec::read_file(&self.path) {
				Ok(shadow) => shadow,
				Err(e) => {
					drop(state);
					self.report(e.into());
					return;
				}
			};

			let mut current = codec::Mapping::clone(&self.mapping.load());
			let result = merge(&mut current, &shadow);
			if result.is_modified() {
				self.mapping.store(Arc::new(current));
			}
			result
		};

		if result.is_modified() {
			tracing::info!(
				path = %self.path.display(),
				added = result.added.len(),
				updated = result.updated.len(),
				removed = result.removed.len(),
				"Merged external settings changes"
			);
			self.publish(SettingsEvent::Merged(result));
		}
	}
}

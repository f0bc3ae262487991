/* src/store/persist.rs */

use std::sync::Arc;

use crate::codec;

use super::{Settings, SettingsEvent};

impl Settings {
	/// Writes the mapping if it is dirty or the file does not exist yet.
	///
	/// Returns whether a write happened. On failure the store stays dirty so
	/// the save can be retried.
	pub fn save(&self) -> crate::Result<bool> {
		let shared = &self.shared;
		{
			let mut state = shared.lock();
			if !state.dirty && shared.path.exists() {
				return Ok(false);
			}

			// The write below fires a file event; the watcher must skip it.
			state.just_saved = state.watching;

			let snapshot = shared.mapping.load_full();
			if let Err(e) = codec::write_file(&shared.path, &snapshot, &shared.header) {
				state.just_saved = false;
				tracing::error!(path = %shared.path.display(), "Failed to save settings: {}", e);
				return Err(e.into());
			}
			state.dirty = false;
		}

		tracing::debug!(path = %shared.path.display(), "Saved settings");
		shared.publish(SettingsEvent::Saved {
			path: shared.path.clone(),
		});
		Ok(true)
	}

	/// Discards the in-memory mapping, including unsaved edits, and reloads
	/// the file.
	pub fn reset(&self) -> crate::Result<()> {
		let shared = &self.shared;
		{
			let mut state = shared.lock();
			let loaded = codec::read_file(&shared.path).inspect_err(|e| {
				tracing::error!(path = %shared.path.display(), "Failed to reload settings: {}", e);
			})?;
			shared.mapping.store(Arc::new(loaded));
			state.dirty = false;
		}

		shared.publish(SettingsEvent::Reloaded);
		Ok(())
	}

	/// Saves pending edits, then stops the watcher and waits for it.
	///
	/// The watcher is stopped even if saving fails; the save error is
	/// returned.
	#[cfg_attr(not(feature = "watch"), allow(unused_mut))]
	pub async fn close(mut self) -> crate::Result<()> {
		let saved = if self.is_dirty() {
			self.save().map(|_| ())
		} else {
			Ok(())
		};

		#[cfg(feature = "watch")]
		self.stop_watching().await?;

		saved
	}
}

impl Drop for Settings {
	fn drop(&mut self) {
		#[cfg(feature = "watch")]
		self.abort_watching();

		if self.shared.lock().dirty {
			tracing::warn!(
				path = %self.shared.path.display(),
				"Settings dropped with unsaved changes"
			);
		}
	}
}

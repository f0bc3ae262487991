/* src/store/observer.rs */

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use super::SettingsEvent;

/// A synchronous change callback.
pub type ObserverFn = Arc<dyn Fn(&SettingsEvent) + Send + Sync>;

/// Handle returned by [`Settings::observe`](super::Settings::observe).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

#[derive(Default)]
pub(crate) struct Observers {
	next_id: AtomicU64,
	list: Mutex<Vec<(ObserverId, ObserverFn)>>,
}

impl Observers {
	pub(crate) fn add(&self, f: ObserverFn) -> ObserverId {
		let id = ObserverId(self.next_id.fetch_add(1, Ordering::Relaxed));
		self.list
			.lock()
			.unwrap_or_else(PoisonError::into_inner)
			.push((id, f));
		id
	}

	pub(crate) fn remove(&self, id: ObserverId) -> bool {
		let mut list = self.list.lock().unwrap_or_else(PoisonError::into_inner);
		let before = list.len();
		list.retain(|(existing, _)| *existing != id);
		list.len() != before
	}

	/// Calls every observer registered at the time of the call. The list is
	/// copied first so callbacks may add or remove observers.
	pub(crate) fn notify(&self, event: &SettingsEvent) {
		let callbacks: Vec<ObserverFn> = self
			.list
			.lock()
			.unwrap_or_else(PoisonError::into_inner)
			.iter()
			.map(|(_, f)| Arc::clone(f))
			.collect();

		for cb in callbacks {
			cb(event);
		}
	}
}

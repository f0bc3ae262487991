/* src/signal/worker.rs */

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use tokio::sync::{broadcast, mpsc};
use tokio::time::MissedTickBehavior;

use super::target::CompiledTarget;
use super::{Config, ErrorHandler, Event, EventKind, SignalError};

/// Latest activity seen for one path inside the current debounce window.
struct Pending {
	last_seen: Instant,
	kind: EventKind,
}

/// Turns raw `notify` callbacks into at most one [`Event`] per quiet period.
pub(crate) struct Worker {
	target: CompiledTarget,
	config: Config,
	tx: broadcast::Sender<Event>,
	on_error: Option<ErrorHandler>,
	pending: HashMap<PathBuf, Pending>,
}

impl Worker {
	pub(crate) fn new(
		target: CompiledTarget,
		config: Config,
		tx: broadcast::Sender<Event>,
		on_error: Option<ErrorHandler>,
	) -> Self {
		Self {
			target,
			config,
			tx,
			on_error,
			pending: HashMap::new(),
		}
	}

	/// Runs until the raw channel closes. Anything still pending then is
	/// dropped.
	pub(crate) async fn run(mut self, mut raw_rx: mpsc::Receiver<notify::Result<notify::Event>>) {
		let mut ticker = tokio::time::interval(self.tick_rate());
		ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

		loop {
			tokio::select! {
				received = raw_rx.recv() => match received {
					Some(Ok(event)) => self.record(event),
					Some(Err(e)) => self.fail(e),
					None => break,
				},
				_ = ticker.tick() => self.flush(Instant::now()),
			}
		}

		tracing::debug!(dir = ?self.target.dir(), "Watch worker stopped");
	}

	fn tick_rate(&self) -> Duration {
		(self.config.debounce / 5).max(Duration::from_millis(1))
	}

	fn record(&mut self, event: notify::Event) {
		use notify::EventKind as Raw;
		let kind = match event.kind {
			Raw::Create(_) => EventKind::Create,
			Raw::Modify(_) => EventKind::Modify,
			Raw::Remove(_) => EventKind::Remove,
			_ => return,
		};

		let now = Instant::now();
		for path in event.paths {
			if !self.target.matches(&path) {
				continue;
			}
			let coalesce = self.config.coalesce;
			self.pending
				.entry(path)
				.and_modify(|p| {
					p.last_seen = now;
					p.kind = combine(p.kind, kind, coalesce);
				})
				.or_insert(Pending {
					last_seen: now,
					kind,
				});
		}
	}

	/// Emits every path that has been quiet for a full debounce window.
	fn flush(&mut self, now: Instant) {
		let debounce = self.config.debounce;
		let listen = self.config.listen_events.as_deref();
		let tx = &self.tx;

		self.pending.retain(|path, p| {
			if now.duration_since(p.last_seen) < debounce {
				return true;
			}
			if listen.is_none_or(|kinds| kinds.contains(&p.kind)) {
				let _ = tx.send(Event {
					paths: vec![path.clone()],
					kind: p.kind,
				});
			}
			false
		});
	}

	fn fail(&self, error: notify::Error) {
		match &self.on_error {
			Some(handler) => handler(SignalError::Notify(error)),
			None => tracing::error!(dir = ?self.target.dir(), "Notify error: {}", error),
		}
	}
}

/// Kind reported for a path that saw `previous` and then `next`.
fn combine(previous: EventKind, next: EventKind, coalesce: bool) -> EventKind {
	match (previous, next) {
		_ if !coalesce => next,
		// A write right after a create or delete adds nothing.
		(EventKind::Create | EventKind::Remove, EventKind::Modify) => previous,
		_ => next,
	}
}

#[cfg(test)]
mod tests {
	use std::path::Path;
	use std::sync::{Arc, Mutex};

	use notify::event::{CreateKind, DataChange, ModifyKind};

	use super::*;

	const DEBOUNCE: Duration = Duration::from_millis(20);

	fn raw(kind: notify::EventKind, path: &str) -> notify::Result<notify::Event> {
		Ok(notify::Event::new(kind).add_path(PathBuf::from(path)))
	}

	fn worker(tx: broadcast::Sender<Event>, on_error: Option<ErrorHandler>) -> Worker {
		let target = CompiledTarget::new(Path::new("/settings/app.conf")).unwrap();
		Worker::new(target, Config::default().with_debounce(DEBOUNCE), tx, on_error)
	}

	#[tokio::test]
	async fn test_burst_becomes_one_event() {
		let (raw_tx, raw_rx) = mpsc::channel(8);
		let (tx, mut rx) = broadcast::channel(8);
		let task = tokio::spawn(worker(tx, None).run(raw_rx));

		let created = notify::EventKind::Create(CreateKind::File);
		let written = notify::EventKind::Modify(ModifyKind::Data(DataChange::Content));
		raw_tx.send(raw(created, "/settings/app.conf")).await.unwrap();
		raw_tx.send(raw(written, "/settings/app.conf")).await.unwrap();
		raw_tx.send(raw(created, "/settings/other.conf")).await.unwrap();

		let event = tokio::time::timeout(Duration::from_secs(2), rx.recv())
			.await
			.unwrap()
			.unwrap();
		assert_eq!(event.kind, EventKind::Create);
		assert_eq!(event.paths, vec![PathBuf::from("/settings/app.conf")]);

		tokio::time::sleep(DEBOUNCE * 3).await;
		assert!(rx.try_recv().is_err());

		drop(raw_tx);
		task.await.unwrap();
	}

	#[tokio::test]
	async fn test_notify_errors_go_to_handler() {
		let (raw_tx, raw_rx) = mpsc::channel(8);
		let (tx, _rx) = broadcast::channel(8);
		let seen = Arc::new(Mutex::new(Vec::new()));
		let sink = Arc::clone(&seen);
		let handler: ErrorHandler = Arc::new(move |e: SignalError| sink.lock().unwrap().push(e.to_string()));
		let task = tokio::spawn(worker(tx, Some(handler)).run(raw_rx));

		raw_tx
			.send(Err(notify::Error::generic("event queue overflowed")))
			.await
			.unwrap();
		drop(raw_tx);
		task.await.unwrap();

		let seen = seen.lock().unwrap();
		assert_eq!(seen.len(), 1);
		assert!(seen[0].contains("event queue overflowed"));
	}

	#[test]
	fn test_combine_keeps_create_and_remove() {
		assert_eq!(combine(EventKind::Create, EventKind::Modify, true), EventKind::Create);
		assert_eq!(combine(EventKind::Remove, EventKind::Modify, true), EventKind::Remove);
		assert_eq!(combine(EventKind::Remove, EventKind::Create, true), EventKind::Create);
		assert_eq!(combine(EventKind::Create, EventKind::Modify, false), EventKind::Modify);
	}
}

/* src/store/event.rs */

use std::path::PathBuf;

use super::MergeResult;

/// Events emitted by the store on changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsEvent {
	/// Keys were put or removed through an accessor.
	Changed { keys: Vec<String> },
	/// The mapping was discarded and reloaded from disk.
	Reloaded,
	/// External edits to the file were merged into the mapping.
	Merged(MergeResult),
	/// The mapping was written to the file.
	Saved { path: PathBuf },
}

#[cfg(feature = "stream")]
pub struct EventStream {
	inner: tokio_stream::wrappers::BroadcastStream<SettingsEvent>,
}

#[cfg(feature = "stream")]
impl EventStream {
	pub(crate) fn new(rx: tokio::sync::broadcast::Receiver<SettingsEvent>) -> Self {
		Self {
			inner: tokio_stream::wrappers::BroadcastStream::new(rx),
		}
	}
}

#[cfg(feature = "stream")]
impl futures_util::Stream for EventStream {
	type Item =
		std::result::Result<SettingsEvent, tokio_stream::wrappers::errors::BroadcastStreamRecvError>;

	fn poll_next(
		mut self: std::pin::Pin<&mut Self>,
		cx: &mut std::task::Context<'_>,
	) -> std::task::Poll<Option<Self::Item>> {
		std::pin::Pin::new(&mut self.inner).poll_next(cx)
	}
}

//!
//! A typed, file-backed settings store that stays in sync with its file.
//!
//! This crate integrates three components:
//!
//! - **codec**: The line-oriented `key=value` file format with escaping.
//! - **store**: [`Settings`], the in-memory mapping with typed accessors,
//!   dirty tracking, change events and the merge of external edits.
//! - **signal**: Filesystem monitoring of the backing file.
//!
//! ## Feature Flags
//!
//! - `full`: Enables all features.
//! - `watch` (default): Merges external edits of the file while it is open.
//! - `stream`: Enables [`Settings::stream`].
//! - `serde`: Derives `Serialize`/`Deserialize` for [`Rect`] and the
//!   watcher configuration types.
//!
//! ## Basic Usage
//!
//! ```no_run
//! # async fn demo() -> livestore::Result<()> {
//! use livestore::{Rect, Settings};
//!
//! let settings = Settings::open("app/settings.conf", None)?;
//! let bounds = settings.get_rect("window.bounds", Some(Rect::new(0, 0, 800, 600)));
//! settings.put_rect("window.bounds", bounds);
//! settings.close().await?;
//! # Ok(())
//! # }
//! ```
//!
//! See `demos/window_state.rs` for a complete example.

pub mod codec;
mod error;
#[cfg(feature = "watch")]
pub mod signal;
pub mod store;

pub use error::{Result, SettingsError};
pub use store::{
	MergeResult, ObserverId, Rect, Settings, SettingsBuilder, SettingsEvent, merge,
};

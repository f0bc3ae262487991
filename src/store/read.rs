/* src/store/read.rs */

use std::str::FromStr;
use std::sync::Arc;

use crate::codec::Mapping;

use super::{Rect, Settings};

impl Settings {
	/// Gets the raw value of a key. This is a wait-free operation.
	pub fn get(&self, key: &str) -> Option<String> {
		self.shared.mapping.load().get(key).cloned()
	}

	/// Gets a string, or `default` if the key is absent.
	pub fn get_string(&self, key: &str, default: Option<&str>) -> Option<String> {
		self.get(key).or_else(|| default.map(str::to_owned))
	}

	/// `true` or `false`, ignoring case. Anything else yields `default`.
	pub fn get_bool(&self, key: &str, default: bool) -> bool {
		match self.get(key) {
			Some(v) if v.eq_ignore_ascii_case("true") => true,
			Some(v) if v.eq_ignore_ascii_case("false") => false,
			_ => default,
		}
	}

	pub fn get_i32(&self, key: &str, default: i32) -> i32 {
		self.get_parsed(key).unwrap_or(default)
	}

	pub fn get_i64(&self, key: &str, default: i64) -> i64 {
		self.get_parsed(key).unwrap_or(default)
	}

	pub fn get_f64(&self, key: &str, default: f64) -> f64 {
		self.get_parsed(key).unwrap_or(default)
	}

	pub fn get_rect(&self, key: &str, default: Option<Rect>) -> Option<Rect> {
		self.get_parsed(key).or(default)
	}

	/// Parses a stored value. Absent and malformed values are both `None`;
	/// surrounding whitespace counts as malformed.
	fn get_parsed<T: FromStr>(&self, key: &str) -> Option<T> {
		let value = self.get(key)?;
		match value.parse() {
			Ok(parsed) => Some(parsed),
			Err(_) => {
				tracing::debug!(key, value = %value, "Ignoring malformed setting");
				None
			}
		}
	}

	/// Returns true if the key has a value.
	pub fn contains_key(&self, key: &str) -> bool {
		self.shared.mapping.load().contains_key(key)
	}

	/// Returns all keys in ascending order.
	pub fn keys(&self) -> Vec<String> {
		self.shared.mapping.load().keys().cloned().collect()
	}

	/// Returns the number of entries.
	pub fn len(&self) -> usize {
		self.shared.mapping.load().len()
	}

	/// Returns true if the store is empty.
	pub fn is_empty(&self) -> bool {
		self.shared.mapping.load().is_empty()
	}

	/// Returns an atomic snapshot of all entries.
	pub fn snapshot(&self) -> Arc<Mapping> {
		self.shared.mapping.load_full()
	}
}

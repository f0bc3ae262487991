/* src/store/write.rs */

use super::{Rect, Settings};

impl Settings {
	/// Sets a string value; `None` removes the key.
	///
	/// Like every put, this marks the store dirty and notifies observers
	/// before returning. Nothing is written to disk.
	pub fn put_string(&self, key: &str, value: Option<&str>) {
		self.put_raw(key, value.map(str::to_owned));
	}

	/// Removes a key. Equivalent to `put_string(key, None)`.
	pub fn remove(&self, key: &str) {
		self.put_raw(key, None);
	}

	pub fn put_bool(&self, key: &str, value: Option<bool>) {
		self.put_raw(key, value.map(|v| v.to_string()));
	}

	pub fn put_i32(&self, key: &str, value: Option<i32>) {
		self.put_raw(key, value.map(|v| v.to_string()));
	}

	pub fn put_i64(&self, key: &str, value: Option<i64>) {
		self.put_raw(key, value.map(|v| v.to_string()));
	}

	pub fn put_f64(&self, key: &str, value: Option<f64>) {
		self.put_raw(key, value.map(|v| v.to_string()));
	}

	pub fn put_rect(&self, key: &str, value: Option<Rect>) {
		self.put_raw(key, value.map(|v| v.to_string()));
	}

	/// Empty keys cannot be stored and are ignored.
	pub(crate) fn put_raw(&self, key: &str, value: Option<String>) {
		if key.is_empty() {
			tracing::debug!("Ignoring put with an empty key");
			return;
		}

		self.shared.mutate(|mapping| {
			match value {
				Some(value) => {
					mapping.insert(key.to_owned(), value);
				}
				None => {
					mapping.remove(key);
				}
			}
			vec![key.to_owned()]
		});
	}
}

/* src/store/list.rs */

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use super::Settings;

/// Separator used between Base64-encoded items. Not part of the Base64
/// alphabet, so items never need escaping.
const ENCODED_SEPARATOR: char = ',';

impl Settings {
	/// Stores a list in a single key.
	///
	/// With a non-empty `separator` the items are joined verbatim; the caller
	/// must pick one that does not occur inside any item. Without one, every
	/// item is Base64-encoded and the results are comma-joined, so items may
	/// contain anything. `None` removes the key.
	pub fn put_string_list<S: AsRef<str>>(
		&self,
		key: &str,
		items: Option<&[S]>,
		separator: Option<&str>,
	) {
		let value = items.map(|items| match separator.filter(|s| !s.is_empty()) {
			Some(separator) => items
				.iter()
				.map(|item| item.as_ref())
				.collect::<Vec<&str>>()
				.join(separator),
			None => items
				.iter()
				.map(|item| STANDARD.encode(item.as_ref().as_bytes()))
				.collect::<Vec<String>>()
				.join(&ENCODED_SEPARATOR.to_string()),
		});
		self.put_raw(key, value);
	}

	/// Reads a list written by [`put_string_list`](Self::put_string_list)
	/// with the same `separator`.
	///
	/// An absent or empty value yields `default`, as does a Base64 item that
	/// does not decode to UTF-8 text.
	pub fn get_string_list(
		&self,
		key: &str,
		default: Option<Vec<String>>,
		separator: Option<&str>,
	) -> Option<Vec<String>> {
		let raw = match self.get(key) {
			Some(raw) if !raw.is_empty() => raw,
			_ => return default,
		};

		match separator.filter(|s| !s.is_empty()) {
			Some(separator) => Some(raw.split(separator).map(str::to_owned).collect()),
			None => match raw
				.split(ENCODED_SEPARATOR)
				.map(decode_item)
				.collect::<Option<Vec<String>>>()
			{
				Some(items) => Some(items),
				None => {
					tracing::debug!(key, "Ignoring malformed encoded list");
					default
				}
			},
		}
	}

	/// Stores each item under `base.0`, `base.1`, ... and removes the
	/// entries left over from a longer list. Removal stops at the first
	/// missing index.
	pub fn put_indexed_list<S: AsRef<str>>(&self, base: &str, items: &[S]) {
		self.shared.mutate(|mapping| {
			let mut keys = Vec::with_capacity(items.len());

			for (n, item) in items.iter().enumerate() {
				let key = indexed_key(base, n);
				mapping.insert(key.clone(), item.as_ref().to_owned());
				keys.push(key);
			}

			for n in items.len().. {
				let key = indexed_key(base, n);
				if mapping.remove(&key).is_none() {
					break;
				}
				keys.push(key);
			}

			keys
		});
	}

	/// Reads `base.0`, `base.1`, ... up to the first missing index. Returns
	/// `default` if `base.0` is absent.
	pub fn get_indexed_list(&self, base: &str, default: Option<Vec<String>>) -> Option<Vec<String>> {
		let mapping = self.shared.mapping.load();
		let items: Vec<String> = (0..)
			.map_while(|n| mapping.get(&indexed_key(base, n)).cloned())
			.collect();

		if items.is_empty() { default } else { Some(items) }
	}
}

fn indexed_key(base: &str, n: usize) -> String {
	format!("{base}.{n}")
}

fn decode_item(token: &str) -> Option<String> {
	let bytes = STANDARD.decode(token).ok()?;
	String::from_utf8(bytes).ok()
}

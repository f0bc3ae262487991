/* src/codec/escape.rs */

/// Whitespace that separates a key from its value and is skipped at the
/// start of a line.
pub(crate) const WHITESPACE: [char; 3] = [' ', '\t', '\x0c'];

/// Escapes a value so it occupies a single physical line and reads back
/// verbatim.
pub fn escape(s: &str) -> String {
	let mut out = String::with_capacity(s.len() + 8);
	for c in s.chars() {
		match c {
			'\\' | ':' | '=' | ' ' => {
				out.push('\\');
				out.push(c);
			}
			'\t' => out.push_str("\\t"),
			'\n' => out.push_str("\\n"),
			'\r' => out.push_str("\\r"),
			'\x0c' => out.push_str("\\f"),
			_ => out.push(c),
		}
	}
	out
}

/// Escapes a key. A leading `#` or `!` is escaped as well, otherwise the
/// line would be read back as a comment.
pub fn escape_key(key: &str) -> String {
	let mut out = escape(key);
	if out.starts_with(['#', '!']) {
		out.insert(0, '\\');
	}
	out
}

/// Reverses [`escape`], also accepting `\uXXXX` sequences written by other
/// tools.
pub fn unescape(s: &str) -> String {
	let mut out = Unescaper::with_capacity(s.len());
	let mut chars = s.chars();

	while let Some(c) = chars.next() {
		if c != '\\' {
			out.push(c);
			continue;
		}
		match chars.next() {
			Some('t') => out.push('\t'),
			Some('n') => out.push('\n'),
			Some('r') => out.push('\r'),
			Some('f') => out.push('\x0c'),
			Some('u') => {
				let digits: String = chars.clone().take(4).collect();
				match u16::from_str_radix(&digits, 16) {
					Ok(unit) if digits.len() == 4 && digits.chars().all(|d| d.is_ascii_hexdigit()) => {
						chars.nth(3);
						out.push_unit(unit);
					}
					// Malformed escape, keep it literally.
					_ => out.push('u'),
				}
			}
			Some(other) => out.push(other),
			// Dangling backslash at the end of the line.
			None => {}
		}
	}

	out.finish()
}

/// Accumulates unescaped text, pairing UTF-16 surrogates from `\u` escapes.
struct Unescaper {
	out: String,
	high: Option<u16>,
}

impl Unescaper {
	fn with_capacity(capacity: usize) -> Self {
		Self {
			out: String::with_capacity(capacity),
			high: None,
		}
	}

	fn push(&mut self, c: char) {
		self.flush();
		self.out.push(c);
	}

	fn push_unit(&mut self, unit: u16) {
		match unit {
			0xD800..=0xDBFF => {
				self.flush();
				self.high = Some(unit);
			}
			0xDC00..=0xDFFF => {
				let c = match self.high.take() {
					Some(high) => char::decode_utf16([high, unit])
						.next()
						.and_then(|r| r.ok())
						.unwrap_or(char::REPLACEMENT_CHARACTER),
					None => char::REPLACEMENT_CHARACTER,
				};
				self.out.push(c);
			}
			_ => self.push(char::from_u32(u32::from(unit)).unwrap_or(char::REPLACEMENT_CHARACTER)),
		}
	}

	fn flush(&mut self) {
		// Unpaired high surrogate.
		if self.high.take().is_some() {
			self.out.push(char::REPLACEMENT_CHARACTER);
		}
	}

	fn finish(mut self) -> String {
		self.flush();
		self.out
	}
}

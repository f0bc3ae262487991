//!
//! Line-oriented `key=value` text format used for the backing file.
//!
//! The reader accepts the conventional flat properties syntax (comments,
//! `=`/`:`/whitespace separators, line continuations, `\uXXXX` escapes).
//! The writer always produces the same canonical layout:
//!
//! ```text
//! # <header line>
//! # Last written on <timestamp>
//!
//! key=value
//! other\ key=multi\nline
//!
//! #eot
//! ```

mod error;
mod escape;

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use chrono::{DateTime, Local};

pub use error::CodecError;
pub use escape::{escape, escape_key, unescape};

use escape::WHITESPACE;

/// The complete key/value content of a settings file, ordered by key.
pub type Mapping = BTreeMap<String, String>;

/// Sentinel written as the last line of every file.
pub const END_MARKER: &str = "#eot";

/// Prefix of the timestamp comment line.
pub const TIMESTAMP_PREFIX: &str = "# Last written on ";

#[cfg(windows)]
pub const LINE_ENDING: &str = "\r\n";
#[cfg(not(windows))]
pub const LINE_ENDING: &str = "\n";

const TIMESTAMP_FORMAT: &str = "%a %b %d %H:%M:%S %Z %Y";

/// Parses file content into a mapping. Later duplicates of a key win.
pub fn decode(input: &str) -> Mapping {
	let input = input.strip_prefix('\u{feff}').unwrap_or(input);
	let mut mapping = Mapping::new();
	let mut logical = String::new();
	let mut continuing = false;

	for line in natural_lines(input) {
		let line = line.trim_start_matches(WHITESPACE);

		if !continuing && (line.is_empty() || line.starts_with(['#', '!'])) {
			continue;
		}

		let trailing = line.bytes().rev().take_while(|b| *b == b'\\').count();
		if trailing % 2 == 1 {
			logical.push_str(&line[..line.len() - 1]);
			continuing = true;
			continue;
		}

		logical.push_str(line);
		continuing = false;
		insert_entry(&mut mapping, &logical);
		logical.clear();
	}

	if continuing {
		insert_entry(&mut mapping, &logical);
	}

	mapping
}

/// Serializes a mapping stamped with the current local time.
pub fn encode(mapping: &Mapping, header: &str) -> String {
	encode_at(mapping, header, &Local::now())
}

/// Serializes a mapping with an explicit timestamp.
pub fn encode_at(mapping: &Mapping, header: &str, written_at: &DateTime<Local>) -> String {
	let mut out = String::new();

	for line in header.split(['\n', '\r']).filter(|l| !l.is_empty()) {
		if !line.starts_with('#') {
			out.push_str("# ");
		}
		out.push_str(line);
		out.push_str(LINE_ENDING);
	}
	out.push_str(TIMESTAMP_PREFIX);
	out.push_str(&written_at.format(TIMESTAMP_FORMAT).to_string());
	out.push_str(LINE_ENDING);
	out.push_str(LINE_ENDING);

	for (key, value) in mapping {
		out.push_str(&escape_key(key));
		out.push('=');
		out.push_str(&escape(value));
		out.push_str(LINE_ENDING);
	}

	out.push_str(LINE_ENDING);
	out.push_str(END_MARKER);
	out.push_str(LINE_ENDING);
	out
}

/// Reads and decodes a file. A missing file is an empty mapping.
///
/// Bytes that are not valid UTF-8 are replaced with U+FFFD rather than
/// failing the read, so one bad entry does not hide the rest of the file.
pub fn read_file(path: &Path) -> Result<Mapping, CodecError> {
	let bytes = match fs::read(path) {
		Ok(bytes) => bytes,
		Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Mapping::new()),
		Err(source) => {
			return Err(CodecError::Io {
				path: path.to_path_buf(),
				source,
			});
		}
	};

	let text = match String::from_utf8(bytes) {
		Ok(text) => text,
		Err(e) => {
			let error = e.utf8_error();
			tracing::warn!(
				path = %path.display(),
				offset = error.valid_up_to(),
				"Settings file is not valid UTF-8, replacing bad bytes: {}",
				error
			);
			String::from_utf8_lossy(e.as_bytes()).into_owned()
		}
	};

	Ok(decode(&text))
}

/// Encodes and writes a mapping, replacing the file content.
pub fn write_file(path: &Path, mapping: &Mapping, header: &str) -> Result<(), CodecError> {
	fs::write(path, encode(mapping, header)).map_err(|source| CodecError::Io {
		path: path.to_path_buf(),
		source,
	})
}

/// Splits on `\n`, `\r` or `\r\n`.
fn natural_lines(input: &str) -> Vec<&str> {
	let bytes = input.as_bytes();
	let mut lines = Vec::new();
	let mut start = 0;
	let mut i = 0;

	while i < bytes.len() {
		match bytes[i] {
			b'\n' => {
				lines.push(&input[start..i]);
				i += 1;
				start = i;
			}
			b'\r' => {
				lines.push(&input[start..i]);
				i += 1;
				if bytes.get(i) == Some(&b'\n') {
					i += 1;
				}
				start = i;
			}
			_ => i += 1,
		}
	}
	if start < bytes.len() {
		lines.push(&input[start..]);
	}

	lines
}

fn insert_entry(mapping: &mut Mapping, logical: &str) {
	let (key, value) = split_entry(logical);
	mapping.insert(unescape(key), unescape(value));
}

/// Splits a logical line at the first unescaped `=`, `:` or whitespace.
fn split_entry(line: &str) -> (&str, &str) {
	let mut escaped = false;
	let mut key_end = line.len();

	for (i, c) in line.char_indices() {
		if escaped {
			escaped = false;
			continue;
		}
		match c {
			'\\' => escaped = true,
			'=' | ':' | ' ' | '\t' | '\x0c' => {
				key_end = i;
				break;
			}
			_ => {}
		}
	}

	let rest = line[key_end..].trim_start_matches(WHITESPACE);
	let rest = rest.strip_prefix(['=', ':']).unwrap_or(rest);
	let value = rest.trim_start_matches(WHITESPACE);

	(&line[..key_end], value)
}

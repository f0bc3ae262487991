/* tests/codec_tests.rs */

use chrono::{Local, TimeZone};
use livestore::codec::{self, END_MARKER, LINE_ENDING, Mapping, TIMESTAMP_PREFIX};
use proptest::prelude::*;

fn mapping(entries: &[(&str, &str)]) -> Mapping {
	entries
		.iter()
		.map(|(k, v)| (k.to_string(), v.to_string()))
		.collect()
}

#[test]
fn test_encode_layout() {
	let written_at = Local.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
	let map = mapping(&[("b c", "x=y"), ("a", "1")]);

	let text = codec::encode_at(&map, "hello\n# already a comment\r\n\nbye", &written_at);
	let lines: Vec<&str> = text.lines().collect();

	assert_eq!(lines[0], "# hello");
	assert_eq!(lines[1], "# already a comment");
	assert_eq!(lines[2], "# bye");
	assert!(lines[3].starts_with(TIMESTAMP_PREFIX));
	assert!(lines[3].contains("2024"));
	assert_eq!(lines[4], "");
	assert_eq!(lines[5], "a=1");
	assert_eq!(lines[6], "b\\ c=x\\=y");
	assert_eq!(lines[7], "");
	assert_eq!(lines[8], END_MARKER);
	assert_eq!(lines.len(), 9);
	assert!(text.ends_with(LINE_ENDING));
}

#[test]
fn test_encode_flattens_multiline_values() {
	let map = mapping(&[("k", "one\ntwo\r\tthree: \\")]);
	let text = codec::encode(&map, "h");

	assert!(text.contains("k=one\\ntwo\\r\\tthree\\:\\ \\\\"));
	assert_eq!(codec::decode(&text), map);
}

#[test]
fn test_encode_is_stable_apart_from_timestamp() {
	let map = mapping(&[("z", "last"), ("m", "middle"), ("a", "first")]);
	let first = codec::encode_at(&map, "h", &Local.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
	let second = codec::encode_at(&map, "h", &Local.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap());

	let strip = |text: &str| -> Vec<String> {
		text.lines()
			.filter(|l| !l.starts_with(TIMESTAMP_PREFIX))
			.map(str::to_owned)
			.collect()
	};

	assert_ne!(first, second);
	assert_eq!(strip(&first), strip(&second));
}

#[test]
fn test_decode_properties_syntax() {
	let text = "\
# comment
! also a comment

   key1 = value one
key2:value2
key3 value3
multi = first \\
        second
unicode=caf\\u00e9 \\ud83d\\ude00
escaped\\ key=a\\=b
empty=
";
	let map = codec::decode(text);

	assert_eq!(map.get("key1").map(String::as_str), Some("value one"));
	assert_eq!(map.get("key2").map(String::as_str), Some("value2"));
	assert_eq!(map.get("key3").map(String::as_str), Some("value3"));
	assert_eq!(map.get("multi").map(String::as_str), Some("first second"));
	assert_eq!(map.get("unicode").map(String::as_str), Some("café 😀"));
	assert_eq!(map.get("escaped key").map(String::as_str), Some("a=b"));
	assert_eq!(map.get("empty").map(String::as_str), Some(""));
	assert_eq!(map.len(), 7);
}

#[test]
fn test_decode_line_endings_and_duplicates() {
	let map = codec::decode("a=1\r\nb=2\rc=3\na=4");

	assert_eq!(map, mapping(&[("a", "4"), ("b", "2"), ("c", "3")]));
}

#[test]
fn test_decode_lone_surrogate_is_replaced() {
	let map = codec::decode("k=\\ud800x");

	assert_eq!(map.get("k").map(String::as_str), Some("\u{fffd}x"));
}

#[test]
fn test_comment_like_keys_survive() {
	let map = mapping(&[("#not-a-comment", "1"), ("!bang", "2")]);
	let text = codec::encode(&map, "h");

	assert_eq!(codec::decode(&text), map);
}

#[test]
fn test_read_missing_file_is_empty() -> Result<(), Box<dyn std::error::Error>> {
	let dir = tempfile::tempdir()?;
	let map = codec::read_file(&dir.path().join("missing.conf"))?;

	assert!(map.is_empty());
	Ok(())
}

#[test]
fn test_read_invalid_utf8_keeps_other_entries() -> Result<(), Box<dyn std::error::Error>> {
	let dir = tempfile::tempdir()?;
	let path = dir.path().join("latin1.conf");
	std::fs::write(&path, b"name=Jos\xe9\nwindow.x=10\n")?;

	let map = codec::read_file(&path)?;
	assert_eq!(map.get("name").map(String::as_str), Some("Jos\u{fffd}"));
	assert_eq!(map.get("window.x").map(String::as_str), Some("10"));
	Ok(())
}

#[test]
fn test_write_then_read_file() -> Result<(), Box<dyn std::error::Error>> {
	let dir = tempfile::tempdir()?;
	let path = dir.path().join("settings.conf");
	let map = mapping(&[("window.x", "10"), ("path", "C:\\Users\\me")]);

	codec::write_file(&path, &map, "header")?;

	assert_eq!(codec::read_file(&path)?, map);
	Ok(())
}

proptest! {
	#[test]
	fn prop_encode_decode_round_trip(
		map in proptest::collection::btree_map(
			any::<String>().prop_filter("keys are non-empty", |k| !k.is_empty()),
			any::<String>(),
			0..8,
		)
	) {
		let text = codec::encode(&map, "round trip");
		prop_assert_eq!(codec::decode(&text), map);
	}

	#[test]
	fn prop_escape_unescape(value in any::<String>()) {
		prop_assert_eq!(codec::unescape(&codec::escape(&value)), value);
	}
}

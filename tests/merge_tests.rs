/* tests/merge_tests.rs */

use livestore::codec::Mapping;
use livestore::merge;

fn mapping(entries: &[(&str, &str)]) -> Mapping {
	entries
		.iter()
		.map(|(k, v)| (k.to_string(), v.to_string()))
		.collect()
}

#[test]
fn test_merge_overwrites_with_disk_state() {
	let mut current = mapping(&[("a", "1"), ("b", "2")]);
	let updated = mapping(&[("a", "1"), ("c", "3")]);

	let result = merge(&mut current, &updated);

	assert!(result.is_modified());
	assert_eq!(current, updated);
	assert_eq!(result.added, vec!["c".to_string()]);
	assert_eq!(result.removed, vec!["b".to_string()]);
	assert!(result.updated.is_empty());
}

#[test]
fn test_merge_reports_changed_values() {
	let mut current = mapping(&[("a", "1")]);
	let updated = mapping(&[("a", "2")]);

	let result = merge(&mut current, &updated);

	assert_eq!(result.updated, vec!["a".to_string()]);
	assert_eq!(result.keys().count(), 1);
	assert_eq!(current.get("a").map(String::as_str), Some("2"));
}

#[test]
fn test_merge_equal_is_noop() {
	let mut current = mapping(&[("a", "1"), ("b", "2")]);
	let updated = current.clone();

	let result = merge(&mut current, &updated);

	assert!(!result.is_modified());
	assert_eq!(current, updated);
}

/// Two-way merge has no baseline: an unsaved local edit is indistinguishable
/// from a stale value and is replaced by the file's value.
#[test]
fn test_merge_discards_local_edit_on_conflict() {
	let mut current = mapping(&[("theme", "dark-unsaved"), ("size", "12")]);
	let updated = mapping(&[("theme", "light"), ("size", "12")]);

	merge(&mut current, &updated);

	assert_eq!(current.get("theme").map(String::as_str), Some("light"));
}

/* src/store/merge.rs */

use crate::codec::Mapping;

/// Result of merging an on-disk mapping into the in-memory one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeResult {
	/// Keys that only existed on disk.
	pub added: Vec<String>,
	/// Keys whose value differed and was taken from disk.
	pub updated: Vec<String>,
	/// Keys that no longer exist on disk.
	pub removed: Vec<String>,
}

impl MergeResult {
	/// Returns true if the merge altered the mapping.
	pub fn is_modified(&self) -> bool {
		!(self.added.is_empty() && self.updated.is_empty() && self.removed.is_empty())
	}

	/// Returns an iterator over every key the merge touched.
	pub fn keys(&self) -> impl Iterator<Item = &String> {
		self.added
			.iter()
			.chain(self.updated.iter())
			.chain(self.removed.iter())
	}
}

/// Makes `current` equal to `updated`, reporting what changed.
///
/// This is a two-way merge: there is no record of what was last read from
/// disk, so a key edited locally and not yet saved cannot be told apart from
/// a stale one. Whenever the two sides differ, `updated` wins.
pub fn merge(current: &mut Mapping, updated: &Mapping) -> MergeResult {
	let mut result = MergeResult::default();

	for (key, value) in updated {
		match current.get_mut(key) {
			Some(existing) if existing == value => {}
			Some(existing) => {
				existing.clone_from(value);
				result.updated.push(key.clone());
			}
			None => {
				current.insert(key.clone(), value.clone());
				result.added.push(key.clone());
			}
		}
	}

	current.retain(|key, _| {
		let keep = updated.contains_key(key);
		if !keep {
			result.removed.push(key.clone());
		}
		keep
	});

	result
}

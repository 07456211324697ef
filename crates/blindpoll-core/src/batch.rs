//! Update batches and their construction from a validated vote.

use crate::effects::InsertionKeyEffects;
use crate::errors::{PollError, PollResult};
use crate::path::{PollId, StorePath};
use crate::snapshot::{AuthKey, PollSnapshot, Selection};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Path-to-value writes applied to the store as one unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UpdateBatch {
    entries: BTreeMap<StorePath, String>,
}

impl UpdateBatch {
    /// Empty batch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the write for `path`.
    pub fn insert(&mut self, path: StorePath, value: impl Into<String>) {
        self.entries.insert(path, value.into());
    }

    /// Value written at `path`, if any.
    pub fn get(&self, path: &StorePath) -> Option<&str> {
        self.entries.get(path).map(String::as_str)
    }

    /// Number of writes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the batch writes nothing.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Writes in path order.
    pub fn iter(&self) -> impl Iterator<Item = (&StorePath, &str)> {
        self.entries
            .iter()
            .map(|(path, value)| (path, value.as_str()))
    }

    /// Target paths in path order.
    pub fn paths(&self) -> impl Iterator<Item = &StorePath> {
        self.entries.keys()
    }
}

impl<'a> IntoIterator for &'a UpdateBatch {
    type Item = (&'a StorePath, &'a String);
    type IntoIter = std::collections::btree_map::Iter<'a, StorePath, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Build the writes that record `auth_key` as a vote on every selected item.
///
/// Each item is located by first name match in `snapshot`; its position is the
/// storage index. One insertion key is drawn per item, scoped to that item's
/// votes collection. `snapshot` must be the one the selection was validated
/// against, otherwise indices may point at the wrong items.
pub fn build_update_batch<K>(
    poll: PollId,
    snapshot: &PollSnapshot,
    selection: &Selection,
    auth_key: &AuthKey,
    keys: &K,
) -> PollResult<UpdateBatch>
where
    K: InsertionKeyEffects + ?Sized,
{
    let mut batch = UpdateBatch::new();

    for name in selection.iter() {
        let index = snapshot
            .index_of(name)
            .ok_or_else(|| PollError::item_not_found(name))?;

        let scope = StorePath::votes(poll, index);
        let insertion_key = keys.new_insertion_key(&scope);
        tracing::trace!(item = name, index, scope = %scope, "drew insertion key");

        batch.insert(scope.child(insertion_key), auth_key.as_str());
    }

    Ok(batch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::{PollItem, PollKey};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingKeys(AtomicUsize);

    impl InsertionKeyEffects for CountingKeys {
        fn new_insertion_key(&self, _scope: &StorePath) -> String {
            format!("k{}", self.0.fetch_add(1, Ordering::SeqCst) + 1)
        }
    }

    fn scenario() -> PollSnapshot {
        PollSnapshot::new(
            vec![PollItem::new("A"), PollItem::new("B"), PollItem::new("C")],
            vec![PollKey::new("ABCDEFGHIJKLMNOP")],
        )
    }

    #[test]
    fn test_builds_one_entry_per_selected_item() {
        let keys = CountingKeys(AtomicUsize::new(0));
        let batch = build_update_batch(
            PollId(0),
            &scenario(),
            &Selection::from_checked(["A", "C"]),
            &AuthKey::new("ABCDEFGHIJKLMNOP"),
            &keys,
        )
        .unwrap();

        let expected: Vec<(String, &str)> = vec![
            ("polls/0/items/0/votes/k1".into(), "ABCDEFGHIJKLMNOP"),
            ("polls/0/items/2/votes/k2".into(), "ABCDEFGHIJKLMNOP"),
        ];
        let actual: Vec<(String, &str)> = batch
            .iter()
            .map(|(path, value)| (path.to_string(), value))
            .collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_unknown_item_is_reported() {
        let keys = CountingKeys(AtomicUsize::new(0));
        let err = build_update_batch(
            PollId(0),
            &scenario(),
            &Selection::from_checked(["A", "Z"]),
            &AuthKey::new("ABCDEFGHIJKLMNOP"),
            &keys,
        )
        .unwrap_err();

        assert_eq!(err, PollError::item_not_found("Z"));
        assert!(err.is_defect());
    }

    #[test]
    fn test_poll_id_is_part_of_every_path() {
        let keys = CountingKeys(AtomicUsize::new(0));
        let batch = build_update_batch(
            PollId(7),
            &scenario(),
            &Selection::from_checked(["B"]),
            &AuthKey::new("ABCDEFGHIJKLMNOP"),
            &keys,
        )
        .unwrap();

        let path = batch.paths().next().unwrap();
        assert!(path.is_descendant_of(&StorePath::votes(PollId(7), 1)));
    }

    #[test]
    fn test_batch_serializes_as_path_map() {
        let mut batch = UpdateBatch::new();
        batch.insert(StorePath::votes(PollId(0), 1).child("k9"), "KEY");
        let json = serde_json::to_value(&batch).unwrap();
        assert_eq!(json, serde_json::json!({ "polls/0/items/1/votes/k9": "KEY" }));
    }
}

//! Poll state as fetched from the store.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Number of characters every auth key must have.
pub const AUTH_KEY_LEN: usize = 16;

/// One poll option and the auth keys that voted for it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollItem {
    /// Display name, unique within the poll
    pub name: String,
    /// Insertion key to auth key
    #[serde(default, deserialize_with = "null_as_empty")]
    pub votes: BTreeMap<String, String>,
}

impl PollItem {
    /// Item with no votes yet.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            votes: BTreeMap::new(),
        }
    }

    /// Whether `key` has been used to vote for this item.
    pub fn has_vote_from(&self, key: &str) -> bool {
        self.votes.values().any(|voter| voter == key)
    }
}

/// An auth key issued for this poll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollKey {
    /// The key text
    pub value: String,
}

impl PollKey {
    /// Wrap a key value.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

/// Immutable copy of one poll's state, fetched fresh for every submission.
///
/// Item positions are stable for the lifetime of a poll and double as storage
/// indices, so the same snapshot value must be used from validation through
/// batch construction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollSnapshot {
    /// Poll options in storage order
    #[serde(default, deserialize_with = "null_as_empty")]
    pub items: Vec<PollItem>,
    /// Issued auth keys
    #[serde(default, deserialize_with = "null_as_empty")]
    pub keys: Vec<PollKey>,
}

impl PollSnapshot {
    /// Build a snapshot from parts.
    pub fn new(items: Vec<PollItem>, keys: Vec<PollKey>) -> Self {
        Self { items, keys }
    }

    /// Item names in storage order.
    pub fn item_names(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(|item| item.name.as_str())
    }

    /// Storage index of the first item called `name`.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.items.iter().position(|item| item.name == name)
    }

    /// Whether `key` was issued for this poll.
    pub fn is_issued_key(&self, key: &str) -> bool {
        self.keys.iter().any(|issued| issued.value == key)
    }

    /// Whether `key` already appears as a vote on any item.
    pub fn is_consumed_key(&self, key: &str) -> bool {
        self.items.iter().any(|item| item.has_vote_from(key))
    }

    /// Number of votes `key` holds across all items.
    pub fn vote_count_for(&self, key: &str) -> usize {
        self.items
            .iter()
            .flat_map(|item| item.votes.values())
            .filter(|voter| voter.as_str() == key)
            .count()
    }

    /// Total votes per item, in storage order.
    pub fn tally(&self) -> Vec<(&str, usize)> {
        self.items
            .iter()
            .map(|item| (item.name.as_str(), item.votes.len()))
            .collect()
    }
}

/// Auth key as typed by the user. Not checked on construction.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthKey(String);

impl AuthKey {
    /// Wrap raw input verbatim.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Key text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length in Unicode scalar values.
    ///
    /// A character outside the Basic Multilingual Plane counts once, where a
    /// UTF-16 length (as a browser's `String.length` reports) counts it twice.
    /// Keys are issued as ASCII, where both measures agree.
    pub fn char_len(&self) -> usize {
        self.0.chars().count()
    }
}

// Keys are credentials; keep them out of logs.
impl fmt::Debug for AuthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AuthKey(<{} chars>)", self.char_len())
    }
}

/// Item names checked in one submission attempt.
///
/// Keeps first-seen order and collapses duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    names: Vec<String>,
}

impl Selection {
    /// Build from the names of checked options.
    pub fn from_checked<I, S>(checked: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut names: Vec<String> = Vec::new();
        for name in checked {
            let name = name.into();
            if !names.contains(&name) {
                names.push(name);
            }
        }
        Self { names }
    }

    /// Number of distinct names.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Names in first-checked order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Whether `name` is selected.
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|selected| selected == name)
    }
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn snapshot() -> PollSnapshot {
        let mut voted = PollItem::new("B");
        voted.votes.insert("-k1".into(), "USEDUSEDUSEDUSED".into());
        PollSnapshot::new(
            vec![PollItem::new("A"), voted, PollItem::new("A")],
            vec![PollKey::new("USEDUSEDUSEDUSED"), PollKey::new("FRESHFRESHFRESH1")],
        )
    }

    #[test]
    fn test_index_of_takes_first_match() {
        let snapshot = snapshot();
        assert_eq!(snapshot.index_of("A"), Some(0));
        assert_eq!(snapshot.index_of("B"), Some(1));
        assert_eq!(snapshot.index_of("Z"), None);
    }

    #[test]
    fn test_key_lookups() {
        let snapshot = snapshot();
        assert!(snapshot.is_issued_key("FRESHFRESHFRESH1"));
        assert!(!snapshot.is_consumed_key("FRESHFRESHFRESH1"));
        assert!(snapshot.is_consumed_key("USEDUSEDUSEDUSED"));
        assert_eq!(snapshot.vote_count_for("USEDUSEDUSEDUSED"), 1);
        assert!(!snapshot.is_issued_key("NOTISSUEDNOTISSU"));
    }

    #[test]
    fn test_missing_or_null_votes_deserialize_empty() {
        let snapshot: PollSnapshot = serde_json::from_value(json!({
            "items": [
                { "name": "A" },
                { "name": "B", "votes": null },
                { "name": "C", "votes": { "-x": "KEY" } }
            ],
            "keys": [ { "value": "KEY" } ],
            "title": "ignored"
        }))
        .unwrap();

        assert!(snapshot.items[0].votes.is_empty());
        assert!(snapshot.items[1].votes.is_empty());
        assert_eq!(snapshot.items[2].votes.len(), 1);
        assert_eq!(snapshot.tally(), vec![("A", 0), ("B", 0), ("C", 1)]);
    }

    #[test]
    fn test_selection_collapses_duplicates() {
        let selection = Selection::from_checked(["C", "A", "C"]);
        assert_eq!(selection.len(), 2);
        assert_eq!(selection.iter().collect::<Vec<_>>(), vec!["C", "A"]);
        assert!(selection.contains("A"));
    }

    #[test]
    fn test_auth_key_counts_chars_and_hides_value() {
        let key = AuthKey::new("äbcdefghijklmnop");
        assert_eq!(key.char_len(), 16);
        assert_eq!(format!("{key:?}"), "AuthKey(<16 chars>)");
    }

    #[test]
    fn test_non_bmp_char_counts_once() {
        let key = AuthKey::new("\u{1F600}ABCDEFGHIJKLMN");
        assert_eq!(key.as_str().encode_utf16().count(), 16);
        assert_eq!(key.char_len(), 15);
    }
}

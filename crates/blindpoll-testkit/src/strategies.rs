//! Property test strategies for poll types
//!
//! Issued keys use upper-case letters and digits; [`arb_fresh_key`] uses lower
//! case only, so a fresh key never collides with an issued or used one.

use blindpoll_core::{AuthKey, PollItem, PollKey, PollSnapshot, Selection, AUTH_KEY_LEN};
use proptest::prelude::*;

// Re-export proptest for convenience
pub use proptest;

/// Distinct item names, 1..8 of them.
pub fn arb_item_names() -> impl Strategy<Value = Vec<String>> {
    prop::collection::btree_set("[A-Z][a-z]{0,6}", 1..8)
        .prop_map(|names| names.into_iter().collect())
}

/// A 16-character key from the issued-key alphabet.
pub fn arb_issued_key() -> impl Strategy<Value = String> {
    "[A-Z0-9]{16}"
}

/// A 16-character key that no snapshot from [`arb_snapshot`] contains.
pub fn arb_fresh_key() -> impl Strategy<Value = String> {
    "[a-z]{16}"
}

/// A key of any length except 16.
pub fn arb_key_wrong_length() -> impl Strategy<Value = String> {
    "[A-Za-z0-9]{0,40}".prop_filter("length must differ from the auth key length", |key| {
        key.chars().count() != AUTH_KEY_LEN
    })
}

/// Snapshot with random items, issued keys and a random subset of those keys
/// already voted on each item.
pub fn arb_snapshot() -> impl Strategy<Value = PollSnapshot> {
    (
        arb_item_names(),
        prop::collection::vec(arb_issued_key(), 1..6),
    )
        .prop_flat_map(|(names, keys)| {
            let votes = prop::collection::vec(
                prop::collection::vec(any::<bool>(), keys.len()),
                names.len(),
            );
            (Just(names), Just(keys), votes)
        })
        .prop_map(|(names, keys, votes)| {
            let items = names
                .into_iter()
                .zip(votes)
                .enumerate()
                .map(|(i, (name, voted))| {
                    let mut item = PollItem::new(name);
                    for (j, key) in keys.iter().enumerate() {
                        if voted[j] {
                            item.votes.insert(format!("-v{i}x{j}"), key.clone());
                        }
                    }
                    item
                })
                .collect();
            PollSnapshot::new(items, keys.into_iter().map(PollKey::new).collect())
        })
}

/// A snapshot together with a selection of any size other than two.
pub fn arb_wrong_size_selection() -> impl Strategy<Value = (PollSnapshot, Selection)> {
    arb_snapshot().prop_flat_map(|snapshot| {
        let names: Vec<String> = snapshot.item_names().map(str::to_string).collect();
        let len = names.len();
        (
            Just(snapshot),
            prop::sample::subsequence(names, 0..=len)
                .prop_filter("selection must not have two items", |picked| picked.len() != 2)
                .prop_map(Selection::from_checked),
        )
    })
}

/// A snapshot with at least two items, two distinct item names from it, and a
/// fresh 16-character key that has been added to the issued keys.
pub fn arb_valid_ballot() -> impl Strategy<Value = (PollSnapshot, Selection, AuthKey)> {
    (
        arb_snapshot().prop_filter("need two items", |s| s.items.len() >= 2),
        arb_fresh_key(),
    )
        .prop_flat_map(|(snapshot, key)| {
            let len = snapshot.items.len();
            (Just(snapshot), Just(key), 0..len, 1..len)
        })
        .prop_map(|(mut snapshot, key, first, offset)| {
            let second = (first + offset) % snapshot.items.len();
            let selection = Selection::from_checked([
                snapshot.items[first].name.clone(),
                snapshot.items[second].name.clone(),
            ]);
            snapshot.keys.push(PollKey::new(key.clone()));
            (snapshot, selection, AuthKey::new(key))
        })
}

//! Snapshot fixtures.

use blindpoll_core::{PollItem, PollKey, PollSnapshot};

/// Auth key issued in [`scenario_snapshot`].
pub const SCENARIO_KEY: &str = "ABCDEFGHIJKLMNOP";

/// Items `A`, `B`, `C` without votes and the single key [`SCENARIO_KEY`].
pub fn scenario_snapshot() -> PollSnapshot {
    snapshot_with(&["A", "B", "C"], &[SCENARIO_KEY])
}

/// Snapshot with vote-free items named `names` and issued `keys`.
pub fn snapshot_with(names: &[&str], keys: &[&str]) -> PollSnapshot {
    PollSnapshot::new(
        names.iter().map(|name| PollItem::new(*name)).collect(),
        keys.iter().map(|key| PollKey::new(*key)).collect(),
    )
}

/// Record a vote by `key` on the first item called `item`.
///
/// Panics if the item does not exist.
pub fn record_vote(snapshot: &mut PollSnapshot, item: &str, key: &str) {
    let index = snapshot.index_of(item).unwrap();
    let votes = &mut snapshot.items[index].votes;
    let insertion_key = format!("-fixture{}", votes.len());
    votes.insert(insertion_key, key.to_string());
}

//! # Blind Poll Testkit
//!
//! Deterministic handlers, fixtures and proptest strategies shared by the
//! tests of crates above `blindpoll-core`.
//!
//! - [`MemoryPollStore`]: in-memory store with fetch/write failure injection
//!   and a gate for holding fetches
//! - [`SequentialKeyGenerator`]: insertion keys `k1`, `k2`, ...
//! - [`RecordingNotifier`]: captures user messages
//! - [`mock_effects`]: all three bundled behind `PollEffects`

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

pub mod effects;
pub mod fixtures;
pub mod keys;
pub mod notify;
pub mod store;
pub mod strategies;

pub use effects::{mock_effects, mock_effects_with_store, MockPollEffects};
pub use fixtures::{record_vote, scenario_snapshot, snapshot_with, SCENARIO_KEY};
pub use keys::SequentialKeyGenerator;
pub use notify::RecordingNotifier;
pub use store::{FetchGate, MemoryPollStore};

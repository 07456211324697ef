//! Deterministic effect system for pipeline tests.

use crate::keys::SequentialKeyGenerator;
use crate::notify::RecordingNotifier;
use crate::store::MemoryPollStore;
use blindpoll_core::PollSnapshot;
use blindpoll_effects::PollEffectSystem;
use std::sync::Arc;

/// Memory store, sequential keys, recording notifier.
pub type MockPollEffects =
    PollEffectSystem<MemoryPollStore, SequentialKeyGenerator, RecordingNotifier>;

/// Mock effects serving `snapshot` as poll 0.
pub fn mock_effects(snapshot: &PollSnapshot) -> Arc<MockPollEffects> {
    mock_effects_with_store(MemoryPollStore::with_snapshot(snapshot))
}

/// Mock effects over a prepared store.
pub fn mock_effects_with_store(store: MemoryPollStore) -> Arc<MockPollEffects> {
    Arc::new(PollEffectSystem::new(
        store,
        SequentialKeyGenerator::new(),
        RecordingNotifier::new(),
    ))
}

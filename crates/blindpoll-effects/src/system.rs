//! Effect system assembled from one handler per interface.
//!
//! The submission pipeline is generic over [`blindpoll_core::PollEffects`].
//! `PollEffectSystem` satisfies that bound by delegating each trait to the
//! handler supplied for it, so production and test wiring differ only in the
//! handlers passed to [`PollEffectSystem::new`].

use async_trait::async_trait;
use blindpoll_core::{
    InsertionKeyEffects, NotificationEffects, PollId, PollResult, PollSnapshot, PollStoreEffects,
    StorePath, UpdateBatch,
};

/// Store, key generator and notifier bundled behind the composed effect bound.
#[derive(Debug)]
pub struct PollEffectSystem<S, K, N> {
    store: S,
    keys: K,
    notifier: N,
}

impl<S, K, N> PollEffectSystem<S, K, N>
where
    S: PollStoreEffects,
    K: InsertionKeyEffects,
    N: NotificationEffects,
{
    /// Assemble from handlers.
    pub fn new(store: S, keys: K, notifier: N) -> Self {
        Self {
            store,
            keys,
            notifier,
        }
    }

    /// Store handler.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Insertion key handler.
    pub fn keys(&self) -> &K {
        &self.keys
    }

    /// Notification handler.
    pub fn notifier(&self) -> &N {
        &self.notifier
    }
}

#[async_trait]
impl<S, K, N> PollStoreEffects for PollEffectSystem<S, K, N>
where
    S: PollStoreEffects,
    K: InsertionKeyEffects,
    N: NotificationEffects,
{
    fn poll(&self) -> PollId {
        self.store.poll()
    }

    async fn fetch_current_poll(&self) -> PollResult<PollSnapshot> {
        self.store.fetch_current_poll().await
    }

    async fn apply_update(&self, batch: &UpdateBatch) -> PollResult<()> {
        self.store.apply_update(batch).await
    }
}

impl<S, K, N> InsertionKeyEffects for PollEffectSystem<S, K, N>
where
    S: PollStoreEffects,
    K: InsertionKeyEffects,
    N: NotificationEffects,
{
    fn new_insertion_key(&self, scope: &StorePath) -> String {
        self.keys.new_insertion_key(scope)
    }
}

#[async_trait]
impl<S, K, N> NotificationEffects for PollEffectSystem<S, K, N>
where
    S: PollStoreEffects,
    K: InsertionKeyEffects,
    N: NotificationEffects,
{
    async fn notify(&self, message: &str) {
        self.notifier.notify(message).await;
    }
}

//! Effect interfaces consumed by the vote pipeline
//!
//! The pipeline never reaches for a global store client. Callers construct
//! handlers for each interface and inject them; production handlers live in
//! `blindpoll-effects`, deterministic ones in `blindpoll-testkit`.
//!
//! - **PollStoreEffects**: snapshot reads and atomic batch writes
//! - **InsertionKeyEffects**: fresh map keys for new vote entries
//! - **NotificationEffects**: fire-and-forget user messages

use crate::batch::UpdateBatch;
use crate::errors::PollResult;
use crate::path::{PollId, StorePath};
use crate::snapshot::PollSnapshot;
use async_trait::async_trait;

/// Read and write access to the poll store.
#[async_trait]
pub trait PollStoreEffects: Send + Sync {
    /// Poll this store reads. Write paths for its snapshots are rooted here.
    fn poll(&self) -> PollId;

    /// Fetch the full current state of [`PollStoreEffects::poll`].
    async fn fetch_current_poll(&self) -> PollResult<PollSnapshot>;

    /// Apply every entry of `batch` together, or none of them.
    async fn apply_update(&self, batch: &UpdateBatch) -> PollResult<()>;
}

/// Generator for vote-entry insertion keys.
pub trait InsertionKeyEffects: Send + Sync {
    /// A key that has not been handed out before within `scope`.
    fn new_insertion_key(&self, scope: &StorePath) -> String;
}

/// Sink for user-facing messages.
#[async_trait]
pub trait NotificationEffects: Send + Sync {
    /// Show `message` to the user. Delivery is not confirmed.
    async fn notify(&self, message: &str);
}

/// Composed effects required by the submission pipeline.
pub trait PollEffects: PollStoreEffects + InsertionKeyEffects + NotificationEffects {}

/// Blanket implementation for any type that implements all required traits.
impl<T> PollEffects for T where T: PollStoreEffects + InsertionKeyEffects + NotificationEffects {}

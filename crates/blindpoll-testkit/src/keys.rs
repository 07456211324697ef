//! Deterministic insertion keys.

use blindpoll_core::{InsertionKeyEffects, StorePath};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Hands out `k1`, `k2`, ... and records the scope of every request.
#[derive(Debug, Clone, Default)]
pub struct SequentialKeyGenerator {
    next: Arc<AtomicU64>,
    scopes: Arc<Mutex<Vec<StorePath>>>,
}

impl SequentialKeyGenerator {
    /// Start at `k1`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Scopes requested so far, in order.
    pub fn scopes(&self) -> Vec<StorePath> {
        self.scopes.lock().clone()
    }

    /// Keys handed out so far.
    pub fn issued(&self) -> u64 {
        self.next.load(Ordering::SeqCst)
    }
}

impl InsertionKeyEffects for SequentialKeyGenerator {
    fn new_insertion_key(&self, scope: &StorePath) -> String {
        self.scopes.lock().push(scope.clone());
        format!("k{}", self.next.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

//! In-memory poll store with failure injection
//!
//! Holds the store tree as a JSON document, like the file store, and shares
//! its patching rules. Tests can make the next fetches or writes fail, and can
//! hold fetches after the read so several submissions observe the same state
//! before any of them writes.
//!
//! # Blocking Lock Usage
//!
//! Uses a synchronous mutex; the lock is never held across an await.

use async_trait::async_trait;
use blindpoll_core::document;
use blindpoll_core::{PollError, PollId, PollResult, PollSnapshot, PollStoreEffects, UpdateBatch};
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::Semaphore;

/// In-memory store for deterministic testing.
#[derive(Debug, Clone)]
pub struct MemoryPollStore {
    poll: PollId,
    state: Arc<Mutex<MemoryState>>,
}

#[derive(Debug)]
struct MemoryState {
    document: Value,
    failing_fetches: usize,
    failing_writes: usize,
    fetches: usize,
    applied: Vec<UpdateBatch>,
    fetch_gate: Option<Arc<Semaphore>>,
}

/// Releases fetches held by [`MemoryPollStore::hold_fetches`].
#[derive(Debug, Clone)]
pub struct FetchGate {
    permits: Arc<Semaphore>,
}

impl FetchGate {
    /// Let `count` held fetches return.
    pub fn release(&self, count: usize) {
        self.permits.add_permits(count);
    }
}

impl MemoryPollStore {
    /// Store over an arbitrary document.
    pub fn new(document: Value, poll: PollId) -> Self {
        Self {
            poll,
            state: Arc::new(Mutex::new(MemoryState {
                document,
                failing_fetches: 0,
                failing_writes: 0,
                fetches: 0,
                applied: Vec::new(),
                fetch_gate: None,
            })),
        }
    }

    /// Store holding `snapshot` as poll 0.
    pub fn with_snapshot(snapshot: &PollSnapshot) -> Self {
        let document = document::document_with_poll(snapshot).unwrap();
        Self::new(document, PollId::default())
    }

    /// Document holding `polls` in order, serving the poll at `poll`.
    pub fn with_polls(polls: &[PollSnapshot], poll: PollId) -> Self {
        let polls = polls
            .iter()
            .map(|snapshot| serde_json::to_value(snapshot).unwrap())
            .collect();
        Self::new(serde_json::json!({ "polls": Value::Array(polls) }), poll)
    }

    /// Make the next `count` fetches fail as unreachable.
    pub fn fail_next_fetches(&self, count: usize) {
        self.state.lock().failing_fetches = count;
    }

    /// Make the next `count` writes fail.
    pub fn fail_next_writes(&self, count: usize) {
        self.state.lock().failing_writes = count;
    }

    /// Hold every fetch after it has read the document until released.
    pub fn hold_fetches(&self) -> FetchGate {
        let permits = Arc::new(Semaphore::new(0));
        self.state.lock().fetch_gate = Some(permits.clone());
        FetchGate { permits }
    }

    /// Stop holding fetches started from now on.
    pub fn resume_fetches(&self) {
        self.state.lock().fetch_gate = None;
    }

    /// Current poll state, bypassing failure injection and counters.
    pub fn snapshot(&self) -> PollSnapshot {
        document::read_snapshot(&self.state.lock().document, self.poll).unwrap()
    }

    /// Replace the stored poll, e.g. to simulate another writer.
    pub fn update_snapshot(&self, change: impl FnOnce(&mut PollSnapshot)) {
        let mut state = self.state.lock();
        let mut snapshot = document::read_snapshot(&state.document, self.poll).unwrap();
        change(&mut snapshot);
        document::write_snapshot(&mut state.document, self.poll, &snapshot).unwrap();
    }

    /// Raw document.
    pub fn document(&self) -> Value {
        self.state.lock().document.clone()
    }

    /// Number of fetches attempted, failed ones included.
    pub fn fetch_count(&self) -> usize {
        self.state.lock().fetches
    }

    /// Batches applied successfully, in order.
    pub fn applied_batches(&self) -> Vec<UpdateBatch> {
        self.state.lock().applied.clone()
    }
}

#[async_trait]
impl PollStoreEffects for MemoryPollStore {
    fn poll(&self) -> PollId {
        self.poll
    }

    async fn fetch_current_poll(&self) -> PollResult<PollSnapshot> {
        let (snapshot, gate) = {
            let mut state = self.state.lock();
            state.fetches += 1;
            if state.failing_fetches > 0 {
                state.failing_fetches -= 1;
                return Err(PollError::unreachable("injected fetch failure"));
            }
            let snapshot = document::read_snapshot(&state.document, self.poll)?;
            (snapshot, state.fetch_gate.clone())
        };

        if let Some(gate) = gate {
            gate.acquire()
                .await
                .map_err(|_| PollError::unreachable("fetch gate closed"))?
                .forget();
        }

        Ok(snapshot)
    }

    async fn apply_update(&self, batch: &UpdateBatch) -> PollResult<()> {
        let mut state = self.state.lock();
        if state.failing_writes > 0 {
            state.failing_writes -= 1;
            return Err(PollError::storage("injected write failure"));
        }
        document::apply_batch(&mut state.document, batch)?;
        state.applied.push(batch.clone());
        Ok(())
    }
}

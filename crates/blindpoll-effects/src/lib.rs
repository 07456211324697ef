//! # Blind Poll Effects - Production Handlers
//!
//! Stateless or self-contained implementations of the effect traits defined in
//! `blindpoll-core`:
//!
//! - [`FileDocumentStore`]: JSON document on disk with atomic batch writes
//! - [`PushIdGenerator`]: chronologically sortable insertion keys
//! - [`ConsoleNotifier`] and [`TracingNotifier`]: user message sinks
//! - [`PollEffectSystem`]: bundles one handler per trait
//!
//! Mock handlers belong in `blindpoll-testkit`.

#![forbid(unsafe_code)]

/// File-backed JSON document store
pub mod file_store;

/// User message sinks
pub mod notify;

/// Push-id insertion keys
pub mod push_id;

/// Handler bundle implementing the composed bound
pub mod system;

pub use file_store::FileDocumentStore;
pub use notify::{ConsoleNotifier, TracingNotifier};
pub use push_id::{PushIdGenerator, PUSH_ID_LEN};
pub use system::PollEffectSystem;

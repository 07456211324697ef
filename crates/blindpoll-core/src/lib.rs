//! # Blind Poll Core
//!
//! Types and pure logic behind the interactive blind poll: the poll snapshot
//! fetched from the realtime store, vote validation, and construction of the
//! update batch that records a vote.
//!
//! ## What Belongs Here
//!
//! - Snapshot, selection, auth key and update batch types
//! - The four vote rules and their rejection reasons
//! - Batch construction from a validated vote
//! - Effect traits for the store, insertion keys and user notification
//! - JSON document helpers shared by store handlers
//!
//! ## What Does NOT Belong Here
//!
//! - Effect handler implementations (belong in blindpoll-effects)
//! - Submission orchestration and form state (belong in blindpoll-widget)
//! - Mock handlers (belong in blindpoll-testkit)
//!
//! Validation and batch construction share one snapshot by construction:
//! [`validate`] returns a [`ValidVote`] that borrows the snapshot, and the
//! batch is built from that value.

#![forbid(unsafe_code)]

/// Update batches and their construction
pub mod batch;

/// JSON document view of the store
pub mod document;

/// Effect interfaces consumed by the pipeline
pub mod effects;

/// Unified error type
pub mod errors;

/// User-facing message texts
pub mod messages;

/// Store paths
pub mod path;

/// Poll snapshot and user input types
pub mod snapshot;

/// Vote rules
pub mod validation;

pub use batch::{build_update_batch, UpdateBatch};
pub use effects::{InsertionKeyEffects, NotificationEffects, PollEffects, PollStoreEffects};
pub use errors::{PollError, PollResult};
pub use path::{PollId, StorePath};
pub use snapshot::{AuthKey, PollItem, PollKey, PollSnapshot, Selection, AUTH_KEY_LEN};
pub use validation::{validate, Rejection, ValidVote, REQUIRED_VOTES};

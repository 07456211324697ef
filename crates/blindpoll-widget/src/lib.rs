//! # Blind Poll Widget
//!
//! Interactive poll widget built on the effect interfaces of
//! `blindpoll-core`.
//!
//! ## Architecture Constraints
//!
//! This crate depends on:
//! - **blindpoll-core**: types, vote rules, batch construction, effect traits
//!
//! Handlers are injected by the caller as one `Arc<E: PollEffects>`; the
//! widget never constructs a store client itself.
//!
//! ## Key Pieces
//!
//! - **Form**: checkbox options and key field derived from the initial poll
//! - **Submission**: fetch → validate → build → write, one user message per run
//! - **Widget**: initial load plus submissions from the current form state

#![forbid(unsafe_code)]

/// Widget configuration
pub mod config;

/// Checkbox and key field model
pub mod form;

/// Vote submission pipeline
pub mod submission;

/// Widget lifecycle
pub mod widget;

pub use config::{ConfigError, WidgetConfig};
pub use form::{PollForm, PollOption};
pub use submission::{
    SubmissionInput, SubmissionOutcome, SubmissionPhase, SubmissionReport, VoteSubmitter,
};
pub use widget::PollWidget;

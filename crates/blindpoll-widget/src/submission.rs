//! Vote submission pipeline
//!
//! One run per click: fetch a fresh snapshot, validate the input against it,
//! build the update batch from that same snapshot, and apply the batch. Write
//! paths are rooted at the poll the store read the snapshot from. Every
//! run ends back in [`SubmissionPhase::Idle`] with exactly one user message
//! (except a run refused by the single-flight guard, which shows none).
//!
//! ```text
//! Idle -> Fetching -> Validating -> Building -> Writing -> Idle
//!            |            |            |           |
//!            +------------+------------+-----------+-----> Idle
//! ```
//!
//! The only suspension points are the fetch and the write. Nothing is retried
//! and nothing can be cancelled once started. Without `single_flight`,
//! overlapping runs are independent and may both pass validation against the
//! same pre-write snapshot.

use crate::config::WidgetConfig;
use blindpoll_core::messages;
use blindpoll_core::{
    validate, AuthKey, NotificationEffects, PollEffects, PollError, PollStoreEffects, Rejection,
    Selection, UpdateBatch,
};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

/// User input captured when the submit button is clicked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionInput {
    selection: Selection,
    auth_key: AuthKey,
}

impl SubmissionInput {
    /// Pair a selection with the typed key.
    pub fn new(selection: Selection, auth_key: AuthKey) -> Self {
        Self {
            selection,
            auth_key,
        }
    }

    /// Checked item names.
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Typed key.
    pub fn auth_key(&self) -> &AuthKey {
        &self.auth_key
    }
}

/// Pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubmissionPhase {
    /// Waiting for a click
    Idle,
    /// Reading the current snapshot
    Fetching,
    /// Checking the vote rules
    Validating,
    /// Drawing insertion keys and assembling writes
    Building,
    /// Applying the batch to the store
    Writing,
}

/// How a submission ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// Batch written
    Accepted {
        /// Writes that were applied
        batch: UpdateBatch,
    },
    /// A vote rule failed
    Rejected(Rejection),
    /// Snapshot fetch failed
    Unreachable(PollError),
    /// Batch write failed
    WriteFailed(PollError),
    /// Batch construction hit a broken invariant
    Defect(PollError),
    /// Another submission from this widget is still running
    AlreadyInFlight,
}

impl SubmissionOutcome {
    /// Whether the vote was recorded.
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }
}

/// Result of one submission run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionReport {
    /// How the run ended
    pub outcome: SubmissionOutcome,
    /// Phases entered, starting and ending with `Idle`
    pub phases: Vec<SubmissionPhase>,
}

/// Runs the submission pipeline against injected effects.
pub struct VoteSubmitter<E: PollEffects> {
    effects: Arc<E>,
    config: WidgetConfig,
    in_flight: AtomicBool,
    next_submission: AtomicU64,
}

impl<E: PollEffects> VoteSubmitter<E> {
    /// Create a submitter.
    pub fn new(effects: Arc<E>, config: WidgetConfig) -> Self {
        Self {
            effects,
            config,
            in_flight: AtomicBool::new(false),
            next_submission: AtomicU64::new(1),
        }
    }

    /// Get the effect system
    pub fn effects(&self) -> &Arc<E> {
        &self.effects
    }

    /// Active configuration.
    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    /// Run one submission to completion.
    pub async fn submit(&self, input: SubmissionInput) -> SubmissionReport {
        let id = self.next_submission.fetch_add(1, Ordering::Relaxed);
        let mut trace = PhaseTrace::new(id);

        let _in_flight = if self.config.single_flight {
            match InFlight::acquire(&self.in_flight) {
                Some(guard) => Some(guard),
                None => {
                    tracing::debug!(submission = id, "submission refused, another is in flight");
                    return trace.finish(SubmissionOutcome::AlreadyInFlight);
                }
            }
        } else {
            None
        };

        trace.enter(SubmissionPhase::Fetching);
        let snapshot = match self.effects.fetch_current_poll().await {
            Ok(snapshot) => snapshot,
            Err(error) => {
                tracing::warn!(submission = id, %error, "failed to fetch poll snapshot");
                self.effects.notify(messages::CHECK_CONNECTION).await;
                return trace.finish(SubmissionOutcome::Unreachable(error));
            }
        };

        trace.enter(SubmissionPhase::Validating);
        let vote = match validate(&snapshot, &input.selection, &input.auth_key) {
            Ok(vote) => vote,
            Err(rejection) => {
                tracing::info!(submission = id, %rejection, "vote rejected");
                self.effects
                    .notify(&messages::rejection_message(&rejection))
                    .await;
                return trace.finish(SubmissionOutcome::Rejected(rejection));
            }
        };

        trace.enter(SubmissionPhase::Building);
        let batch = match vote.build(self.effects.poll(), &*self.effects) {
            Ok(batch) => batch,
            Err(error) => {
                tracing::error!(
                    submission = id,
                    %error,
                    defect = error.is_defect(),
                    "failed to build update batch for a validated vote"
                );
                self.effects.notify(messages::VOTE_FAILED).await;
                return trace.finish(SubmissionOutcome::Defect(error));
            }
        };

        trace.enter(SubmissionPhase::Writing);
        match self.effects.apply_update(&batch).await {
            Ok(()) => {
                tracing::info!(submission = id, writes = batch.len(), "vote recorded");
                self.effects.notify(messages::VOTE_ACCEPTED).await;
                trace.finish(SubmissionOutcome::Accepted { batch })
            }
            Err(error) => {
                tracing::warn!(submission = id, %error, "failed to apply update batch");
                self.effects.notify(messages::VOTE_FAILED).await;
                trace.finish(SubmissionOutcome::WriteFailed(error))
            }
        }
    }
}

/// Phases visited by one run, logged as they are entered.
struct PhaseTrace {
    submission: u64,
    phases: Vec<SubmissionPhase>,
}

impl PhaseTrace {
    fn new(submission: u64) -> Self {
        Self {
            submission,
            phases: vec![SubmissionPhase::Idle],
        }
    }

    fn enter(&mut self, phase: SubmissionPhase) {
        tracing::trace!(submission = self.submission, ?phase, "entering phase");
        self.phases.push(phase);
    }

    fn finish(mut self, outcome: SubmissionOutcome) -> SubmissionReport {
        self.enter(SubmissionPhase::Idle);
        SubmissionReport {
            outcome,
            phases: self.phases,
        }
    }
}

/// Clears the in-flight flag when the run ends, however it ends.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

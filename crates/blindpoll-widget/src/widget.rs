//! Widget lifecycle: initial load, then any number of submissions.

use crate::config::WidgetConfig;
use crate::form::PollForm;
use crate::submission::{SubmissionReport, VoteSubmitter};
use blindpoll_core::messages;
use blindpoll_core::{NotificationEffects, PollEffects, PollResult, PollStoreEffects};
use std::sync::Arc;

/// A loaded poll widget.
pub struct PollWidget<E: PollEffects> {
    submitter: VoteSubmitter<E>,
    form: PollForm,
}

impl<E: PollEffects> PollWidget<E> {
    /// Fetch the poll once and derive the form from it.
    ///
    /// On failure the user is told the poll could not be loaded and no widget
    /// is returned.
    pub async fn load(effects: Arc<E>, config: WidgetConfig) -> PollResult<Self> {
        let snapshot = match effects.fetch_current_poll().await {
            Ok(snapshot) => snapshot,
            Err(error) => {
                tracing::warn!(%error, poll = %effects.poll(), "failed to load poll");
                effects.notify(messages::LOAD_FAILED).await;
                return Err(error);
            }
        };

        let form = PollForm::from_snapshot(&snapshot);
        tracing::debug!(
            poll = %effects.poll(),
            options = form.options().len(),
            "poll widget loaded"
        );

        Ok(Self {
            submitter: VoteSubmitter::new(effects, config),
            form,
        })
    }

    /// Form state.
    pub fn form(&self) -> &PollForm {
        &self.form
    }

    /// Mutable form state for input events.
    pub fn form_mut(&mut self) -> &mut PollForm {
        &mut self.form
    }

    /// Submission pipeline.
    pub fn submitter(&self) -> &VoteSubmitter<E> {
        &self.submitter
    }

    /// Submit what the form currently holds. The form is left as is.
    pub async fn submit(&self) -> SubmissionReport {
        self.submitter.submit(self.form.input()).await
    }
}

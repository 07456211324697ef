//! Vote command
//!
//! Checks the named options on a freshly loaded widget, types the key and
//! clicks submit once. The user message is printed by the console notifier.

use super::effect_system;
use crate::config::CliConfig;
use anyhow::{bail, Result};
use blindpoll_widget::{PollWidget, SubmissionOutcome};

/// Submit one vote. Fails unless the vote was recorded.
pub async fn run(config: &CliConfig, choices: &[String], key: &str) -> Result<()> {
    let effects = effect_system(config);
    let mut widget = PollWidget::load(effects, config.widget.clone()).await?;

    for choice in choices {
        if !widget.form_mut().check(choice) {
            bail!("No poll option named {choice:?}");
        }
    }
    widget.form_mut().set_auth_key(key);

    let report = widget.submit().await;
    tracing::debug!(phases = ?report.phases, "submission finished");

    match report.outcome {
        SubmissionOutcome::Accepted { .. } => Ok(()),
        SubmissionOutcome::Rejected(rejection) => bail!("Vote rejected: {rejection}"),
        SubmissionOutcome::Unreachable(error)
        | SubmissionOutcome::WriteFailed(error)
        | SubmissionOutcome::Defect(error) => bail!("Vote not recorded: {error}"),
        SubmissionOutcome::AlreadyInFlight => bail!("Another vote is still being submitted"),
    }
}

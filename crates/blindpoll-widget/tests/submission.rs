//! Submission pipeline integration tests.

use assert_matches::assert_matches;
use blindpoll_core::{document, messages};
use blindpoll_core::{AuthKey, PollError, PollId, Rejection, Selection, StorePath};
use blindpoll_testkit::{
    mock_effects, mock_effects_with_store, record_vote, scenario_snapshot, snapshot_with,
    MemoryPollStore, MockPollEffects, SCENARIO_KEY,
};
use blindpoll_widget::{
    PollWidget, SubmissionInput, SubmissionOutcome, SubmissionPhase, VoteSubmitter, WidgetConfig,
};
use std::sync::Arc;

use SubmissionPhase::{Building, Fetching, Idle, Validating, Writing};

fn input(selected: &[&str], key: &str) -> SubmissionInput {
    SubmissionInput::new(
        Selection::from_checked(selected.iter().copied()),
        AuthKey::new(key),
    )
}

fn submitter(effects: &Arc<MockPollEffects>) -> VoteSubmitter<MockPollEffects> {
    VoteSubmitter::new(effects.clone(), WidgetConfig::default())
}

#[tokio::test]
async fn test_scenario_vote_is_recorded() {
    let effects = mock_effects(&scenario_snapshot());
    let report = submitter(&effects)
        .submit(input(&["A", "C"], SCENARIO_KEY))
        .await;

    let batch = assert_matches!(report.outcome, SubmissionOutcome::Accepted { batch } => batch);
    let writes: Vec<(String, &str)> = batch
        .iter()
        .map(|(path, value)| (path.to_string(), value))
        .collect();
    assert_eq!(
        writes,
        vec![
            ("polls/0/items/0/votes/k1".to_string(), SCENARIO_KEY),
            ("polls/0/items/2/votes/k2".to_string(), SCENARIO_KEY),
        ]
    );
    assert_eq!(
        report.phases,
        vec![Idle, Fetching, Validating, Building, Writing, Idle]
    );
    assert_eq!(
        effects.notifier().messages(),
        vec![messages::VOTE_ACCEPTED.to_string()]
    );

    let after = effects.store().snapshot();
    assert!(after.items[0].has_vote_from(SCENARIO_KEY));
    assert!(!after.items[1].has_vote_from(SCENARIO_KEY));
    assert!(after.items[2].has_vote_from(SCENARIO_KEY));
}

#[tokio::test]
async fn test_votes_land_in_the_poll_that_was_read() {
    let first_poll = snapshot_with(&["X", "Y", "Z"], &[SCENARIO_KEY]);
    let store = MemoryPollStore::with_polls(&[first_poll.clone(), scenario_snapshot()], PollId(1));
    let effects = mock_effects_with_store(store);

    let report = submitter(&effects)
        .submit(input(&["A", "C"], SCENARIO_KEY))
        .await;

    let batch = assert_matches!(report.outcome, SubmissionOutcome::Accepted { batch } => batch);
    let paths: Vec<String> = batch.paths().map(StorePath::to_string).collect();
    assert_eq!(
        paths,
        vec!["polls/1/items/0/votes/k1", "polls/1/items/2/votes/k2"]
    );

    let voted = effects.store().snapshot();
    assert!(voted.items[0].has_vote_from(SCENARIO_KEY));
    assert!(voted.items[2].has_vote_from(SCENARIO_KEY));
    let untouched = document::read_snapshot(&effects.store().document(), PollId(0)).unwrap();
    assert_eq!(untouched, first_poll);

    // The key is now spent in the poll it was used for.
    let again = submitter(&effects)
        .submit(input(&["A", "B"], SCENARIO_KEY))
        .await;
    assert_eq!(
        again.outcome,
        SubmissionOutcome::Rejected(Rejection::InvalidOrUsedKey)
    );
}

#[tokio::test]
async fn test_insertion_keys_are_scoped_to_item_votes() {
    let effects = mock_effects(&scenario_snapshot());
    submitter(&effects)
        .submit(input(&["C", "B"], SCENARIO_KEY))
        .await;

    let scopes: Vec<String> = effects
        .keys()
        .scopes()
        .iter()
        .map(StorePath::to_string)
        .collect();
    assert_eq!(scopes, vec!["polls/0/items/2/votes", "polls/0/items/1/votes"]);
}

#[tokio::test]
async fn test_three_votes_rejected() {
    let effects = mock_effects(&scenario_snapshot());
    let report = submitter(&effects)
        .submit(input(&["A", "B", "C"], SCENARIO_KEY))
        .await;

    assert_eq!(
        report.outcome,
        SubmissionOutcome::Rejected(Rejection::WrongVoteCount { actual: 3 })
    );
    assert_eq!(report.phases, vec![Idle, Fetching, Validating, Idle]);
    assert_eq!(
        effects.notifier().last().unwrap(),
        "Du hast zwei Stimmen ! Du hast aber 3 checkboxen aktiviert."
    );
    assert!(effects.store().applied_batches().is_empty());
    assert_eq!(effects.keys().issued(), 0);
}

#[tokio::test]
async fn test_short_key_rejected_with_length() {
    let effects = mock_effects(&scenario_snapshot());
    let report = submitter(&effects)
        .submit(input(&["A", "B"], "ABCDEFGH"))
        .await;

    assert_eq!(
        report.outcome,
        SubmissionOutcome::Rejected(Rejection::InvalidKeyLength { actual: 8 })
    );
    assert_eq!(
        effects.notifier().last().unwrap(),
        "Dein Truhenschluessel muss exakt 16 Zeichen haben, aktuell hast du 8 Zeichen."
    );
}

#[tokio::test]
async fn test_key_cannot_be_used_twice() {
    let effects = mock_effects(&scenario_snapshot());
    let submitter = submitter(&effects);

    let first = submitter.submit(input(&["A", "B"], SCENARIO_KEY)).await;
    let second = submitter.submit(input(&["B", "C"], SCENARIO_KEY)).await;

    assert!(first.outcome.is_accepted());
    assert_eq!(
        second.outcome,
        SubmissionOutcome::Rejected(Rejection::InvalidOrUsedKey)
    );
    assert_eq!(
        effects.notifier().messages(),
        vec![
            messages::VOTE_ACCEPTED.to_string(),
            messages::INVALID_OR_USED_KEY.to_string(),
        ]
    );
    assert_eq!(effects.store().snapshot().vote_count_for(SCENARIO_KEY), 2);
}

#[tokio::test]
async fn test_every_submission_fetches_fresh_state() {
    let effects = mock_effects(&scenario_snapshot());
    let submitter = submitter(&effects);

    // Another client spends the key between page load and click.
    effects
        .store()
        .update_snapshot(|snapshot| record_vote(snapshot, "B", SCENARIO_KEY));

    let report = submitter.submit(input(&["A", "C"], SCENARIO_KEY)).await;

    assert_eq!(
        report.outcome,
        SubmissionOutcome::Rejected(Rejection::InvalidOrUsedKey)
    );
    assert_eq!(effects.store().fetch_count(), 1);
}

#[tokio::test]
async fn test_fetch_failure_reports_connectivity() {
    let effects = mock_effects(&scenario_snapshot());
    effects.store().fail_next_fetches(1);

    let report = submitter(&effects)
        .submit(input(&["A", "C"], SCENARIO_KEY))
        .await;

    assert_matches!(
        report.outcome,
        SubmissionOutcome::Unreachable(PollError::NetworkUnreachable { .. })
    );
    assert_eq!(report.phases, vec![Idle, Fetching, Idle]);
    assert_eq!(
        effects.notifier().messages(),
        vec![messages::CHECK_CONNECTION.to_string()]
    );
}

#[tokio::test]
async fn test_write_failure_is_not_retried() {
    let effects = mock_effects(&scenario_snapshot());
    effects.store().fail_next_writes(1);
    let submitter = submitter(&effects);

    let failed = submitter.submit(input(&["A", "C"], SCENARIO_KEY)).await;

    assert_matches!(failed.outcome, SubmissionOutcome::WriteFailed(_));
    assert_eq!(
        failed.phases,
        vec![Idle, Fetching, Validating, Building, Writing, Idle]
    );
    assert_eq!(
        effects.notifier().last().unwrap(),
        messages::VOTE_FAILED
    );
    assert_eq!(effects.store().fetch_count(), 1);
    assert_eq!(effects.store().snapshot(), scenario_snapshot());

    // A fresh click starts over and succeeds.
    let retried = submitter.submit(input(&["A", "C"], SCENARIO_KEY)).await;
    assert!(retried.outcome.is_accepted());
}

#[tokio::test]
async fn test_unknown_item_is_a_defect() {
    let effects = mock_effects(&scenario_snapshot());
    let report = submitter(&effects)
        .submit(input(&["A", "Z"], SCENARIO_KEY))
        .await;

    let error = assert_matches!(report.outcome, SubmissionOutcome::Defect(error) => error);
    assert!(error.is_defect());
    assert_eq!(
        report.phases,
        vec![Idle, Fetching, Validating, Building, Idle]
    );
    assert_eq!(
        effects.notifier().messages(),
        vec![messages::VOTE_FAILED.to_string()]
    );
    assert!(effects.store().applied_batches().is_empty());
}

#[tokio::test]
async fn test_overlapping_submissions_can_double_spend_a_key() {
    let effects = mock_effects(&scenario_snapshot());
    let submitter = submitter(&effects);
    let gate = effects.store().hold_fetches();

    let (first, second, ()) = tokio::join!(
        submitter.submit(input(&["A", "B"], SCENARIO_KEY)),
        submitter.submit(input(&["B", "C"], SCENARIO_KEY)),
        async { gate.release(2) },
    );

    assert!(first.outcome.is_accepted());
    assert!(second.outcome.is_accepted());
    assert_eq!(effects.store().snapshot().vote_count_for(SCENARIO_KEY), 4);
}

#[tokio::test]
async fn test_single_flight_refuses_overlapping_submission() {
    let effects = mock_effects(&scenario_snapshot());
    let config = WidgetConfig {
        single_flight: true,
        ..WidgetConfig::default()
    };
    let submitter = VoteSubmitter::new(effects.clone(), config);
    let gate = effects.store().hold_fetches();

    let (first, second, ()) = tokio::join!(
        submitter.submit(input(&["A", "B"], SCENARIO_KEY)),
        submitter.submit(input(&["B", "C"], SCENARIO_KEY)),
        async { gate.release(1) },
    );

    assert!(first.outcome.is_accepted());
    assert_eq!(second.outcome, SubmissionOutcome::AlreadyInFlight);
    assert_eq!(second.phases, vec![Idle, Idle]);
    assert_eq!(effects.notifier().messages().len(), 1);
    assert_eq!(effects.store().snapshot().vote_count_for(SCENARIO_KEY), 2);

    // The guard is released once the first run ends.
    effects.store().resume_fetches();
    let third = submitter.submit(input(&["B", "C"], SCENARIO_KEY)).await;
    assert_eq!(
        third.outcome,
        SubmissionOutcome::Rejected(Rejection::InvalidOrUsedKey)
    );
}

#[tokio::test]
async fn test_widget_load_failure_notifies() {
    let effects = mock_effects(&scenario_snapshot());
    effects.store().fail_next_fetches(1);

    let result = PollWidget::load(effects.clone(), WidgetConfig::default()).await;

    assert!(result.is_err());
    assert_eq!(
        effects.notifier().messages(),
        vec![messages::LOAD_FAILED.to_string()]
    );
}

#[tokio::test]
async fn test_widget_submits_form_state() {
    let effects = mock_effects(&scenario_snapshot());
    let mut widget = PollWidget::load(effects.clone(), WidgetConfig::default())
        .await
        .unwrap();

    let ids: Vec<&str> = widget.form().options().iter().map(|o| o.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b", "c"]);

    widget.form_mut().check("B");
    widget.form_mut().check("C");
    widget.form_mut().set_auth_key(SCENARIO_KEY);
    let report = widget.submit().await;

    assert!(report.outcome.is_accepted());
    let after = effects.store().snapshot();
    assert!(after.items[1].has_vote_from(SCENARIO_KEY));
    assert!(after.items[2].has_vote_from(SCENARIO_KEY));
    assert_eq!(effects.store().fetch_count(), 2);
}

//! Effect-free vote validation.
//!
//! Rules run in a fixed order and the first failure is reported:
//!
//! 1. exactly [`REQUIRED_VOTES`] items selected
//! 2. auth key is [`AUTH_KEY_LEN`] characters long
//! 3. auth key was issued for the poll
//! 4. auth key has not voted on any item yet

use crate::batch::{build_update_batch, UpdateBatch};
use crate::effects::InsertionKeyEffects;
use crate::errors::PollResult;
use crate::path::PollId;
use crate::snapshot::{AuthKey, PollSnapshot, Selection, AUTH_KEY_LEN};
use serde::{Deserialize, Serialize};

/// Number of items every ballot must select.
pub const REQUIRED_VOTES: usize = 2;

/// Why a vote was refused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum Rejection {
    /// Selection size differs from [`REQUIRED_VOTES`]
    #[error("expected {} votes, got {actual}", REQUIRED_VOTES)]
    WrongVoteCount {
        /// Number of items selected
        actual: usize,
    },

    /// Auth key length differs from [`AUTH_KEY_LEN`]
    #[error("auth key must have {} characters, got {actual}", AUTH_KEY_LEN)]
    InvalidKeyLength {
        /// Characters in the submitted key
        actual: usize,
    },

    /// Auth key was never issued or has already voted
    #[error("auth key is unknown or already used")]
    InvalidOrUsedKey,
}

/// A vote that passed every rule against one specific snapshot.
///
/// Holds borrows of the inputs it checked, so the batch can only be built from
/// the very snapshot that was validated.
#[derive(Debug, Clone, Copy)]
pub struct ValidVote<'a> {
    snapshot: &'a PollSnapshot,
    selection: &'a Selection,
    auth_key: &'a AuthKey,
}

impl<'a> ValidVote<'a> {
    /// Snapshot the vote was checked against.
    pub fn snapshot(&self) -> &'a PollSnapshot {
        self.snapshot
    }

    /// Validated selection.
    pub fn selection(&self) -> &'a Selection {
        self.selection
    }

    /// Validated auth key.
    pub fn auth_key(&self) -> &'a AuthKey {
        self.auth_key
    }

    /// Build the store writes for this vote.
    pub fn build<K>(&self, poll: PollId, keys: &K) -> PollResult<UpdateBatch>
    where
        K: InsertionKeyEffects + ?Sized,
    {
        build_update_batch(poll, self.snapshot, self.selection, self.auth_key, keys)
    }
}

/// Run all rules. Pure: nothing is logged or shown to the user here.
pub fn validate<'a>(
    snapshot: &'a PollSnapshot,
    selection: &'a Selection,
    auth_key: &'a AuthKey,
) -> Result<ValidVote<'a>, Rejection> {
    check_vote_count(selection)?;
    check_key_length(auth_key)?;
    check_key_permission(snapshot, auth_key)?;

    Ok(ValidVote {
        snapshot,
        selection,
        auth_key,
    })
}

/// Rule 1.
pub fn check_vote_count(selection: &Selection) -> Result<(), Rejection> {
    match selection.len() {
        REQUIRED_VOTES => Ok(()),
        actual => Err(Rejection::WrongVoteCount { actual }),
    }
}

/// Rule 2.
pub fn check_key_length(auth_key: &AuthKey) -> Result<(), Rejection> {
    match auth_key.char_len() {
        AUTH_KEY_LEN => Ok(()),
        actual => Err(Rejection::InvalidKeyLength { actual }),
    }
}

/// Rules 3 and 4. Both failures read the same to the user.
pub fn check_key_permission(snapshot: &PollSnapshot, auth_key: &AuthKey) -> Result<(), Rejection> {
    let key = auth_key.as_str();
    if snapshot.is_issued_key(key) && !snapshot.is_consumed_key(key) {
        Ok(())
    } else {
        Err(Rejection::InvalidOrUsedKey)
    }
}

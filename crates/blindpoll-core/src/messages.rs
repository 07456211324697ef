//! User-facing message texts.

use crate::validation::Rejection;

/// Shown after the batch was written.
pub const VOTE_ACCEPTED: &str = "Deine Abstimmung war erfolgreich !";

/// Shown when the write fails, or when building the batch hits a defect.
pub const VOTE_FAILED: &str =
    "Deine Abstimmung war nicht erfolgreich, bitte versuche es spaeter nochmal !";

/// Shown when the snapshot fetch for a submission fails.
pub const CHECK_CONNECTION: &str = "Bitte prüfe deine Internetverbindung ...";

/// Shown when the initial poll load fails.
pub const LOAD_FAILED: &str =
    "Die Daten fuer die Abstimmung konnten nicht geladen werden, ist deine Internetverbindung ok ?";

/// Shown for rules 3 and 4.
pub const INVALID_OR_USED_KEY: &str =
    "Dein Truhenschluessel ist ungueltig oder wurde schon benutzt !";

/// Message for a refused vote, including the offending count.
pub fn rejection_message(rejection: &Rejection) -> String {
    match rejection {
        Rejection::WrongVoteCount { actual } => {
            format!("Du hast zwei Stimmen ! Du hast aber {actual} checkboxen aktiviert.")
        }
        Rejection::InvalidKeyLength { actual } => format!(
            "Dein Truhenschluessel muss exakt 16 Zeichen haben, aktuell hast du {actual} Zeichen."
        ),
        Rejection::InvalidOrUsedKey => INVALID_OR_USED_KEY.to_string(),
    }
}

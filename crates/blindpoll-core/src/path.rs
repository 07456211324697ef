//! Store paths.
//!
//! The store is a tree addressed by `/`-separated paths. Polls live under
//! `polls/{poll_id}`; each item's votes collection under
//! `polls/{poll_id}/items/{index}/votes`.

use crate::errors::{PollError, PollResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of a poll under the `polls` collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PollId(pub u32);

impl PollId {
    /// Highest poll id a new document may be created for. Lower slots of the
    /// `polls` array are filled with nulls, so this bounds the document size.
    pub const MAX: PollId = PollId(1024);

    /// Reject ids above [`PollId::MAX`].
    pub fn check_bounds(self) -> PollResult<Self> {
        if self > Self::MAX {
            return Err(PollError::invalid(format!(
                "poll id {self} exceeds the maximum of {}",
                Self::MAX
            )));
        }
        Ok(self)
    }
}

impl fmt::Display for PollId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A fully-qualified path into the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct StorePath {
    segments: Vec<String>,
}

impl StorePath {
    /// Root of the `polls` collection.
    pub fn polls() -> Self {
        Self {
            segments: vec!["polls".to_string()],
        }
    }

    /// `polls/{poll}`
    pub fn poll(poll: PollId) -> Self {
        Self::polls().child(poll.0.to_string())
    }

    /// `polls/{poll}/items/{index}/votes`
    pub fn votes(poll: PollId, item_index: usize) -> Self {
        Self::poll(poll)
            .child("items")
            .child(item_index.to_string())
            .child("votes")
    }

    /// Append one segment.
    pub fn child(mut self, segment: impl Into<String>) -> Self {
        self.segments.push(segment.into());
        self
    }

    /// Parse a `/`-separated path. Leading, trailing and doubled slashes are ignored.
    pub fn parse(raw: &str) -> PollResult<Self> {
        let segments: Vec<String> = raw
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
            .collect();

        if segments.is_empty() {
            return Err(PollError::invalid(format!("empty store path: {raw:?}")));
        }

        Ok(Self { segments })
    }

    /// Path segments from the root.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Last segment.
    pub fn leaf(&self) -> &str {
        self.segments.last().map(String::as_str).unwrap_or_default()
    }

    /// Whether `self` lies strictly below `ancestor`.
    pub fn is_descendant_of(&self, ancestor: &StorePath) -> bool {
        self.segments.len() > ancestor.segments.len()
            && self.segments.starts_with(&ancestor.segments)
    }
}

impl fmt::Display for StorePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("/"))
    }
}

impl From<StorePath> for String {
    fn from(path: StorePath) -> Self {
        path.to_string()
    }
}

impl TryFrom<String> for StorePath {
    type Error = PollError;

    fn try_from(raw: String) -> PollResult<Self> {
        Self::parse(&raw)
    }
}

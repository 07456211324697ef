//! Poll form model
//!
//! The data side of the rendered widget: one checkbox per poll item plus the
//! auth key text field. The rendering layer owns element creation and layout;
//! it reads [`PollOption`]s from here and feeds clicks and keystrokes back.

use crate::submission::SubmissionInput;
use blindpoll_core::{AuthKey, PollSnapshot, Selection};

/// Element id of the auth key input.
pub const AUTH_KEY_FIELD_ID: &str = "pollAuthKey";

/// Form name of the auth key input.
pub const AUTH_KEY_FIELD_NAME: &str = "truhenschluessel-eingabe";

/// Label text in front of the auth key input.
pub const AUTH_KEY_LABEL: &str = "Truhenschluessel : ";

/// Text of the submit button.
pub const SUBMIT_LABEL: &str = "Absenden";

/// One checkbox.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollOption {
    /// Element id and name
    pub id: String,
    /// Text shown next to the box
    pub label: String,
    /// Item name submitted when checked
    pub value: String,
}

impl PollOption {
    /// Checkbox for the item called `name`.
    pub fn for_item(name: &str) -> Self {
        Self {
            id: option_id(name),
            label: name.to_string(),
            value: name.to_string(),
        }
    }
}

/// Element id for an item name: lower-cased, first space replaced by a dash.
pub fn option_id(name: &str) -> String {
    name.to_lowercase().replacen(' ', "-", 1)
}

/// Checkbox states and key field contents for one widget.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PollForm {
    options: Vec<PollOption>,
    checked: Vec<bool>,
    auth_key: String,
}

impl PollForm {
    /// One unchecked option per item, in storage order.
    pub fn from_snapshot(snapshot: &PollSnapshot) -> Self {
        let options: Vec<PollOption> = snapshot.item_names().map(PollOption::for_item).collect();
        let checked = vec![false; options.len()];
        Self {
            options,
            checked,
            auth_key: String::new(),
        }
    }

    /// Options in display order.
    pub fn options(&self) -> &[PollOption] {
        &self.options
    }

    /// Set the box at `index`. Returns false if there is no such box.
    pub fn set_checked(&mut self, index: usize, checked: bool) -> bool {
        match self.checked.get_mut(index) {
            Some(slot) => {
                *slot = checked;
                true
            }
            None => false,
        }
    }

    /// Flip the box at `index`. Returns its new state, or `None` if absent.
    pub fn toggle(&mut self, index: usize) -> Option<bool> {
        let slot = self.checked.get_mut(index)?;
        *slot = !*slot;
        Some(*slot)
    }

    /// Check the first box whose value is `value`.
    pub fn check(&mut self, value: &str) -> bool {
        match self.options.iter().position(|option| option.value == value) {
            Some(index) => self.set_checked(index, true),
            None => false,
        }
    }

    /// Whether the box at `index` is checked.
    pub fn is_checked(&self, index: usize) -> bool {
        self.checked.get(index).copied().unwrap_or(false)
    }

    /// Values of checked boxes in display order.
    pub fn checked_values(&self) -> Vec<&str> {
        self.options
            .iter()
            .zip(&self.checked)
            .filter(|(_, checked)| **checked)
            .map(|(option, _)| option.value.as_str())
            .collect()
    }

    /// Number of checked boxes.
    pub fn checked_count(&self) -> usize {
        self.checked.iter().filter(|checked| **checked).count()
    }

    /// Replace the key field contents. Taken verbatim, not trimmed.
    pub fn set_auth_key(&mut self, raw: impl Into<String>) {
        self.auth_key = raw.into();
    }

    /// Key field contents.
    pub fn auth_key(&self) -> &str {
        &self.auth_key
    }

    /// Uncheck everything and empty the key field.
    pub fn reset(&mut self) {
        self.checked.iter_mut().for_each(|checked| *checked = false);
        self.auth_key.clear();
    }

    /// Read the form at click time.
    pub fn input(&self) -> SubmissionInput {
        SubmissionInput::new(
            Selection::from_checked(self.checked_values()),
            AuthKey::new(self.auth_key.clone()),
        )
    }
}

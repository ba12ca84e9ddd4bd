use serde::Deserialize;

use super::form::{FieldErrors, Form, FormLimits, clean_text};
use crate::store::Entry;

/// Submitted fields of the new-entry and edit-entry forms.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EntryForm {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryFields {
    pub text: String,
}

impl Form for EntryForm {
    type Valid = EntryFields;

    fn validate(&self, limits: &FormLimits) -> Result<EntryFields, FieldErrors> {
        let mut errors = FieldErrors::default();
        match clean_text("text", &self.text, limits.entry_text_max, &mut errors) {
            Some(text) => Ok(EntryFields { text }),
            None => Err(errors),
        }
    }
}

/// Pre-fills the form with the current text of an entry being edited.
impl From<&Entry> for EntryForm {
    fn from(entry: &Entry) -> Self {
        Self {
            text: entry.text.clone(),
        }
    }
}

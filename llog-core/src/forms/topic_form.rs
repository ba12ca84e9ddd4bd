use serde::Deserialize;

use super::form::{FieldErrors, Form, FormLimits, clean_text};

/// Submitted fields of the new-topic form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TopicForm {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicFields {
    pub text: String,
}

impl Form for TopicForm {
    type Valid = TopicFields;

    fn validate(&self, limits: &FormLimits) -> Result<TopicFields, FieldErrors> {
        let mut errors = FieldErrors::default();
        match clean_text("text", &self.text, limits.topic_text_max, &mut errors) {
            Some(text) => Ok(TopicFields { text }),
            None => Err(errors),
        }
    }
}

//! Shared form machinery: the [`Form`] trait, per-field error collection and
//! the text-field cleaning rule used by both topic and entry forms.
use std::collections::BTreeMap;

pub const REQUIRED_MESSAGE: &str = "This field is required.";

/// Maximum lengths, in characters, of the text fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormLimits {
    pub topic_text_max: usize,
    pub entry_text_max: usize,
}

impl Default for FormLimits {
    fn default() -> Self {
        Self {
            topic_text_max: 200,
            entry_text_max: 10_000,
        }
    }
}

/// A form as it arrives from the request: nothing submitted yet, or the raw
/// submitted fields.
#[derive(Debug, Clone)]
pub enum FormState<F> {
    Blank,
    Submitted(F),
}

/// Raw submitted fields that can be checked into a validated shape.
pub trait Form {
    type Valid;

    fn validate(&self, limits: &FormLimits) -> Result<Self::Valid, FieldErrors>;
}

/// Messages keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    fields: BTreeMap<&'static str, Vec<String>>,
}

impl FieldErrors {
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.fields.entry(field).or_default().push(message.into());
    }

    /// Messages for one field; empty when the field is valid.
    pub fn get(&self, field: &str) -> &[String] {
        self.fields.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

}

/// Strips surrounding whitespace and checks a required text field against `max`
/// characters. Problems are recorded under `field`.
pub(crate) fn clean_text(
    field: &'static str,
    value: &str,
    max: usize,
    errors: &mut FieldErrors,
) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        errors.add(field, REQUIRED_MESSAGE);
        return None;
    }
    let length = value.chars().count();
    if length > max {
        errors.add(
            field,
            format!("Ensure this value has at most {max} characters (it has {length})."),
        );
        return None;
    }
    Some(value.to_string())
}

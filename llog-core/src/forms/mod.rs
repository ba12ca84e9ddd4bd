mod entry_form;
mod form;
mod topic_form;

pub use entry_form::{EntryFields, EntryForm};
pub use form::{FieldErrors, Form, FormLimits, FormState};
pub use topic_form::{TopicFields, TopicForm};

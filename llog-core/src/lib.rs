pub mod config;
pub mod forms;
pub mod store;

pub use config::Config;
pub use forms::{EntryForm, FieldErrors, Form, FormLimits, FormState, TopicForm};
pub use store::{Entry, RecordStore, SqliteStore, StoreError, Topic};

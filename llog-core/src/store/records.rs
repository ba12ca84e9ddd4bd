use chrono::{DateTime, Utc};
use strum_macros::Display;

/// Top-level grouping of entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topic {
    pub id: i64,
    pub text: String,
    pub date_added: DateTime<Utc>,
}

/// A note that belongs to exactly one [`Topic`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub id: i64,
    pub topic_id: i64,
    pub text: String,
    pub date_added: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum RecordKind {
    Topic,
    Entry,
}

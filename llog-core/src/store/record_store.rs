use chrono::{DateTime, Utc};
use std::{path::PathBuf, sync::Arc};

use super::records::{Entry, RecordKind, Topic};

pub type StoreResult<T> = Result<T, StoreError>;

/// Source of `date_added` timestamps for new records.
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{kind} {id} does not exist")]
    NotFound { kind: RecordKind, id: i64 },
    #[error("stored timestamp {0} is out of range")]
    InvalidTimestamp(i64),
    #[error("creating directory {}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("opening database {}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

/// Persistence for topics and their entries.
///
/// Handlers only see this trait, so the backing store is chosen once at startup
/// and shared through an `Arc<dyn RecordStore>`.
pub trait RecordStore: Send + Sync {
    /// All topics, oldest first.
    fn list_topics(&self) -> StoreResult<Vec<Topic>>;

    fn get_topic(&self, id: i64) -> StoreResult<Topic>;

    /// Entries of one topic, newest first.
    fn list_entries(&self, topic_id: i64) -> StoreResult<Vec<Entry>>;

    fn get_entry(&self, id: i64) -> StoreResult<Entry>;

    fn create_topic(&self, text: &str) -> StoreResult<Topic>;

    /// Fails with [`StoreError::NotFound`] when `topic_id` does not name a topic.
    fn create_entry(&self, topic_id: i64, text: &str) -> StoreResult<Entry>;

    /// Replaces the text of an entry. Id, topic and `date_added` are kept.
    fn update_entry(&self, id: i64, text: &str) -> StoreResult<Entry>;
}

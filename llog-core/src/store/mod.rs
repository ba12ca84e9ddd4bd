mod record_store;
mod records;
mod sqlite;

pub use record_store::{Clock, RecordStore, StoreError, StoreResult};
pub use records::{Entry, RecordKind, Topic};
pub use sqlite::SqliteStore;

//! SQLite-backed [`RecordStore`].
//!
//! Timestamps are stored as microseconds since the Unix epoch so that ordering
//! by `date_added` is a plain integer comparison.
use chrono::{DateTime, SubsecRound, Utc};
use parking_lot::Mutex;
use rusqlite::{Connection, OptionalExtension, Row, params};
use std::{fs, path::Path, sync::Arc};

use super::record_store::{Clock, RecordStore, StoreError, StoreResult};
use super::records::{Entry, RecordKind, Topic};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS topics (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    text        TEXT NOT NULL,
    date_added  INTEGER NOT NULL
);
CREATE TABLE IF NOT EXISTS entries (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    topic_id    INTEGER NOT NULL REFERENCES topics(id) ON DELETE CASCADE,
    text        TEXT NOT NULL,
    date_added  INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS entries_topic_id ON entries(topic_id);
";

type TopicRow = (i64, String, i64);
type EntryRow = (i64, i64, String, i64);

pub struct SqliteStore {
    conn: Mutex<Connection>,
    clock: Clock,
}

impl SqliteStore {
    /// Opens or creates the database at `path`, creating parent directories and
    /// the schema when missing.
    pub fn open(path: &Path) -> StoreResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| StoreError::CreateDir {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }
        let conn = Connection::open(path).map_err(|source| StoreError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "opened database");
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> StoreResult<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    /// Replaces the source of `date_added` timestamps.
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    fn with_connection(conn: Connection) -> StoreResult<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
            clock: Arc::new(Utc::now),
        })
    }

    // Truncated to what the database keeps, so returned records match later reads.
    fn now(&self) -> DateTime<Utc> {
        (self.clock)().trunc_subsecs(6)
    }
}

impl RecordStore for SqliteStore {
    fn list_topics(&self) -> StoreResult<Vec<Topic>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT id, text, date_added FROM topics ORDER BY date_added ASC, id ASC",
        )?;
        let rows = stmt.query_map([], topic_row)?;
        let topics = rows
            .map(|row| into_topic(row?))
            .collect::<StoreResult<Vec<_>>>()?;
        Ok(topics)
    }

    fn get_topic(&self, id: i64) -> StoreResult<Topic> {
        let conn = self.conn.lock();
        fetch_topic(&conn, id)
    }

    fn list_entries(&self, topic_id: i64) -> StoreResult<Vec<Entry>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT id, topic_id, text, date_added FROM entries
             WHERE topic_id = ?1
             ORDER BY date_added DESC, id DESC",
        )?;
        let rows = stmt.query_map([topic_id], entry_row)?;
        let entries = rows
            .map(|row| into_entry(row?))
            .collect::<StoreResult<Vec<_>>>()?;
        Ok(entries)
    }

    fn get_entry(&self, id: i64) -> StoreResult<Entry> {
        let conn = self.conn.lock();
        fetch_entry(&conn, id)
    }

    fn create_topic(&self, text: &str) -> StoreResult<Topic> {
        let date_added = self.now();
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO topics (text, date_added) VALUES (?1, ?2)",
            params![text, date_added.timestamp_micros()],
        )?;
        Ok(Topic {
            id: conn.last_insert_rowid(),
            text: text.to_string(),
            date_added,
        })
    }

    fn create_entry(&self, topic_id: i64, text: &str) -> StoreResult<Entry> {
        let date_added = self.now();
        let conn = self.conn.lock();
        fetch_topic(&conn, topic_id)?;
        conn.execute(
            "INSERT INTO entries (topic_id, text, date_added) VALUES (?1, ?2, ?3)",
            params![topic_id, text, date_added.timestamp_micros()],
        )?;
        Ok(Entry {
            id: conn.last_insert_rowid(),
            topic_id,
            text: text.to_string(),
            date_added,
        })
    }

    fn update_entry(&self, id: i64, text: &str) -> StoreResult<Entry> {
        let conn = self.conn.lock();
        let changed = conn.execute(
            "UPDATE entries SET text = ?1 WHERE id = ?2",
            params![text, id],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound {
                kind: RecordKind::Entry,
                id,
            });
        }
        fetch_entry(&conn, id)
    }
}

fn fetch_topic(conn: &Connection, id: i64) -> StoreResult<Topic> {
    let row = conn
        .query_row(
            "SELECT id, text, date_added FROM topics WHERE id = ?1",
            [id],
            topic_row,
        )
        .optional()?;
    match row {
        Some(row) => into_topic(row),
        None => Err(StoreError::NotFound {
            kind: RecordKind::Topic,
            id,
        }),
    }
}

fn fetch_entry(conn: &Connection, id: i64) -> StoreResult<Entry> {
    let row = conn
        .query_row(
            "SELECT id, topic_id, text, date_added FROM entries WHERE id = ?1",
            [id],
            entry_row,
        )
        .optional()?;
    match row {
        Some(row) => into_entry(row),
        None => Err(StoreError::NotFound {
            kind: RecordKind::Entry,
            id,
        }),
    }
}

fn topic_row(row: &Row<'_>) -> rusqlite::Result<TopicRow> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?))
}

fn entry_row(row: &Row<'_>) -> rusqlite::Result<EntryRow> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
}

fn into_topic((id, text, micros): TopicRow) -> StoreResult<Topic> {
    Ok(Topic {
        id,
        text,
        date_added: from_micros(micros)?,
    })
}

fn into_entry((id, topic_id, text, micros): EntryRow) -> StoreResult<Entry> {
    Ok(Entry {
        id,
        topic_id,
        text,
        date_added: from_micros(micros)?,
    })
}

fn from_micros(micros: i64) -> StoreResult<DateTime<Utc>> {
    DateTime::from_timestamp_micros(micros).ok_or(StoreError::InvalidTimestamp(micros))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::common::{at, mk_store};
    use tempfile::tempdir;

    #[test]
    fn empty_store_lists_nothing() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert!(store.list_topics().unwrap().is_empty());
        assert!(store.list_entries(1).unwrap().is_empty());
    }

    #[test]
    fn create_topic_assigns_id_and_timestamp() {
        let store = mk_store(vec![at(0)]);
        let topic = store.create_topic("Chess").unwrap();

        assert_eq!(topic.text, "Chess");
        assert_eq!(topic.date_added, at(0));
        assert_eq!(store.get_topic(topic.id).unwrap(), topic);
    }

    #[test]
    fn list_topics_is_oldest_first_regardless_of_insertion_order() {
        let store = mk_store(vec![at(30), at(10), at(20)]);
        store.create_topic("third").unwrap();
        store.create_topic("first").unwrap();
        store.create_topic("second").unwrap();

        let texts: Vec<String> = store
            .list_topics()
            .unwrap()
            .into_iter()
            .map(|t| t.text)
            .collect();
        assert_eq!(texts, ["first", "second", "third"]);
    }

    #[test]
    fn list_entries_is_newest_first_and_scoped_to_topic() {
        let store = mk_store(vec![at(0), at(1), at(5), at(3), at(4), at(9)]);
        let chess = store.create_topic("Chess").unwrap();
        let go = store.create_topic("Go").unwrap();
        store.create_entry(chess.id, "middle").unwrap();
        store.create_entry(chess.id, "oldest").unwrap();
        store.create_entry(go.id, "other topic").unwrap();
        store.create_entry(chess.id, "newest").unwrap();

        let entries = store.list_entries(chess.id).unwrap();
        let texts: Vec<&str> = entries.iter().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, ["newest", "middle", "oldest"]);
        assert!(entries.iter().all(|e| e.topic_id == chess.id));
    }

    #[test]
    fn same_timestamp_falls_back_to_id_order() {
        let store = mk_store(vec![at(0), at(0), at(1), at(1)]);
        let a = store.create_topic("a").unwrap();
        store.create_topic("b").unwrap();
        store.create_entry(a.id, "first").unwrap();
        store.create_entry(a.id, "second").unwrap();

        let topics = store.list_topics().unwrap();
        assert_eq!(topics[0].text, "a");
        assert_eq!(topics[1].text, "b");
        let entries = store.list_entries(a.id).unwrap();
        assert_eq!(entries[0].text, "second");
        assert_eq!(entries[1].text, "first");
    }

    #[test]
    fn get_missing_records_is_not_found() {
        let store = SqliteStore::open_in_memory().unwrap();
        let err = store.get_topic(999).unwrap_err();
        assert!(matches!(
            err,
            StoreError::NotFound {
                kind: RecordKind::Topic,
                id: 999
            }
        ));
        assert!(store.get_entry(999).unwrap_err().is_not_found());
    }

    #[test]
    fn create_entry_for_missing_topic_writes_nothing() {
        let store = mk_store(vec![at(0), at(1)]);
        let err = store.create_entry(42, "orphan").unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "topic 42 does not exist");

        let topic = store.create_topic("Chess").unwrap();
        assert!(store.list_entries(topic.id).unwrap().is_empty());
        assert!(store.list_entries(42).unwrap().is_empty());
    }

    #[test]
    fn update_entry_replaces_only_text() {
        let store = mk_store(vec![at(0), at(1)]);
        let topic = store.create_topic("Chess").unwrap();
        let entry = store.create_entry(topic.id, "Opening theory").unwrap();

        let updated = store
            .update_entry(entry.id, "Opening theory revised")
            .unwrap();
        assert_eq!(updated.id, entry.id);
        assert_eq!(updated.topic_id, topic.id);
        assert_eq!(updated.date_added, entry.date_added);
        assert_eq!(updated.text, "Opening theory revised");
        assert_eq!(store.get_entry(entry.id).unwrap(), updated);
    }

    #[test]
    fn update_missing_entry_is_not_found() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert!(store.update_entry(7, "text").unwrap_err().is_not_found());
    }

    #[test]
    fn records_survive_reopening_the_file() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("nested").join("llog.sqlite3");

        let (topic, entry) = {
            let store = SqliteStore::open(&path).unwrap();
            let topic = store.create_topic("Chess").unwrap();
            let entry = store.create_entry(topic.id, "Opening theory").unwrap();
            (topic, entry)
        };

        let store = SqliteStore::open(&path).unwrap();
        assert_eq!(store.list_topics().unwrap(), vec![topic]);
        assert_eq!(store.list_entries(entry.topic_id).unwrap(), vec![entry]);
    }
}

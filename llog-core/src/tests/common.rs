use crate::store::{Clock, SqliteStore};
use chrono::{DateTime, Duration, TimeZone, Utc};
use parking_lot::Mutex;
use std::{collections::VecDeque, sync::Arc};

/// A fixed instant shifted by `minutes`, for readable timestamp fixtures.
pub fn at(minutes: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 8, 15, 12, 0, 0).unwrap() + Duration::minutes(minutes)
}

/// A clock that hands out `times` in order, one per created record.
pub fn scripted_clock(times: Vec<DateTime<Utc>>) -> Clock {
    let queue = Mutex::new(VecDeque::from(times));
    Arc::new(move || {
        queue
            .lock()
            .pop_front()
            .expect("scripted clock ran out of timestamps")
    })
}

/// In-memory store whose records get `times` as their `date_added`.
pub fn mk_store(times: Vec<DateTime<Utc>>) -> SqliteStore {
    SqliteStore::open_in_memory()
        .expect("in-memory store")
        .with_clock(scripted_clock(times))
}

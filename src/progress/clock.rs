//! Date keys and the clock the engine reads "today" from
//!
//! Every daily aggregate (score rows, streaks, quest rotation) is keyed by a
//! calendar day, never by a rolling 24h window.
//! - Day keys: "YYYY-MM-DD"

use std::sync::Mutex;

use chrono::{DateTime, Days, Local, NaiveDate, Utc};

/// Source of the current time.
pub trait Clock: Send + Sync {
    /// Current instant.
    fn now(&self) -> DateTime<Utc>;

    /// Calendar day the player is currently in.
    fn today(&self) -> NaiveDate;
}

/// Wall clock, with days resolved in the local time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// A clock that only moves when told to. Days are taken from the UTC date.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// Start at noon UTC on the given day.
    pub fn on_day(day: NaiveDate) -> Self {
        let noon = day
            .and_hms_opt(12, 0, 0)
            .map(|dt| dt.and_utc())
            .unwrap_or_else(Utc::now);
        Self::new(noon)
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock().expect("clock lock poisoned") = now;
    }

    pub fn advance_days(&self, days: u64) {
        let mut now = self.now.lock().expect("clock lock poisoned");
        if let Some(next) = now.checked_add_days(Days::new(days)) {
            *now = next;
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().expect("clock lock poisoned")
    }

    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Format a day as its "YYYY-MM-DD" key.
pub fn day_key(day: NaiveDate) -> String {
    day.format("%Y-%m-%d").to_string()
}

/// Parse a "YYYY-MM-DD" key. Also accepts a full RFC 3339 timestamp and keeps
/// its date part, which is how older profiles stored `lastScoreUpdate`.
pub fn parse_day_key(key: &str) -> Option<NaiveDate> {
    let key = key.trim();
    if let Ok(day) = NaiveDate::parse_from_str(key, "%Y-%m-%d") {
        return Some(day);
    }
    DateTime::parse_from_rfc3339(key)
        .ok()
        .map(|dt| dt.with_timezone(&Utc).date_naive())
}

pub fn is_same_day(a: NaiveDate, b: NaiveDate) -> bool {
    a == b
}

/// True when `later` is exactly one calendar day after `earlier`.
pub fn is_next_day(earlier: NaiveDate, later: NaiveDate) -> bool {
    earlier.succ_opt() == Some(later)
}

/// Whole calendar days from `earlier` to `later` (negative if reversed).
pub fn days_between(earlier: NaiveDate, later: NaiveDate) -> i64 {
    (later - earlier).num_days()
}

/// First day of a window of `days` calendar days ending on `today` inclusive.
pub fn window_start(today: NaiveDate, days: u32) -> NaiveDate {
    let span = u64::from(days.max(1) - 1);
    today.checked_sub_days(Days::new(span)).unwrap_or(NaiveDate::MIN)
}

//! Shared test utilities for progression tests
#![allow(dead_code)]

use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::{bail, Result};
use chrono::NaiveDate;
use marquee::progress::clock::ManualClock;
use marquee::progress::quests::{DailyQuest, DailyQuestEngine};
use marquee::storage::{FileStorage, MemoryStorage, ProfileStorage, SqliteStorage};
use marquee::ProgressEngine;

/// An empty quest catalogue, so quest rewards never move the score
pub static NO_QUESTS: &[DailyQuest] = &[];

pub fn day(n: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 1).unwrap() + chrono::Days::new(u64::from(n) - 1)
}

/// Engine over `storage` with a clock fixed on day `n`
pub fn engine_with(storage: Arc<dyn ProfileStorage>, n: u32) -> (ProgressEngine, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::on_day(day(n)));
    let engine = ProgressEngine::new(storage, clock.clone()).with_rng_seed(7);
    (engine, clock)
}

/// In-memory engine without quests
pub fn scoring_engine(n: u32) -> (ProgressEngine, Arc<ManualClock>) {
    let (engine, clock) = engine_with(Arc::new(MemoryStorage::new()), n);
    (engine.with_quests(DailyQuestEngine::with_catalogue(NO_QUESTS)), clock)
}

pub fn file_storage(dir: &Path) -> Arc<dyn ProfileStorage> {
    Arc::new(FileStorage::new(dir).expect("Failed to open file storage"))
}

pub fn sqlite_storage(dir: &Path) -> Arc<dyn ProfileStorage> {
    Arc::new(SqliteStorage::open(&dir.join("profile.db")).expect("Failed to open sqlite storage"))
}

/// Sum of the catalogue points of every unlocked achievement
pub fn unlocked_points(engine: &ProgressEngine, unlocked: &[String]) -> u32 {
    unlocked
        .iter()
        .filter_map(|id| engine.achievements().get(id))
        .map(|a| a.points)
        .sum()
}

/// Memory storage whose writes can be made to fail
pub struct FlakyStorage {
    inner: MemoryStorage,
    /// Writes still allowed, `usize::MAX` for unlimited
    writes_left: AtomicUsize,
}

impl FlakyStorage {
    pub fn new() -> Self {
        Self {
            inner: MemoryStorage::new(),
            writes_left: AtomicUsize::new(usize::MAX),
        }
    }

    /// Let `n` more writes through, then fail every write.
    pub fn allow_writes(&self, n: usize) {
        self.writes_left.store(n, Ordering::SeqCst);
    }

    pub fn heal(&self) {
        self.writes_left.store(usize::MAX, Ordering::SeqCst);
    }
}

impl ProfileStorage for FlakyStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        self.inner.read(key)
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        let left = self.writes_left.load(Ordering::SeqCst);
        if left == 0 {
            bail!("disk full");
        }
        if left != usize::MAX {
            self.writes_left.store(left - 1, Ordering::SeqCst);
        }
        self.inner.write(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.inner.remove(key)
    }
}

/// Memory storage that moves the clock to the next day during a read,
/// as if midnight passed while a profile was being loaded.
pub struct MidnightStorage {
    inner: MemoryStorage,
    clock: Arc<ManualClock>,
    armed: AtomicBool,
}

impl MidnightStorage {
    pub fn new(clock: Arc<ManualClock>) -> Self {
        Self {
            inner: MemoryStorage::new(),
            clock,
            armed: AtomicBool::new(false),
        }
    }

    /// Advance the clock by one day on the next read only.
    pub fn arm(&self) {
        self.armed.store(true, Ordering::SeqCst);
    }
}

impl ProfileStorage for MidnightStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let value = self.inner.read(key)?;
        if self.armed.swap(false, Ordering::SeqCst) {
            self.clock.advance_days(1);
        }
        Ok(value)
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        self.inner.write(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.inner.remove(key)
    }
}

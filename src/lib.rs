//! Marquee - progression engine for a movie-trivia game hub
//!
//! Every mini-game reports its outcome as a [`ScoreEvent`]. The engine keeps
//! one persisted player profile with:
//!
//! 1. **Score**: a running total plus one row per calendar day.
//! 2. **Streak**: consecutive days with at least one recorded event.
//! 3. **Achievements**: permanent unlocks with point values.
//! 4. **Daily quests**: three objectives per day, each paying out once.
//!
//! Storage is pluggable (JSON file, SQLite, memory) behind
//! [`storage::ProfileStorage`].

pub mod config;
pub mod progress;
pub mod storage;

pub use progress::{
    CompletedQuest, CounterUpdate, GameId, Outcome, Profile, ProgressEngine, ProgressEvent,
    ProgressOutcome, ScoreEvent, UnlockedAchievement, AVATARS,
};

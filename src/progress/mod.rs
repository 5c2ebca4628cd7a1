//! Player progression for the movie-trivia hub
//!
//! Tracks total and per-day score, the daily play streak, achievements and
//! daily quests in a single persisted profile.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐  ScoreEvent   ┌────────────────┐
//! │  mini-games  │ ────────────▶ │ ProgressEngine │
//! └──────────────┘               └───────┬────────┘
//!                                        │ record → streak → achievements → quests
//!                                        ▼
//!                                 ┌──────────────┐
//!                                 │ ProfileStore │ ──▶ storage["movieGameProfile"]
//!                                 └──────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! let engine = ProgressEngine::from_config(&Config::load()?)?;
//!
//! // A round of the poster game was won
//! let outcome = engine.record(&ScoreEvent::win(GameId::Poster, 40))?;
//! for event in &outcome.events {
//!     show_toast(event);
//! }
//! ```

pub mod achievements;
pub mod clock;
mod error;
mod identity;
pub mod leaderboard;
mod models;
pub mod quests;
mod recorder;
mod store;
pub mod streaks;

pub use error::{EventError, IdentityError, RuleError};
pub use identity::{validate_avatar, validate_username, MAX_USERNAME_CHARS};
pub use models::{
    counters, AchievementState, CounterUpdate, DailyActivity, DailyQuestState, DailyScore,
    DailyScores, GameCounters, GameId, Outcome, Profile, ScoreEvent, Stats, StreakState, AVATARS,
    DEFAULT_USERNAME, PROFILE_VERSION, STORAGE_KEY,
};
pub use recorder::{validate, RecordedScore, ScoreRecorder, ValidatedEvent, MAX_POINTS_DELTA};
pub use store::ProfileStore;
pub use streaks::StreakTransition;

use std::sync::{Arc, Mutex};

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::Config;
use crate::storage::ProfileStorage;
use achievements::{Achievement, AchievementEngine, AchievementStatus};
use clock::Clock;
use leaderboard::LeaderboardView;
use quests::{DailyQuest, DailyQuestEngine, QuestStatus};

/// An achievement that was just unlocked
#[derive(Debug, Clone)]
pub struct UnlockedAchievement {
    pub achievement: &'static Achievement,
    pub unlocked_at: DateTime<Utc>,
}

/// A daily quest that was just completed
#[derive(Debug, Clone)]
pub struct CompletedQuest {
    pub quest: &'static DailyQuest,
    pub completed_at: DateTime<Utc>,
}

/// Things worth telling the player about, in the order they happened
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    StreakChanged(StreakTransition),
    QuestsRotated { day: NaiveDate, quest_ids: Vec<String> },
    AchievementUnlocked(UnlockedAchievement),
    QuestCompleted(CompletedQuest),
}

/// Result of a `record` or `refresh` call
#[derive(Debug, Clone)]
pub struct ProgressOutcome {
    /// The persisted profile after the call
    pub profile: Profile,
    /// Day the call was attributed to
    pub day: NaiveDate,
    pub events: Vec<ProgressEvent>,
}

impl ProgressOutcome {
    pub fn newly_unlocked(&self) -> Vec<&'static Achievement> {
        self.events
            .iter()
            .filter_map(|e| match e {
                ProgressEvent::AchievementUnlocked(u) => Some(u.achievement),
                _ => None,
            })
            .collect()
    }

    pub fn newly_completed(&self) -> Vec<&'static DailyQuest> {
        self.events
            .iter()
            .filter_map(|e| match e {
                ProgressEvent::QuestCompleted(c) => Some(c.quest),
                _ => None,
            })
            .collect()
    }
}

/// Central entry point for progression
///
/// Coordinates the score recorder and the achievement and quest passes over
/// one profile store.
pub struct ProgressEngine {
    store: ProfileStore,
    recorder: ScoreRecorder,
    achievements: AchievementEngine,
    quests: DailyQuestEngine,
    rng: Mutex<StdRng>,
    leaderboard_days: u32,
}

impl ProgressEngine {
    pub fn new(storage: Arc<dyn ProfileStorage>, clock: Arc<dyn Clock>) -> Self {
        let store = ProfileStore::new(storage, clock);
        Self {
            recorder: ScoreRecorder::new(store.clone()),
            store,
            achievements: AchievementEngine::new(),
            quests: DailyQuestEngine::new(),
            rng: Mutex::new(StdRng::from_entropy()),
            leaderboard_days: leaderboard::DEFAULT_WINDOW_DAYS,
        }
    }

    /// Build an engine from the configured storage backend and settings
    pub fn from_config(config: &Config) -> Result<Self> {
        let storage = config.storage.backend.open(&config.data_dir())?;
        Ok(Self::new(storage, Arc::new(clock::SystemClock))
            .clamp_total_at_zero(config.scoring.clamp_total_at_zero)
            .leaderboard_days(config.leaderboard.window_days))
    }

    pub fn clamp_total_at_zero(mut self, clamp: bool) -> Self {
        self.recorder = self.recorder.clamp_total_at_zero(clamp);
        self.quests = self.quests.clamp_total_at_zero(clamp);
        self
    }

    pub fn leaderboard_days(mut self, days: u32) -> Self {
        self.leaderboard_days = days.max(1);
        self
    }

    /// Deterministic quest selection
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng = Mutex::new(StdRng::seed_from_u64(seed));
        self
    }

    pub fn with_achievements(mut self, achievements: AchievementEngine) -> Self {
        self.achievements = achievements;
        self.store = self.store.with_achievements(achievements);
        self.recorder = ScoreRecorder::new(self.store.clone())
            .clamp_total_at_zero(self.recorder.is_clamping());
        self
    }

    pub fn with_quests(mut self, quests: DailyQuestEngine) -> Self {
        self.quests = quests.clamp_total_at_zero(self.recorder.is_clamping());
        self
    }

    pub fn store(&self) -> &ProfileStore {
        &self.store
    }

    pub fn achievements(&self) -> &AchievementEngine {
        &self.achievements
    }

    pub fn quests(&self) -> &DailyQuestEngine {
        &self.quests
    }

    /// Current profile snapshot
    pub fn profile(&self) -> Result<Profile> {
        self.store.load()
    }

    /// Record a score event, then run the achievement and quest passes
    ///
    /// Once the score is committed this never fails. If the passes cannot be
    /// saved, the committed profile is returned without their events and the
    /// next `record` or `refresh` catches up.
    pub fn record(&self, event: &ScoreEvent) -> Result<ProgressOutcome> {
        let recorded = self.recorder.record(event)?;

        let mut events = Vec::new();
        if recorded.streak.count().is_some() {
            events.push(ProgressEvent::StreakChanged(recorded.streak));
        }

        let mut outcome = match self.run_passes(&recorded.profile, recorded.day) {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!(
                    "Score on {} saved, but achievement and quest checks failed: {:#}",
                    recorded.day,
                    e
                );
                ProgressOutcome {
                    profile: recorded.profile,
                    day: recorded.day,
                    events: Vec::new(),
                }
            }
        };
        events.append(&mut outcome.events);
        outcome.events = events;
        Ok(outcome)
    }

    /// Run the achievement and quest passes without recording anything,
    /// e.g. when the hub page opens on a new day.
    pub fn refresh(&self) -> Result<ProgressOutcome> {
        let profile = self.store.load()?;
        let today = self.store.clock().today();
        self.run_passes(&profile, today)
    }

    /// Change the displayed username and avatar
    pub fn set_identity(&self, username: &str, avatar: &str) -> Result<Profile> {
        let username = validate_username(username)?;
        let avatar = validate_avatar(avatar)?;
        self.store.update(|profile| {
            profile.username = username;
            profile.avatar = avatar;
            Ok(())
        })
    }

    /// Delete all progress
    pub fn reset(&self) -> Result<()> {
        self.store.reset()
    }

    pub fn leaderboard(&self) -> Result<LeaderboardView> {
        let profile = self.store.load()?;
        let today = self.store.clock().today();
        Ok(leaderboard::recent_days(&profile, today, self.leaderboard_days))
    }

    pub fn achievement_progress(&self) -> Result<Vec<AchievementStatus>> {
        Ok(self.achievements.progress(&self.store.load()?))
    }

    pub fn quest_statuses(&self) -> Result<Vec<QuestStatus>> {
        Ok(self.quests.statuses(&self.store.load()?))
    }

    /// Streak as it should be shown today
    pub fn display_streak(&self) -> Result<u32> {
        let profile = self.store.load()?;
        Ok(streaks::display_streak(
            &profile.stats.streak,
            self.store.clock().today(),
        ))
    }

    /// Quest rotation, achievements, quest completion, and achievements again
    /// if a quest completed. Only writes when something would change.
    fn run_passes(&self, snapshot: &Profile, day: NaiveDate) -> Result<ProgressOutcome> {
        let needs_write = self.quests.needs_rotation(snapshot, day)
            || !self.quests.pending(snapshot, day).is_empty()
            || !self.achievements.pending(snapshot).is_empty();
        if !needs_write {
            return Ok(ProgressOutcome {
                profile: snapshot.clone(),
                day,
                events: Vec::new(),
            });
        }

        let clock = self.store.clock().clone();
        let (profile, (today, events)) = self.store.update_with(|profile| {
            let today = clock.today();
            let now = clock.now();
            let mut events = Vec::new();

            let mut rng = self.rng.lock().expect("quest rng lock poisoned");
            if self.quests.ensure_todays_quests(profile, today, &mut *rng) {
                events.push(ProgressEvent::QuestsRotated {
                    day: today,
                    quest_ids: profile.daily_quests.quest_ids.clone(),
                });
            }
            drop(rng);

            self.unlock_achievements(profile, now, &mut events);

            let completed = self.quests.check_completion(profile, today);
            if !completed.is_empty() {
                events.extend(completed.into_iter().map(|quest| {
                    ProgressEvent::QuestCompleted(CompletedQuest {
                        quest,
                        completed_at: now,
                    })
                }));
                self.unlock_achievements(profile, now, &mut events);
            }

            Ok((today, events))
        })?;

        Ok(ProgressOutcome {
            profile,
            day: today,
            events,
        })
    }

    fn unlock_achievements(
        &self,
        profile: &mut Profile,
        now: DateTime<Utc>,
        events: &mut Vec<ProgressEvent>,
    ) {
        events.extend(self.achievements.evaluate(profile).into_iter().map(|achievement| {
            ProgressEvent::AchievementUnlocked(UnlockedAchievement {
                achievement,
                unlocked_at: now,
            })
        }));
    }
}

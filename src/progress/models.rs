//! Profile data model
//!
//! Everything here round-trips through JSON as plain nested data: no behaviour
//! is serialized. Achievement and quest definitions live in code and are
//! referenced from the profile by id only.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Storage key the profile document is persisted under.
pub const STORAGE_KEY: &str = "movieGameProfile";

/// Current profile schema version.
pub const PROFILE_VERSION: u32 = 2;

pub const DEFAULT_USERNAME: &str = "Player";

/// Avatars a player can pick from.
pub const AVATARS: &[&str] = &["🎬", "🍿", "🎥", "🌟", "🎭", "🎮", "🚀", "🌈"];

/// Well-known per-game counter names.
pub mod counters {
    /// Finished rounds (wins + losses)
    pub const PLAYS: &str = "plays";
    pub const WINS: &str = "wins";
    pub const LOSSES: &str = "losses";
    /// Net points earned in this game
    pub const POINTS: &str = "points";
    pub const CORRECT_GUESSES: &str = "correctGuesses";
    pub const HIGH_SCORE: &str = "highScore";
    /// Best accuracy in percent (rating game)
    pub const ACCURACY: &str = "accuracy";
    /// Non-zero once a timed challenge was finished
    pub const COMPLETED: &str = "completed";
}

// ============================================================
// GAMES & EVENTS
// ============================================================

/// The mini-games that may report scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameId {
    Guesser,
    Criteria,
    Poster,
    Rating,
    TimedChallenge,
    OscarWins,
    Quote,
}

impl GameId {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Guesser => "guesser",
            Self::Criteria => "criteria",
            Self::Poster => "poster",
            Self::Rating => "rating",
            Self::TimedChallenge => "timed_challenge",
            Self::OscarWins => "oscar_wins",
            Self::Quote => "quote",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "guesser" => Some(Self::Guesser),
            "criteria" => Some(Self::Criteria),
            "poster" => Some(Self::Poster),
            "rating" => Some(Self::Rating),
            "timed_challenge" => Some(Self::TimedChallenge),
            "oscar_wins" => Some(Self::OscarWins),
            "quote" => Some(Self::Quote),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Guesser => "Movie Guesser",
            Self::Criteria => "Criteria Challenge",
            Self::Poster => "Poster Reveal",
            Self::Rating => "Rating Guesser",
            Self::TimedChallenge => "Timed Challenge",
            Self::OscarWins => "Oscar Wins",
            Self::Quote => "Movie Quotes",
        }
    }

    pub fn all() -> &'static [GameId] {
        &[
            Self::Guesser,
            Self::Criteria,
            Self::Poster,
            Self::Rating,
            Self::TimedChallenge,
            Self::OscarWins,
            Self::Quote,
        ]
    }

    /// The five games offered on the hub page.
    pub fn hub_games() -> &'static [GameId] {
        &[
            Self::Guesser,
            Self::Criteria,
            Self::Poster,
            Self::Rating,
            Self::TimedChallenge,
        ]
    }

    pub(crate) fn known_ids() -> String {
        Self::all()
            .iter()
            .map(|g| g.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a scoring event ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Win,
    Loss,
    /// Incremental points inside a round; does not count as a game played
    Progress,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Win => "win",
            Self::Loss => "loss",
            Self::Progress => "progress",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "win" => Some(Self::Win),
            "loss" => Some(Self::Loss),
            "progress" => Some(Self::Progress),
            _ => None,
        }
    }

    /// Whether this outcome closes a round.
    pub fn finishes_game(&self) -> bool {
        !matches!(self, Self::Progress)
    }
}

/// How an event-supplied counter merges into the stored one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CounterUpdate {
    Add(i64),
    Max(i64),
    Set(i64),
}

impl CounterUpdate {
    fn apply(self, current: i64) -> i64 {
        match self {
            Self::Add(n) => current.saturating_add(n),
            Self::Max(n) => current.max(n),
            Self::Set(n) => n,
        }
    }
}

/// A scoring outcome reported by a mini-game. Never persisted.
///
/// `game_id` and `points_delta` arrive unchecked from the UI layer and are
/// validated when recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreEvent {
    pub game_id: String,
    pub points_delta: f64,
    #[serde(default = "Utc::now")]
    pub occurred_at: DateTime<Utc>,
    pub outcome: Outcome,
    /// Game-scoped counters merged into `perGameStats`
    #[serde(default)]
    pub counters: BTreeMap<String, CounterUpdate>,
}

impl ScoreEvent {
    pub fn new(game: GameId, points: i64, outcome: Outcome) -> Self {
        Self {
            game_id: game.as_str().to_string(),
            points_delta: points as f64,
            occurred_at: Utc::now(),
            outcome,
            counters: BTreeMap::new(),
        }
    }

    pub fn win(game: GameId, points: i64) -> Self {
        Self::new(game, points, Outcome::Win)
    }

    pub fn loss(game: GameId, points: i64) -> Self {
        Self::new(game, points, Outcome::Loss)
    }

    pub fn progress(game: GameId, points: i64) -> Self {
        Self::new(game, points, Outcome::Progress)
    }

    pub fn with_counter(mut self, name: impl Into<String>, update: CounterUpdate) -> Self {
        self.counters.insert(name.into(), update);
        self
    }

    pub fn at(mut self, occurred_at: DateTime<Utc>) -> Self {
        self.occurred_at = occurred_at;
        self
    }
}

// ============================================================
// PROFILE
// ============================================================

/// The single persisted player profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(default)]
    pub version: u32,
    pub id: String,
    #[serde(default = "default_username")]
    pub username: String,
    #[serde(default = "default_avatar")]
    pub avatar: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, alias = "gameStats")]
    pub stats: Stats,
    #[serde(default)]
    pub achievements: AchievementState,
    #[serde(default)]
    pub daily_quests: DailyQuestState,
}

fn default_username() -> String {
    DEFAULT_USERNAME.to_string()
}

fn default_avatar() -> String {
    AVATARS[0].to_string()
}

impl Profile {
    /// A brand-new profile with a generated id.
    pub fn fresh(now: DateTime<Utc>) -> Self {
        Self {
            version: PROFILE_VERSION,
            id: uuid::Uuid::new_v4().to_string(),
            username: default_username(),
            avatar: default_avatar(),
            created_at: now,
            stats: Stats::default(),
            achievements: AchievementState::default(),
            daily_quests: DailyQuestState::default(),
        }
    }

    /// Bring a loaded profile up to the current schema and repair derived
    /// sets. Returns true if anything changed.
    pub fn normalize(&mut self) -> bool {
        let mut changed = false;

        if self.version < PROFILE_VERSION {
            self.version = PROFILE_VERSION;
            changed = true;
        }

        let before = self.achievements.unlocked.len();
        dedup_in_order(&mut self.achievements.unlocked);
        changed |= before != self.achievements.unlocked.len();

        let quests = &mut self.daily_quests;
        let before = (quests.quest_ids.len(), quests.completed_ids.len());
        dedup_in_order(&mut quests.quest_ids);
        dedup_in_order(&mut quests.completed_ids);
        let selected = quests.quest_ids.clone();
        quests.completed_ids.retain(|id| selected.contains(id));
        changed |= before != (quests.quest_ids.len(), quests.completed_ids.len());

        if self.username.trim().is_empty() {
            self.username = default_username();
            changed = true;
        }

        changed
    }
}

fn dedup_in_order(ids: &mut Vec<String>) {
    let mut seen = Vec::with_capacity(ids.len());
    ids.retain(|id| {
        if seen.contains(id) {
            false
        } else {
            seen.push(id.clone());
            true
        }
    });
}

/// Aggregate statistics. Only the score recorder, the streak tracker and the
/// quest reward path write here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Stats {
    pub total_score: i64,
    pub daily_scores: DailyScores,
    pub games_played: u64,
    pub per_game_stats: BTreeMap<GameId, GameCounters>,
    pub streak: StreakState,
    /// Activity bucket for the most recent day with an event
    pub today: DailyActivity,
}

impl Stats {
    /// Credit points to the running total and to the day's row.
    pub fn apply_points(&mut self, day: NaiveDate, delta: i64, clamp_at_zero: bool) {
        let total = self.total_score.saturating_add(delta);
        self.total_score = if clamp_at_zero { total.max(0) } else { total };
        self.daily_scores.add(day, delta);
    }

    /// Counter value for a game, 0 if never recorded.
    pub fn counter(&self, game: GameId, name: &str) -> i64 {
        self.per_game_stats
            .get(&game)
            .map(|c| c.get(name))
            .unwrap_or(0)
    }

    /// Number of games with at least one finished round.
    pub fn distinct_games_played(&self) -> usize {
        self.per_game_stats
            .values()
            .filter(|c| c.get(counters::PLAYS) > 0)
            .count()
    }

    /// The activity bucket, but only if it belongs to `day`.
    pub fn activity_on(&self, day: NaiveDate) -> Option<&DailyActivity> {
        (self.today.date == Some(day)).then_some(&self.today)
    }
}

/// One day's score row as persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyScore {
    #[serde(with = "date_key")]
    pub date: NaiveDate,
    pub points: i64,
}

/// Per-day score rows, keyed by date so a day can only ever have one row.
///
/// Serialized as a date-ascending list of `{date, points}`. Duplicate rows in
/// older documents are merged by summing their points.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<DailyScore>", into = "Vec<DailyScore>")]
pub struct DailyScores(BTreeMap<NaiveDate, i64>);

impl DailyScores {
    /// Add to the day's row, creating it if needed. Returns the new row total.
    pub fn add(&mut self, day: NaiveDate, delta: i64) -> i64 {
        let points = self.0.entry(day).or_insert(0);
        *points = points.saturating_add(delta);
        *points
    }

    pub fn get(&self, day: NaiveDate) -> i64 {
        self.0.get(&day).copied().unwrap_or(0)
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.0.contains_key(&day)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Rows in date order, oldest first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = DailyScore> + '_ {
        self.0
            .iter()
            .map(|(date, points)| DailyScore { date: *date, points: *points })
    }

    /// Rows with `start <= date <= end`, oldest first.
    pub fn between(&self, start: NaiveDate, end: NaiveDate) -> impl DoubleEndedIterator<Item = DailyScore> + '_ {
        self.0
            .range(start..=end)
            .map(|(date, points)| DailyScore { date: *date, points: *points })
    }

    pub fn latest_day(&self) -> Option<NaiveDate> {
        self.0.keys().next_back().copied()
    }

    /// Highest-scoring day; the earliest one wins a tie.
    pub fn best_day(&self) -> Option<DailyScore> {
        self.iter().fold(None, |best: Option<DailyScore>, row| match best {
            Some(b) if b.points >= row.points => Some(b),
            _ => Some(row),
        })
    }
}

impl From<Vec<DailyScore>> for DailyScores {
    fn from(rows: Vec<DailyScore>) -> Self {
        let mut scores = DailyScores::default();
        for row in rows {
            scores.add(row.date, row.points);
        }
        scores
    }
}

impl From<DailyScores> for Vec<DailyScore> {
    fn from(scores: DailyScores) -> Self {
        scores.iter().collect()
    }
}

/// Named integer counters for one game.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameCounters(BTreeMap<String, i64>);

impl GameCounters {
    pub fn get(&self, name: &str) -> i64 {
        self.0.get(name).copied().unwrap_or(0)
    }

    pub fn try_get(&self, name: &str) -> Option<i64> {
        self.0.get(name).copied()
    }

    pub fn increment(&mut self, name: &str, by: i64) {
        self.apply(name, CounterUpdate::Add(by));
    }

    pub fn apply(&mut self, name: &str, update: CounterUpdate) {
        let value = self.0.entry(name.to_string()).or_insert(0);
        *value = update.apply(*value);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

/// Consecutive-day streak.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StreakState {
    pub current_streak: u32,
    pub best_streak: u32,
    #[serde(with = "opt_date_key")]
    pub last_streak_date: Option<NaiveDate>,
}

/// What happened on a single day, used by daily quests.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DailyActivity {
    #[serde(with = "opt_date_key")]
    pub date: Option<NaiveDate>,
    pub wins: u32,
    pub losses: u32,
    pub per_game: BTreeMap<GameId, GameCounters>,
}

impl DailyActivity {
    /// Start a fresh bucket if the stored one belongs to another day.
    pub fn roll_to(&mut self, day: NaiveDate) {
        if self.date != Some(day) {
            *self = DailyActivity {
                date: Some(day),
                ..DailyActivity::default()
            };
        }
    }

    pub fn counter(&self, game: GameId, name: &str) -> i64 {
        self.per_game.get(&game).map(|c| c.get(name)).unwrap_or(0)
    }

    /// Distinct games with any event on this day.
    pub fn games_touched(&self) -> usize {
        self.per_game.len()
    }
}

/// Unlocked achievements, in unlock order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AchievementState {
    pub unlocked: Vec<String>,
    #[serde(alias = "totalAchievementPoints")]
    pub total_points: u32,
}

impl AchievementState {
    pub fn is_unlocked(&self, id: &str) -> bool {
        self.unlocked.iter().any(|u| u == id)
    }

    /// Record an unlock. Returns false if it was already unlocked.
    pub fn unlock(&mut self, id: &str, points: u32) -> bool {
        if self.is_unlocked(id) {
            return false;
        }
        self.unlocked.push(id.to_string());
        self.total_points = self.total_points.saturating_add(points);
        true
    }
}

/// Today's quest selection and its completion state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DailyQuestState {
    #[serde(with = "opt_date_key", alias = "date")]
    pub for_date: Option<NaiveDate>,
    #[serde(alias = "quests")]
    pub quest_ids: Vec<String>,
    #[serde(alias = "completedQuests")]
    pub completed_ids: Vec<String>,
    #[serde(alias = "totalQuestRewards")]
    pub reward_total: i64,
    /// Quests completed over the whole lifetime of the profile
    pub lifetime_completed: u64,
}

impl DailyQuestState {
    pub fn is_for(&self, day: NaiveDate) -> bool {
        self.for_date == Some(day)
    }

    pub fn is_completed(&self, id: &str) -> bool {
        self.completed_ids.iter().any(|c| c == id)
    }
}

/// "YYYY-MM-DD" (de)serialization for dates.
mod date_key {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::progress::clock::{day_key, parse_day_key};

    pub fn serialize<S: Serializer>(day: &NaiveDate, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&day_key(*day))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(d)?;
        parse_day_key(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid date key '{raw}'")))
    }
}

mod opt_date_key {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::progress::clock::{day_key, parse_day_key};

    pub fn serialize<S: Serializer>(day: &Option<NaiveDate>, s: S) -> Result<S::Ok, S::Error> {
        match day {
            Some(day) => s.serialize_some(&day_key(*day)),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDate>, D::Error> {
        let raw = Option::<String>::deserialize(d)?;
        match raw {
            None => Ok(None),
            Some(raw) => parse_day_key(&raw)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid date key '{raw}'"))),
        }
    }
}

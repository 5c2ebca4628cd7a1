//! Score recorder - the one entry point for score changes
//!
//! A recorded event updates the running total, the day's score row, the
//! per-game counters, today's activity bucket and the streak inside a single
//! store update. "Today" is read inside that update so an event committed
//! just after midnight lands on the new day.
//!
//! Identical events are not deduplicated: a caller that may replay an event
//! must guard against it itself.

use std::collections::BTreeMap;

use anyhow::Result;
use chrono::NaiveDate;

use super::error::EventError;
use super::models::{counters, CounterUpdate, GameId, Outcome, Profile, ScoreEvent, Stats};
use super::store::ProfileStore;
use super::streaks::{self, StreakTransition};

/// Largest accepted absolute points delta for a single event.
pub const MAX_POINTS_DELTA: f64 = 1_000_000_000.0;

/// A score event that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedEvent<'a> {
    pub game: GameId,
    pub points: i64,
    pub outcome: Outcome,
    pub counters: &'a BTreeMap<String, CounterUpdate>,
}

/// Check an incoming event without touching any state.
pub fn validate(event: &ScoreEvent) -> Result<ValidatedEvent<'_>, EventError> {
    let game = GameId::from_str(event.game_id.trim())
        .ok_or_else(|| EventError::UnknownGame(event.game_id.clone()))?;

    let points = event.points_delta;
    if !points.is_finite() {
        return Err(EventError::NonFinitePoints(points));
    }
    if points.fract() != 0.0 {
        return Err(EventError::FractionalPoints(points));
    }
    if points.abs() > MAX_POINTS_DELTA {
        return Err(EventError::PointsOutOfRange(points));
    }
    if event.counters.keys().any(|name| name.trim().is_empty()) {
        return Err(EventError::EmptyCounterName);
    }

    Ok(ValidatedEvent {
        game,
        points: points as i64,
        outcome: event.outcome,
        counters: &event.counters,
    })
}

/// What a successful `record` committed.
#[derive(Debug, Clone)]
pub struct RecordedScore {
    pub profile: Profile,
    /// Day the event was attributed to
    pub day: NaiveDate,
    pub streak: StreakTransition,
}

/// Writes score events into the profile.
#[derive(Clone)]
pub struct ScoreRecorder {
    store: ProfileStore,
    clamp_total_at_zero: bool,
}

impl ScoreRecorder {
    pub fn new(store: ProfileStore) -> Self {
        Self {
            store,
            clamp_total_at_zero: false,
        }
    }

    /// Never let penalties push the running total below zero.
    pub fn clamp_total_at_zero(mut self, clamp: bool) -> Self {
        self.clamp_total_at_zero = clamp;
        self
    }

    pub fn is_clamping(&self) -> bool {
        self.clamp_total_at_zero
    }

    /// Validate and commit a score event.
    pub fn record(&self, event: &ScoreEvent) -> Result<RecordedScore> {
        let valid = validate(event)?;
        let clock = self.store.clock().clone();
        let clamp = self.clamp_total_at_zero;

        let (profile, (day, streak)) = self.store.update_with(|profile| {
            let today = clock.today();
            apply_event(&mut profile.stats, &valid, today, clamp);
            let streak = streaks::on_score_committed(&mut profile.stats.streak, today);
            Ok((today, streak))
        })?;

        tracing::debug!(
            "Recorded {} {} {:+} on {} (total {})",
            valid.game,
            valid.outcome.as_str(),
            valid.points,
            day,
            profile.stats.total_score
        );

        Ok(RecordedScore {
            profile,
            day,
            streak,
        })
    }
}

/// Fold a validated event into the stats for `today`.
pub fn apply_event(stats: &mut Stats, event: &ValidatedEvent<'_>, today: NaiveDate, clamp: bool) {
    stats.apply_points(today, event.points, clamp);

    let finished = event.outcome.finishes_game();
    if finished {
        stats.games_played += 1;
    }

    let game = stats.per_game_stats.entry(event.game).or_default();
    merge_counters(game, event);

    stats.today.roll_to(today);
    match event.outcome {
        Outcome::Win => stats.today.wins += 1,
        Outcome::Loss => stats.today.losses += 1,
        Outcome::Progress => {}
    }
    let day_game = stats.today.per_game.entry(event.game).or_default();
    merge_counters(day_game, event);
}

fn merge_counters(target: &mut super::models::GameCounters, event: &ValidatedEvent<'_>) {
    if event.outcome.finishes_game() {
        target.increment(counters::PLAYS, 1);
    }
    match event.outcome {
        Outcome::Win => target.increment(counters::WINS, 1),
        Outcome::Loss => target.increment(counters::LOSSES, 1),
        Outcome::Progress => {}
    }
    target.increment(counters::POINTS, event.points);

    for (name, update) in event.counters {
        target.apply(name.trim(), *update);
    }
}

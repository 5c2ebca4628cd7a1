//! Score recording, day bucketing and streak behaviour through the engine

mod common;

use std::sync::Arc;

use common::{day, scoring_engine, unlocked_points, MidnightStorage, NO_QUESTS};
use marquee::progress::clock::{Clock, ManualClock};
use marquee::progress::quests::DailyQuestEngine;
use marquee::progress::{EventError, StreakTransition};
use marquee::{GameId, Outcome, ProgressEngine, ProgressEvent, ScoreEvent};

#[test]
fn test_first_win_on_a_fresh_profile() {
    let (engine, clock) = scoring_engine(1);

    let outcome = engine.record(&ScoreEvent::win(GameId::Guesser, 100)).unwrap();
    let stats = &outcome.profile.stats;

    assert_eq!(stats.total_score, 100);
    let rows: Vec<_> = stats.daily_scores.iter().map(|r| (r.date, r.points)).collect();
    assert_eq!(rows, vec![(clock.today(), 100)]);
    assert_eq!(stats.games_played, 1);
    assert_eq!(stats.streak.current_streak, 1);
    assert!(outcome.newly_unlocked().iter().any(|a| a.id == "first_game"));
}

#[test]
fn test_two_events_same_day_share_one_row() {
    let (engine, clock) = scoring_engine(1);

    engine.record(&ScoreEvent::win(GameId::Poster, 50)).unwrap();
    let outcome = engine.record(&ScoreEvent::win(GameId::Quote, 30)).unwrap();

    let stats = &outcome.profile.stats;
    assert_eq!(stats.daily_scores.len(), 1);
    assert_eq!(stats.daily_scores.get(clock.today()), 80);
    assert_eq!(stats.total_score, 80);
}

#[test]
fn test_consecutive_days_extend_the_streak() {
    let (engine, clock) = scoring_engine(1);

    engine.record(&ScoreEvent::win(GameId::Rating, 10)).unwrap();
    clock.advance_days(1);
    let outcome = engine.record(&ScoreEvent::win(GameId::Rating, 10)).unwrap();

    assert_eq!(outcome.profile.stats.streak.current_streak, 2);
    assert_eq!(outcome.profile.stats.daily_scores.len(), 2);
    assert!(matches!(
        outcome.events[0],
        ProgressEvent::StreakChanged(StreakTransition::Extended(2))
    ));
}

#[test]
fn test_gap_resets_the_streak() {
    let (engine, clock) = scoring_engine(1);

    engine.record(&ScoreEvent::win(GameId::Criteria, 10)).unwrap();
    clock.advance_days(3);
    let outcome = engine.record(&ScoreEvent::win(GameId::Criteria, 10)).unwrap();

    assert_eq!(outcome.profile.stats.streak.current_streak, 1);
    assert_eq!(outcome.profile.stats.streak.best_streak, 1);
    assert!(matches!(
        outcome.events[0],
        ProgressEvent::StreakChanged(StreakTransition::Reset { previous: 1 })
    ));
}

#[test]
fn test_streak_over_three_days_and_over_a_gap() {
    let (engine, clock) = scoring_engine(1);
    for _ in 0..3 {
        engine.record(&ScoreEvent::win(GameId::Guesser, 5)).unwrap();
        clock.advance_days(1);
    }
    let profile = engine.profile().unwrap();
    assert_eq!(profile.stats.streak.current_streak, 3);

    let (engine, clock) = scoring_engine(1);
    engine.record(&ScoreEvent::win(GameId::Guesser, 5)).unwrap();
    clock.advance_days(2);
    engine.record(&ScoreEvent::win(GameId::Guesser, 5)).unwrap();
    assert_eq!(engine.profile().unwrap().stats.streak.current_streak, 1);
}

#[test]
fn test_many_events_one_day_sum_into_one_row() {
    let (engine, clock) = scoring_engine(4);
    let deltas = [12, -3, 40, 0, 7, -20, 100, 1];

    for (i, delta) in deltas.iter().enumerate() {
        let outcome = if i % 2 == 0 { Outcome::Win } else { Outcome::Loss };
        engine
            .record(&ScoreEvent::new(GameId::TimedChallenge, *delta, outcome))
            .unwrap();
    }

    let stats = engine.profile().unwrap().stats;
    let sum: i64 = deltas.iter().sum();
    assert_eq!(stats.daily_scores.len(), 1);
    assert_eq!(stats.daily_scores.get(clock.today()), sum);
    assert_eq!(stats.total_score, sum);
}

#[test]
fn test_streak_counts_once_per_day() {
    let (engine, _) = scoring_engine(1);

    engine.record(&ScoreEvent::win(GameId::Guesser, 10)).unwrap();
    let outcome = engine.record(&ScoreEvent::loss(GameId::Guesser, -5)).unwrap();

    assert_eq!(outcome.profile.stats.streak.current_streak, 1);
    assert!(!outcome
        .events
        .iter()
        .any(|e| matches!(e, ProgressEvent::StreakChanged(_))));
}

#[test]
fn test_negative_delta_may_push_total_below_zero() {
    let (engine, clock) = scoring_engine(1);

    let outcome = engine.record(&ScoreEvent::loss(GameId::OscarWins, -25)).unwrap();
    assert_eq!(outcome.profile.stats.total_score, -25);
    assert_eq!(outcome.profile.stats.daily_scores.get(clock.today()), -25);
}

#[test]
fn test_clamping_keeps_total_at_zero_but_not_the_day_row() {
    let (engine, clock) = scoring_engine(1);
    let engine = engine.clamp_total_at_zero(true);

    engine.record(&ScoreEvent::win(GameId::Poster, 10)).unwrap();
    let outcome = engine.record(&ScoreEvent::loss(GameId::Poster, -30)).unwrap();

    assert_eq!(outcome.profile.stats.total_score, 0);
    assert_eq!(outcome.profile.stats.daily_scores.get(clock.today()), -20);
}

#[test]
fn test_invalid_events_change_nothing() {
    let (engine, _) = scoring_engine(1);
    engine.record(&ScoreEvent::win(GameId::Guesser, 10)).unwrap();
    let before = engine.profile().unwrap();

    let mut unknown = ScoreEvent::win(GameId::Guesser, 10);
    unknown.game_id = "x".to_string();
    let err = engine.record(&unknown).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<EventError>(),
        Some(EventError::UnknownGame(id)) if id == "x"
    ));

    let mut nan = ScoreEvent::win(GameId::Guesser, 0);
    nan.points_delta = f64::NAN;
    assert!(engine.record(&nan).is_err());

    let mut fractional = ScoreEvent::win(GameId::Guesser, 0);
    fractional.points_delta = 2.5;
    assert!(engine.record(&fractional).is_err());

    assert_eq!(engine.profile().unwrap(), before);
}

#[test]
fn test_achievement_points_match_unlocked_after_every_record() {
    let (engine, clock) = scoring_engine(1);
    let games = GameId::hub_games();

    for round in 0..12u32 {
        let game = games[round as usize % games.len()];
        let outcome = engine.record(&ScoreEvent::win(game, 60)).unwrap();
        let achievements = &outcome.profile.achievements;
        assert_eq!(
            achievements.total_points,
            unlocked_points(&engine, &achievements.unlocked),
            "round {round}"
        );
        if round % 4 == 3 {
            clock.advance_days(1);
        }
    }

    let unlocked = engine.profile().unwrap().achievements.unlocked;
    for id in ["first_game", "movie_master", "genre_diversity", "on_fire"] {
        assert!(unlocked.iter().any(|u| u == id), "{id} not unlocked");
    }
}

#[test]
fn test_day_rollover_between_records() {
    let (engine, clock) = scoring_engine(1);

    engine.record(&ScoreEvent::win(GameId::Guesser, 10)).unwrap();
    clock.advance_days(1);
    let outcome = engine.record(&ScoreEvent::win(GameId::Guesser, 15)).unwrap();

    assert_eq!(outcome.day, day(2));
    assert_eq!(outcome.profile.stats.daily_scores.get(day(1)), 10);
    assert_eq!(outcome.profile.stats.daily_scores.get(day(2)), 15);
    assert_eq!(outcome.profile.stats.today.wins, 1);
}

#[test]
fn test_midnight_during_load_books_the_event_on_the_new_day() {
    let clock = Arc::new(ManualClock::on_day(day(1)));
    let storage = Arc::new(MidnightStorage::new(clock.clone()));
    let engine = ProgressEngine::new(storage.clone(), clock.clone())
        .with_quests(DailyQuestEngine::with_catalogue(NO_QUESTS));
    engine.profile().unwrap();

    storage.arm();
    let outcome = engine.record(&ScoreEvent::win(GameId::Poster, 30)).unwrap();

    assert_eq!(clock.today(), day(2));
    assert_eq!(outcome.day, day(2));
    let stats = &outcome.profile.stats;
    assert_eq!(stats.daily_scores.get(day(2)), 30);
    assert!(!stats.daily_scores.contains(day(1)));
    assert_eq!(stats.streak.last_streak_date, Some(day(2)));
    assert_eq!(stats.today.date, Some(day(2)));
}
